//! Record Store: pluggable, trait-based storage for the poetry corpus.
//!
//! Default: `PgRecordStore` (sqlx/Postgres). Tests use the in-memory store.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::poem::{Poem, PoemFilter};
use crate::models::poet::Poet;
use crate::models::vocab::{Era, Meter, Theme};

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_poets(&self, limit: i64) -> Result<Vec<Poet>, AppError>;
    async fn get_poet(&self, id: Uuid) -> Result<Option<Poet>, AppError>;
    async fn insert_poet(&self, poet: &Poet) -> Result<(), AppError>;

    async fn list_poems(&self, filter: &PoemFilter, limit: i64) -> Result<Vec<Poem>, AppError>;
    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, AppError>;
    async fn insert_poem(&self, poem: &Poem) -> Result<(), AppError>;

    /// Case-insensitive substring match on poet names. No ranking.
    async fn search_poets(&self, query: &str, limit: i64) -> Result<Vec<Poet>, AppError>;
    /// Case-insensitive substring match on title, content and poet name. No ranking.
    async fn search_poems(&self, query: &str, limit: i64) -> Result<Vec<Poem>, AppError>;

    /// Inserts a batch atomically, but only while `poets` is empty. Returns
    /// whether anything was written. Concurrent callers seed at most once.
    async fn insert_corpus_if_empty(
        &self,
        poets: &[Poet],
        poems: &[Poem],
    ) -> Result<bool, AppError>;
}

const POET_COLUMNS: &str = "id, name, bio, era, birth_year, death_year, image_url";
const POEM_COLUMNS: &str = "id, title, poet_id, poet_name, content, theme, meter, created_at";

#[derive(Debug, FromRow)]
struct PoetRow {
    id: Uuid,
    name: String,
    bio: String,
    era: String,
    birth_year: Option<i32>,
    death_year: Option<i32>,
    image_url: Option<String>,
}

#[derive(Debug, FromRow)]
struct PoemRow {
    id: Uuid,
    title: String,
    poet_id: Uuid,
    poet_name: String,
    content: String,
    theme: String,
    meter: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PoetRow> for Poet {
    type Error = AppError;

    fn try_from(row: PoetRow) -> Result<Self, Self::Error> {
        let era = row
            .era
            .parse::<Era>()
            .map_err(|e| AppError::Internal(anyhow!("poet {} has {e}", row.id)))?;
        Ok(Poet {
            id: row.id,
            name: row.name,
            bio: row.bio,
            era,
            birth_year: row.birth_year,
            death_year: row.death_year,
            image_url: row.image_url,
        })
    }
}

impl TryFrom<PoemRow> for Poem {
    type Error = AppError;

    fn try_from(row: PoemRow) -> Result<Self, Self::Error> {
        let theme = row
            .theme
            .parse::<Theme>()
            .map_err(|e| AppError::Internal(anyhow!("poem {} has {e}", row.id)))?;
        let meter = row
            .meter
            .as_deref()
            .map(str::parse::<Meter>)
            .transpose()
            .map_err(|e| AppError::Internal(anyhow!("poem {} has {e}", row.id)))?;
        Ok(Poem {
            id: row.id,
            title: row.title,
            poet_id: row.poet_id,
            poet_name: row.poet_name,
            content: row.content,
            theme,
            meter,
            created_at: row.created_at,
        })
    }
}

fn into_poets(rows: Vec<PoetRow>) -> Result<Vec<Poet>, AppError> {
    rows.into_iter().map(Poet::try_from).collect()
}

fn into_poems(rows: Vec<PoemRow>) -> Result<Vec<Poem>, AppError> {
    rows.into_iter().map(Poem::try_from).collect()
}

/// Wraps `query` as an ILIKE pattern that matches it literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_POET: &str = r#"
    INSERT INTO poets (id, name, bio, era, birth_year, death_year, image_url)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const INSERT_POEM: &str = r#"
    INSERT INTO poems (id, title, poet_id, poet_name, content, theme, meter, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

fn bind_poet<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    poet: &'q Poet,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(poet.id)
        .bind(&poet.name)
        .bind(&poet.bio)
        .bind(poet.era.as_str())
        .bind(poet.birth_year)
        .bind(poet.death_year)
        .bind(&poet.image_url)
}

fn bind_poem<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    poem: &'q Poem,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(poem.id)
        .bind(&poem.title)
        .bind(poem.poet_id)
        .bind(&poem.poet_name)
        .bind(&poem.content)
        .bind(poem.theme.as_str())
        .bind(poem.meter.map(|m| m.as_str()))
        .bind(poem.created_at)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_poets(&self, limit: i64) -> Result<Vec<Poet>, AppError> {
        let rows: Vec<PoetRow> = sqlx::query_as(&format!(
            "SELECT {POET_COLUMNS} FROM poets ORDER BY created_at LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_poets(rows)
    }

    async fn get_poet(&self, id: Uuid) -> Result<Option<Poet>, AppError> {
        let row: Option<PoetRow> =
            sqlx::query_as(&format!("SELECT {POET_COLUMNS} FROM poets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Poet::try_from).transpose()
    }

    async fn insert_poet(&self, poet: &Poet) -> Result<(), AppError> {
        bind_poet(sqlx::query(INSERT_POET), poet)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_poems(&self, filter: &PoemFilter, limit: i64) -> Result<Vec<Poem>, AppError> {
        let rows: Vec<PoemRow> = sqlx::query_as(&format!(
            r#"
            SELECT {POEM_COLUMNS} FROM poems
            WHERE ($1::uuid IS NULL OR poet_id = $1)
              AND ($2::text IS NULL OR theme = $2)
            ORDER BY created_at
            LIMIT $3
            "#
        ))
        .bind(filter.poet_id)
        .bind(filter.theme.map(|t| t.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_poems(rows)
    }

    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, AppError> {
        let row: Option<PoemRow> =
            sqlx::query_as(&format!("SELECT {POEM_COLUMNS} FROM poems WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Poem::try_from).transpose()
    }

    async fn insert_poem(&self, poem: &Poem) -> Result<(), AppError> {
        bind_poem(sqlx::query(INSERT_POEM), poem)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search_poets(&self, query: &str, limit: i64) -> Result<Vec<Poet>, AppError> {
        let rows: Vec<PoetRow> = sqlx::query_as(&format!(
            "SELECT {POET_COLUMNS} FROM poets WHERE name ILIKE $1 LIMIT $2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_poets(rows)
    }

    async fn search_poems(&self, query: &str, limit: i64) -> Result<Vec<Poem>, AppError> {
        let rows: Vec<PoemRow> = sqlx::query_as(&format!(
            r#"
            SELECT {POEM_COLUMNS} FROM poems
            WHERE title ILIKE $1 OR content ILIKE $1 OR poet_name ILIKE $1
            LIMIT $2
            "#
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_poems(rows)
    }

    async fn insert_corpus_if_empty(
        &self,
        poets: &[Poet],
        poems: &[Poem],
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        // Blocks a second seeder (and other writers) until this one commits.
        sqlx::query("LOCK TABLE poets IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM poets")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        for poet in poets {
            bind_poet(sqlx::query(INSERT_POET), poet)
                .execute(&mut *tx)
                .await?;
        }
        for poem in poems {
            bind_poem(sqlx::query(INSERT_POEM), poem)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(true)
    }
}
