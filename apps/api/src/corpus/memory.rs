//! In-memory `RecordStore` used by handler and router tests.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::corpus::store::RecordStore;
use crate::errors::AppError;
use crate::models::poem::{Poem, PoemFilter};
use crate::models::poet::Poet;

#[derive(Default)]
pub struct MemoryStore {
    poets: RwLock<Vec<Poet>>,
    poems: RwLock<Vec<Poem>>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn take<T>(items: impl Iterator<Item = T>, limit: i64) -> Vec<T> {
    items.take(limit.max(0) as usize).collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_poets(&self, limit: i64) -> Result<Vec<Poet>, AppError> {
        Ok(take(self.poets.read().unwrap().iter().cloned(), limit))
    }

    async fn get_poet(&self, id: Uuid) -> Result<Option<Poet>, AppError> {
        Ok(self.poets.read().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert_poet(&self, poet: &Poet) -> Result<(), AppError> {
        self.poets.write().unwrap().push(poet.clone());
        Ok(())
    }

    async fn list_poems(&self, filter: &PoemFilter, limit: i64) -> Result<Vec<Poem>, AppError> {
        let poems = self.poems.read().unwrap();
        Ok(take(
            poems.iter().filter(|p| filter.matches(p)).cloned(),
            limit,
        ))
    }

    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, AppError> {
        Ok(self.poems.read().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert_poem(&self, poem: &Poem) -> Result<(), AppError> {
        self.poems.write().unwrap().push(poem.clone());
        Ok(())
    }

    async fn search_poets(&self, query: &str, limit: i64) -> Result<Vec<Poet>, AppError> {
        let poets = self.poets.read().unwrap();
        Ok(take(
            poets.iter().filter(|p| contains_ci(&p.name, query)).cloned(),
            limit,
        ))
    }

    async fn search_poems(&self, query: &str, limit: i64) -> Result<Vec<Poem>, AppError> {
        let poems = self.poems.read().unwrap();
        Ok(take(
            poems
                .iter()
                .filter(|p| {
                    contains_ci(&p.title, query)
                        || contains_ci(&p.content, query)
                        || contains_ci(&p.poet_name, query)
                })
                .cloned(),
            limit,
        ))
    }

    async fn insert_corpus_if_empty(
        &self,
        poets: &[Poet],
        poems: &[Poem],
    ) -> Result<bool, AppError> {
        let mut stored_poets = self.poets.write().unwrap();
        if !stored_poets.is_empty() {
            return Ok(false);
        }
        let mut stored_poems = self.poems.write().unwrap();
        stored_poets.extend_from_slice(poets);
        stored_poems.extend_from_slice(poems);
        Ok(true)
    }
}
