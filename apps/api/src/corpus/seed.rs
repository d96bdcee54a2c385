//! Sample corpus for `POST /api/init-data`.

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::corpus::store::RecordStore;
use crate::errors::AppError;
use crate::models::poem::Poem;
use crate::models::poet::Poet;
use crate::models::vocab::{Era, Meter, Theme};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub seeded: bool,
    pub poets: usize,
    pub poems: usize,
}

/// Two poets with one poem each. Ids are fresh on every call.
pub fn sample_corpus() -> (Vec<Poet>, Vec<Poem>) {
    let mutanabbi = Poet {
        id: Uuid::new_v4(),
        name: "أبو الطيب المتنبي".to_string(),
        bio: "أحد أعظم شعراء العربية، عُرف بفصاحته وحكمته وعزة نفسه. وُلد في الكوفة وعاش في القرن الرابع الهجري.".to_string(),
        era: Era::Abbasid,
        birth_year: Some(915),
        death_year: Some(965),
        image_url: Some("https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=300&fit=crop&crop=face".to_string()),
    };
    let imru_al_qais = Poet {
        id: Uuid::new_v4(),
        name: "امرؤ القيس".to_string(),
        bio: "شاعر جاهلي، يُعتبر من أصحاب المعلقات السبع. عُرف بشعر الغزل والوصف والحماسة.".to_string(),
        era: Era::PreIslamic,
        birth_year: Some(501),
        death_year: Some(544),
        image_url: Some("https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=300&h=300&fit=crop&crop=face".to_string()),
    };

    let poems = vec![
        Poem {
            id: Uuid::new_v4(),
            title: "على قدر أهل العزم".to_string(),
            poet_id: mutanabbi.id,
            poet_name: mutanabbi.name.clone(),
            content: "على قدر أهل العزم تأتي العزائم\n\
                      وتأتي على قدر الكرام المكارم\n\
                      وتعظم في عين الصغير صغارها\n\
                      وتصغر في عين العظيم العظائم"
                .to_string(),
            theme: Theme::Wisdom,
            meter: Some(Meter::Tawil),
            created_at: Utc::now(),
        },
        Poem {
            id: Uuid::new_v4(),
            title: "قفا نبك من ذكرى حبيب ومنزل".to_string(),
            poet_id: imru_al_qais.id,
            poet_name: imru_al_qais.name.clone(),
            content: "قفا نبك من ذكرى حبيب ومنزل\n\
                      بسقط اللوى بين الدخول فحومل\n\
                      فتوضح فالمقراة لم يعف رسمها\n\
                      لما نسجتها من جنوب وشمأل"
                .to_string(),
            theme: Theme::Love,
            meter: Some(Meter::Tawil),
            created_at: Utc::now(),
        },
    ];

    (vec![mutanabbi, imru_al_qais], poems)
}

/// Seeds the sample corpus unless poets already exist.
pub async fn seed_sample_corpus(store: &dyn RecordStore) -> Result<SeedOutcome, AppError> {
    let (poets, poems) = sample_corpus();
    if !store.insert_corpus_if_empty(&poets, &poems).await? {
        info!("Corpus already populated, skipping sample data");
        return Ok(SeedOutcome {
            seeded: false,
            poets: 0,
            poems: 0,
        });
    }

    info!(
        "Seeded sample corpus: {} poets, {} poems",
        poets.len(),
        poems.len()
    );

    Ok(SeedOutcome {
        seeded: true,
        poets: poets.len(),
        poems: poems.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::memory::MemoryStore;
    use crate::models::poem::PoemFilter;

    #[test]
    fn test_sample_poems_reference_sample_poets() {
        let (poets, poems) = sample_corpus();
        for poem in &poems {
            let poet = poets.iter().find(|p| p.id == poem.poet_id).unwrap();
            assert_eq!(poet.name, poem.poet_name);
            assert!(poem.validate().is_ok());
        }
        assert!(poets.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_sample_verse_lines_have_no_leading_whitespace() {
        let (_, poems) = sample_corpus();
        for line in poems[0].content.lines() {
            assert_eq!(line, line.trim_start());
        }
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_populated() {
        let store = MemoryStore::default();

        let first = seed_sample_corpus(&store).await.unwrap();
        assert_eq!(
            first,
            SeedOutcome {
                seeded: true,
                poets: 2,
                poems: 2
            }
        );

        let second = seed_sample_corpus(&store).await.unwrap();
        assert!(!second.seeded);
        assert_eq!(store.list_poets(100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_seeds_write_once() {
        let store = MemoryStore::default();

        let (a, b) = tokio::join!(seed_sample_corpus(&store), seed_sample_corpus(&store));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(a.seeded ^ b.seeded, "exactly one seeder should write");
        assert_eq!(store.list_poets(100).await.unwrap().len(), 2);
        let poems = store.list_poems(&PoemFilter::default(), 100).await.unwrap();
        assert_eq!(poems.len(), 2);
    }
}
