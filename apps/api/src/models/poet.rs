use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::vocab::Era;

/// A poet in the corpus. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poet {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub era: Era,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub image_url: Option<String>,
}

impl Poet {
    /// Rejects records the corpus should never hold.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        if self.bio.trim().is_empty() {
            return Err(AppError::Validation("bio cannot be empty".to_string()));
        }
        if let (Some(born), Some(died)) = (self.birth_year, self.death_year) {
            if born > died {
                return Err(AppError::Validation(format!(
                    "birth_year ({born}) is after death_year ({died})"
                )));
            }
        }
        Ok(())
    }
}
