use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::vocab::{Meter, Theme};

/// A poem. `poet_id` is a soft reference: nothing checks that the poet exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub poet_id: Uuid,
    /// Denormalized for display.
    pub poet_name: String,
    pub content: String,
    pub theme: Theme,
    pub meter: Option<Meter>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Poem {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("poet_name", &self.poet_name),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

/// Optional filters for listing poems. Both are exact matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoemFilter {
    pub poet_id: Option<Uuid>,
    pub theme: Option<Theme>,
}

impl PoemFilter {
    pub fn matches(&self, poem: &Poem) -> bool {
        self.poet_id.map_or(true, |id| poem.poet_id == id)
            && self.theme.map_or(true, |theme| poem.theme == theme)
    }
}
