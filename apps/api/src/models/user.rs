#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reader account. Stored in `users`; no endpoint writes it yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Poem ids, in the order they were favorited.
    pub favorites: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorites_keep_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let user: User = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "username": "qari",
            "email": "qari@example.com",
            "favorites": [first, second],
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.favorites, vec![first, second]);
    }
}
