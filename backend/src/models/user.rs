use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub entry_count: i64,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: User, entry_count: i64) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            entry_count,
            created_at: user.created_at,
        }
    }
}
