/// Row types that stay inside the store. Public records (posts, comments,
/// votes, reactions) are mapped straight into `forum_types::models`.
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Full user row, including the password hash. Only the identity service sees this.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
