use agora_types::models::User;
use chrono::NaiveDate;

/// A `users` row including the password hash. Convert to [`User`] before
/// handing it to anything that renders or serializes.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDate,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}
