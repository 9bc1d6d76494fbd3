pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use agora_types::models::{CommentListing, Question, QuestionListing};

use crate::models::UserRow;

/// Persistence operations the forum needs. There are no update or delete
/// operations: every row is immutable once written.
pub trait ForumStore: Send + Sync {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: NaiveDate,
    ) -> Result<i64>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>>;
    fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>>;

    fn create_question(&self, author_id: i64, text: &str, created_at: NaiveDate) -> Result<i64>;
    fn get_question(&self, id: i64) -> Result<Option<Question>>;
    fn list_questions(&self) -> Result<Vec<Question>>;
    fn list_question_listings(&self) -> Result<Vec<QuestionListing>>;

    fn create_comment(
        &self,
        question_id: i64,
        author_id: i64,
        text: &str,
        created_at: NaiveDate,
    ) -> Result<i64>;
    fn list_comment_listings(&self, question_id: i64) -> Result<Vec<CommentListing>>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}
