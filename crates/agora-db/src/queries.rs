use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use agora_types::models::{CommentListing, Question, QuestionListing};

use crate::models::UserRow;
use crate::{Database, ForumStore};

impl ForumStore for Database {
    // -- Users --

    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: NaiveDate,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                params![username, password_hash, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
            )
        })
    }

    fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, username, password_hash, created_at FROM users WHERE id = ?1",
                params![id],
            )
        })
    }

    // -- Questions --

    fn create_question(&self, author_id: i64, text: &str, created_at: NaiveDate) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (text, author_id, created_at) VALUES (?1, ?2, ?3)",
                params![text, author_id, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get_question(&self, id: i64) -> Result<Option<Question>> {
        self.with_conn(|conn| {
            let question = conn
                .query_row(
                    "SELECT id, text, author_id, created_at FROM questions WHERE id = ?1",
                    [id],
                    question_from_row,
                )
                .optional()?;
            Ok(question)
        })
    }

    fn list_questions(&self) -> Result<Vec<Question>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, text, author_id, created_at FROM questions ORDER BY id")?;
            let rows = stmt
                .query_map([], question_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn list_question_listings(&self) -> Result<Vec<QuestionListing>> {
        // Inner join: a question whose author row is missing is not listed.
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT q.id, q.text, u.username, q.created_at
                 FROM questions q
                 JOIN users u ON u.id = q.author_id
                 ORDER BY q.id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(QuestionListing {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        username: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments --

    fn create_comment(
        &self,
        question_id: i64,
        author_id: i64,
        text: &str,
        created_at: NaiveDate,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (question_id, author_id, text, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![question_id, author_id, text, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn list_comment_listings(&self, question_id: i64) -> Result<Vec<CommentListing>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.question_id, c.author_id, u.username, c.text, c.created_at
                 FROM comments c
                 JOIN users u ON u.id = c.author_id
                 WHERE c.question_id = ?1
                 ORDER BY c.id",
            )?;
            let rows = stmt
                .query_map([question_id], |row| {
                    Ok(CommentListing {
                        id: row.get(0)?,
                        question_id: row.get(1)?,
                        author_id: row.get(2)?,
                        username: row.get(3)?,
                        text: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(sql, params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        text: row.get(1)?,
        author_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}
