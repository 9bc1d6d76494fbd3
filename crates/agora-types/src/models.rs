use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Public view of a user. The password hash never leaves `agora-db`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub created_at: NaiveDate,
}

/// A question joined with its author's username, as shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionListing {
    pub id: i64,
    pub text: String,
    pub username: String,
    pub created_at: NaiveDate,
}

/// A comment joined with the commenter's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentListing {
    pub id: i64,
    pub question_id: i64,
    pub author_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: NaiveDate,
}
