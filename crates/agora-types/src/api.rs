use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Question;

// -- Session --

/// Claims carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

// -- Forms --
//
// Every field defaults to an empty string so a missing field reaches the
// handler as a presence-check failure instead of a 422 rejection.

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionForm {
    #[serde(default, rename = "topicName")]
    pub topic_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub claim_text: String,
}

// -- Read API --

/// One element of `GET /questions_api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub text: String,
    /// Author id.
    pub user: i64,
    pub created_at: NaiveDate,
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            user: q.author_id,
            created_at: q.created_at,
        }
    }
}
