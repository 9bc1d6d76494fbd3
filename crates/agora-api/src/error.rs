use thiserror::Error;
use tracing::{debug, error};

use crate::flash::Flash;
use crate::password::PasswordError;
use crate::session::SessionError;

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later";

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("username already exists")]
    DuplicateUsername,
    #[error("username or password is incorrect")]
    InvalidCredentials,
    #[error("comment text is empty")]
    EmptyComment,
    #[error("question {0} not found")]
    QuestionNotFound(i64),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("session: {0}")]
    Session(#[from] SessionError),
    #[error("template: {0}")]
    Render(#[from] minijinja::Error),
    #[error("storage: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("blocking task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ForumError {
    /// Business-rule failures the user caused, as opposed to faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials
                | Self::DuplicateUsername
                | Self::InvalidCredentials
                | Self::EmptyComment
                | Self::QuestionNotFound(_)
        )
    }

    /// The notice shown to the user. Faults all collapse to the generic text.
    pub fn flash(&self) -> Flash {
        match self {
            Self::MissingCredentials => Flash::error("Username and password are required"),
            Self::DuplicateUsername => Flash::error("User already exists"),
            Self::InvalidCredentials => Flash::error("Username or password is incorrect"),
            Self::EmptyComment => Flash::error("Comment cannot be empty"),
            Self::QuestionNotFound(_) => Flash::error("Question not found"),
            _ => Flash::error(GENERIC_FAILURE),
        }
    }

    pub fn log(&self, action: &str) {
        if self.is_user_error() {
            debug!("{} rejected: {}", action, self);
        } else {
            error!("{} failed: {}", action, self);
        }
    }
}
