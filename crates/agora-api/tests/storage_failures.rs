//! Storage faults must never escape a handler: each one ends in a redirect
//! (or a 500 for the JSON API) and the server keeps serving.

mod common;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::http::StatusCode;
use chrono::NaiveDate;

use agora_api::error::GENERIC_FAILURE;
use agora_api::flash::Flash;
use agora_api::password::hash_password;
use agora_db::models::UserRow;
use agora_db::{Database, ForumStore};
use agora_types::models::{CommentListing, Question, QuestionListing};

use common::{TestApp, body_text, flashes, location};

/// Reads go to the real database, every write fails.
struct ReadOnlyStore(Arc<Database>);

impl ForumStore for ReadOnlyStore {
    fn create_user(&self, _: &str, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("attempt to write a readonly database"))
    }
    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.0.get_user_by_username(username)
    }
    fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.0.get_user_by_id(id)
    }
    fn create_question(&self, _: i64, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("attempt to write a readonly database"))
    }
    fn get_question(&self, id: i64) -> Result<Option<Question>> {
        self.0.get_question(id)
    }
    fn list_questions(&self) -> Result<Vec<Question>> {
        self.0.list_questions()
    }
    fn list_question_listings(&self) -> Result<Vec<QuestionListing>> {
        self.0.list_question_listings()
    }
    fn create_comment(&self, _: i64, _: i64, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("attempt to write a readonly database"))
    }
    fn list_comment_listings(&self, question_id: i64) -> Result<Vec<CommentListing>> {
        self.0.list_comment_listings(question_id)
    }
}

/// Every call fails.
struct BrokenStore;

impl ForumStore for BrokenStore {
    fn create_user(&self, _: &str, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("database is locked"))
    }
    fn get_user_by_username(&self, _: &str) -> Result<Option<UserRow>> {
        Err(anyhow!("database is locked"))
    }
    fn get_user_by_id(&self, _: i64) -> Result<Option<UserRow>> {
        Err(anyhow!("database is locked"))
    }
    fn create_question(&self, _: i64, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("database is locked"))
    }
    fn get_question(&self, _: i64) -> Result<Option<Question>> {
        Err(anyhow!("database is locked"))
    }
    fn list_questions(&self) -> Result<Vec<Question>> {
        Err(anyhow!("database is locked"))
    }
    fn list_question_listings(&self) -> Result<Vec<QuestionListing>> {
        Err(anyhow!("database is locked"))
    }
    fn create_comment(&self, _: i64, _: i64, _: &str, _: NaiveDate) -> Result<i64> {
        Err(anyhow!("database is locked"))
    }
    fn list_comment_listings(&self, _: i64) -> Result<Vec<CommentListing>> {
        Err(anyhow!("database is locked"))
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// A read-only app with `alice` (password "p1") and one question seeded.
async fn seeded_read_only() -> (TestApp, String, i64) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let alice = db
        .create_user("alice", &hash_password("p1").unwrap(), day())
        .unwrap();
    let question = db.create_question(alice, "seeded", day()).unwrap();

    let app = TestApp::with_store(db.clone(), Arc::new(ReadOnlyStore(db)));
    let res = app
        .post_form("/signin", "username=alice&password=p1", None)
        .await;
    let token = common::set_cookies(&res)
        .remove(agora_api::session::SESSION_COOKIE)
        .unwrap();
    let cookie = format!("{}={}", agora_api::session::SESSION_COOKIE, token);

    (app, cookie, question)
}

#[tokio::test]
async fn failed_question_write_is_silent() {
    let (app, cookie, _) = seeded_read_only().await;

    let res = app
        .post_form("/create_question", "topicName=lost", Some(&cookie))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert!(flashes(&res).is_empty());
    assert_eq!(app.count("questions"), 1);
}

#[tokio::test]
async fn failed_comment_write_is_flashed() {
    let (app, cookie, question) = seeded_read_only().await;

    let res = app
        .post_form(
            &format!("/create_comment/{question}"),
            "claim_text=lost",
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/comments/{question}"));
    assert_eq!(flashes(&res), vec![Flash::error(GENERIC_FAILURE)]);
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn failed_signup_write_is_flashed() {
    let (app, _, _) = seeded_read_only().await;

    let res = app.signup("bob", "p2").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(flashes(&res), vec![Flash::error(GENERIC_FAILURE)]);
    assert_eq!(app.count("users"), 1);
}

#[tokio::test]
async fn broken_store_never_escapes() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let app = TestApp::with_store(db, Arc::new(BrokenStore));

    let res = app.signup("alice", "p1").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(flashes(&res), vec![Flash::error(GENERIC_FAILURE)]);

    let res = app
        .post_form("/signin", "username=alice&password=p1", None)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(flashes(&res), vec![Flash::error(GENERIC_FAILURE)]);

    let res = app.get("/", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains(GENERIC_FAILURE));

    let res = app.get("/comments/1", None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let res = app.get("/questions_api", None).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
