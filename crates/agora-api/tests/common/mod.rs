#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use agora_api::flash::{self, FLASH_COOKIE, Flash};
use agora_api::session::{SESSION_COOKIE, SessionConfig};
use agora_api::AppStateInner;
use agora_db::{Database, ForumStore};

pub struct TestApp {
    pub db: Arc<Database>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        Self::with_store(db.clone(), db)
    }

    /// `db` is the backing database used for assertions; `store` is what
    /// the handlers see.
    pub fn with_store(db: Arc<Database>, store: Arc<dyn ForumStore>) -> Self {
        let state = AppStateInner::new(store, SessionConfig::new("test-secret", 30)).unwrap();
        Self {
            db,
            router: agora_api::router(state),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.send(req.body(Body::from(body.to_owned())).unwrap()).await
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn signup(&self, username: &str, password: &str) -> Response {
        self.post_form(
            "/signup",
            &format!("username={username}&password={password}"),
            None,
        )
        .await
    }

    /// Sign up and sign in; returns a `Cookie` header value for the session.
    pub async fn login(&self, username: &str, password: &str) -> String {
        self.signup(username, password).await;
        let res = self
            .post_form(
                "/signin",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        let token = set_cookies(&res)
            .remove(SESSION_COOKIE)
            .expect("signin should set a session cookie");
        format!("{SESSION_COOKIE}={token}")
    }

    pub fn count(&self, table: &str) -> i64 {
        self.db
            .with_conn(|conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
            })
            .unwrap()
    }
}

/// Cookies set by a response, name to value. Removals show up as "".
pub fn set_cookies(res: &Response) -> HashMap<String, String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .collect()
}

pub fn flashes(res: &Response) -> Vec<Flash> {
    set_cookies(res)
        .get(FLASH_COOKIE)
        .map(|v| flash::decode(v))
        .unwrap_or_default()
}

pub fn location(res: &Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
