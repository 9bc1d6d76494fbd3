pub mod auth;
pub mod comments;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod password;
pub mod questions;
pub mod session;
pub mod state;
pub mod views;

use axum::{
    Form, Router,
    extract::rejection::FormRejection,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use state::{AppState, AppStateInner};

/// Assemble every forum route around `state`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(questions::index))
        .route("/signup", get(auth::home).post(auth::signup))
        .route("/signin", get(auth::home).post(auth::signin))
        .route("/comments/{question_id}", get(comments::show))
        .route("/questions_api", get(questions::questions_api))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route("/create_question", get(auth::home).post(questions::create_question))
        .route("/create_comment/{question_id}", post(comments::create_comment))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Malformed form bodies are treated as empty forms so the handler's own
/// presence checks decide what happens.
pub(crate) fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(value)) => value,
        Err(e) => {
            warn!("Unreadable form body: {}", e);
            T::default()
        }
    }
}
