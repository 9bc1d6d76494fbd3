use axum::{
    Extension, Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use minijinja::context;
use tracing::{debug, info};

use agora_types::api::{QuestionForm, QuestionRecord};

use crate::error::ForumError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::session::Session;
use crate::state::{AppState, today};

pub async fn index(State(state): State<AppState>, session: Session, jar: CookieJar) -> Response {
    let (jar, mut flashes) = flash::take(jar);

    let questions = match state.db(|db| db.list_question_listings()).await {
        Ok(questions) => questions,
        Err(e) => {
            e.log("listing questions");
            flashes.push(e.flash());
            Vec::new()
        }
    };

    let page = state.views.render(
        "index.html",
        context! {
            user => session.user(),
            flashes => flashes,
            questions => questions,
        },
    );

    match page {
        Ok(html) => (jar, html).into_response(),
        Err(e) => {
            e.log("rendering index");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Failures here are logged but never reported back to the user.
pub async fn create_question(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    form: Result<Form<QuestionForm>, FormRejection>,
) -> Redirect {
    let text = crate::form_or_default(form).topic_name;
    if text.trim().is_empty() {
        debug!("Ignoring empty question from user {}", user.id);
        return Redirect::to("/");
    }

    let author_id = user.id;
    let created_at = today();
    match state
        .db(move |db| db.create_question(author_id, &text, created_at))
        .await
    {
        Ok(id) => info!("Question {} created by user {}", id, author_id),
        Err(e) => e.log("creating question"),
    }

    Redirect::to("/")
}

pub async fn questions_api(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionRecord>>, StatusCode> {
    let questions = state
        .db(|db| db.list_questions())
        .await
        .map_err(|e: ForumError| {
            e.log("question API");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(questions.into_iter().map(QuestionRecord::from).collect()))
}
