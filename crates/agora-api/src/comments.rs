use axum::{
    Extension, Form,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use minijinja::context;
use tracing::{debug, info, warn};

use agora_types::api::CommentForm;

use crate::error::ForumError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::session::Session;
use crate::state::{AppState, AppStateInner, today};

pub async fn show(
    State(state): State<AppState>,
    question_id: Result<Path<i64>, PathRejection>,
    session: Session,
    jar: CookieJar,
) -> Response {
    let Some(question_id) = question_id_or_home(question_id) else {
        return Redirect::to("/").into_response();
    };

    let loaded = state
        .db(move |db| {
            let Some(question) = db.get_question(question_id)? else {
                return Ok(None);
            };
            let author = db.get_user_by_id(question.author_id)?.map(|u| u.username);
            let comments = db.list_comment_listings(question_id)?;
            Ok(Some((question, author, comments)))
        })
        .await;

    let (question, author, comments) = match loaded {
        Ok(Some(found)) => found,
        Ok(None) => {
            debug!("Question {} not found", question_id);
            return Redirect::to("/").into_response();
        }
        Err(e) => {
            e.log("loading comments");
            return Redirect::to("/").into_response();
        }
    };

    let (jar, flashes) = flash::take(jar);
    let page = state.views.render(
        "comments.html",
        context! {
            user => session.user(),
            flashes => flashes,
            question => question,
            author => author,
            comments => comments,
        },
    );

    match page {
        Ok(html) => (jar, html).into_response(),
        Err(e) => {
            e.log("rendering comments");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create_comment(
    State(state): State<AppState>,
    question_id: Result<Path<i64>, PathRejection>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    form: Result<Form<CommentForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let Some(question_id) = question_id_or_home(question_id) else {
        return (jar, Redirect::to("/"));
    };
    let back = format!("/comments/{}", question_id);
    let text = crate::form_or_default(form).claim_text;

    match add_comment(&state, question_id, user.id, text).await {
        Ok(id) => {
            info!("Comment {} on question {} by user {}", id, question_id, user.id);
            (jar, Redirect::to(&back))
        }
        Err(e @ ForumError::QuestionNotFound(_)) => {
            e.log("commenting");
            (flash::push(jar, e.flash()), Redirect::to("/"))
        }
        Err(e) => {
            e.log("commenting");
            (flash::push(jar, e.flash()), Redirect::to(&back))
        }
    }
}

/// A question id that doesn't parse is treated like a missing question.
fn question_id_or_home(path: Result<Path<i64>, PathRejection>) -> Option<i64> {
    match path {
        Ok(Path(id)) => Some(id),
        Err(e) => {
            warn!("Unreadable question id: {}", e);
            None
        }
    }
}

async fn add_comment(
    state: &AppStateInner,
    question_id: i64,
    author_id: i64,
    text: String,
) -> Result<i64, ForumError> {
    if text.trim().is_empty() {
        return Err(ForumError::EmptyComment);
    }

    let created_at = today();
    state
        .db(move |db| {
            if db.get_question(question_id)?.is_none() {
                return Ok(None);
            }
            db.create_comment(question_id, author_id, &text, created_at).map(Some)
        })
        .await?
        .ok_or(ForumError::QuestionNotFound(question_id))
}
