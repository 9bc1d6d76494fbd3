use axum::{
    Extension, Form,
    extract::{State, rejection::FormRejection},
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use tracing::info;

use agora_types::api::CredentialsForm;
use agora_types::models::User;

use crate::error::ForumError;
use crate::flash::{self, Flash};
use crate::middleware::CurrentUser;
use crate::password::{hash_password, verify_password};
use crate::session;
use crate::state::{AppState, AppStateInner, today};

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let notice = match register(&state, crate::form_or_default(form)).await {
        Ok(user_id) => {
            info!("User {} registered", user_id);
            Flash::info("User added successfully")
        }
        Err(e) => {
            e.log("signup");
            e.flash()
        }
    };

    (flash::push(jar, notice), Redirect::to("/"))
}

/// Check-then-insert. The schema's UNIQUE constraint catches the race
/// between two concurrent signups for the same name.
async fn register(state: &AppStateInner, form: CredentialsForm) -> Result<i64, ForumError> {
    let username = form.username.trim().to_owned();
    if username.is_empty() || form.password.is_empty() {
        return Err(ForumError::MissingCredentials);
    }

    let lookup = username.clone();
    if state
        .db(move |db| db.get_user_by_username(&lookup))
        .await?
        .is_some()
    {
        return Err(ForumError::DuplicateUsername);
    }

    let password_hash = hash_password(&form.password)?;
    let created_at = today();

    state
        .db(move |db| db.create_user(&username, &password_hash, created_at))
        .await
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    match authenticate(&state, crate::form_or_default(form)).await {
        Ok((user, token)) => {
            info!("User {} signed in", user.id);
            (session::establish(jar, token), Redirect::to("/"))
        }
        Err(e) => {
            e.log("signin");
            (flash::push(jar, e.flash()), Redirect::to("/"))
        }
    }
}

async fn authenticate(
    state: &AppStateInner,
    form: CredentialsForm,
) -> Result<(User, String), ForumError> {
    let username = form.username.trim().to_owned();
    let row = state
        .db(move |db| db.get_user_by_username(&username))
        .await?
        .ok_or(ForumError::InvalidCredentials)?;

    if !verify_password(&row.password_hash, &form.password) {
        return Err(ForumError::InvalidCredentials);
    }

    let user = User::from(row);
    let token = state.session.issue(&user)?;
    Ok((user, token))
}

/// Always ends Anonymous; there is nothing here that can fail.
pub async fn logout(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    info!("User {} logged out", user.id);
    (session::clear(jar), Redirect::to("/"))
}

/// `GET` on the form endpoints just lands back on the home page.
pub async fn home() -> Redirect {
    Redirect::to("/")
}
