use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use agora_types::models::User;

use crate::flash::{self, Flash};
use crate::session::{self, Session};
use crate::state::AppState;

/// The authenticated user, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Guard for routes that need a signed-in user. Anonymous requests never
/// reach the handler: they are sent home with a notice.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session::resolve(&state, &jar).await {
        Session::Authenticated(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Session::Anonymous => {
            debug!("Anonymous request to {} redirected", req.uri().path());
            let jar = flash::push(
                session::clear(jar),
                Flash::error("Please log in to access this page."),
            );
            (jar, Redirect::to("/")).into_response()
        }
    }
}
