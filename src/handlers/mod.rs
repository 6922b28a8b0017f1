mod auth;
mod home;
mod gallery;
mod alumni;
mod profile;

pub use auth::{serve_login_page, handle_auth, handle_logout};
pub use home::serve_homepage;
pub use gallery::{serve_gallery, submit_comment, comments_fragment};
pub use alumni::{serve_alumni, add_alumni, alumni_fragment};
pub use profile::{serve_profile, save_profile};

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::{UserSession, SESSION_KEY};

pub(crate) async fn current_user(session: &Session) -> AppResult<Option<UserSession>> {
    Ok(session.get::<UserSession>(SESSION_KEY).await?)
}

pub(crate) enum Flash<'a> {
    Error(&'a str),
    Notice(&'a str),
}

/// Redirect to `path`, carrying a status line for the next page load.
pub(crate) fn redirect_with(path: &str, flash: Flash<'_>) -> Response {
    let (key, msg) = match flash {
        Flash::Error(msg) => ("error", msg),
        Flash::Notice(msg) => ("notice", msg),
    };
    Redirect::to(&format!("{}?{}={}", path, key, urlencoding::encode(msg))).into_response()
}
