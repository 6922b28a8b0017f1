use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::Request,
};
use tower_sessions::Session;
use crate::errors::AppError;
use crate::models::{UserSession, SESSION_KEY};

/// Lets the request through only when the session holds a user.
pub async fn require_auth(
    session: Session,
    req: Request,
    next: Next,
) -> Response {
    match session.get::<UserSession>(SESSION_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            tracing::debug!("Anonymous request to {} rejected", req.uri().path());
            AppError::Auth("Please log in first.".into()).into_response()
        }
        Err(e) => AppError::Session(e).into_response(),
    }
}
