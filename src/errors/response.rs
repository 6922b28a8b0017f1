use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use urlencoding;
use crate::errors::AppError;

// Converts AppError into the HTTP response the browser sees.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors send the user back to the login page
            AppError::Auth(msg) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                msg
            ).into_response(),

            AppError::Session(e) => {
                tracing::error!("Session failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error").into_response()
            }

            AppError::File(e) => {
                tracing::error!("File failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("File error: {}", e)).into_response()
            }

            AppError::Json(e) => {
                tracing::error!("JSON failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Data error: {}", e)).into_response()
            }

            AppError::Hash(e) => {
                tracing::error!("Password hashing failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }

            AppError::Template(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading page: {}", msg)
            ).into_response(),
        }
    }
}
