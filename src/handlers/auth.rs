use axum::{
    extract::{Form, Query, State},
    response::{Html, Response},
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::{verify_password, AuthAction, AuthForm, FlashQuery, UserSession, SESSION_KEY};
use crate::state::AppState;
use crate::views::Page;
use super::{current_user, redirect_with, Flash};

async fn render_login(state: &AppState, user: Option<&UserSession>, flash: &FlashQuery) -> AppResult<Html<String>> {
    let content = state.views.template("login.html").await?;
    let html = state.views
        .render(Page { title: "Login", user, flash }, &content)
        .await?;
    Ok(Html(html))
}

pub async fn serve_login_page(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let user = current_user(&session).await?;
    render_login(&state, user.as_ref(), &flash).await
}

#[axum::debug_handler]
pub async fn handle_auth(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AuthForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(redirect_with("/login", Flash::Error("Please enter both username and password.")));
    }

    let credentials = state.store.get_credentials().await;

    match form.action {
        AuthAction::Login => {
            tracing::info!("Login attempt for user: {}", username);
            let verified = match credentials.stored_password(username) {
                Some(stored) => verify_password(&form.password, stored)?,
                None => false,
            };
            if !verified {
                tracing::warn!("Rejected login for user: {}", username);
                return Ok(redirect_with("/login", Flash::Error("Invalid username or password.")));
            }

            session
                .insert(SESSION_KEY, UserSession { username: username.to_string() })
                .await?;
            tracing::info!("User logged in: {}", username);
            let msg = format!("Login successful. Welcome {}!", username);
            Ok(redirect_with("/homepage", Flash::Notice(&msg)))
        }
        AuthAction::Signup => {
            if credentials.contains(username) {
                return Ok(redirect_with("/login", Flash::Error("Username already exists. Try logging in.")));
            }

            let stored = if state.auth.hash_passwords {
                bcrypt::hash(form.password.as_bytes(), state.auth.bcrypt_cost)?
            } else {
                form.password.clone()
            };
            // a concurrent signup may have taken the name since the check above
            if !state.store.register_user(username, stored).await? {
                return Ok(redirect_with("/login", Flash::Error("Username already exists. Try logging in.")));
            }

            let msg = format!("Sign-up successful! You can now log in, {}.", username);
            Ok(redirect_with("/login", Flash::Notice(&msg)))
        }
    }
}

#[axum::debug_handler]
pub async fn handle_logout(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Html<String>> {
    if let Some(user) = session.remove::<UserSession>(SESSION_KEY).await? {
        tracing::info!("User logged out: {}", user.username);
    }
    let flash = FlashQuery { error: None, notice: Some("You have logged out.".into()) };
    render_login(&state, None, &flash).await
}
