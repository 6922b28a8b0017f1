use axum::{
    extract::{Form, Query, State},
    response::{Html, Response},
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::{FlashQuery, ProfileForm};
use crate::state::AppState;
use crate::views::{profile_display_html, Page};
use super::{current_user, redirect_with, Flash};

pub async fn serve_profile(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let user = current_user(&session).await?;

    let display = match &user {
        Some(user) => {
            let profile = state.store.load_profile(&user.username).await;
            profile_display_html(profile.as_ref())
        }
        None => "<p>Please log in to view your profile.</p>".to_string(),
    };

    let content = state.views
        .template("profile.html")
        .await?
        .replace("{{profile_display}}", &display);
    let html = state.views
        .render(Page { title: "Profile", user: user.as_ref(), flash: &flash }, &content)
        .await?;
    Ok(Html(html))
}

pub async fn save_profile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let Some(user) = current_user(&session).await? else {
        return Ok(redirect_with("/profile", Flash::Error("You must be logged in to save your info.")));
    };

    let info = form.info.trim();
    if info.is_empty() {
        return Ok(redirect_with("/profile", Flash::Error("Please enter some text to save.")));
    }

    state.store.append_profile(&user.username, info).await?;
    Ok(redirect_with("/profile", Flash::Notice("Your info has been saved successfully!")))
}
