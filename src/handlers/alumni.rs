use axum::{
    extract::{Form, Query, State},
    response::{Html, Response},
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::{AddOutcome, AlumniForm, FlashQuery};
use crate::state::AppState;
use crate::views::{alumni_list_html, html_escape, Page};
use super::{current_user, redirect_with, Flash};

pub async fn serve_alumni(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let user = current_user(&session).await?;
    let alumni = state.store.load_alumni().await;
    let suggested = user.as_ref().map(|u| html_escape(&u.username)).unwrap_or_default();

    let content = state.views
        .template("alumni.html")
        .await?
        .replace("{{suggested_name}}", &suggested)
        .replace("{{alumni_list}}", &alumni_list_html(&alumni));
    let html = state.views
        .render(Page { title: "Alumni", user: user.as_ref(), flash: &flash }, &content)
        .await?;
    Ok(Html(html))
}

pub async fn add_alumni(
    State(state): State<AppState>,
    Form(form): Form<AlumniForm>,
) -> AppResult<Response> {
    let outcome = state.store.add_alumni(&form.name).await?;
    let msg = outcome.message();
    let flash = match outcome {
        AddOutcome::Added(_) => Flash::Notice(&msg),
        AddOutcome::AlreadyListed(_) | AddOutcome::Blank => Flash::Error(&msg),
    };
    Ok(redirect_with("/alumni", flash))
}

/// Roster markup, polled by the alumni page.
pub async fn alumni_fragment(State(state): State<AppState>) -> Html<String> {
    Html(alumni_list_html(&state.store.load_alumni().await))
}
