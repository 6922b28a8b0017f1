use axum::{
    extract::{Query, State},
    response::Html,
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::FlashQuery;
use crate::state::AppState;
use crate::views::Page;
use super::current_user;

pub async fn serve_homepage(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let user = current_user(&session).await?;
    let content = state.views.template("homepage.html").await?;
    let html = state.views
        .render(Page { title: "Home", user: user.as_ref(), flash: &flash }, &content)
        .await?;
    Ok(Html(html))
}
