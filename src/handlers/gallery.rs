use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{timestamp_now, Comment, CommentForm, FlashQuery};
use crate::state::AppState;
use crate::views::{comments_html, photo_card_html, Page};
use super::current_user;

pub async fn serve_gallery(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    tracing::info!("Serving gallery");
    let user = current_user(&session).await?;
    let photos = state.store.list_photos().await?;

    let mut cards = Vec::with_capacity(photos.len());
    for photo in &photos {
        let comments = state.store.comments_for(photo).await;
        cards.push(photo_card_html(photo, &comments));
    }
    let photos_html = if cards.is_empty() {
        "<p>No photos yet.</p>".to_string()
    } else {
        cards.join("\n")
    };

    let content = state.views
        .template("gallery.html")
        .await?
        .replace("{{photos}}", &photos_html);
    let html = state.views
        .render(Page { title: "Gallery", user: user.as_ref(), flash: &flash }, &content)
        .await?;
    Ok(Html(html))
}

async fn require_photo(state: &AppState, photo: &str) -> AppResult<()> {
    if state.store.list_photos().await?.iter().any(|p| p == photo) {
        Ok(())
    } else {
        tracing::warn!("Request for unknown photo: {}", photo);
        Err(AppError::Validation("Unknown photo.".into()))
    }
}

/// Only reachable behind `require_auth`.
pub async fn submit_comment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let user = current_user(&session)
        .await?
        .ok_or_else(|| AppError::Auth("Please log in first.".into()))?;
    require_photo(&state, &form.photo).await?;

    let text = form.text.trim();
    if text.is_empty() {
        tracing::debug!("Ignoring empty comment on {}", form.photo);
    } else {
        let comment = Comment {
            username: user.username.clone(),
            timestamp: timestamp_now(),
            text: text.to_string(),
        };
        state.store.add_comment(&form.photo, comment).await?;
        tracing::info!("{} commented on {}", user.username, form.photo);
    }

    let target = format!("/gallery#{}", urlencoding::encode(&form.photo));
    Ok(Redirect::to(&target).into_response())
}

/// Comment list for one photo, polled by the gallery page.
pub async fn comments_fragment(
    State(state): State<AppState>,
    Path(photo): Path<String>,
) -> AppResult<Html<String>> {
    require_photo(&state, &photo).await?;
    let comments = state.store.comments_for(&photo).await;
    Ok(Html(comments_html(&comments)))
}
