use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn,
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use crate::{config::Config, handlers, middleware, state::AppState};

pub fn router(state: AppState, config: &Config) -> Router {
    // Session cookie without expiry: it lasts as long as the browser session
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    let protected = Router::new()
        .route("/gallery/comment", post(handlers::submit_comment))
        .route_layer(from_fn(middleware::require_auth));

    Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page))
        .route("/login", get(handlers::serve_login_page).post(handlers::handle_auth))
        .route("/logout", get(handlers::handle_logout))

        // Pages
        .route("/homepage", get(handlers::serve_homepage))
        .route("/gallery", get(handlers::serve_gallery))
        .route("/alumni", get(handlers::serve_alumni).post(handlers::add_alumni))
        .route("/profile", get(handlers::serve_profile).post(handlers::save_profile))

        // Fragments polled by the pages
        .route("/gallery/comments/:photo", get(handlers::comments_fragment))
        .route("/alumni/list", get(handlers::alumni_fragment))

        .merge(protected)

        // Static files, photos included
        .nest_service("/static", ServeDir::new(&config.server.static_dir))

        // Unknown paths land on the login page
        .fallback(handlers::serve_login_page)

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
                .layer(session_layer),
        )
        .with_state(state)
}
