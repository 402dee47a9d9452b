use crate::{
    handlers, // Import handlers module
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
///
/// Everything is namespaced under `/api`. CORS is deliberately wide open —
/// this is a demo-grade public API, not a hardened one.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/status",
            post(handlers::create_status_check).get(handlers::list_status_checks),
        )
        .route("/memes/templates", get(handlers::list_templates))
        .route("/memes/create", post(handlers::create_meme))
        .route("/memes/create-custom", post(handlers::create_custom_meme))
        .route("/memes", get(handlers::list_memes))
        .route("/memes/{id}", delete(handlers::delete_meme))
        .route("/upload", post(handlers::upload_image));

    Router::new()
        .nest("/api", api)
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state) // Pass the application state
}
