//! # api-adapters
//!
//! The HTTP surface: routers, handlers, middleware, and the domain error
//! to status-code mapping.

use std::path::PathBuf;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::AppState;

/// Where uploaded complaint photos are served from. The prefix must match
/// the media store's URL prefix so returned `image_url`s resolve.
pub struct MediaDir {
    pub url_prefix: String,
    pub root: PathBuf,
}

/// Builds the complete application router.
///
/// Browsers on the public form and voting views call this API directly,
/// hence the permissive CORS layer.
pub fn router(state: AppState, media: MediaDir) -> Router {
    let admin = Router::new()
        .route("/complaints", get(handlers::admin::list))
        .route("/get_complaint/{id}", get(handlers::admin::get_complaint))
        .route(
            "/complaints/{id}/department",
            put(handlers::admin::set_department),
        )
        .route(
            "/complaints/{id}/urgency",
            put(handlers::admin::set_urgency),
        )
        .route(
            "/complaints/{id}/process",
            put(handlers::admin::set_process),
        )
        .route("/complaints/{id}", delete(handlers::admin::delete))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_admin_token,
        ));

    Router::new()
        .route("/", get(handlers::health))
        .route("/complaints/register", post(handlers::complaints::register))
        .route("/complaints/all", get(handlers::complaints::list_all))
        .route(
            "/complaints/resolved",
            get(handlers::complaints::list_resolved),
        )
        .route("/AIhelp/assist", post(handlers::assist::suggest))
        .route("/votes/pending", get(handlers::votes::pending))
        .route("/votes/{id}/summary", get(handlers::votes::summary))
        .route("/votes/{id}", post(handlers::votes::cast))
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .nest("/admin", admin)
        .nest_service(media.url_prefix.as_str(), ServeDir::new(media.root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
