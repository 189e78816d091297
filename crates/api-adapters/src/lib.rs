//! # api-adapters
//!
//! The HTTP surface of the companion site. Everything axum-specific sits
//! behind the `web-axum` feature.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

pub use metrics::Metrics;
#[cfg(feature = "web-axum")]
pub use state::AppState;

/// Builds the full router with middleware applied.
///
/// Mounted under `/` so the paths match what the site frontend and the
/// EventSub subscription were registered with.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    let app = axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/api/ideas",
            get(handlers::ideas::list_ideas).post(handlers::ideas::submit_idea),
        )
        .route("/api/twitch/webhook", post(handlers::webhook::twitch_webhook))
        .layer(middleware::cors_policy())
        .with_state(state);

    middleware::standard_middleware(app)
}
