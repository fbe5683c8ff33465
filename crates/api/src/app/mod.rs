//! HTTP application wiring.
//!
//! - `services.rs`: store selection and the shared ledger/session services
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the API tests).
pub fn build_app(services: services::AppServices) -> Router {
    let sessions = services.sessions.clone();

    // Everything under /api/admin except login requires a live admin session.
    let admin = Router::new()
        .route("/login", post(routes::admin::login))
        .merge(routes::admin::router().layer(axum::middleware::from_fn_with_state(
            sessions,
            middleware::admin_auth,
        )));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .nest("/api/admin", admin)
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services))))
}
