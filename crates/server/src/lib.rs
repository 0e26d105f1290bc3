//! HTTP API for the Sinais gambling-recovery support service.
//!
//! The router exposes the person registry, support sessions, alerts,
//! progress reports, the help resource catalog and the external advisory
//! gateway as JSON endpoints under `/api`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use config::{Config, ConfigError};
pub use error::{ApiError, Result};
pub use state::AppState;

/// Build the application with request tracing and state attached.
pub fn app(state: AppState) -> Router {
    with_fault_handling(routes::router()).with_state(state)
}

/// Wrap a router in request spans and turn handler panics into plain 500s.
///
/// Spans are emitted at INFO so fault logs carry the method and URI under
/// the default filter.
pub fn with_fault_handling<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(CatchPanicLayer::custom(handle_panic)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, error::INTERNAL_ERROR_BODY).into_response()
}
