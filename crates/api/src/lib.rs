//! HTTP API server for the order placement and inventory engine.
//!
//! Exposes the boundary operations (place, get, update status, remove) over
//! REST, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use audit::{AuditSink, TracingAuditSink};
use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use ordering::OrderingService;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, A>(state: Arc<AppState<S, A>>, metrics_handle: PrometheusHandle) -> Router
where
    S: Store + 'static,
    A: AuditSink + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::place::<S, A>))
        .route("/orders/{id}", get(routes::orders::get::<S, A>))
        .route(
            "/orders/{id}/status",
            put(routes::orders::update_status::<S, A>),
        )
        .route("/orders/{id}", delete(routes::orders::remove::<S, A>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over a store, auditing to the log.
pub fn create_state<S: Store>(store: S) -> Arc<AppState<S, TracingAuditSink>> {
    Arc::new(AppState {
        service: OrderingService::new(store, TracingAuditSink::new()),
    })
}
