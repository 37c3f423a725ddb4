//! HTTP surface: the messaging-client lookup, the list/stats read API, and
//! the dashboard's trigger management endpoints.

pub mod android;
pub mod dashboard;
pub mod triggers_api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get, post};
use axum::{Json, Router};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::store::TriggerStore;

/// Shared state for every HTTP handler.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn TriggerStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn TriggerStore>) -> Self {
        Self { store }
    }
}

/// Build the full router. Separate from [`start_server`] so tests can drive it directly.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/android-trigger-check",
            post(android::check_trigger).options(preflight),
        )
        .route("/triggers-api/{*path}", any(triggers_api::handle))
        .route(
            "/api/triggers",
            get(dashboard::list_triggers).post(dashboard::create_trigger),
        )
        .route(
            "/api/triggers/{id}",
            get(dashboard::get_trigger)
                .patch(dashboard::update_trigger)
                .delete(dashboard::delete_trigger),
        )
        .route("/api/stats", get(dashboard::stats))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server and run until `shutdown_rx` changes.
pub async fn start_server(
    state: ApiState,
    addr: SocketAddr,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = state.store.backend_name();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(backend, "Auto-reply server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("Auto-reply server shutting down");
        })
        .await?;

    Ok(())
}

/// Headers the messaging client and the dashboard send cross-origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Bare `OPTIONS` requests (without CORS request headers) still get a 200.
pub(crate) async fn preflight() -> &'static str {
    "ok"
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "autoreply" }))
}

pub(crate) async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Endpoint not found" })),
    )
}
