//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the employee routes and a health probe
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS, metrics)
//! - Bind server to listener
//! - Stop gracefully on an OS signal or an internal shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::employees;
use crate::http::middleware::track_metrics;
use crate::http::request::{make_request_span, MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::signals::wait_for_signal;
use crate::store::Collection;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// The employee collection, opened once at startup.
    pub employees: Arc<dyn Collection>,
}

impl AppState {
    pub fn new(employees: Arc<dyn Collection>) -> Self {
        Self { employees }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// HTTP server for the employee API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over an already opened collection.
    pub fn new(config: ServiceConfig, employees: Arc<dyn Collection>) -> Self {
        let router = Self::build_router(&config, AppState::new(employees));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = employees::router(&config.api.base_path)
            .route("/health", get(health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state);

        if config.security.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server until an OS signal or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.api.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = wait_for_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::store::MemoryCollection;

    fn server(config: ServiceConfig) -> HttpServer {
        HttpServer::new(config, Arc::new(MemoryCollection::new()))
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let router = server(ServiceConfig::default()).router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_client_request_id_is_propagated() {
        let router = server(ServiceConfig::default()).router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/employees")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_custom_base_path() {
        let mut config = ServiceConfig::default();
        config.api.base_path = "/api/staff/".into();
        let router = server(config).router();

        let ok = router
            .clone()
            .oneshot(Request::builder().uri("/api/staff").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let missing = router
            .oneshot(Request::builder().uri("/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = ServiceConfig::default();
        config.security.max_body_size = 16;
        let router = server(config).router();

        let body = serde_json::json!({"name": "a name that is far too long"}).to_string();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header("content-type", "application/json")
                    .header("content-length", body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_oversized_body_without_length_is_rejected() {
        let mut config = ServiceConfig::default();
        config.security.max_body_size = 16;
        let router = server(config).router();

        let body = serde_json::json!({"name": "a name that is far too long"}).to_string();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
