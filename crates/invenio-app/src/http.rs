//! Router construction and listener for a built application.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, http::Request, routing::get};
use invenio_config::{ConfigMap, DEFAULT_SERVER_BIND};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{Span, info};

use crate::application::Application;
use crate::error::{AppError, AppResult};

const HEADER_REQUEST_ID: &str = "x-request-id";
const SERVER_BIND: &str = "SERVER_BIND";

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    app: &'static str,
    extensions: Vec<&'static str>,
}

async fn healthz(State(health): State<Arc<HealthResponse>>) -> Json<HealthResponse> {
    Json(health.as_ref().clone())
}

/// Listener address from `SERVER_BIND`, falling back to the default.
///
/// # Errors
///
/// Returns an error if the configured value is not a socket address.
pub fn bind_addr(config: &ConfigMap) -> AppResult<SocketAddr> {
    let raw = config.get_str(SERVER_BIND).unwrap_or(DEFAULT_SERVER_BIND);
    raw.parse().map_err(|_| AppError::InvalidConfig {
        field: SERVER_BIND,
        reason: "not_a_socket_addr",
        value: Some(raw.to_string()),
    })
}

impl Application {
    /// Router serving the static folder under the static URL path plus `/healthz`.
    pub fn router(&self) -> Router {
        let health = Arc::new(HealthResponse {
            status: "ok",
            app: self.name(),
            extensions: self.extensions().to_vec(),
        });
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %invenio_telemetry::build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );

        let router = Router::new()
            .route("/healthz", get(healthz))
            .with_state(health);
        let static_files = ServeDir::new(self.static_folder());
        let mount = self.static_url_path().trim_end_matches('/');
        let router = if mount.is_empty() {
            router.fallback_service(static_files)
        } else {
            router.nest_service(mount, static_files)
        };

        router.layer(
            ServiceBuilder::new()
                .layer(invenio_telemetry::set_request_id_layer())
                .layer(invenio_telemetry::propagate_request_id_layer())
                .layer(trace_layer),
        )
    }

    /// Serve the application on `addr` until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server terminates unexpectedly.
    pub async fn serve(&self, addr: SocketAddr) -> AppResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| AppError::io("http.bind", None, err))?;
        info!(addr = %addr, "Launching HTTP listener");
        axum::serve(listener, self.router().into_make_service())
            .await
            .map_err(|err| AppError::io("http.serve", None, err))
    }
}
