//! Autogarage API library
//!
//! Backend for a garage and auto-detailing shop: master data, job cards,
//! inquiries, invoices, appointments and a dashboard, behind a session gate.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod pricing;
pub mod services;
pub mod tracing;

use axum::{http::HeaderValue, middleware, response::Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, SessionStore};
use crate::db::DbPool;
use crate::events::EventSender;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<config::AppConfig>,
    pub event_sender: Arc<EventSender>,
    pub services: handlers::AppServices,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the service layer and an empty session store over `db`.
    pub fn new(
        db: Arc<DbPool>,
        config: config::AppConfig,
        event_sender: Arc<EventSender>,
        root_logger: &slog::Logger,
    ) -> Self {
        let services =
            handlers::AppServices::new(db.clone(), event_sender.clone(), &config, root_logger);
        let sessions = SessionStore::new(config.session_ttl());
        Self {
            db,
            config: Arc::new(config),
            event_sender,
            services,
            sessions,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Business routes under `/api`; everything except login/logout needs a
/// session.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let gated = Router::new()
        .merge(handlers::auth::user_routes())
        .merge(handlers::dashboard::dashboard_routes())
        .nest("/masters", handlers::masters::masters_routes())
        .nest("/technicians", handlers::technicians::technician_routes())
        .nest("/appointments", handlers::appointments::appointment_routes())
        .nest("/job-cards", handlers::job_cards::job_card_routes())
        .nest("/inquiries", handlers::inquiries::inquiry_routes())
        .nest("/invoices", handlers::invoices::invoice_routes())
        .with_session(state.clone());

    Router::new()
        .merge(handlers::auth::public_routes())
        .merge(gated)
}

fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    // credentials require explicit origins, so the permissive fallback mirrors them
    if let Some(origins) = config.cors_allowed_origins.as_deref() {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        if !origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(tower_http::cors::AllowMethods::mirror_request())
                .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
                .allow_credentials(true);
        }
    }
    if config.should_allow_permissive_cors() {
        return CorsLayer::very_permissive();
    }
    CorsLayer::new()
}

/// The full application: API, health, OpenAPI docs and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .nest("/api", api_routes(&state))
        .nest("/health", health::health_routes(state.db.clone()))
        .merge(openapi::swagger_ui())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(crate::tracing::configure_http_tracing())
        .layer(middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!response.success);
    }
}
