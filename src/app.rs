// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, error responses, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::batch::{BatchEntry, BatchRequest, BatchResult};
use crate::models::config::ServiceConfig;
use crate::models::scrape::{ErrorType, ScrapeRequest, ScrapeResult};
use crate::models::version::{ErrorResponse, HealthResponse, VersionResponse};
use crate::services::batch::BatchDriver;
use crate::services::fetcher::FetchError;
use crate::services::scrape::ScrapeService;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SCRAPE_AGENT_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SCRAPE_AGENT_VERSION");

pub const SERVICE_NAME: &str = "scrape-agent";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub scrape_service: Arc<ScrapeService>,
    pub batch_driver: Arc<BatchDriver>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Result<Self, FetchError> {
        let scrape_service = Arc::new(ScrapeService::new(&config)?);
        let batch_driver = Arc::new(BatchDriver::new(scrape_service.clone(), &config));

        Ok(Self {
            config: Arc::new(config),
            scrape_service,
            batch_driver,
        })
    }
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

/// Errors that end a request with a non-200 status. Scrape failures are not among
/// them: those are reported inside a 200 response.
#[derive(Debug)]
pub enum ApiError {
    Validation {
        message: String,
        instructions: Option<String>,
    },
    PayloadTooLarge,
    Internal(String),
}

impl ApiError {
    fn validation(message: &str) -> Self {
        ApiError::Validation {
            message: message.to_string(),
            instructions: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::validation(&rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, instructions) = match self {
            ApiError::Validation {
                message,
                instructions,
            } => (StatusCode::BAD_REQUEST, message, instructions),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body exceeds 10 MB".to_string(),
                None,
            ),
            ApiError::Internal(detail) => {
                error!(%detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error,
            instructions,
        };
        (status, Json(body)).into_response()
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is online", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Scrape outcome, check `success`", body = ScrapeResult),
        (status = 400, description = "Missing `url` or malformed body", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResult>, ApiError> {
    let Json(request) = payload?;

    let url = request
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::validation("url is required"))?;
    let instructions = request.instructions.unwrap_or_default();

    let result = state
        .scrape_service
        .scrape(&url, &instructions, state.config.fetch_timeout())
        .await;

    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/scrape-batch",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Per-URL outcomes and combined text", body = BatchResult),
        (status = 400, description = "`urls` missing, empty or not a list", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn scrape_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResult>, ApiError> {
    let Json(request) = payload?;
    let instructions = request.instructions.unwrap_or_default();

    let urls = match request.urls {
        Some(urls) if !urls.is_empty() => urls,
        _ => {
            return Err(ApiError::Validation {
                message: "urls must be a non-empty array".to_string(),
                instructions: Some(instructions),
            })
        }
    };

    let result = state
        .batch_driver
        .run(&urls, &instructions, request.main_url)
        .await;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(health_handler, version_handler, scrape_handler, scrape_batch_handler),
    components(schemas(
        ScrapeRequest,
        ScrapeResult,
        ErrorType,
        BatchRequest,
        BatchEntry,
        BatchResult,
        HealthResponse,
        VersionResponse,
        ErrorResponse
    ))
)]
pub struct ScrapeApiDoc;

/// Build the Axum application router.
///
/// All origins are allowed, bodies are capped at [`MAX_BODY_BYTES`], and a panicking
/// handler yields a generic 500 instead of dropping the connection.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/version", get(version_handler))
        .route("/scrape", post(scrape_handler))
        .route("/scrape-batch", post(scrape_batch_handler))
        .with_state(state)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ScrapeApiDoc::openapi()),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}
