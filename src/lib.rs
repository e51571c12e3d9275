//! Sales Data API Library
//!
//! CRUD over quarterly sales records, chart projections of the record set, and the
//! HTTP client the terminal front end uses.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod chart;
pub mod client;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;
pub mod validation;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub sales_data: services::SalesDataService,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        Self {
            sales_data: services::SalesDataService::new(db.clone()),
            db,
            config,
        }
    }
}

/// Success envelope: `{data}` for reads, `{data, message}` for writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Body of responses that carry only a confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Sales data deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every sales data endpoint, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sales-data", handlers::sales_data::sales_data_routes())
        .nest("/charts", handlers::charts::chart_routes())
}

/// Full application router without CORS, which depends on deployment config
pub fn app_router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(|| async { "sales-data-api up" }))
        .nest("/health", health::health_routes())
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

pub mod prelude {
    pub use crate::chart::{ChartData, ChartMode, ChartPoint};
    pub use crate::client::{ClientError, SalesDataClient};
    pub use crate::config::AppConfig;
    pub use crate::dto::{SalesDataInput, SalesDataPayload, SalesRecord};
    pub use crate::errors::ServiceError;
    pub use crate::services::SalesDataService;
    pub use crate::validation::FieldErrors;
    pub use crate::{ApiResponse, AppState, MessageResponse};
}
