//! HTTP client for the sales data API.
//!
//! [`SalesDataClient`] is a thin typed wrapper over the REST endpoints. [`Dashboard`] holds
//! the last successful full read and re-fetches after every mutation, and [`FormSession`]
//! tracks the create/edit form.

pub mod dashboard;
pub mod form;
pub mod render;

pub use dashboard::Dashboard;
pub use form::{FormField, FormSession, FormState, Submission};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::chart::{ChartData, ChartMode};
use crate::dto::{SalesDataInput, SalesRecord};
use crate::errors::{ErrorResponse, ValidationErrorResponse};
use crate::validation::FieldErrors;
use crate::{ApiResponse, MessageResponse};

/// Base URL the bundled front end talks to.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Field violations, from local checks or a 422 answer
    #[error("The given data was invalid.")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("HTTP {status}: {error}: {message}")]
    Server {
        status: u16,
        error: String,
        message: String,
    },

    #[error("network: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ClientError {
    /// One-line text for the dismissible error banner.
    pub fn banner(&self) -> String {
        match self {
            Self::Server { error, message, .. } => format!("{}: {}", error, message),
            Self::Transport(e) => format!("Could not reach the sales data API: {}", e),
            other => other.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Typed client for `/sales-data` and `/charts`.
#[derive(Debug, Clone)]
pub struct SalesDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl SalesDataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/sales-data", self.base_url)
    }

    fn item_url(&self, id: i32) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Maps non-success answers onto [`ClientError`] using the server's error bodies.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<R>()
                .await
                .map_err(|e| ClientError::Decode(format!("response body: {}", e)));
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "sales data API returned an error");

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Ok(rejected) = serde_json::from_str::<ValidationErrorResponse>(&body) {
                return Err(ClientError::Validation(rejected.errors));
            }
        }

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) if status == StatusCode::NOT_FOUND => Err(ClientError::NotFound(err.message)),
            Ok(err) => Err(ClientError::Server {
                status: status.as_u16(),
                error: err.error,
                message: err.message,
            }),
            Err(_) => Err(ClientError::Server {
                status: status.as_u16(),
                error: status.canonical_reason().unwrap_or("Error").to_string(),
                message: body,
            }),
        }
    }

    fn data<T>(response: ApiResponse<T>) -> Result<T, ClientError> {
        response
            .data
            .ok_or_else(|| ClientError::Decode("response is missing `data`".to_string()))
    }

    /// Every record, ordered by id.
    pub async fn list(&self) -> Result<Vec<SalesRecord>, ClientError> {
        let resp = self.http.get(self.collection_url()).send().await?;
        Self::data(Self::parse(resp).await?)
    }

    pub async fn get(&self, id: i32) -> Result<SalesRecord, ClientError> {
        let resp = self.http.get(self.item_url(id)).send().await?;
        Self::data(Self::parse(resp).await?)
    }

    pub async fn create(&self, input: &SalesDataInput) -> Result<SalesRecord, ClientError> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(input)
            .send()
            .await?;
        Self::data(Self::parse(resp).await?)
    }

    pub async fn update(&self, id: i32, input: &SalesDataInput) -> Result<SalesRecord, ClientError> {
        let resp = self.http.put(self.item_url(id)).json(input).send().await?;
        Self::data(Self::parse(resp).await?)
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: i32) -> Result<String, ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        let confirmation: MessageResponse = Self::parse(resp).await?;
        Ok(confirmation.message)
    }

    /// Server-side chart projection.
    pub async fn chart(&self, mode: ChartMode) -> Result<ChartData, ClientError> {
        let resp = self
            .http
            .get(format!("{}/charts/sales", self.base_url))
            .query(&[("mode", mode.as_str())])
            .send()
            .await?;
        Self::data(Self::parse(resp).await?)
    }
}
