use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sales_data_api::{config::AppConfig, db, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper harness for spinning up the full router over a throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("sales_data_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_000,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = sales_data_api::app_router(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request against the router with optional JSON body and extra headers.
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Raw body, for requests that are not valid JSON.
    pub async fn request_raw(&self, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates a record through the API and returns its `data` object.
    pub async fn create(&self, payload: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/sales-data", Some(payload))
            .await;
        assert_eq!(response.status(), 201, "seed create failed");
        response_json(response).await["data"].clone()
    }

    pub async fn list(&self) -> Vec<Value> {
        let response = self.request(Method::GET, "/api/sales-data", None).await;
        assert_eq!(response.status(), 200);
        response_json(response).await["data"]
            .as_array()
            .cloned()
            .expect("list data is an array")
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body is JSON")
}

pub fn sample_payload(name: &str) -> Value {
    json!({
        "product_name": name,
        "q1_sales": 10,
        "q2_sales": 20,
        "q3_sales": 0,
        "q4_sales": 5,
        "target": 100
    })
}
