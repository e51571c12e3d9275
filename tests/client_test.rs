use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sales_data_api::chart::ChartMode;
use sales_data_api::client::{ClientError, Dashboard, FormField, FormSession, FormState, SalesDataClient};

fn record_json(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "product_name": name,
        "q1_sales": "10.00",
        "q2_sales": "20.00",
        "q3_sales": "0.00",
        "q4_sales": "5.00",
        "target": "100.00",
        "created_at": "2024-03-21T10:00:00Z",
        "updated_at": "2024-03-21T10:00:00Z"
    })
}

async fn client_for(server: &MockServer) -> SalesDataClient {
    SalesDataClient::new(format!("{}/api", server.uri())).unwrap()
}

fn filled_form(name: &str) -> FormSession {
    let mut form = FormSession::new();
    form.set_field(FormField::ProductName, name);
    form.set_field(FormField::Q1Sales, "10");
    form.set_field(FormField::Q2Sales, "20");
    form.set_field(FormField::Q3Sales, "0");
    form.set_field(FormField::Q4Sales, "5");
    form.set_field(FormField::Target, "100");
    form
}

#[tokio::test]
async fn list_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [record_json(1, "Widget"), record_json(2, "Gadget")] })),
        )
        .mount(&server)
        .await;

    let records = client_for(&server).await.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].product_name, "Widget");
    assert_eq!(records[1].q2_sales, dec!(20.00));
    assert_eq!(records[1].total_sales(), dec!(35.00));
}

#[tokio::test]
async fn unprocessable_entity_maps_to_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": { "product_name": ["The product name field is required."] }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let input = filled_form("Widget").begin_submit().unwrap().input;
    let err = client.create(&input).await.unwrap_err();
    assert_matches!(err, ClientError::Validation(errors) if errors.contains_key("product_name"));
}

#[tokio::test]
async fn not_found_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sales-data/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "message": "Sales data with ID 9 not found",
            "timestamp": "2024-03-21T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.delete(9).await.unwrap_err();
    assert_matches!(err, ClientError::NotFound(message) if message == "Sales data with ID 9 not found");
}

#[tokio::test]
async fn storage_failure_becomes_banner_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to fetch sales data",
            "message": "database is locked",
            "timestamp": "2024-03-21T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let err = dashboard.refresh().await.unwrap_err();
    assert_matches!(err, ClientError::Server { status: 500, .. });
    assert_eq!(
        dashboard.banner(),
        Some("Failed to fetch sales data: database is locked")
    );
    assert!(dashboard.records().is_empty());

    dashboard.dismiss_banner();
    assert_eq!(dashboard.banner(), None);
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get(1).await.unwrap_err();
    assert_matches!(
        err,
        ClientError::Server { status: 502, error, message } if error == "Bad Gateway" && message == "upstream down"
    );
}

#[tokio::test]
async fn submit_creates_then_refetches_full_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sales-data"))
        .and(body_json(json!({
            "product_name": "Widget",
            "q1_sales": "10.00",
            "q2_sales": "20.00",
            "q3_sales": "0.00",
            "q4_sales": "5.00",
            "target": "100.00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": record_json(3, "Widget"),
            "message": "Sales data created successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [record_json(1, "Old"), record_json(3, "Widget")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let mut form = filled_form("Widget");

    let created = dashboard.submit(&mut form).await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(dashboard.records().len(), 2);
    assert!(dashboard.record(3).is_some());
}

#[tokio::test]
async fn invalid_form_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let mut form = filled_form("Widget");
    form.set_field(FormField::Q1Sales, "-1");

    let err = dashboard.submit(&mut form).await.unwrap_err();
    assert_matches!(err, ClientError::Validation(ref errors) if errors.contains_key("q1_sales"));
    assert!(form.errors().contains_key("q1_sales"));
    assert_eq!(dashboard.banner(), None);
}

#[tokio::test]
async fn edit_submit_issues_put_for_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/sales-data/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": record_json(1, "Renamed"),
            "message": "Sales data updated successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [record_json(1, "Renamed")] })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let original = serde_json::from_value(record_json(1, "Original")).unwrap();
    let mut form = FormSession::new();
    form.begin_edit(&original);
    form.set_field(FormField::ProductName, "Renamed");

    let mut dashboard = Dashboard::new(client);
    let updated = dashboard.submit(&mut form).await.unwrap();
    assert_eq!(updated.product_name, "Renamed");
    assert_eq!(dashboard.records()[0].product_name, "Renamed");
}

#[tokio::test]
async fn server_rejection_keeps_edit_mode_with_inline_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/sales-data/1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": { "target": ["The target must not be greater than 9999999999.99."] }
        })))
        .mount(&server)
        .await;

    let original = serde_json::from_value(record_json(1, "Widget")).unwrap();
    let mut form = FormSession::new();
    form.begin_edit(&original);

    let mut dashboard = Dashboard::new(client_for(&server).await);
    dashboard.submit(&mut form).await.unwrap_err();

    assert_eq!(form.state(), FormState::Editing(1));
    assert!(form.errors().contains_key("target"));
    assert_eq!(dashboard.banner(), None);
}

#[tokio::test]
async fn delete_refetches_list() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sales-data/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Sales data deleted successfully" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [record_json(1, "Keep")] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let message = dashboard.delete(2).await.unwrap();
    assert_eq!(message, "Sales data deleted successfully");
    assert_eq!(dashboard.records().len(), 1);
    assert!(dashboard.record(2).is_none());
}

#[tokio::test]
async fn chart_passes_mode_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/charts/sales"))
        .and(query_param("mode", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "mode": "product",
                "points": [{ "productName": "Widget", "totalValue": "35.00", "color": "#4ECDC4" }],
                "scale": "35.00"
            }
        })))
        .mount(&server)
        .await;

    let data = client_for(&server)
        .await
        .chart(ChartMode::Product)
        .await
        .unwrap();
    assert_eq!(data.mode, ChartMode::Product);
    assert_eq!(data.points[0].label(), "Widget");
    assert_eq!(data.scale, dec!(35.00));
}

#[tokio::test]
async fn local_chart_uses_last_fetched_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [record_json(1, "A"), record_json(2, "B")] })),
        )
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    dashboard.refresh().await.unwrap();

    let data = dashboard.chart(ChartMode::Quarterly);
    assert_eq!(data.points.len(), 4);
    assert_eq!(data.scale, dec!(40.00));
}

#[tokio::test]
async fn committed_create_survives_failed_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": record_json(4, "Widget"),
            "message": "Sales data created successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to fetch sales data",
            "message": "db down",
            "timestamp": "2024-03-21T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let mut form = filled_form("Widget");

    let created = dashboard.submit(&mut form).await.unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(
        dashboard.banner(),
        Some("Failed to fetch sales data: db down")
    );
}

#[tokio::test]
async fn committed_delete_survives_failed_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sales-data/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Sales data deleted successfully" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales-data"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(client_for(&server).await);
    let message = dashboard.delete(2).await.unwrap();
    assert_eq!(message, "Sales data deleted successfully");
    assert!(dashboard.banner().is_some());
}
