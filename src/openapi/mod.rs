use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Data API",
        version = "0.1.0",
        description = r#"
# Sales Data API

CRUD over quarterly sales records plus chart-ready projections of the whole record set.

## Amounts

Every amount (`q1_sales` .. `q4_sales`, `target`) is a non-negative fixed-point value with two
fractional digits. Requests may send JSON numbers or numeric strings; responses always send
strings such as `"1250.50"`.

## Error Handling

Rejected payloads answer `422` with every offending field:

```json
{
  "message": "The given data was invalid.",
  "errors": { "q1_sales": ["The q1 sales must be at least 0."] }
}
```

Everything else answers with:

```json
{
  "error": "Not Found",
  "message": "Sales data with ID 42 not found",
  "request_id": "8f0c…",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://127.0.0.1:8000", description = "Local development")
    ),
    tags(
        (name = "Sales Data", description = "Sales record CRUD endpoints"),
        (name = "Charts", description = "Aggregate projections for the bar-chart views"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::sales_data::list_sales_data,
        crate::handlers::sales_data::get_sales_data,
        crate::handlers::sales_data::create_sales_data,
        crate::handlers::sales_data::update_sales_data,
        crate::handlers::sales_data::delete_sales_data,
        crate::handlers::charts::get_sales_chart,
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::MessageResponse,

            crate::dto::SalesRecord,
            crate::dto::SalesDataPayload,
            crate::dto::SalesDataInput,

            crate::chart::ChartData,
            crate::chart::ChartMode,
            crate::chart::ChartPoint,
            crate::chart::QuarterTotal,
            crate::chart::ProductPerformance,
            crate::chart::ProductTotal,

            crate::health::HealthReport,
            crate::health::HealthChecks,
            crate::health::HealthStatus,

            crate::errors::ErrorResponse,
            crate::errors::ValidationErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
