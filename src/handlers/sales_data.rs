use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::{
    dto::{SalesDataInput, SalesDataPayload, SalesRecord},
    errors::{ErrorResponse, ServiceError, ValidationErrorResponse},
    ApiResponse, AppState, MessageResponse,
};

pub const CREATED_MESSAGE: &str = "Sales data created successfully";
pub const UPDATED_MESSAGE: &str = "Sales data updated successfully";
pub const DELETED_MESSAGE: &str = "Sales data deleted successfully";

/// Build the sales data Router scoped under `/api/sales-data`.
pub fn sales_data_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales_data).post(create_sales_data))
        .route(
            "/:id",
            get(get_sales_data)
                .put(update_sales_data)
                .delete(delete_sales_data),
        )
}

fn validated(
    payload: Result<Json<SalesDataPayload>, JsonRejection>,
) -> Result<SalesDataInput, ServiceError> {
    let Json(payload) = payload?;
    SalesDataInput::try_from(payload).map_err(ServiceError::Validation)
}

/// List every sales record
#[utoipa::path(
    get,
    path = "/api/sales-data",
    responses(
        (status = 200, description = "All sales records, ordered by id", body = ApiResponse<Vec<SalesRecord>>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "Sales Data"
)]
pub async fn list_sales_data(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SalesRecord>>>, ServiceError> {
    let records = state.sales_data.list().await?;
    Ok(Json(ApiResponse::success(records)))
}

/// Fetch one sales record
#[utoipa::path(
    get,
    path = "/api/sales-data/{id}",
    params(("id" = i32, Path, description = "Sales record id")),
    responses(
        (status = 200, description = "The record", body = ApiResponse<SalesRecord>),
        (status = 404, description = "No record with that id", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "Sales Data"
)]
pub async fn get_sales_data(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<SalesRecord>>, ServiceError> {
    let Path(id) = id?;
    let record = state.sales_data.get(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

/// Create a sales record
#[utoipa::path(
    post,
    path = "/api/sales-data",
    request_body = SalesDataPayload,
    responses(
        (status = 201, description = "Record created", body = ApiResponse<SalesRecord>),
        (status = 400, description = "Body is not JSON", body = ErrorResponse),
        (status = 422, description = "Field violations", body = ValidationErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Sales Data"
)]
pub async fn create_sales_data(
    State(state): State<AppState>,
    payload: Result<Json<SalesDataPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SalesRecord>>), ServiceError> {
    let input = validated(payload)?;
    let record = state.sales_data.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(record, CREATED_MESSAGE)),
    ))
}

/// Replace all business fields of a sales record
#[utoipa::path(
    put,
    path = "/api/sales-data/{id}",
    params(("id" = i32, Path, description = "Sales record id")),
    request_body = SalesDataPayload,
    responses(
        (status = 200, description = "Record updated", body = ApiResponse<SalesRecord>),
        (status = 404, description = "No record with that id", body = ErrorResponse),
        (status = 422, description = "Field violations", body = ValidationErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Sales Data"
)]
pub async fn update_sales_data(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SalesDataPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<SalesRecord>>, ServiceError> {
    let Path(id) = id?;
    let input = validated(payload)?;
    let record = state.sales_data.update(id, input).await?;
    Ok(Json(ApiResponse::with_message(record, UPDATED_MESSAGE)))
}

/// Permanently delete a sales record
#[utoipa::path(
    delete,
    path = "/api/sales-data/{id}",
    params(("id" = i32, Path, description = "Sales record id")),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 404, description = "No record with that id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Sales Data"
)]
pub async fn delete_sales_data(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Path(id) = id?;
    state.sales_data.delete(id).await?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
