use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    chart::{ChartData, ChartMode},
    errors::{ErrorResponse, ServiceError},
    ApiResponse, AppState,
};

/// Build the chart Router scoped under `/api/charts`.
pub fn chart_routes() -> Router<AppState> {
    Router::new().route("/sales", get(get_sales_chart))
}

/// Query parameters for the sales chart
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ChartQuery {
    /// quarterly (default), performance or product
    #[param(example = "quarterly")]
    pub mode: Option<String>,
}

impl ChartQuery {
    pub fn mode(&self) -> Result<ChartMode, ServiceError> {
        match self.mode.as_deref() {
            None => Ok(ChartMode::default()),
            Some(raw) => raw
                .parse()
                .map_err(|e: crate::chart::ParseChartModeError| ServiceError::BadRequest(e.to_string())),
        }
    }
}

/// Chart projection of every sales record
#[utoipa::path(
    get,
    path = "/api/charts/sales",
    params(ChartQuery),
    responses(
        (status = 200, description = "Points and scale for the chosen view", body = ApiResponse<ChartData>),
        (status = 400, description = "Unknown chart mode", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "Charts"
)]
pub async fn get_sales_chart(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ChartData>>, ServiceError> {
    let Query(query) = query?;
    let data = state.sales_data.chart(query.mode()?).await?;
    Ok(Json(ApiResponse::success(data)))
}
