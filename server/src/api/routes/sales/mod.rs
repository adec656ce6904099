//! Sales API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::SalesParams;
use crate::api::types::{ApiError, PaginationMeta};
use crate::core::constants::FILTER_OPTIONS_CACHE_CONTROL;
use crate::data::SalesService;

use types::{FilterOptionsResponse, SalesListResponse, SalesStatsResponse};

/// Shared state for Sales API endpoints
#[derive(Clone)]
pub struct SalesApiState {
    pub sales: Arc<SalesService>,
}

/// Build Sales API routes
pub fn routes(sales: Arc<SalesService>) -> Router<()> {
    let state = SalesApiState { sales };

    Router::new()
        .route("/", get(list_sales))
        .route("/data", get(list_sales))
        .route("/filters", get(get_filter_options))
        .route("/stats", get(get_sales_stats))
        .with_state(state)
}

/// Search, filter, sort and paginate sales records
#[utoipa::path(
    get,
    path = "/api/sales/data",
    tag = "sales",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of Customer Name or Phone Number"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u32>, Query, description = "Items per page (default 10, max 500)"),
        ("sortBy" = Option<String>, Query, description = "date-newest, date-oldest, quantity-high, quantity-low, amount-high, customer-az, customer-za"),
        ("customerRegion" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("gender" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("productCategory" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("tags" = Option<String>, Query, description = "Matches records carrying any of the tags"),
        ("paymentMethod" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("orderStatus" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("deliveryType" = Option<String>, Query, description = "Comma-separated or repeated"),
        ("ageMin" = Option<i64>, Query, description = "Inclusive lower age bound"),
        ("ageMax" = Option<i64>, Query, description = "Inclusive upper age bound"),
        ("dateFrom" = Option<String>, Query, description = "Inclusive start date (YYYY-MM-DD)"),
        ("dateTo" = Option<String>, Query, description = "Inclusive end date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "One page of sales", body = SalesListResponse),
        (status = 500, description = "Store failure", body = crate::api::types::ErrorResponse)
    )
)]
pub async fn list_sales(
    State(state): State<SalesApiState>,
    params: SalesParams,
) -> Result<Json<SalesListResponse>, ApiError> {
    let query = params.query();
    tracing::debug!(?query, "Sales query");

    let page = state
        .sales
        .repository()
        .query_sales(&query)
        .await
        .map_err(|e| ApiError::from_data("Failed to fetch sales data", e))?;

    let pagination = PaginationMeta::new(query.window, page.total_records);
    Ok(Json(SalesListResponse::new(
        page,
        pagination,
        params.applied(),
    )))
}

/// Distinct values for every filter control
#[utoipa::path(
    get,
    path = "/api/sales/filters",
    tag = "sales",
    responses(
        (status = 200, description = "Filter options", body = FilterOptionsResponse),
        (status = 500, description = "Store failure", body = crate::api::types::ErrorResponse)
    )
)]
pub async fn get_filter_options(
    State(state): State<SalesApiState>,
) -> Result<(HeaderMap, Json<FilterOptionsResponse>), ApiError> {
    let options = state
        .sales
        .repository()
        .filter_options()
        .await
        .map_err(|e| ApiError::from_data("Failed to fetch filter options", e))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(FILTER_OPTIONS_CACHE_CONTROL),
    );

    Ok((
        headers,
        Json(FilterOptionsResponse {
            success: true,
            data: options,
        }),
    ))
}

/// Summary totals over the filtered set (pagination parameters are ignored)
#[utoipa::path(
    get,
    path = "/api/sales/stats",
    tag = "sales",
    responses(
        (status = 200, description = "Totals for the summary cards", body = SalesStatsResponse),
        (status = 500, description = "Store failure", body = crate::api::types::ErrorResponse)
    )
)]
pub async fn get_sales_stats(
    State(state): State<SalesApiState>,
    params: SalesParams,
) -> Result<Json<SalesStatsResponse>, ApiError> {
    let stats = state
        .sales
        .repository()
        .stats(&params.query())
        .await
        .map_err(|e| ApiError::from_data("Failed to fetch sales stats", e))?;

    Ok(Json(SalesStatsResponse {
        success: true,
        data: stats,
    }))
}
