//! Sales API types

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::api::types::PaginationMeta;
use crate::domain::sales::{FilterOptions, SaleRecord, SalesPage, SalesStats};

/// Echo of the request's query parameters
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedFilters {
    #[schema(value_type = Object)]
    pub applied: Map<String, Value>,
}

/// One page of sales in the external (CSV header) field format
#[derive(Debug, Serialize, ToSchema)]
pub struct SalesListResponse {
    pub success: bool,
    /// Records keyed by CSV header names ("Customer Name", "Final Amount", ...)
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<SaleRecord>,
    pub pagination: PaginationMeta,
    pub filters: AppliedFilters,
}

impl SalesListResponse {
    pub fn new(page: SalesPage, pagination: PaginationMeta, applied: Map<String, Value>) -> Self {
        Self {
            success: true,
            data: page.data,
            pagination,
            filters: AppliedFilters { applied },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterOptionsResponse {
    pub success: bool,
    pub data: FilterOptions,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesStatsResponse {
    pub success: bool,
    pub data: SalesStats,
}
