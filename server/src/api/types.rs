//! Shared API types
//!
//! Common types used across all API endpoints: the error envelope and
//! pagination metadata.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::sales::PageWindow;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    /// Unmatched route
    NotFound,
    /// Store or processing failure, reported with the operation that failed
    Internal { message: String, error: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        Self::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// Log a data-layer failure and wrap it for the response
    pub fn from_data(message: &str, e: crate::data::DataError) -> Self {
        tracing::error!(error = %e, backend = e.backend(), "{}", message);
        Self::internal(message, e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "status": "error",
                    "message": "Route not found"
                })),
            )
                .into_response(),
            Self::Internal { message, error } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": message,
                    "error": error
                })),
            )
                .into_response(),
        }
    }
}

/// Error body returned with HTTP 500
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
}

/// Pagination metadata in response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_records: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    pub fn new(window: PageWindow, total_records: u64) -> Self {
        let total_pages = window.total_pages(total_records);
        Self {
            current_page: window.page,
            page_size: window.limit,
            total_pages,
            total_records,
            has_next_page: u64::from(window.page) < total_pages,
            has_prev_page: window.page > 1,
        }
    }
}
