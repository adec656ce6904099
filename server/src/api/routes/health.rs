//! Health check endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::config::StoreBackend;
use crate::data::SalesService;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    /// "connected" for database stores, "memory" for the CSV dataset
    pub database: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub error: String,
}

/// Health check endpoint
///
/// Pings the configured store; the in-memory store counts as healthy once
/// its dataset loads.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 500, description = "Store is unreachable", body = HealthErrorResponse)
    )
)]
pub async fn health(State(sales): State<Arc<SalesService>>) -> Response {
    match sales.repository().ping().await {
        Ok(()) => {
            let database = match sales.backend() {
                StoreBackend::Memory => "memory".to_string(),
                StoreBackend::Sqlite | StoreBackend::Postgres => "connected".to_string(),
            };
            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "success",
                    message: "Sales API is running",
                    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    database,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                backend = %sales.backend(),
                transient = e.is_transient(),
                "Health check failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthErrorResponse {
                    status: "error",
                    message: "Database connection failed",
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    use crate::data::{MemoryStore, SqliteService};

    async fn call(sales: SalesService) -> (StatusCode, serde_json::Value) {
        let router = Router::new()
            .route("/health", get(health))
            .with_state(Arc::new(sales));
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_sqlite_connected() {
        let dir = tempfile::tempdir().unwrap();
        let service = SqliteService::init(&dir.path().join("sales.db")).await.unwrap();
        let (status, body) = call(SalesService::Sqlite(Arc::new(service))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_health_memory_with_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "Transaction ID,Customer Name\n1,Neha\n").unwrap();
        let (status, body) = call(SalesService::Memory(Arc::new(MemoryStore::new(path)))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "memory");
    }

    #[tokio::test]
    async fn test_health_failure_is_500() {
        let store = MemoryStore::new("/nonexistent/sales.csv");
        let (status, body) = call(SalesService::Memory(Arc::new(store))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Database connection failed");
        assert!(body["error"].is_string());
    }
}
