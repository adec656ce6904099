//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, sales};
use crate::api::types::{ErrorResponse, PaginationMeta};
use crate::domain::sales::{AgeRange, FilterOptions, SalesStats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salesboard API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Search, filter, sort and paginate retail sales records"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "sales", description = "Sales records, filter options and totals")
    ),
    paths(
        health::health,
        sales::list_sales,
        sales::get_filter_options,
        sales::get_sales_stats,
    ),
    components(schemas(
        // API types
        PaginationMeta,
        ErrorResponse,
        // Health
        health::HealthResponse,
        health::HealthErrorResponse,
        // Sales
        sales::types::SalesListResponse,
        sales::types::AppliedFilters,
        sales::types::FilterOptionsResponse,
        sales::types::SalesStatsResponse,
        FilterOptions,
        AgeRange,
        SalesStats,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Salesboard API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_sales_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/health", "/api/sales/data", "/api/sales/filters", "/api/sales/stats"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(doc["components"]["schemas"]["FilterOptions"].is_object());
    }

    #[test]
    fn test_swagger_points_at_spec() {
        assert!(SWAGGER_UI_HTML.contains("/api/openapi.json"));
    }
}
