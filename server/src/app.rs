//! Core application

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands, ExplainTarget};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::SalesService;
use crate::data::document::build_document_query;
use crate::data::ingest::import_csv;
use crate::data::sql::Backend;
use crate::data::sql::builder::build_sales_query;
use crate::domain::sales::SalesQuery;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub sales: Arc<SalesService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Explain { query, target }) => {
                Self::explain(query.as_deref().unwrap_or_default(), target)
            }
            Some(Commands::Import { csv, keep_existing }) => {
                Self::import(&cli_config, csv, keep_existing).await
            }
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let sales = Arc::new(
            SalesService::init(&config.store)
                .await
                .with_context(|| format!("Failed to initialize {} store", config.store.backend))?,
        );
        let shutdown = ShutdownService::new(sales.clone());

        Ok(Self {
            shutdown,
            config,
            sales,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            "{} listening on http://{}:{} (store: {})",
            APP_NAME,
            app.config.server.host,
            app.config.server.port,
            app.sales.backend()
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    /// Warm the in-memory dataset so the first request does not pay for the CSV parse
    pub async fn start_background_tasks(&self) {
        let SalesService::Memory(store) = self.sales.as_ref() else {
            return;
        };
        let store = store.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = store.cache().load().await {
                tracing::warn!(error = %e, "Dataset warm-up failed; will retry on first request");
            }
        });
        self.shutdown.register(handle).await;
        tracing::debug!("Background tasks started");
    }

    async fn import(cli: &CliConfig, csv: Option<PathBuf>, keep_existing: bool) -> Result<()> {
        let config = AppConfig::load(cli)?;
        let csv = csv.unwrap_or_else(|| config.store.csv_path.clone());
        let service = SalesService::init(&config.store)
            .await
            .with_context(|| format!("Failed to initialize {} store", config.store.backend))?;

        let result = import_csv(&service, &csv, keep_existing).await;
        service.close().await;
        let summary =
            result.with_context(|| format!("Failed to import {}", csv.display()))?;

        println!(
            "Imported {} rows from {} into {} ({} skipped, {} replaced)",
            summary.inserted,
            csv.display(),
            config.store.backend,
            summary.skipped,
            summary.deleted
        );
        Ok(())
    }

    fn explain(raw_query: &str, target: ExplainTarget) -> Result<()> {
        println!("{}", Self::render_explain(raw_query, target)?);
        Ok(())
    }

    fn render_explain(raw_query: &str, target: ExplainTarget) -> Result<String> {
        let pairs = parse_query_string(raw_query)?;
        let query = SalesQuery::from_pairs(&pairs);

        let backend = match target {
            ExplainTarget::Document => {
                let document = build_document_query(&query);
                return serde_json::to_string_pretty(&document)
                    .context("Failed to render document query");
            }
            ExplainTarget::Sqlite => Backend::Sqlite,
            ExplainTarget::Postgres => Backend::Postgres,
        };

        let sql = build_sales_query(&query, backend.dialect());
        let params = sql
            .params
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("  {} = {}", i + 1, v))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "-- {backend} data query\n{}\n\n-- {backend} count query\n{}\n\n-- parameters\n{}",
            sql.data_sql,
            sql.count_sql,
            if params.is_empty() { "  (none)".to_string() } else { params },
        ))
    }
}

/// Split a raw `a=b&c=d` string into decoded pairs.
///
/// Literal spaces are read as `+` (form encoding); any other character that
/// cannot appear in a URI is an error rather than an empty query.
fn parse_query_string(raw: &str) -> Result<Vec<(String, String)>> {
    let raw = raw.trim().trim_start_matches('?').replace(' ', "+");
    let uri: axum::http::Uri = format!("/?{raw}")
        .parse()
        .with_context(|| format!("Invalid query string: {raw}"))?;
    let query = axum::extract::Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .with_context(|| format!("Invalid query string: {raw}"))?;
    Ok(query.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let pairs = parse_query_string("?search=ali%20ce&tags=a&tags=b").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), "ali ce".to_string()),
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
            ]
        );
        assert!(parse_query_string("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_query_string_literal_spaces() {
        let pairs = parse_query_string("search=ali ce&gender=Male").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), "ali ce".to_string()),
                ("gender".to_string(), "Male".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_query_string_is_an_error() {
        let err = parse_query_string("search=a\tb&gender=Male").unwrap_err();
        assert!(err.to_string().contains("Invalid query string"));
        assert!(CoreApp::render_explain("search=a\tb", ExplainTarget::Sqlite).is_err());
    }

    #[test]
    fn test_explain_keeps_spaced_search_term() {
        let out = CoreApp::render_explain("search=ali ce", ExplainTarget::Sqlite).unwrap();
        assert!(out.contains("'%ali ce%'"));
    }

    #[test]
    fn test_explain_sqlite() {
        let out = CoreApp::render_explain("search=ali&sortBy=customer-az", ExplainTarget::Sqlite)
            .unwrap();
        assert!(out.contains("-- sqlite data query"));
        assert!(out.contains("LIKE"));
        assert!(out.contains("%ali%"));
    }

    #[test]
    fn test_explain_postgres_uses_numbered_placeholders() {
        let out = CoreApp::render_explain("gender=Male", ExplainTarget::Postgres).unwrap();
        assert!(out.contains("$1"));
        assert!(out.contains("Male"));
    }

    #[test]
    fn test_explain_document_is_json() {
        let out = CoreApp::render_explain("page=2&limit=5", ExplainTarget::Document).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["skip"], 5);
        assert_eq!(value["limit"], 5);
    }

    #[test]
    fn test_explain_without_parameters() {
        let out = CoreApp::render_explain("", ExplainTarget::Sqlite).unwrap();
        assert!(out.contains("(none)"));
    }
}
