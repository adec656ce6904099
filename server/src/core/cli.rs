use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::StoreBackend;
use super::constants::{
    ENV_CONFIG, ENV_CORS_ORIGINS, ENV_CSV_PATH, ENV_HOST, ENV_PORT, ENV_POSTGRES_URL,
    ENV_SQLITE_PATH, ENV_STORE_BACKEND,
};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(version, about = "Sales records dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Sales store backend (memory, sqlite or postgres)
    #[arg(long, global = true, env = ENV_STORE_BACKEND, value_parser = parse_store_backend)]
    pub store: Option<StoreBackend>,

    /// Sales CSV file (memory backend and import source)
    #[arg(long, global = true, env = ENV_CSV_PATH)]
    pub csv_path: Option<PathBuf>,

    /// SQLite database file (when using sqlite backend)
    #[arg(long, global = true, env = ENV_SQLITE_PATH)]
    pub sqlite_path: Option<PathBuf>,

    /// PostgreSQL connection URL (when using postgres backend)
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Allowed CORS origins, comma-separated
    #[arg(long, global = true, env = ENV_CORS_ORIGINS, value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,
}

/// Parse store backend from CLI/env string
fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.to_lowercase().as_str() {
        "memory" | "csv" => Ok(StoreBackend::Memory),
        "sqlite" => Ok(StoreBackend::Sqlite),
        "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
        _ => Err(format!(
            "Invalid store backend '{}'. Valid options: memory, sqlite, postgres",
            s
        )),
    }
}

/// Query dialect rendered by `explain`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainTarget {
    Sqlite,
    Postgres,
    Document,
}

/// Parse explain target from CLI string
fn parse_explain_target(s: &str) -> Result<ExplainTarget, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(ExplainTarget::Sqlite),
        "postgres" | "postgresql" => Ok(ExplainTarget::Postgres),
        "document" | "mongo" | "mongodb" => Ok(ExplainTarget::Document),
        _ => Err(format!(
            "Invalid explain target '{}'. Valid options: sqlite, postgres, document",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Load a sales CSV into the configured sqlite or postgres store
    Import {
        /// CSV file to import (defaults to the configured csv path)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Append to existing rows instead of replacing them
        #[arg(long)]
        keep_existing: bool,
    },
    /// Print the query a backend would run for a dashboard query string
    Explain {
        /// Query string as sent to /api/sales, e.g. "search=ali&sortBy=customer-az"
        query: Option<String>,
        /// Output dialect (sqlite, postgres or document)
        #[arg(long, short = 't', default_value = "sqlite", value_parser = parse_explain_target)]
        target: ExplainTarget,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub store: Option<StoreBackend>,
    pub csv_path: Option<PathBuf>,
    pub sqlite_path: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub cors_origins: Option<Vec<String>>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            store: cli.store,
            csv_path: cli.csv_path,
            sqlite_path: cli.sqlite_path,
            postgres_url: cli.postgres_url,
            cors_origins: cli.cors_origins.map(|origins| {
                origins
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (CliConfig::from(cli), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> (CliConfig, Option<Commands>) {
        let mut cli = Cli::try_parse_from(args).unwrap();
        let command = cli.command.take();
        (CliConfig::from(cli), command)
    }

    #[test]
    fn test_parse_store_backend() {
        assert_eq!(parse_store_backend("SQLite").unwrap(), StoreBackend::Sqlite);
        assert_eq!(parse_store_backend("postgresql").unwrap(), StoreBackend::Postgres);
        assert_eq!(parse_store_backend("csv").unwrap(), StoreBackend::Memory);
        assert!(parse_store_backend("mysql").unwrap_err().contains("Valid options"));
    }

    #[test]
    fn test_parse_explain_target() {
        assert_eq!(parse_explain_target("mongo").unwrap(), ExplainTarget::Document);
        assert!(parse_explain_target("redis").is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let (config, command) = parse_args(&[
            "salesboard",
            "import",
            "--csv",
            "in.csv",
            "--store",
            "sqlite",
            "-p",
            "8081",
        ]);
        assert_eq!(config.store, Some(StoreBackend::Sqlite));
        assert_eq!(config.port, Some(8081));
        match command {
            Some(Commands::Import { csv, keep_existing }) => {
                assert_eq!(csv, Some(PathBuf::from("in.csv")));
                assert!(!keep_existing);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_explain_defaults_to_sqlite() {
        let (_, command) = parse_args(&["salesboard", "explain", "search=ali"]);
        match command {
            Some(Commands::Explain { query, target }) => {
                assert_eq!(query.as_deref(), Some("search=ali"));
                assert_eq!(target, ExplainTarget::Sqlite);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cors_origins_split_and_trimmed() {
        let (config, command) = parse_args(&[
            "salesboard",
            "--cors-origins",
            "https://a.example, https://b.example,",
        ]);
        assert!(command.is_none());
        assert_eq!(
            config.cors_origins.unwrap(),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
