use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_CORS_ORIGINS, DEFAULT_CSV_PATH, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SQLITE_PATH, ENV_DATABASE_URL,
};

// =============================================================================
// Store Backend Enum
// =============================================================================

/// Where sales records are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// CSV dataset loaded into memory
    #[default]
    Memory,
    Sqlite,
    #[serde(alias = "postgresql")]
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use SALESBOARD_POSTGRES_URL / DATABASE_URL)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds (default: 60)
    pub statement_timeout_secs: Option<u64>,
    /// Install pg_trgm GIN indexes for substring search (default: false)
    pub trigram_search: Option<bool>,
}

/// Store configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreFileConfig {
    pub backend: Option<StoreBackend>,
    pub csv_path: Option<PathBuf>,
    pub sqlite_path: Option<PathBuf>,
    pub postgres: Option<PostgresFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub store: Option<StoreFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Resolved Config Structs
// =============================================================================

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Exact origins allowed by CORS (preview hosts are matched separately)
    pub cors_origins: Vec<String>,
}

/// PostgreSQL pool settings; zero values fall back to the built-in defaults
#[derive(Debug, Clone, Default)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub statement_timeout_secs: u64,
    pub trigram_search: bool,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub csv_path: PathBuf,
    pub sqlite_path: PathBuf,
    pub postgres: PostgresConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            postgres: PostgresConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    ///
    /// `DATABASE_URL` is used for PostgreSQL only when nothing else sets a URL.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match path {
            Some(path) => {
                let file_config = FileConfig::load_from_file(&path)?;
                file_config.warn_unknown_fields();
                file_config
            }
            None => FileConfig::default(),
        };

        let config = Self::resolve(cli, file_config, std::env::var(ENV_DATABASE_URL).ok());
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            store = %config.store.backend,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer defaults, file values and CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig, database_url: Option<String>) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_store = file_config.store.unwrap_or_default();
        let file_postgres = file_store.postgres.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
            cors_origins: cli
                .cors_origins
                .clone()
                .or(file_server.cors_origins)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()),
        };

        let postgres = PostgresConfig {
            url: cli
                .postgres_url
                .clone()
                .or(file_postgres.url)
                .or(database_url)
                .unwrap_or_default(),
            max_connections: file_postgres.max_connections.unwrap_or_default(),
            min_connections: file_postgres.min_connections.unwrap_or_default(),
            acquire_timeout_secs: file_postgres.acquire_timeout_secs.unwrap_or_default(),
            idle_timeout_secs: file_postgres.idle_timeout_secs.unwrap_or_default(),
            max_lifetime_secs: file_postgres.max_lifetime_secs.unwrap_or_default(),
            statement_timeout_secs: file_postgres.statement_timeout_secs.unwrap_or_default(),
            trigram_search: file_postgres.trigram_search.unwrap_or(false),
        };

        let store = StoreConfig {
            backend: cli.store.or(file_store.backend).unwrap_or_default(),
            csv_path: cli
                .csv_path
                .clone()
                .or(file_store.csv_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            sqlite_path: cli
                .sqlite_path
                .clone()
                .or(file_store.sqlite_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
            postgres,
        };

        Self { server, store }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.store.backend == StoreBackend::Postgres && self.store.postgres.url.is_empty() {
            anyhow::bail!(
                "Configuration error: store.postgres.url (or DATABASE_URL) is required when store.backend is 'postgres'"
            );
        }

        let pg = &self.store.postgres;
        if pg.max_connections > 0 && pg.min_connections > pg.max_connections {
            anyhow::bail!(
                "Configuration error: store.postgres.min_connections ({}) exceeds max_connections ({})",
                pg.min_connections,
                pg.max_connections
            );
        }

        Ok(())
    }
}
