// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Salesboard";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "salesboard";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "salesboard.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SALESBOARD_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SALESBOARD_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SALESBOARD_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SALESBOARD_LOG";

/// Environment variable for allowed CORS origins (comma-separated)
pub const ENV_CORS_ORIGINS: &str = "SALESBOARD_CORS_ORIGINS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed by default (local dashboard dev servers)
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

/// Hosted preview deployments are allowed on any subdomain of this suffix
pub const CORS_PREVIEW_HOST_SUFFIX: &str = ".vercel.app";

// =============================================================================
// Environment Variables - Store
// =============================================================================

/// Environment variable for the sales store backend (memory, sqlite, postgres)
pub const ENV_STORE_BACKEND: &str = "SALESBOARD_STORE";

/// Environment variable for the sales CSV path
pub const ENV_CSV_PATH: &str = "SALESBOARD_CSV_PATH";

/// Environment variable for the SQLite database path
pub const ENV_SQLITE_PATH: &str = "SALESBOARD_SQLITE_PATH";

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "SALESBOARD_POSTGRES_URL";

/// Conventional PostgreSQL URL variable, used when ENV_POSTGRES_URL is unset
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

// =============================================================================
// Store Defaults
// =============================================================================

/// Default sales CSV location
pub const DEFAULT_CSV_PATH: &str = "data/sales_data.csv";

/// Default SQLite database location
pub const DEFAULT_SQLITE_PATH: &str = "data/sales.db";

/// Rows per insert transaction during CSV import
pub const IMPORT_BATCH_SIZE: usize = 1000;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds (release unused connections)
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds (cycle connections to prevent stale state)
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds (prevent runaway queries)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// HTTP
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Cache-Control value for the filter options endpoint
pub const FILTER_OPTIONS_CACHE_CONTROL: &str = "private, max-age=30";

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
