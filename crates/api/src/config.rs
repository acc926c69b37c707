//! # API Configuration Module
//!
//! Loads settings for the BookSlot API server from environment variables,
//! with defaults for everything except the database connection string.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: whole-request timeout (default: 30)
//! - `BUSINESS_TIMEZONE`: IANA zone of published working hours (default: "Europe/Sofia")
//! - `CACHE_ENABLED`: cache provider and customer profiles (default: true)
//! - `CACHE_TTL_SECONDS`: lifetime of a cached profile (default: 300)
//! - `LOOKUP_TIMEOUT_MS`: bound on each entity lookup (default: 5000)

use std::env;
use std::time::Duration;

use bookslot_core::coordinator::CoordinatorSettings;
use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use tracing::Level;

/// Configuration for the BookSlot API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use bookslot_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Zone in which working hours are interpreted and slots rendered
    pub business_timezone: Tz,

    /// Whether profile lookups go through the in-memory cache
    pub cache_enabled: bool,

    /// Cache entry lifetime in seconds
    pub cache_ttl: u64,

    /// Per-lookup timeout for entity resolution, in milliseconds
    pub lookup_timeout_ms: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is missing, or if `API_PORT`,
    /// `DATABASE_MAX_CONNECTIONS` or `BUSINESS_TIMEZONE` hold values that do
    /// not parse.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Scheduling settings
        let business_timezone = parse_timezone(
            &env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "Europe/Sofia".to_string()),
        )?;
        let cache_enabled = env::var("CACHE_ENABLED")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);
        let cache_ttl = env::var("CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);
        let lookup_timeout_ms = env::var("LOOKUP_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            business_timezone,
            cache_enabled,
            cache_ttl,
            lookup_timeout_ms,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            zone: self.business_timezone,
            lookup_timeout: Duration::from_millis(self.lookup_timeout_ms),
        }
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .parse::<Tz>()
        .map_err(|e| eyre!("Invalid BUSINESS_TIMEZONE value {value:?}: {e}"))
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}
