//! Configuration module for the portfolio backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Root directory for the filesystem object store; in-memory store when unset
    pub storage_root: Option<PathBuf>,
    /// Base URL prefix for issued object read URLs
    pub public_url_base: String,
    /// Secret used to sign identity tokens
    pub jwt_secret: String,
    /// Lifetime of issued identity tokens, in seconds
    pub token_ttl_secs: i64,
    /// Allowed CORS origin; `*` allows any
    pub cors_origin: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Email for the bootstrap super admin, created when no accounts exist
    pub bootstrap_admin_email: Option<String>,
    /// Password for the bootstrap super admin
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PORTFOLIO_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let storage_root = env::var("PORTFOLIO_STORAGE_ROOT").ok().map(PathBuf::from);

        let public_url_base = env::var("PORTFOLIO_PUBLIC_URL_BASE")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/storage".to_string());

        let jwt_secret =
            env::var("PORTFOLIO_JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string());

        let token_ttl_secs = env::var("PORTFOLIO_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let cors_origin = env::var("PORTFOLIO_CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        let bind_addr = env::var("PORTFOLIO_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PORTFOLIO_BIND_ADDR format");

        let log_level = env::var("PORTFOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let bootstrap_admin_email = env::var("PORTFOLIO_BOOTSTRAP_ADMIN_EMAIL").ok();
        let bootstrap_admin_password = env::var("PORTFOLIO_BOOTSTRAP_ADMIN_PASSWORD").ok();

        Self {
            db_path,
            storage_root,
            public_url_base,
            jwt_secret,
            token_ttl_secs,
            cors_origin,
            bind_addr,
            log_level,
            bootstrap_admin_email,
            bootstrap_admin_password,
        }
    }
}
