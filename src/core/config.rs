//! Server configuration
//!
//! All settings are environment-driven with development defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | ./gatepass-data | working directory (database, uploads, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development / staging / production |
//! | ANALYTICS_MONTHS | 6 | trailing window for monthly rollups |
//! | EVENT_BANNER_MAX_MB | 10 | event banner upload ceiling |
//! | TICKET_BANNER_MAX_MB | 5 | ticket-type banner / logo upload ceiling |

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding database, uploads and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT settings
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Trailing window (months) for monthly sales rollups
    pub analytics_months: u32,
    /// Upload ceiling for event banners (bytes)
    pub event_banner_max_bytes: usize,
    /// Upload ceiling for ticket-type banners, logos and profile images (bytes)
    pub ticket_banner_max_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./gatepass-data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            analytics_months: std::env::var("ANALYTICS_MONTHS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(6),
            event_banner_max_bytes: std::env::var("EVENT_BANNER_MAX_MB")
                .ok()
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(10)
                * 1024
                * 1024,
            ticket_banner_max_bytes: std::env::var("TICKET_BANNER_MAX_MB")
                .ok()
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(5)
                * 1024
                * 1024,
        }
    }

    /// Override the work dir and port, for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> Result<(), AppError> {
        for dir in [self.database_dir(), self.uploads_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
