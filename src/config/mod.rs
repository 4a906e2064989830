use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;

pub use database::DatabaseConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Window, in days, for "due soon" installment alerts
    pub upcoming_due_days: u32,
    /// Threshold given to products created without one of their own; feeds
    /// `ProductService::with_default_threshold`
    pub default_low_stock_threshold: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                upcoming_due_days: env::var("UPCOMING_DUE_DAYS")
                    .unwrap_or_else(|_| "7".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid UPCOMING_DUE_DAYS".to_string())
                    })?,
                default_low_stock_threshold: env::var("LOW_STOCK_THRESHOLD")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid LOW_STOCK_THRESHOLD".to_string())
                    })?,
            },
            database: DatabaseConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.upcoming_due_days == 0 {
            return Err(AppError::Configuration(
                "Upcoming due window must be greater than 0".to_string(),
            ));
        }

        if self.app.default_low_stock_threshold < 0 {
            return Err(AppError::Configuration(
                "Low stock threshold cannot be negative".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool must allow at least one connection".to_string(),
            ));
        }

        Ok(())
    }
}
