//! Configuration module for procurement-service.

use rust_decimal::Decimal;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProcurementConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Pricing knobs. The tax rate is configuration, not a literal at call
/// sites; 0.05 matches the business default.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub tax_rate: Decimal,
}

impl PricingConfig {
    pub fn default_tax_rate() -> Decimal {
        // 5%
        Decimal::new(5, 2)
    }
}

impl ProcurementConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let tax_rate = match env::var("PRICING_TAX_RATE") {
            Ok(raw) => Decimal::from_str(&raw).map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "PRICING_TAX_RATE must be a decimal fraction, got '{}'",
                    raw
                ))
            })?,
            Err(_) => PricingConfig::default_tax_rate(),
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "procurement-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            },
            pricing: PricingConfig { tax_rate },
        })
    }
}
