//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Payroll policy.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Inventory and dashboard settings.
    #[serde(default)]
    pub inventory: InventoryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Payroll policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Contractual hours in one working day.
    #[serde(default = "default_hours_per_day")]
    pub standard_hours_per_day: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: Decimal,
    /// Whether Saturday counts as a working day.
    #[serde(default)]
    pub saturday_is_workday: bool,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            standard_hours_per_day: default_hours_per_day(),
            overtime_multiplier: default_overtime_multiplier(),
            saturday_is_workday: false,
        }
    }
}

fn default_hours_per_day() -> Decimal {
    Decimal::from(8)
}

fn default_overtime_multiplier() -> Decimal {
    Decimal::new(15, 1)
}

/// Inventory and dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// How long the dashboard summary is cached, in seconds.
    #[serde(default = "default_dashboard_ttl")]
    pub dashboard_cache_ttl_secs: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            dashboard_cache_ttl_secs: default_dashboard_ttl(),
        }
    }
}

fn default_dashboard_ttl() -> u64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COMPTOIR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("COMPTOIR__DATABASE__URL", Some("postgres://localhost/comptoir")),
                ("COMPTOIR__JWT__SECRET", Some("secret")),
                ("COMPTOIR__SERVER__PORT", Some("9000")),
                ("RUN_MODE", Some("config-test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/comptoir");
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.log.format, LogFormat::Pretty);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("COMPTOIR__DATABASE__URL", None::<&str>),
                ("COMPTOIR__JWT__SECRET", Some("secret")),
                ("RUN_MODE", Some("config-test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_payroll_defaults() {
        let payroll = PayrollConfig::default();
        assert_eq!(payroll.standard_hours_per_day, dec!(8));
        assert_eq!(payroll.overtime_multiplier, dec!(1.5));
        assert!(!payroll.saturday_is_workday);
    }
}
