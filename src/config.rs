//! Configuration module
//!
//! Reads a TOML file (default `~/.config/parking-service/config.toml`,
//! overridable via `PARKING_CONFIG`); every section falls back to sane
//! defaults when absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub jwt_expiration_minutes: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            jwt_expiration_minutes: 30,
        }
    }
}

/// Pricing for parking sessions. Fractional rates are allowed; amounts
/// are converted to `Decimal` at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub price_per_hour: f64,
    /// Fee cap per calendar day; 0 disables the cap
    pub max_daily: f64,
    pub currency: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            price_per_hour: 5000.0,
            max_daily: 50000.0,
            currency: "IDR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Seed admin account, created on first start when no accounts exist
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            email: "admin@example.com".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `~/.config/parking-service/config.toml` (platform equivalent)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parking-service")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.security.jwt_expiration_minutes, 30);
        assert_eq!(cfg.tariff.price_per_hour, 5000.0);
        assert_eq!(cfg.tariff.currency, "IDR");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 3000

            [tariff]
            price_per_hour = 2500.5
            max_daily = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.tariff.price_per_hour, 2500.5);
        assert_eq!(cfg.tariff.max_daily, 0.0);
        assert_eq!(cfg.security.jwt_expiration_minutes, 30);
    }

    #[test]
    fn server_address_formatting() {
        let cfg = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(cfg.address(), "127.0.0.1:9000");
    }
}
