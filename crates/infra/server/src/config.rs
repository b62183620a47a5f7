//! Server configuration.

use serde::{Deserialize, Serialize};
use zip_auth_plugin_phone_reset::PhoneResetConfig;

/// Deployment environment; selects the SMS transport and whether raw
/// codes may be disclosed in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Reads `ZIP_AUTH_ENV`; anything other than "production" is
    /// development.
    pub fn from_env() -> Self {
        match std::env::var("ZIP_AUTH_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Application-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Base path for auth routes.
    pub base_path: String,
    /// Brand name used in SMS templates.
    pub brand: String,
    /// Reset-flow knobs.
    pub reset: ResetSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_path: "/api/auth".to_string(),
            brand: "ZipFood".to_string(),
            reset: ResetSettings::default(),
        }
    }
}

/// Reset-flow settings, all optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetSettings {
    /// Code expiration in seconds.
    pub expires_in: u64,
    /// Client resend cooldown in seconds.
    pub resend_cooldown: u64,
    /// Maximum code sends per phone per window.
    pub max_sends: u32,
    /// Send-rate window in seconds.
    pub send_window: u64,
    /// Minimum accepted password length.
    pub min_password_length: usize,
}

impl Default for ResetSettings {
    fn default() -> Self {
        let defaults = PhoneResetConfig::default();
        Self {
            expires_in: defaults.expires_in,
            resend_cooldown: defaults.resend_cooldown,
            max_sends: defaults.max_sends,
            send_window: defaults.send_window,
            min_password_length: defaults.min_password_length,
        }
    }
}

impl AppConfig {
    /// Builds the plugin config from these settings.
    ///
    /// Raw-code disclosure follows the environment and can never be
    /// switched on in production.
    pub fn reset_config(&self) -> PhoneResetConfig {
        let mut config = PhoneResetConfig::new()
            .brand(self.brand.clone())
            .expires_in(self.reset.expires_in)
            .resend_cooldown(self.reset.resend_cooldown)
            .max_sends(self.reset.max_sends)
            .send_window(self.reset.send_window)
            .min_password_length(self.reset.min_password_length);

        if !self.environment.is_production() {
            config = config.expose_dev_code();
        }
        config
    }
}

/// Loads configuration from a TOML file with `[server]` and `[app]`
/// sections. Missing sections fall back to defaults.
pub fn load_config(path: &str) -> Result<(ServerConfig, AppConfig), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: toml::Value =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let server: ServerConfig = config
        .get("server")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    let app: AppConfig = config
        .get("app")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    Ok((server, app))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8000);

        let app = AppConfig::default();
        assert_eq!(app.reset.expires_in, 15 * 60);
        assert_eq!(app.reset.max_sends, 5);
    }

    #[test]
    fn test_dev_codes_follow_environment() {
        let mut app = AppConfig::default();
        assert!(app.reset_config().expose_dev_code);

        app.environment = Environment::Production;
        assert!(!app.reset_config().expose_dev_code);
    }

    #[test]
    fn test_parse_sections() {
        let parsed: toml::Value = toml::from_str(
            r#"
            [server]
            port = 9001

            [app]
            environment = "production"
            brand = "TestFood"

            [app.reset]
            max_sends = 3
            "#,
        )
        .unwrap();

        let server: ServerConfig = parsed.get("server").cloned().unwrap().try_into().unwrap();
        assert_eq!(server.port, 9001);
        assert_eq!(server.host, "0.0.0.0");

        let app: AppConfig = parsed.get("app").cloned().unwrap().try_into().unwrap();
        assert!(app.environment.is_production());
        assert_eq!(app.brand, "TestFood");
        assert_eq!(app.reset.max_sends, 3);
        assert_eq!(app.reset.expires_in, 900);
    }
}
