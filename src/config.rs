use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::utils::get_env_with_prefix;

/// Main configuration for a subsync instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum request body size in bytes (default: 1MB).
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Webhook endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Route path the receiver is mounted at.
    #[serde(default = "default_webhook_path")]
    pub path: String,
    /// Shared secret used to verify the `stripe-signature` header.
    ///
    /// Held as a [`SecretString`] so it never shows up in debug output or
    /// serialized config. Loaded from `SUBSYNC_STRIPE_WEBHOOK_SECRET`.
    #[serde(skip)]
    pub secret: Option<SecretString>,
    /// Allowed clock skew between the signature timestamp and now, in seconds.
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: default_webhook_path(),
            secret: None,
            tolerance_secs: default_tolerance_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_webhook_path() -> String {
    "/webhooks".to_string()
}

fn default_tolerance_secs() -> i64 {
    300
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Builder for Config with environment variable support.
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.config.server.max_body_size = max_body_size;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Set the route path the webhook receiver is mounted at.
    pub fn with_webhook_path(mut self, path: impl Into<String>) -> Self {
        self.config.webhook.path = path.into();
        self
    }

    /// Set the shared secret used to verify webhook signatures.
    pub fn with_webhook_secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.config.webhook.secret = Some(secret.into());
        self
    }

    /// Set the signature timestamp tolerance in seconds.
    pub fn with_signature_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.config.webhook.tolerance_secs = tolerance_secs;
        self
    }

    /// Load configuration from environment variables with SUBSYNC_ prefix.
    pub fn from_env(mut self) -> Self {
        if let Some(host) = get_env_with_prefix("HOST") {
            self.config.server.host = host;
        }
        // Check SUBSYNC_PORT first, fall back to PORT (for Railway/Heroku compatibility)
        if let Some(port) = get_env_with_prefix("PORT") {
            if let Ok(p) = port.parse() {
                self.config.server.port = p;
            }
        }
        if let Some(max_body_size) = get_env_with_prefix("MAX_BODY_SIZE") {
            if let Ok(size) = max_body_size.parse() {
                self.config.server.max_body_size = size;
            }
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(path) = get_env_with_prefix("WEBHOOK_PATH") {
            self.config.webhook.path = path;
        }
        if let Some(secret) = get_env_with_prefix("STRIPE_WEBHOOK_SECRET") {
            self.config.webhook.secret = Some(secret.into());
        }
        if let Some(tolerance) = get_env_with_prefix("WEBHOOK_TOLERANCE_SECS") {
            if let Ok(t) = tolerance.parse() {
                self.config.webhook.tolerance_secs = t;
            }
        }

        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - Invalid server address (host:port)
    /// - Invalid log level
    /// - Invalid webhook path or tolerance
    pub fn build(self) -> crate::error::Result<Config> {
        self.config.server.addr().map_err(|e| {
            crate::error::SubsyncError::Config(format!(
                "Invalid server address {}:{} - {}",
                self.config.server.host, self.config.server.port, e
            ))
        })?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(crate::error::SubsyncError::Config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        if self.config.server.port == 0 {
            return Err(crate::error::SubsyncError::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.config.server.max_body_size == 0 {
            return Err(crate::error::SubsyncError::Config(
                "Maximum body size must be greater than 0".to_string(),
            ));
        }

        if !self.config.webhook.path.starts_with('/') {
            return Err(crate::error::SubsyncError::Config(format!(
                "Webhook path must start with '/': {}",
                self.config.webhook.path
            )));
        }

        if self.config.webhook.tolerance_secs <= 0 {
            return Err(crate::error::SubsyncError::Config(
                "Signature tolerance must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config_builds() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.webhook.path, "/webhooks");
        assert_eq!(config.webhook.tolerance_secs, 300);
        assert!(config.webhook.secret.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = ConfigBuilder::new()
            .with_host("127.0.0.1")
            .with_port(3000)
            .with_max_body_size(64 * 1024)
            .with_log_level("debug")
            .with_json_logging(true)
            .with_webhook_path("/stripe/events")
            .with_webhook_secret("whsec_test".to_string())
            .with_signature_tolerance(60)
            .build()
            .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_body_size, 64 * 1024);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.webhook.path, "/stripe/events");
        assert_eq!(config.webhook.tolerance_secs, 60);
        assert_eq!(
            config.webhook.secret.unwrap().expose_secret(),
            "whsec_test"
        );
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = ConfigBuilder::new().with_log_level("loud").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let result = ConfigBuilder::new().with_host("not a host").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let result = ConfigBuilder::new().with_port(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_webhook_path_must_be_absolute() {
        let result = ConfigBuilder::new().with_webhook_path("webhooks").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_nonpositive_tolerance_rejected() {
        let result = ConfigBuilder::new().with_signature_tolerance(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_env_reads_secret() {
        std::env::set_var("SUBSYNC_STRIPE_WEBHOOK_SECRET", "whsec_env");
        std::env::set_var("SUBSYNC_WEBHOOK_PATH", "/hooks/stripe");
        let config = ConfigBuilder::new().from_env().build().unwrap();
        std::env::remove_var("SUBSYNC_STRIPE_WEBHOOK_SECRET");
        std::env::remove_var("SUBSYNC_WEBHOOK_PATH");

        assert_eq!(config.webhook.path, "/hooks/stripe");
        assert_eq!(config.webhook.secret.unwrap().expose_secret(), "whsec_env");
    }

    #[test]
    fn test_secret_not_serialized() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_hidden".to_string())
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("whsec_hidden"));
    }
}
