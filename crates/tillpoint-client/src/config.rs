//! # Client Configuration
//!
//! Where the backend lives, where the session is kept, and how the terminal
//! behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILLPOINT_API_URL=https://pos.example.com/api                      │
//! │     TILLPOINT_TIMEOUT_SECS=15                                          │
//! │     TILLPOINT_SESSION_PATH=/var/lib/tillpoint/session.json             │
//! │     TILLPOINT_PAYMENT_METHOD=card                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tillpoint/tillpoint.toml (Linux)                         │
//! │     ~/Library/Application Support/com.tillpoint.tillpoint/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, 30s timeout, CASH                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tillpoint.toml
//! [api]
//! base_url = "https://pos.example.com/api"
//! timeout_secs = 30
//!
//! [session]
//! storage_path = "/home/cashier/.local/share/tillpoint/session.json"
//!
//! [terminal]
//! payment_method = "CASH"
//! currency_symbols = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tillpoint_core::{Currency, Money, PaymentMethod};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Session file. `None` uses the platform data directory.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl SessionSettings {
    /// The configured path, or `session.json` in the platform data directory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "tillpoint", "tillpoint")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }
}

// =============================================================================
// Terminal Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Payment method submitted with every sale.
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Prefix amounts with "$" / "ZWL " when displaying.
    #[serde(default = "default_true")]
    pub currency_symbols: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            payment_method: PaymentMethod::default(),
            currency_symbols: default_true(),
        }
    }
}

impl TerminalSettings {
    /// Formats an amount for display.
    pub fn format_money(&self, amount: Money, currency: Currency) -> String {
        if self.currency_symbols {
            amount.display_in(currency)
        } else {
            amount.to_string()
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub terminal: TerminalSettings,
}

impl ClientConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TILLPOINT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("TILLPOINT_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid TILLPOINT_TIMEOUT_SECS"),
            }
        }

        if let Ok(path) = std::env::var("TILLPOINT_SESSION_PATH") {
            self.session.storage_path = Some(PathBuf::from(path));
        }

        if let Ok(method) = std::env::var("TILLPOINT_PAYMENT_METHOD") {
            match method.parse() {
                Ok(parsed) => {
                    debug!(method = %method, "Overriding payment method from environment");
                    self.terminal.payment_method = parsed;
                }
                Err(e) => warn!("Ignoring TILLPOINT_PAYMENT_METHOD: {}", e),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tillpoint", "tillpoint")
            .map(|dirs| dirs.config_dir().join("tillpoint.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.terminal.payment_method
    }

    /// Config pointing at `base_url` with everything else defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.payment_method(), PaymentMethod::Cash);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::for_base_url("ftp://pos.example.com");
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://pos.example.com/api".into();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));

        config.api.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://pos.example.com/api"

            [terminal]
            payment_method = "CARD"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.payment_method(), PaymentMethod::Card);
        assert!(config.terminal.currency_symbols);
        assert!(config.session.storage_path.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ClientConfig::default()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[terminal]"));
    }

    #[test]
    fn test_format_money() {
        let mut terminal = TerminalSettings::default();
        let amount = Money::from_cents(600);
        assert_eq!(terminal.format_money(amount, Currency::Usd), "$6.00");

        terminal.currency_symbols = false;
        assert_eq!(terminal.format_money(amount, Currency::Zwl), "6.00");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tillpoint.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:9000/api\"\n").unwrap();

        let config = ClientConfig::load(Some(path)).unwrap();
        // Environment may override in CI; only the file value is asserted when unset.
        if std::env::var("TILLPOINT_API_URL").is_err() {
            assert_eq!(config.base_url(), "http://10.0.0.5:9000/api");
        }
    }
}
