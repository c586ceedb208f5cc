//! # Dispatch Configuration
//!
//! Where orders go and how their text is labelled.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SANTTO_DESTINATION=5591984497134                                   │
//! │     SANTTO_STORE_LABEL, SANTTO_PAYMENT_FALLBACK, SANTTO_WHATSAPP_URL   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/santto/santto.toml (Linux)                               │
//! │     ~/Library/Application Support/br.santto.santto/santto.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The store's WhatsApp number, Portuguese labels                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # santto.toml
//! [order]
//! store_label = "Novo Pedido - Santto Hambúrguer"
//! payment_fallback = "A combinar"
//!
//! [whatsapp]
//! destination = "+55 (91) 98449-7134"
//! base_url = "https://wa.me"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use santto_core::OrderSettings;

use crate::error::{DispatchError, DispatchResult};
use crate::transport::normalize_destination;

// =============================================================================
// WhatsApp Settings
// =============================================================================

/// Where the order link points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppSettings {
    /// Store phone number. Formatting characters are allowed and stripped.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Deep-link endpoint; the normalized number is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_destination() -> String {
    "5591984497134".to_string()
}

fn default_base_url() -> String {
    "https://wa.me".to_string()
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        WhatsAppSettings {
            destination: default_destination(),
            base_url: default_base_url(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete dispatch configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Labels and currency convention for the order text.
    #[serde(default)]
    pub order: OrderSettings,

    #[serde(default)]
    pub whatsapp: WhatsAppSettings,
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (santto.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DispatchResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dispatch config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load dispatch config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DispatchResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DispatchError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Dispatch config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DispatchResult<()> {
        self.order
            .validate()
            .map_err(|e| DispatchError::InvalidConfig(e.to_string()))?;

        normalize_destination(&self.whatsapp.destination)?;

        let base = Url::parse(&self.whatsapp.base_url)?;
        if base.scheme() != "https" && base.scheme() != "http" {
            return Err(DispatchError::InvalidUrl(format!(
                "WhatsApp URL must start with http:// or https://, got: {}",
                self.whatsapp.base_url
            )));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in `load`).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(destination) = lookup("SANTTO_DESTINATION") {
            debug!(destination = %destination, "Overriding destination from environment");
            self.whatsapp.destination = destination;
        }

        if let Some(url) = lookup("SANTTO_WHATSAPP_URL") {
            debug!(url = %url, "Overriding WhatsApp URL from environment");
            self.whatsapp.base_url = url;
        }

        if let Some(label) = lookup("SANTTO_STORE_LABEL") {
            self.order.store_label = label;
        }

        if let Some(fallback) = lookup("SANTTO_PAYMENT_FALLBACK") {
            self.order.payment_fallback = fallback;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br", "santto", "santto")
            .map(|dirs| dirs.config_dir().join("santto.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn destination(&self) -> &str {
        &self.whatsapp.destination
    }

    pub fn order_settings(&self) -> &OrderSettings {
        &self.order
    }
}
