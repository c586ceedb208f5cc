//! # Dispatch Error Types
//!
//! Error types for configuration and order hand-off.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dispatch Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Order               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  InvalidDest.   │  │  Core (from santto-core)│ │
//! │  │  ConfigLoad     │  │  InvalidUrl     │  │                         │ │
//! │  │  ConfigSave     │  │  LaunchFailed   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use santto_core::CoreError;
use thiserror::Error;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Error)]
pub enum DispatchError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid dispatch configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Destination is not a phone number the messaging app accepts.
    #[error("Invalid destination '{destination}': {reason}")]
    InvalidDestination { destination: String, reason: String },

    #[error("Invalid link URL: {0}")]
    InvalidUrl(String),

    /// The launcher could not open the link.
    #[error("Failed to launch link: {0}")]
    LaunchFailed(String),

    // =========================================================================
    // Order Errors
    // =========================================================================
    /// Formatting rejected the order (missing name, etc).
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for DispatchError {
    fn from(err: url::ParseError) -> Self {
        DispatchError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for DispatchError {
    fn from(err: std::io::Error) -> Self {
        DispatchError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DispatchError {
    fn from(err: toml::de::Error) -> Self {
        DispatchError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for DispatchError {
    fn from(err: toml::ser::Error) -> Self {
        DispatchError::ConfigSaveFailed(err.to_string())
    }
}

impl DispatchError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidConfig(_)
                | DispatchError::ConfigLoadFailed(_)
                | DispatchError::ConfigSaveFailed(_)
                | DispatchError::InvalidDestination { .. }
                | DispatchError::InvalidUrl(_)
        )
    }

    /// Returns true if the customer can fix this by editing the order.
    pub fn is_order_error(&self) -> bool {
        matches!(self, DispatchError::Core(_))
    }
}
