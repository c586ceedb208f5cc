//! # Error Types
//!
//! Domain-specific error types for santto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  santto-core errors (this file)                                        │
//! │  ├── CoreError        - Composition / cart / formatting rule failures  │
//! │  ├── ValidationError  - Malformed input (ids, names, quantities)       │
//! │  └── ErrorPayload     - What the ordering UI receives (serialized)     │
//! │                                                                         │
//! │  santto-dispatch errors (separate crate)                               │
//! │  └── DispatchError    - Config, destination and link failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DispatchError                     │
//! │                              └──────► ErrorPayload → UI                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is a local, synchronous logic error. None of them is
//! transient, so nothing in the core retries.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use crate::types::{Category, CompositionPhase};

// =============================================================================
// Core Error
// =============================================================================

/// Ordering rule violations.
///
/// Operations validate before they mutate, so receiving one of these means
/// the session is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lookup or removal target is absent.
    ///
    /// For catalog ids this is a data/programming error: the catalog is
    /// static and the UI only offers ids it read from it.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// `start` was given an entry that is not a base.
    #[error("{id} is in category '{category}', not 'base'")]
    InvalidBase { id: String, category: Category },

    /// `add` was given an entry that is not an add-on.
    #[error("{id} is in category '{category}', not 'addon'")]
    InvalidAddon { id: String, category: Category },

    /// A base or add-on was added to the cart directly.
    ///
    /// ## User Workflow
    /// ```text
    /// Drinks tab ──► add_simple("coke")      ✅ beverage
    /// Drinks tab ──► add_simple("bacon")     ❌ InvalidSimpleItem
    ///                                          (add-ons go through the builder)
    /// ```
    #[error("{id} is in category '{category}' and must go through composition")]
    InvalidSimpleItem { id: String, category: Category },

    /// A simple line was handed to `add_composed`.
    #[error("Cart line {id} is not a composed item")]
    InvalidComposedLine { id: String },

    /// Attempted removal of the anchor selection.
    #[error("Selection {selection_id} is the base of the item and cannot be removed")]
    BaseImmutable { selection_id: String },

    /// Operation is illegal in the current composition phase.
    #[error("Cannot {operation} while composition is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: CompositionPhase,
    },

    /// The order text needs a customer name.
    #[error("Customer name is required")]
    MissingCustomerName,

    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    #[error("An item cannot have more than {max} selections")]
    CompositionTooLarge { max: usize },

    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Machine-readable code for the UI.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::InvalidBase { .. }
            | CoreError::InvalidAddon { .. }
            | CoreError::InvalidSimpleItem { .. }
            | CoreError::InvalidComposedLine { .. } => ErrorCode::InvalidCategory,
            CoreError::BaseImmutable { .. } => ErrorCode::BaseImmutable,
            CoreError::InvalidState { .. } => ErrorCode::InvalidState,
            CoreError::MissingCustomerName => ErrorCode::MissingCustomerName,
            CoreError::CartTooLarge { .. }
            | CoreError::CompositionTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => ErrorCode::LimitExceeded,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., two catalog entries sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// UI Payload
// =============================================================================

/// Error codes the ordering UI switches on.
///
/// ```typescript
/// switch (e.code) {
///   case 'MISSING_CUSTOMER_NAME': focusNameInput(); break;
///   case 'BASE_IMMUTABLE':        shakeBurger();     break;
///   default:                      showToast(e.message);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidCategory,
    BaseImmutable,
    InvalidState,
    MissingCustomerName,
    LimitExceeded,
    ValidationError,
}

/// Serialized error handed back across the presentation boundary.
///
/// ```json
/// { "code": "BASE_IMMUTABLE", "message": "Selection ... cannot be removed" }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&CoreError> for ErrorPayload {
    fn from(err: &CoreError) -> Self {
        ErrorPayload {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ErrorPayload {
    fn from(err: CoreError) -> Self {
        ErrorPayload::from(&err)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
