//! # Validation Module
//!
//! Input validation for catalog data and ordering inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Ordering UI (TypeScript)                                     │
//! │  ├── Disables "−" at zero count, requires a name before sending        │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: santto-core                                                  │
//! │  ├── THIS MODULE: ids, names, prices, quantities                       │
//! │  └── Rule checks in composition / cart / formatter                     │
//! │                                                                         │
//! │  The core re-validates whatever the UI already prevents.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use santto_core::validation::{validate_entry_id, validate_quantity};
//!
//! assert!(validate_entry_id("base_burger").is_ok());
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest customer name accepted into the order text.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog entry id.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use santto_core::validation::validate_entry_id;
///
/// assert!(validate_entry_id("orange_juice").is_ok());
/// assert!(validate_entry_id("").is_err());
/// assert!(validate_entry_id("two words").is_err());
/// ```
pub fn validate_entry_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 50,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (catalog entries).
///
/// Non-empty, at most 200 characters. Counted in characters, not bytes,
/// since names like "Guaraná 350ml" carry accents.
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates the customer name and returns it trimmed.
///
/// Emptiness is reported by the formatter as `MissingCustomerName`; this
/// guards the length and keeps the name on a single line.
///
/// ```rust
/// use santto_core::validation::validate_customer_name;
///
/// assert_eq!(validate_customer_name(" Maria ").unwrap(), "Maria");
/// assert!(validate_customer_name("Maria\n*Total:* R$0.01").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<&str> {
    let name = name.trim();

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    reject_control_chars("customer name", name)?;
    Ok(name)
}

/// Validates a payment preference and returns it trimmed.
///
/// Blank is fine (the formatter writes the fallback); line breaks and
/// other control characters are not.
pub fn validate_payment(payment: &str) -> ValidationResult<&str> {
    let payment = payment.trim();
    reject_control_chars("payment", payment)?;
    Ok(payment)
}

/// The order text is line-structured, so free text must not start new lines.
fn reject_control_chars(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain line breaks or control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog price.
///
/// ## Rules
/// - Zero is allowed (free extras), negative is not
/// - Must not exceed MAX_PRICE_CENTS, so cart totals cannot overflow
///
/// ```rust
/// use santto_core::money::Money;
/// use santto_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1700)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
