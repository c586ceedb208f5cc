//! # Order Formatter
//!
//! Renders a cart into the plain-text order message.
//!
//! ## Layout
//! ```text
//! *{store_label}*
//! *{customer_label}:* {name}
//!
//! *{items_label}:*
//! - {qty}x {line name} ({subtotal})
//!   + {addon}, {addon}            (composed lines with add-ons only)
//!
//! *{payment_label}:* {payment or fallback}
//! *{total_label}:* {cart total}
//! ```
//!
//! Lines are joined with `\n` and there is no trailing newline. The output
//! depends only on the inputs, so the same cart always yields the same
//! bytes.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::settings::OrderSettings;
use crate::validation::{validate_customer_name, validate_payment};

/// Formats the order text for `cart`.
///
/// - `customer_name` is trimmed; blank → `MissingCustomerName`
/// - a blank or absent `payment` writes the configured fallback
/// - line breaks in either are rejected, so every row of the text is ours
///
/// ```rust
/// use std::sync::Arc;
/// use santto_core::cart::CartAggregator;
/// use santto_core::catalog::Catalog;
/// use santto_core::formatter::format_order;
/// use santto_core::settings::OrderSettings;
///
/// let mut cart = CartAggregator::new(Arc::new(Catalog::santto_menu()));
/// cart.add_simple("guarana", 2).unwrap();
///
/// let text = format_order(cart.cart(), "João", None, &OrderSettings::default()).unwrap();
/// assert!(text.contains("- 2x Guaraná 350ml (R$11.00)"));
/// assert!(text.ends_with("*Total:* R$11.00"));
/// ```
pub fn format_order(
    cart: &Cart,
    customer_name: &str,
    payment: Option<&str>,
    settings: &OrderSettings,
) -> CoreResult<String> {
    let name = validate_customer_name(customer_name)?;
    if name.is_empty() {
        return Err(CoreError::MissingCustomerName);
    }

    let payment = match payment.map(validate_payment).transpose()? {
        Some(p) if !p.is_empty() => p,
        _ => settings.payment_fallback.as_str(),
    };

    let currency = &settings.currency;
    let mut lines = Vec::with_capacity(cart.len() * 2 + 7);

    lines.push(format!("*{}*", settings.store_label));
    lines.push(format!("*{}:* {}", settings.customer_label, name));
    lines.push(String::new());
    lines.push(format!("*{}:*", settings.items_label));

    for line in cart {
        lines.push(format!(
            "- {}x {} ({})",
            line.quantity(),
            line.name(),
            line.subtotal().format_with(currency)
        ));

        let addons = line.addon_names();
        if !addons.is_empty() {
            lines.push(format!("  + {}", addons.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("*{}:* {}", settings.payment_label, payment));
    lines.push(format!(
        "*{}:* {}",
        settings.total_label,
        cart.total().format_with(currency)
    ));

    Ok(lines.join("\n"))
}

// =============================================================================
// Unit Tests
// =============================================================================
