//! # Order Settings
//!
//! Labels and conventions that shape the order text.
//!
//! Pure data: santto-dispatch reads these from the `[order]` table of
//! `santto.toml` and environment variables; the core only consumes them.
//!
//! ```toml
//! [order]
//! store_label = "Novo Pedido - Santto Hambúrguer"
//! payment_fallback = "A combinar"
//! composed_suffix = "customized"
//!
//! [order.currency]
//! symbol = "R$"
//! decimal_separator = "."
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// How amounts are rendered in the order text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Prefix written before the amount, spacing included (`"R$"`, `"R$ "`).
    pub symbol: String,

    /// Separator between reais and centavos.
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "R$".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Labels used by the order formatter and the composition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct OrderSettings {
    /// Order announcement written on the first line.
    pub store_label: String,

    pub customer_label: String,

    pub items_label: String,

    pub payment_label: String,

    pub total_label: String,

    /// Written when the customer picked no payment method.
    pub payment_fallback: String,

    /// Appended to the base name of a composed line
    /// ("Hambúrguer Clássico customized"). Empty keeps the bare base name.
    pub composed_suffix: String,

    pub currency: CurrencyFormat,
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            store_label: "Novo Pedido - Santto Hambúrguer".to_string(),
            customer_label: "Cliente".to_string(),
            items_label: "Itens do Pedido".to_string(),
            payment_label: "Forma de Pagamento".to_string(),
            total_label: "Total".to_string(),
            payment_fallback: "A combinar".to_string(),
            composed_suffix: "customized".to_string(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl OrderSettings {
    /// Checks that the labels the order text cannot do without are present.
    pub fn validate(&self) -> ValidationResult<()> {
        let required = [
            ("store_label", &self.store_label),
            ("payment_fallback", &self.payment_fallback),
            ("currency.symbol", &self.currency.symbol),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Display name for a composed line built on `base_name`.
    pub fn composed_name(&self, base_name: &str) -> String {
        let suffix = self.composed_suffix.trim();
        if suffix.is_empty() {
            base_name.to_string()
        } else {
            format!("{} {}", base_name, suffix)
        }
    }
}
