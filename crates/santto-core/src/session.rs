//! # Order Session
//!
//! The presentation boundary: one customer's ordering session, wiring the
//! composition engine, the cart and the formatter together.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│Composing │────►│ In Cart  │────►│ Order    │       │
//! │  │  Session │     │  Burger  │     │          │     │  Text    │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │               start_composition   add_simple_to_cart  format_order     │
//! │               add_to_composition  remove_cart_line                     │
//! │               remove_from_...     decrement_cart_line                  │
//! │               finalize_composition                                      │
//! │                                                                         │
//! │  Single-threaded: the UI owns the session and calls it in sequence.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

use crate::cart::{Cart, CartAggregator, CartLine, CartTotals};
use crate::catalog::Catalog;
use crate::composition::{CompositionEngine, CompositionState, Selection};
use crate::error::CoreResult;
use crate::formatter;
use crate::money::Money;
use crate::settings::OrderSettings;
use crate::types::CompositionPhase;

/// What the "remove" gesture in the builder points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RemovalTarget {
    /// A specific selection instance.
    Selection(String),
    /// The most recent add-on of a catalog entry (the "−" button).
    LastOf(String),
}

/// Cart payload returned to the ordering UI.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// One customer's ordering session.
///
/// ```rust
/// use std::sync::Arc;
/// use santto_core::catalog::Catalog;
/// use santto_core::session::{OrderSession, RemovalTarget};
/// use santto_core::settings::OrderSettings;
///
/// let mut session = OrderSession::new(Arc::new(Catalog::santto_menu()), OrderSettings::default());
/// session.start_composition("base_burger").unwrap();
/// session.add_to_composition("bacon").unwrap();
/// session.add_to_composition("tomato").unwrap();
/// session.remove_from_composition(RemovalTarget::LastOf("tomato".into())).unwrap();
/// session.finalize_composition().unwrap();
/// session.add_simple_to_cart("coke", None).unwrap();
///
/// assert_eq!(session.cart_total().cents(), 1700 + 350 + 600);
/// ```
#[derive(Debug, Clone)]
pub struct OrderSession {
    catalog: Arc<Catalog>,
    settings: OrderSettings,
    composition: CompositionEngine,
    cart: CartAggregator,
}

impl OrderSession {
    pub fn new(catalog: Arc<Catalog>, settings: OrderSettings) -> Self {
        OrderSession {
            composition: CompositionEngine::with_settings(Arc::clone(&catalog), &settings),
            cart: CartAggregator::new(Arc::clone(&catalog)),
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Begins a new item, discarding any unfinished one.
    pub fn start_composition(&mut self, base_id: &str) -> CoreResult<()> {
        debug!(base_id, "start_composition");
        self.composition.start(base_id)
    }

    /// Adds an add-on and returns its selection id.
    pub fn add_to_composition(&mut self, entry_id: &str) -> CoreResult<String> {
        debug!(entry_id, "add_to_composition");
        self.composition.add(entry_id)
    }

    /// Removes a selection. `LastOf` with no match is a no-op (`Ok(None)`).
    pub fn remove_from_composition(
        &mut self,
        target: RemovalTarget,
    ) -> CoreResult<Option<Selection>> {
        debug!(?target, "remove_from_composition");
        match target {
            RemovalTarget::Selection(id) => self.composition.remove(&id).map(Some),
            RemovalTarget::LastOf(entry_id) => self.composition.remove_last_of_kind(&entry_id),
        }
    }

    /// Finalizes the current item into the cart and returns the line id.
    ///
    /// Capacity is checked first, so a full cart leaves the composition open.
    pub fn finalize_composition(&mut self) -> CoreResult<String> {
        debug!(total = %self.composition.current_total(), "finalize_composition");
        self.cart.ensure_capacity()?;

        let line = self.composition.finalize()?;
        let id = line.id().to_string();
        self.cart.add_composed(line)?;
        Ok(id)
    }

    pub fn composition_total(&self) -> Money {
        self.composition.current_total()
    }

    /// Per-entry counter shown next to each add-on.
    pub fn composition_count(&self, entry_id: &str) -> usize {
        self.composition.count_of(entry_id)
    }

    pub fn composition_phase(&self) -> CompositionPhase {
        self.composition.phase()
    }

    pub fn composition(&self) -> Option<&CompositionState> {
        self.composition.state()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a beverage; quantity defaults to 1.
    pub fn add_simple_to_cart(&mut self, entry_id: &str, quantity: Option<i64>) -> CoreResult<String> {
        let quantity = quantity.unwrap_or(1);
        debug!(entry_id, quantity, "add_simple_to_cart");
        self.cart.add_simple(entry_id, quantity)
    }

    pub fn remove_cart_line(&mut self, line_id: &str) -> CoreResult<()> {
        debug!(line_id, "remove_cart_line");
        self.cart.remove(line_id).map(|_| ())
    }

    /// Lowers a line's quantity; returns what remains (0 once removed).
    pub fn decrement_cart_line(&mut self, line_id: &str, quantity: i64) -> CoreResult<i64> {
        debug!(line_id, quantity, "decrement_cart_line");
        self.cart.decrement(line_id, quantity)
    }

    pub fn clear_cart(&mut self) {
        debug!("clear_cart");
        self.cart.clear();
    }

    pub fn cart_total(&self) -> Money {
        self.cart.total()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.lines()
    }

    pub fn cart_view(&self) -> CartView {
        CartView::from(self.cart.cart())
    }

    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Renders the order text for the current cart.
    pub fn format_order(&self, customer_name: &str, payment: Option<&str>) -> CoreResult<String> {
        debug!(lines = self.cart.cart().len(), ?payment, "format_order");
        formatter::format_order(self.cart.cart(), customer_name, payment, &self.settings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::MAX_CART_LINES;

    fn session() -> OrderSession {
        OrderSession::new(Arc::new(Catalog::santto_menu()), OrderSettings::default())
    }

    #[test]
    fn test_burger_scenario() {
        let mut session = session();

        session.start_composition("base_burger").unwrap();
        session.add_to_composition("bacon").unwrap();
        session.add_to_composition("cheese").unwrap();
        assert_eq!(session.composition_total(), Money::from_cents(2300));

        session.finalize_composition().unwrap();
        session.add_simple_to_cart("coke", None).unwrap();
        assert_eq!(session.cart_total(), Money::from_cents(2900));

        let text = session.format_order("Maria", Some("PIX")).unwrap();
        assert!(text.contains("- 1x Hambúrguer Clássico customized (R$23.00)\n  + Bacon, Queijo Cheddar\n"));
        assert!(text.ends_with("*Forma de Pagamento:* PIX\n*Total:* R$29.00"));
    }

    #[test]
    fn test_remove_base_leaves_session_unchanged() {
        let mut session = session();
        session.start_composition("base_burger").unwrap();
        session.add_to_composition("lettuce").unwrap();
        let base_id = session.composition().unwrap().base().id().to_string();
        let before = session.composition().unwrap().clone();

        let err = session
            .remove_from_composition(RemovalTarget::Selection(base_id))
            .unwrap_err();
        assert!(matches!(err, CoreError::BaseImmutable { .. }));
        assert_eq!(session.composition().unwrap(), &before);
        assert_eq!(session.composition_total(), Money::from_cents(1800));
    }

    #[test]
    fn test_removal_targets() {
        let mut session = session();
        session.start_composition("base_burger").unwrap();
        let sauce = session.add_to_composition("sauce").unwrap();
        session.add_to_composition("bacon").unwrap();
        session.add_to_composition("bacon").unwrap();

        let removed = session
            .remove_from_composition(RemovalTarget::Selection(sauce.clone()))
            .unwrap()
            .unwrap();
        assert_eq!(removed.id(), sauce);

        session
            .remove_from_composition(RemovalTarget::LastOf("bacon".to_string()))
            .unwrap();
        assert_eq!(session.composition_count("bacon"), 1);

        assert!(session
            .remove_from_composition(RemovalTarget::LastOf("cheese".to_string()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_finalized_price_survives_new_composition() {
        let mut session = session();
        session.start_composition("base_burger").unwrap();
        session.add_to_composition("bacon").unwrap();
        let line_id = session.finalize_composition().unwrap();

        session.start_composition("base_burger").unwrap();
        session.add_to_composition("pineapple").unwrap();
        session.add_to_composition("cheese").unwrap();

        let lines = session.cart_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].id(), line_id);
        assert_eq!(lines[0].unit_price(), Money::from_cents(2050));
        assert_eq!(session.cart_total(), Money::from_cents(2050));
    }

    #[test]
    fn test_full_cart_keeps_composition_open() {
        let mut session = session();
        for _ in 0..MAX_CART_LINES {
            session.start_composition("base_burger").unwrap();
            session.finalize_composition().unwrap();
        }

        session.start_composition("base_burger").unwrap();
        session.add_to_composition("bacon").unwrap();
        assert!(matches!(
            session.finalize_composition().unwrap_err(),
            CoreError::CartTooLarge { .. }
        ));
        assert_eq!(session.composition_phase(), CompositionPhase::Composing);
        assert_eq!(session.composition_total(), Money::from_cents(2050));
    }

    #[test]
    fn test_cart_line_management() {
        let mut session = session();
        let juice = session.add_simple_to_cart("orange_juice", Some(3)).unwrap();
        session.add_simple_to_cart("guarana", None).unwrap();

        assert_eq!(session.decrement_cart_line(&juice, 1).unwrap(), 2);
        assert_eq!(session.cart_view().totals.total_quantity, 3);

        session.remove_cart_line(&juice).unwrap();
        assert_eq!(session.cart_total(), Money::from_cents(550));

        session.clear_cart();
        assert!(session.cart().is_empty());
        assert!(session.remove_cart_line(&juice).is_err());
    }

    #[test]
    fn test_format_requires_name() {
        let mut session = session();
        session.add_simple_to_cart("coke", None).unwrap();
        assert!(matches!(
            session.format_order("   ", Some("PIX")).unwrap_err(),
            CoreError::MissingCustomerName
        ));
    }

    #[test]
    fn test_removal_target_wire_shape() {
        let target: RemovalTarget =
            serde_json::from_str(r#"{ "kind": "last_of", "id": "bacon" }"#).unwrap();
        assert_eq!(target, RemovalTarget::LastOf("bacon".to_string()));
    }
}
