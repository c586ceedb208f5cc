//! # Cart Aggregator
//!
//! Holds the finalized lines of one order.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Source                   Aggregator Call          Cart Change          │
//! │  ──────                   ───────────────          ───────────          │
//! │                                                                         │
//! │  CompositionEngine ──────► add_composed(line) ────► lines.push(line)    │
//! │    ::finalize()                                     (never merged)      │
//! │                                                                         │
//! │  Beverage "+" ───────────► add_simple(id, n) ─────► qty += n or push    │
//! │                                                                         │
//! │  Beverage "−" ───────────► decrement(line, n) ────► qty -= n, drop at 0 │
//! │                                                                         │
//! │  Swipe to delete ────────► remove(line) ──────────► lines.remove(i)     │
//! │                                                                         │
//! │  New order ──────────────► clear() ───────────────► lines.clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A composed line stores the sum of its selections at finalization and
//! never recomputes it. A simple line shares its catalog entry; the catalog
//! is immutable, so its unit price cannot drift either.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::composition::Selection;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogEntry, Category, LineKind};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the cart.
///
/// Fields are private: price and selections of a composed line are fixed
/// at construction, and only the aggregator adjusts a simple line's
/// quantity.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    id: String,
    kind: LineKind,
    name: String,
    unit_price: Money,
    quantity: i64,

    /// Shared catalog entry (simple lines only).
    entry: Option<Arc<CatalogEntry>>,

    /// Frozen selections, base first (composed lines only).
    selections: Vec<Selection>,

    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl CartLine {
    /// Freezes `selections` into a composed line with quantity 1.
    pub(crate) fn composed(name: String, selections: Vec<Selection>) -> Self {
        CartLine {
            id: Uuid::new_v4().to_string(),
            kind: LineKind::Composed,
            name,
            unit_price: selections.iter().map(Selection::price).sum(),
            quantity: 1,
            entry: None,
            selections,
            added_at: Utc::now(),
        }
    }

    pub(crate) fn simple(entry: Arc<CatalogEntry>, quantity: i64) -> Self {
        CartLine {
            id: Uuid::new_v4().to_string(),
            kind: LineKind::Simple,
            name: entry.name.clone(),
            unit_price: entry.price,
            quantity,
            entry: Some(entry),
            selections: Vec::new(),
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn entry(&self) -> Option<&CatalogEntry> {
        self.entry.as_deref()
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// Names of the add-on selections, in insertion order.
    /// Empty for simple lines and base-only compositions.
    pub fn addon_names(&self) -> Vec<&str> {
        self.selections
            .iter()
            .filter(|s| !s.is_base())
            .map(|s| s.entry().name.as_str())
            .collect()
    }

    fn is_simple_for(&self, entry_id: &str) -> bool {
        self.kind == LineKind::Simple && self.entry.as_ref().is_some_and(|e| e.id == entry_id)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The ordered lines of one order.
///
/// ## Invariants
/// - total = Σ(unit_price × quantity)
/// - no two simple lines share an entry
/// - at most `MAX_CART_LINES` lines, quantities in `1..=MAX_ITEM_QUANTITY`
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.lines.iter()
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of lines (not units).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn position(&self, id: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::not_found("Cart line", id))
    }

    fn ensure_capacity(&self) -> CoreResult<()> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        Ok(())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Cart totals summary for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Owns the cart and applies every mutation to it.
///
/// Every operation validates before it mutates: a failed call leaves the
/// cart exactly as it was.
#[derive(Debug, Clone)]
pub struct CartAggregator {
    catalog: Arc<Catalog>,
    cart: Cart,
}

impl CartAggregator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        CartAggregator {
            catalog,
            cart: Cart::new(),
        }
    }

    /// Appends a finalized composed line as-is. Composed lines never merge.
    pub fn add_composed(&mut self, line: CartLine) -> CoreResult<()> {
        if line.kind != LineKind::Composed {
            return Err(CoreError::InvalidComposedLine { id: line.id });
        }

        if self.cart.line(&line.id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "cart line id".to_string(),
                value: line.id,
            }
            .into());
        }

        self.ensure_capacity()?;

        debug!(line_id = %line.id, price = %line.unit_price, "Adding composed line");
        self.cart.lines.push(line);
        Ok(())
    }

    /// Adds `quantity` units of a beverage and returns the line id.
    ///
    /// Merges into the existing line for the same entry when there is one.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use santto_core::cart::CartAggregator;
    /// use santto_core::catalog::Catalog;
    ///
    /// let mut cart = CartAggregator::new(Arc::new(Catalog::santto_menu()));
    /// let first = cart.add_simple("coke", 1).unwrap();
    /// let second = cart.add_simple("coke", 2).unwrap();
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(cart.line(&first).unwrap().quantity(), 3);
    /// assert_eq!(cart.total().cents(), 1800);
    /// ```
    pub fn add_simple(&mut self, entry_id: &str, quantity: i64) -> CoreResult<String> {
        validate_quantity(quantity)?;

        let entry = self.catalog.lookup(entry_id)?;
        if entry.category != Category::Beverage {
            return Err(CoreError::InvalidSimpleItem {
                id: entry.id.clone(),
                category: entry.category,
            });
        }

        if let Some(line) = self.cart.lines.iter_mut().find(|l| l.is_simple_for(entry_id)) {
            let requested = line.quantity + quantity;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }

            debug!(line_id = %line.id, entry_id, quantity = requested, "Merging simple line");
            line.quantity = requested;
            return Ok(line.id.clone());
        }

        self.ensure_capacity()?;

        let line = CartLine::simple(entry, quantity);
        let id = line.id.clone();
        debug!(line_id = %id, entry_id, quantity, "Adding simple line");
        self.cart.lines.push(line);
        Ok(id)
    }

    /// Removes a whole line.
    pub fn remove(&mut self, line_id: &str) -> CoreResult<CartLine> {
        let index = self.cart.position(line_id)?;
        debug!(line_id, "Removing cart line");
        Ok(self.cart.lines.remove(index))
    }

    /// Lowers a line's quantity by `quantity`, removing the line once it
    /// reaches zero. Returns the remaining quantity.
    pub fn decrement(&mut self, line_id: &str, quantity: i64) -> CoreResult<i64> {
        validate_quantity(quantity)?;
        let index = self.cart.position(line_id)?;

        let line = &mut self.cart.lines[index];
        if line.quantity <= quantity {
            debug!(line_id, "Decrement empties line, removing");
            self.cart.lines.remove(index);
            return Ok(0);
        }

        line.quantity -= quantity;
        debug!(line_id, remaining = line.quantity, "Decremented cart line");
        Ok(line.quantity)
    }

    /// Empties the cart and restarts its timestamp.
    pub fn clear(&mut self) {
        debug!(lines = self.cart.len(), "Clearing cart");
        self.cart.lines.clear();
        self.cart.created_at = Utc::now();
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Owned snapshot of the lines in cart order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lines.clone()
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.cart.line(line_id)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    /// Fails with `CartTooLarge` when one more line would not fit.
    pub fn ensure_capacity(&self) -> CoreResult<()> {
        self.cart.ensure_capacity()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::CompositionEngine;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::santto_menu())
    }

    fn composed_line(catalog: &Arc<Catalog>, addons: &[&str]) -> CartLine {
        let mut engine = CompositionEngine::new(Arc::clone(catalog));
        engine.start("base_burger").unwrap();
        for addon in addons {
            engine.add(addon).unwrap();
        }
        engine.finalize().unwrap()
    }

    fn sum_of_lines(cart: &CartAggregator) -> Money {
        cart.cart()
            .iter()
            .map(|l| l.unit_price() * l.quantity())
            .sum()
    }

    #[test]
    fn test_burger_scenario_total() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));

        cart.add_composed(composed_line(&catalog, &["bacon", "cheese"]))
            .unwrap();
        cart.add_simple("coke", 1).unwrap();

        assert_eq!(cart.total(), Money::from_cents(2900));
        assert_eq!(
            cart.totals(),
            CartTotals {
                line_count: 2,
                total_quantity: 2,
                total: Money::from_cents(2900),
            }
        );
    }

    #[test]
    fn test_simple_adds_merge() {
        let mut cart = CartAggregator::new(catalog());

        let first = cart.add_simple("coke", 1).unwrap();
        let second = cart.add_simple("coke", 1).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.cart().len(), 1);
        assert_eq!(cart.line(&first).unwrap().quantity(), 2);
        assert_eq!(cart.total(), Money::from_cents(1200));
    }

    #[test]
    fn test_identical_composed_lines_stay_separate() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));

        cart.add_composed(composed_line(&catalog, &["bacon"])).unwrap();
        cart.add_composed(composed_line(&catalog, &["bacon"])).unwrap();

        assert_eq!(cart.cart().len(), 2);
        assert_eq!(cart.total(), Money::from_cents(2 * 2050));
    }

    #[test]
    fn test_add_composed_rejects_bad_lines() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));

        let simple = CartLine::simple(catalog.lookup("coke").unwrap(), 1);
        assert!(matches!(
            cart.add_composed(simple).unwrap_err(),
            CoreError::InvalidComposedLine { .. }
        ));

        let line = composed_line(&catalog, &[]);
        cart.add_composed(line.clone()).unwrap();
        assert!(matches!(
            cart.add_composed(line).unwrap_err(),
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(cart.cart().len(), 1);
    }

    #[test]
    fn test_add_simple_rejects_non_beverages() {
        let mut cart = CartAggregator::new(catalog());

        assert!(matches!(
            cart.add_simple("bacon", 1).unwrap_err(),
            CoreError::InvalidSimpleItem { category: Category::Addon, .. }
        ));
        assert!(matches!(
            cart.add_simple("base_burger", 1).unwrap_err(),
            CoreError::InvalidSimpleItem { .. }
        ));
        assert!(matches!(
            cart.add_simple("milkshake", 1).unwrap_err(),
            CoreError::NotFound { .. }
        ));
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_add_simple_quantity_limits() {
        let mut cart = CartAggregator::new(catalog());

        assert!(cart.add_simple("coke", 0).is_err());
        assert!(cart.add_simple("coke", MAX_ITEM_QUANTITY + 1).is_err());

        let id = cart.add_simple("coke", MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add_simple("coke", 1).unwrap_err(),
            CoreError::QuantityTooLarge { requested: 1000, .. }
        ));
        assert_eq!(cart.line(&id).unwrap().quantity(), MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_cart_line_limit() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));

        for _ in 0..MAX_CART_LINES {
            cart.add_composed(composed_line(&catalog, &[])).unwrap();
        }

        assert!(matches!(
            cart.add_composed(composed_line(&catalog, &[])).unwrap_err(),
            CoreError::CartTooLarge { .. }
        ));
        assert!(matches!(
            cart.add_simple("coke", 1).unwrap_err(),
            CoreError::CartTooLarge { .. }
        ));
        assert_eq!(cart.cart().len(), MAX_CART_LINES);
    }

    #[test]
    fn test_remove_and_decrement() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));
        let burger = composed_line(&catalog, &["tomato"]);
        let burger_id = burger.id().to_string();
        cart.add_composed(burger).unwrap();
        let coke = cart.add_simple("coke", 3).unwrap();

        assert_eq!(cart.decrement(&coke, 1).unwrap(), 2);
        assert_eq!(cart.total(), Money::from_cents(1850 + 1200));

        assert_eq!(cart.decrement(&coke, 5).unwrap(), 0);
        assert!(cart.line(&coke).is_none());

        let removed = cart.remove(&burger_id).unwrap();
        assert_eq!(removed.unit_price(), Money::from_cents(1850));
        assert!(cart.cart().is_empty());

        assert!(matches!(
            cart.remove(&burger_id).unwrap_err(),
            CoreError::NotFound { entity: "Cart line", .. }
        ));
        assert!(cart.decrement("missing", 1).is_err());
    }

    #[test]
    fn test_total_matches_sum_after_every_operation() {
        let catalog = catalog();
        let mut cart = CartAggregator::new(Arc::clone(&catalog));

        let burger = composed_line(&catalog, &["bacon", "bacon", "sauce"]);
        let burger_id = burger.id().to_string();
        cart.add_composed(burger).unwrap();
        assert_eq!(cart.total(), sum_of_lines(&cart));

        let juice = cart.add_simple("orange_juice", 2).unwrap();
        assert_eq!(cart.total(), sum_of_lines(&cart));

        cart.add_simple("guarana", 4).unwrap();
        assert_eq!(cart.total(), sum_of_lines(&cart));

        cart.decrement(&juice, 1).unwrap();
        assert_eq!(cart.total(), sum_of_lines(&cart));

        cart.remove(&burger_id).unwrap();
        assert_eq!(cart.total(), sum_of_lines(&cart));
        assert_eq!(cart.total(), Money::from_cents(800 + 4 * 550));
    }

    #[test]
    fn test_lines_snapshot_is_detached() {
        let mut cart = CartAggregator::new(catalog());
        cart.add_simple("coke", 1).unwrap();

        let snapshot = cart.lines();
        cart.add_simple("coke", 1).unwrap();
        cart.add_simple("guarana", 1).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartAggregator::new(catalog());
        cart.add_simple("coke", 2).unwrap();
        let created = cart.cart().created_at();

        cart.clear();
        assert!(cart.cart().is_empty());
        assert_eq!(cart.total(), Money::zero());
        assert!(cart.cart().created_at() >= created);
    }

    #[test]
    fn test_addon_names() {
        let catalog = catalog();
        let line = composed_line(&catalog, &["bacon", "cheese"]);
        assert_eq!(line.addon_names(), vec!["Bacon", "Queijo Cheddar"]);

        let plain = composed_line(&catalog, &[]);
        assert!(plain.addon_names().is_empty());

        let coke = CartLine::simple(catalog.lookup("coke").unwrap(), 2);
        assert!(coke.addon_names().is_empty());
        assert_eq!(coke.subtotal(), Money::from_cents(1200));
        assert_eq!(coke.entry().map(|e| e.id.as_str()), Some("coke"));
    }
}
