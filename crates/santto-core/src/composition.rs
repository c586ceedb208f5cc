//! # Composition Engine
//!
//! Builds one customizable item (a base plus add-ons) through add/remove
//! operations against the catalog.
//!
//! ## Burger Builder Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Composition Operations                               │
//! │                                                                         │
//! │  UI Action              Engine Call                 State Change        │
//! │  ─────────              ───────────                 ────────────        │
//! │                                                                         │
//! │  Open builder ────────► start("base_burger") ─────► [base]              │
//! │                                                                         │
//! │  Tap "+" on Bacon ────► add("bacon") ─────────────► [base, bacon]       │
//! │                                                                         │
//! │  Tap "−" on Bacon ────► remove_last_of_kind("bacon") ► [base]           │
//! │                                                                         │
//! │  Swipe a topping ─────► remove(selection_id) ─────► selection dropped   │
//! │                                                                         │
//! │  "Finalizar" ─────────► finalize() ───────────────► CartLine (frozen)   │
//! │                                                                         │
//! │  The base selection is the anchor: it can only be replaced by start.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The total is never cached: `current_total` re-sums the selections on
//! every call.

use serde::Serialize;
use std::sync::Arc;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::CartLine;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::settings::OrderSettings;
use crate::types::{CatalogEntry, Category, CompositionPhase};
use crate::MAX_SELECTIONS;

// =============================================================================
// Selection
// =============================================================================

/// One chosen instance of a catalog entry.
///
/// The instance id is generated per selection, so picking "bacon" twice
/// yields two selections with different ids pointing at the same entry.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    id: String,
    entry: Arc<CatalogEntry>,
}

impl Selection {
    fn new(entry: Arc<CatalogEntry>) -> Self {
        Selection {
            id: Uuid::new_v4().to_string(),
            entry,
        }
    }

    /// Instance id (not the catalog id).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entry(&self) -> &CatalogEntry {
        &self.entry
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.entry.price
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.entry.is_base()
    }
}

// =============================================================================
// Composition State
// =============================================================================

/// The selections of one in-progress item.
///
/// ## Invariants
/// - `selections[0]` is the only `base` selection
/// - every other selection is an `addon`
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompositionState {
    selections: Vec<Selection>,
}

impl CompositionState {
    fn with_base(base: Arc<CatalogEntry>) -> Self {
        CompositionState {
            selections: vec![Selection::new(base)],
        }
    }

    /// The anchor selection.
    pub fn base(&self) -> &Selection {
        &self.selections[0]
    }

    /// All selections in insertion order, base first.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Add-on selections in insertion order.
    pub fn addons(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter().filter(|s| !s.is_base())
    }

    /// Sum of the selections' catalog prices.
    pub fn total(&self) -> Money {
        self.selections.iter().map(Selection::price).sum()
    }

    /// How many selections reference `entry_id` (the "+ 2 −" counter).
    pub fn count_of(&self, entry_id: &str) -> usize {
        self.selections
            .iter()
            .filter(|s| s.entry.id == entry_id)
            .count()
    }
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Clone)]
enum Phase {
    Empty,
    Composing(CompositionState),
    Finalized(CompositionState),
}

impl Phase {
    fn kind(&self) -> CompositionPhase {
        match self {
            Phase::Empty => CompositionPhase::Empty,
            Phase::Composing(_) => CompositionPhase::Composing,
            Phase::Finalized(_) => CompositionPhase::Finalized,
        }
    }
}

/// Manages exactly one composition session.
///
/// One engine per customization session: `finalize` does not reset the
/// state, a new item needs a fresh `start`.
///
/// ```rust
/// use std::sync::Arc;
/// use santto_core::catalog::Catalog;
/// use santto_core::composition::CompositionEngine;
///
/// let mut engine = CompositionEngine::new(Arc::new(Catalog::santto_menu()));
/// engine.start("base_burger").unwrap();
/// engine.add("bacon").unwrap();
/// engine.add("cheese").unwrap();
/// assert_eq!(engine.current_total().cents(), 2300);
///
/// let line = engine.finalize().unwrap();
/// assert_eq!(line.unit_price().cents(), 2300);
/// assert_eq!(line.name(), "Hambúrguer Clássico customized");
/// ```
#[derive(Debug, Clone)]
pub struct CompositionEngine {
    catalog: Arc<Catalog>,
    phase: Phase,
    settings: OrderSettings,
}

impl CompositionEngine {
    /// Creates an engine in the `Empty` phase with default naming.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_settings(catalog, &OrderSettings::default())
    }

    /// Creates an engine that names composed lines per `settings`.
    pub fn with_settings(catalog: Arc<Catalog>, settings: &OrderSettings) -> Self {
        CompositionEngine {
            catalog,
            phase: Phase::Empty,
            settings: settings.clone(),
        }
    }

    pub fn phase(&self) -> CompositionPhase {
        self.phase.kind()
    }

    /// Current state, if a composition was ever started.
    pub fn state(&self) -> Option<&CompositionState> {
        match &self.phase {
            Phase::Empty => None,
            Phase::Composing(state) | Phase::Finalized(state) => Some(state),
        }
    }

    /// Current selections, base first; empty before `start`.
    pub fn selections(&self) -> &[Selection] {
        self.state()
            .map(CompositionState::selections)
            .unwrap_or(&[])
    }

    pub fn base(&self) -> Option<&Selection> {
        self.state().map(CompositionState::base)
    }

    /// Starts a new item on `base_id`, discarding whatever was in progress.
    ///
    /// Legal from every phase. On error the previous state is kept.
    pub fn start(&mut self, base_id: &str) -> CoreResult<()> {
        let base = self.catalog.lookup(base_id)?;
        if base.category != Category::Base {
            return Err(CoreError::InvalidBase {
                id: base.id.clone(),
                category: base.category,
            });
        }

        self.phase = Phase::Composing(CompositionState::with_base(base));
        Ok(())
    }

    /// Appends an add-on and returns the new selection's instance id.
    ///
    /// Repeats are legal and priced per unit.
    pub fn add(&mut self, entry_id: &str) -> CoreResult<String> {
        let state = match &mut self.phase {
            Phase::Composing(state) => state,
            other => return Err(invalid_state("add", other)),
        };

        let entry = self.catalog.lookup(entry_id)?;
        if entry.category != Category::Addon {
            return Err(CoreError::InvalidAddon {
                id: entry.id.clone(),
                category: entry.category,
            });
        }

        if state.selections.len() >= MAX_SELECTIONS {
            return Err(CoreError::CompositionTooLarge {
                max: MAX_SELECTIONS,
            });
        }

        let selection = Selection::new(entry);
        let id = selection.id.clone();
        state.selections.push(selection);
        Ok(id)
    }

    /// Removes the selection with instance id `selection_id`.
    pub fn remove(&mut self, selection_id: &str) -> CoreResult<Selection> {
        let state = match &mut self.phase {
            Phase::Composing(state) => state,
            other => return Err(invalid_state("remove", other)),
        };

        let index = state
            .selections
            .iter()
            .position(|s| s.id == selection_id)
            .ok_or_else(|| CoreError::not_found("Selection", selection_id))?;

        if state.selections[index].is_base() {
            return Err(CoreError::BaseImmutable {
                selection_id: selection_id.to_string(),
            });
        }

        Ok(state.selections.remove(index))
    }

    /// Removes the most recently added add-on for `entry_id`.
    ///
    /// Backs the "−" button: no per-instance addressing, last in first out
    /// per entry. Returns `None` (not an error) when nothing matches. The
    /// base is never matched.
    pub fn remove_last_of_kind(&mut self, entry_id: &str) -> CoreResult<Option<Selection>> {
        let state = match &mut self.phase {
            Phase::Composing(state) => state,
            other => return Err(invalid_state("remove_last_of_kind", other)),
        };

        let removed = state
            .selections
            .iter()
            .rposition(|s| !s.is_base() && s.entry.id == entry_id)
            .map(|index| state.selections.remove(index));

        Ok(removed)
    }

    /// Sum of the current selections' prices; zero before `start`.
    pub fn current_total(&self) -> Money {
        self.state()
            .map(CompositionState::total)
            .unwrap_or_default()
    }

    /// Number of current selections referencing `entry_id`.
    pub fn count_of(&self, entry_id: &str) -> usize {
        self.state().map_or(0, |state| state.count_of(entry_id))
    }

    /// Freezes the selections and their total into a composed cart line.
    ///
    /// The cart is not touched; the caller hands the line to the cart
    /// aggregator. The engine moves to `Finalized` and keeps its selections.
    pub fn finalize(&mut self) -> CoreResult<CartLine> {
        let state = match &self.phase {
            Phase::Composing(state) => state.clone(),
            other => return Err(invalid_state("finalize", other)),
        };

        let name = self.settings.composed_name(&state.base().entry.name);
        let line = CartLine::composed(name, state.selections.clone());
        self.phase = Phase::Finalized(state);
        Ok(line)
    }
}

fn invalid_state(operation: &'static str, phase: &Phase) -> CoreError {
    CoreError::InvalidState {
        operation,
        phase: phase.kind(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineKind;

    fn engine() -> CompositionEngine {
        CompositionEngine::new(Arc::new(Catalog::santto_menu()))
    }

    fn composing() -> CompositionEngine {
        let mut engine = engine();
        engine.start("base_burger").unwrap();
        engine
    }

    /// Re-derives the total from the catalog, independent of the engine.
    fn expected_total(engine: &CompositionEngine) -> Money {
        let catalog = Catalog::santto_menu();
        engine
            .state()
            .unwrap()
            .selections()
            .iter()
            .map(|s| catalog.lookup(&s.entry().id).unwrap().price)
            .sum()
    }

    #[test]
    fn test_start_creates_single_base() {
        let engine = composing();
        let state = engine.state().unwrap();

        assert_eq!(engine.phase(), CompositionPhase::Composing);
        assert_eq!(state.selections().len(), 1);
        assert!(state.base().is_base());
        assert_eq!(engine.current_total(), Money::from_cents(1700));
    }

    #[test]
    fn test_accessors_before_and_after_start() {
        let mut engine = engine();
        assert!(engine.selections().is_empty());
        assert!(engine.base().is_none());

        engine.start("base_burger").unwrap();
        engine.add("sauce").unwrap();
        assert_eq!(engine.base().unwrap().entry().id, "base_burger");
        assert_eq!(engine.selections().len(), 2);

        let addons: Vec<&str> = engine
            .state()
            .unwrap()
            .addons()
            .map(|s| s.entry().name.as_str())
            .collect();
        assert_eq!(addons, vec!["Molho Especial"]);
    }

    #[test]
    fn test_start_rejects_non_base() {
        let mut engine = engine();

        let err = engine.start("bacon").unwrap_err();
        assert!(matches!(err, CoreError::InvalidBase { category: Category::Addon, .. }));
        assert_eq!(engine.phase(), CompositionPhase::Empty);

        assert!(matches!(
            engine.start("nope").unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_failed_start_keeps_previous_state() {
        let mut engine = composing();
        engine.add("bacon").unwrap();

        assert!(engine.start("coke").is_err());
        assert_eq!(engine.count_of("bacon"), 1);
        assert_eq!(engine.current_total(), Money::from_cents(2050));
    }

    #[test]
    fn test_burger_scenario_total() {
        let mut engine = composing();
        engine.add("bacon").unwrap();
        engine.add("cheese").unwrap();
        assert_eq!(engine.current_total(), Money::from_cents(2300));
    }

    #[test]
    fn test_add_rejects_non_addons() {
        let mut engine = composing();

        assert!(matches!(
            engine.add("coke").unwrap_err(),
            CoreError::InvalidAddon { category: Category::Beverage, .. }
        ));
        assert!(matches!(
            engine.add("base_burger").unwrap_err(),
            CoreError::InvalidAddon { category: Category::Base, .. }
        ));
        assert_eq!(engine.state().unwrap().selections().len(), 1);
    }

    #[test]
    fn test_duplicate_addons_priced_per_unit() {
        let mut engine = composing();
        let first = engine.add("bacon").unwrap();
        let second = engine.add("bacon").unwrap();

        assert_ne!(first, second);
        assert_eq!(engine.count_of("bacon"), 2);
        assert_eq!(engine.current_total(), Money::from_cents(1700 + 350 * 2));
    }

    #[test]
    fn test_total_invariant_after_every_operation() {
        let mut engine = composing();
        let mut ids = Vec::new();

        for entry in ["lettuce", "tomato", "bacon", "bacon", "sauce", "cheese"] {
            ids.push(engine.add(entry).unwrap());
            assert_eq!(engine.current_total(), expected_total(&engine));
        }

        engine.remove(&ids[1]).unwrap();
        assert_eq!(engine.current_total(), expected_total(&engine));

        engine.remove_last_of_kind("bacon").unwrap();
        assert_eq!(engine.current_total(), expected_total(&engine));

        engine.remove_last_of_kind("pineapple").unwrap();
        assert_eq!(engine.current_total(), expected_total(&engine));

        engine.remove(&ids[0]).unwrap();
        assert_eq!(engine.current_total(), expected_total(&engine));
        assert_eq!(engine.current_total(), Money::from_cents(1700 + 350 + 200 + 250));
    }

    #[test]
    fn test_remove_base_is_rejected() {
        let mut engine = composing();
        engine.add("bacon").unwrap();
        let base_id = engine.state().unwrap().base().id().to_string();
        let before = engine.state().unwrap().clone();

        let err = engine.remove(&base_id).unwrap_err();
        assert!(matches!(err, CoreError::BaseImmutable { .. }));
        assert_eq!(engine.state().unwrap(), &before);
    }

    #[test]
    fn test_remove_unknown_selection() {
        let mut engine = composing();
        assert!(matches!(
            engine.remove("missing").unwrap_err(),
            CoreError::NotFound { entity: "Selection", .. }
        ));
    }

    #[test]
    fn test_remove_last_of_kind_is_lifo_per_entry() {
        let mut engine = composing();
        let _first = engine.add("bacon").unwrap();
        engine.add("cheese").unwrap();
        let last = engine.add("bacon").unwrap();

        let removed = engine.remove_last_of_kind("bacon").unwrap().unwrap();
        assert_eq!(removed.id(), last);

        let order: Vec<&str> = engine
            .state()
            .unwrap()
            .selections()
            .iter()
            .map(|s| s.entry().id.as_str())
            .collect();
        assert_eq!(order, vec!["base_burger", "bacon", "cheese"]);
    }

    #[test]
    fn test_remove_last_of_kind_without_match_is_noop() {
        let mut engine = composing();
        assert!(engine.remove_last_of_kind("bacon").unwrap().is_none());
        assert!(engine.remove_last_of_kind("base_burger").unwrap().is_none());
        assert_eq!(engine.state().unwrap().selections().len(), 1);
    }

    #[test]
    fn test_remove_last_then_add_restores_total() {
        let mut engine = composing();
        engine.add("bacon").unwrap();
        engine.add("tomato").unwrap();
        let before = engine.current_total();

        engine.remove_last_of_kind("bacon").unwrap();
        engine.add("bacon").unwrap();
        assert_eq!(engine.current_total(), before);
    }

    #[test]
    fn test_operations_require_composing() {
        let mut engine = engine();

        assert!(matches!(
            engine.add("bacon").unwrap_err(),
            CoreError::InvalidState { phase: CompositionPhase::Empty, .. }
        ));
        assert!(matches!(
            engine.remove("x").unwrap_err(),
            CoreError::InvalidState { .. }
        ));
        assert!(matches!(
            engine.remove_last_of_kind("bacon").unwrap_err(),
            CoreError::InvalidState { .. }
        ));
        assert!(matches!(
            engine.finalize().unwrap_err(),
            CoreError::InvalidState { operation: "finalize", .. }
        ));
        assert_eq!(engine.current_total(), Money::zero());
    }

    #[test]
    fn test_finalize_freezes_line() {
        let mut engine = composing();
        engine.add("bacon").unwrap();
        engine.add("cheese").unwrap();

        let line = engine.finalize().unwrap();
        assert_eq!(line.kind(), LineKind::Composed);
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.unit_price(), Money::from_cents(2300));
        assert_eq!(line.selections().len(), 3);

        // Finalized is terminal for this session but keeps its selections.
        assert_eq!(engine.phase(), CompositionPhase::Finalized);
        assert_eq!(engine.current_total(), Money::from_cents(2300));
        assert!(matches!(
            engine.add("bacon").unwrap_err(),
            CoreError::InvalidState { phase: CompositionPhase::Finalized, .. }
        ));
        assert!(engine.finalize().is_err());

        // A new composition never touches the finalized line.
        engine.start("base_burger").unwrap();
        engine.add("pineapple").unwrap();
        engine.add("pineapple").unwrap();
        assert_eq!(line.unit_price(), Money::from_cents(2300));
        assert_eq!(line.selections().len(), 3);
    }

    #[test]
    fn test_finalize_name_uses_settings() {
        let settings = OrderSettings {
            composed_suffix: "personalizado".to_string(),
            ..OrderSettings::default()
        };
        let mut engine =
            CompositionEngine::with_settings(Arc::new(Catalog::santto_menu()), &settings);
        engine.start("base_burger").unwrap();

        let line = engine.finalize().unwrap();
        assert_eq!(line.name(), "Hambúrguer Clássico personalizado");
    }

    #[test]
    fn test_selection_limit() {
        let mut engine = composing();
        for _ in 1..MAX_SELECTIONS {
            engine.add("lettuce").unwrap();
        }
        assert!(matches!(
            engine.add("lettuce").unwrap_err(),
            CoreError::CompositionTooLarge { .. }
        ));
        assert_eq!(engine.state().unwrap().selections().len(), MAX_SELECTIONS);
    }
}
