//! # Domain Types
//!
//! Core domain types used throughout Santto ordering.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogEntry   │   │    Category     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (stable)    │   │  Base           │   │  Pix            │       │
//! │  │  name           │   │  Addon          │   │  CreditCard     │       │
//! │  │  price (Money)  │   │  Beverage       │   │  DebitCard      │       │
//! │  │  category       │   └─────────────────┘   │  Cash           │       │
//! │  │  asset          │                         └─────────────────┘       │
//! │  │  stack_order    │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │CompositionPhase │   │    LineKind     │       │
//! │                        │  Empty          │   │  Composed       │       │
//! │                        │  Composing      │   │  Simple         │       │
//! │                        │  Finalized      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - Catalog entries carry a stable business id (`"bacon"`, `"coke"`).
//! - Selections and cart lines carry a generated UUID v4, so the same entry
//!   can appear many times.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The closed set of catalog categories.
///
/// The category decides which operation may consume an entry:
/// ```text
/// Base     ──► CompositionEngine::start
/// Addon    ──► CompositionEngine::add
/// Beverage ──► CartAggregator::add_simple
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The anchor of a composed item (the burger patty and bun).
    Base,
    /// Toppings stacked on a base. Older menu files call these `burger`;
    /// [`FromStr`] accepts both spellings.
    Addon,
    /// Standalone drinks sold by quantity.
    Beverage,
}

impl Category {
    /// Every category, in menu tab order.
    pub const ALL: [Category; 3] = [Category::Base, Category::Addon, Category::Beverage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Addon => "addon",
            Category::Beverage => "beverage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Category::Base),
            "addon" | "burger" | "ingredient" => Ok(Category::Addon),
            "beverage" | "drink" => Ok(Category::Beverage),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One purchasable item on the menu.
///
/// Immutable once loaded; shared by selections and cart lines through
/// `Arc<CatalogEntry>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable business id, unique across the catalog.
    pub id: String,

    /// Display name used on screen and in the order text.
    pub name: String,

    /// Unit price (never negative).
    pub price: Money,

    pub category: Category,

    /// Opaque asset reference for the UI (image path). Not interpreted here.
    pub asset: String,

    /// Stacking hint for the burger illustration. Higher draws on top.
    /// Ignored by every price and cart computation.
    pub stack_order: i32,
}

impl CatalogEntry {
    /// Creates an entry with no asset and a zero stacking hint.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        category: Category,
    ) -> Self {
        CatalogEntry {
            id: id.into(),
            name: name.into(),
            price,
            category,
            asset: String::new(),
            stack_order: 0,
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = asset.into();
        self
    }

    pub fn with_stack_order(mut self, stack_order: i32) -> Self {
        self.stack_order = stack_order;
        self
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.category == Category::Base
    }
}

// =============================================================================
// Composition Phase
// =============================================================================

/// Lifecycle of a single customization session.
///
/// ```text
///   Empty ──start──► Composing ──finalize──► Finalized
///                      ▲   │                     │
///                      └───┘ add / remove        │
///                      ▲                         │
///                      └──────── start ──────────┘ (new item)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPhase {
    #[default]
    Empty,
    Composing,
    Finalized,
}

impl fmt::Display for CompositionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionPhase::Empty => write!(f, "empty"),
            CompositionPhase::Composing => write!(f, "composing"),
            CompositionPhase::Finalized => write!(f, "finalized"),
        }
    }
}

// =============================================================================
// Line Kind
// =============================================================================

/// Kind tag of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A base plus add-ons, frozen at finalization. Never merged.
    Composed,
    /// A beverage with a quantity. Merged by entry id.
    Simple,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment options offered on the checkout screen.
///
/// The order text takes any literal string; these are the labels the
/// checkout radio buttons submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    /// Every option, in checkout display order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Cash,
    ];

    /// The label shown to the customer and written into the order text.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::DebitCard => "Cartão de Débito",
            PaymentMethod::Cash => "Dinheiro",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
