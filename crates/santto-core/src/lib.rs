//! # santto-core: Pure Ordering Logic for Santto Hambúrguer
//!
//! This crate is the **heart** of Santto ordering. It turns taps on the menu
//! into a priced cart and the cart into the order text, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Santto Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Ordering UI (TypeScript)                     │   │
//! │  │    Menu ──► Burger Builder ──► Cart ──► Checkout               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderSession calls                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ santto-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐  ┌──────────┐ │   │
//! │  │   │  catalog  │─►│ composition │─►│   cart    │─►│formatter │ │   │
//! │  │   │  entries  │  │  selections │  │  lines    │  │  text    │ │   │
//! │  │   └───────────┘  └─────────────┘  └───────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • INTEGER MONEY                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ order text                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 santto-dispatch (Transport Layer)               │   │
//! │  │            config, WhatsApp link hand-off, logging              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - The immutable menu
//! - [`composition`] - Burger builder (base + add-ons)
//! - [`cart`] - Cart lines, merging, totals
//! - [`formatter`] - Order text rendering
//! - [`session`] - Presentation-facing facade over the above
//! - [`money`] - Integer-cent money
//! - [`settings`] - Labels and currency convention for the order text
//! - [`types`] - Domain types
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use santto_core::{Catalog, OrderSession, OrderSettings};
//!
//! let mut session = OrderSession::new(Arc::new(Catalog::santto_menu()), OrderSettings::default());
//!
//! session.start_composition("base_burger").unwrap();
//! session.add_to_composition("bacon").unwrap();
//! session.add_to_composition("cheese").unwrap();
//! session.finalize_composition().unwrap();
//! session.add_simple_to_cart("coke", None).unwrap();
//!
//! let text = session.format_order("Maria", Some("PIX")).unwrap();
//! assert!(text.ends_with("*Total:* R$29.00"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod composition;
pub mod error;
pub mod formatter;
pub mod money;
pub mod session;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAggregator, CartLine, CartTotals};
pub use catalog::Catalog;
pub use composition::{CompositionEngine, CompositionState, Selection};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorPayload, ValidationError};
pub use formatter::format_order;
pub use money::Money;
pub use session::{CartView, OrderSession, RemovalTarget};
pub use settings::{CurrencyFormat, OrderSettings};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single simple line.
///
/// Guards against a stuck "+" button turning 10 drinks into 1000.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum selections (base included) in one composition.
pub const MAX_SELECTIONS: usize = 50;

/// Highest unit price a catalog entry may carry (R$1,000,000.00).
///
/// A full cart at this price stays far below `i64::MAX` cents:
/// `MAX_PRICE_CENTS * MAX_ITEM_QUANTITY * MAX_CART_LINES` is about 10^13.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
