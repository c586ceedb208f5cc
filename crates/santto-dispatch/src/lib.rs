//! # santto-dispatch: Order Hand-off for Santto
//!
//! Everything between a finished cart and the store's phone: configuration,
//! the outbound message snapshot, the WhatsApp deep link and logging setup.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dispatch Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 OrderDispatcher (checkout entry point)           │  │
//! │  │                                                                  │  │
//! │  │  session.format_order(..) ──► OutboundMessage ──► transport      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ DispatchConfig │  │ WhatsApp       │  │  LinkLauncher          │    │
//! │  │                │  │ Transport      │  │                        │    │
//! │  │ santto.toml    │  │ wa.me/{phone}  │  │ LogLauncher, or the    │    │
//! │  │ + SANTTO_* env │  │ ?text=...      │  │ host's URL opener      │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Dispatch configuration (labels, destination, link URL)
//! - [`dispatcher`] - `OrderDispatcher` checkout entry point
//! - [`error`] - Dispatch error types
//! - [`message`] - `OutboundMessage` snapshot
//! - [`telemetry`] - Tracing subscriber setup
//! - [`transport`] - `MessageTransport`, WhatsApp links, launchers
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use santto_core::{Catalog, OrderSession};
//! use santto_dispatch::{DispatchConfig, LogLauncher, OrderDispatcher};
//!
//! let config = DispatchConfig::default();
//! let mut session = OrderSession::new(Arc::new(Catalog::santto_menu()), config.order.clone());
//! session.add_simple_to_cart("coke", Some(2)).unwrap();
//!
//! let dispatcher = OrderDispatcher::whatsapp(&config, LogLauncher).unwrap();
//! let message = dispatcher.submit(&session, "Maria", Some("PIX")).unwrap();
//! assert!(message.text().ends_with("*Total:* R$12.00"));
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod telemetry;
pub mod transport;

pub use config::{DispatchConfig, WhatsAppSettings};
pub use dispatcher::OrderDispatcher;
pub use error::{DispatchError, DispatchResult};
pub use message::OutboundMessage;
pub use telemetry::init_tracing;
pub use transport::{
    normalize_destination, LinkLauncher, LogLauncher, MessageTransport, WhatsAppTransport,
};
