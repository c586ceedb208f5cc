//! # Order Dispatcher
//!
//! Checkout: formats the session's cart, snapshots the text and sends it.
//!
//! ```text
//! submit(session, "Maria", Some("PIX"))
//!     │
//!     ├── session.format_order(..)      CoreError ──► DispatchError::Core
//!     ├── OutboundMessage::new(..)      owned snapshot
//!     └── transport.send(&message)      fire-and-forget
//! ```

use tracing::info;

use santto_core::OrderSession;

use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::message::OutboundMessage;
use crate::transport::{normalize_destination, LinkLauncher, MessageTransport, WhatsAppTransport};

/// Sends finished orders to one store destination.
#[derive(Debug, Clone)]
pub struct OrderDispatcher<T> {
    transport: T,
    destination: String,
}

impl<T: MessageTransport> OrderDispatcher<T> {
    /// `destination` may carry phone formatting; it is normalized here.
    pub fn new(transport: T, destination: &str) -> DispatchResult<Self> {
        Ok(OrderDispatcher {
            transport,
            destination: normalize_destination(destination)?,
        })
    }

    /// Normalized destination every message goes to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Formats the order and hands it to the transport.
    ///
    /// Nothing is sent when formatting fails. The session is only read, so
    /// the customer can fix the name and submit again.
    pub fn submit(
        &self,
        session: &OrderSession,
        customer_name: &str,
        payment: Option<&str>,
    ) -> DispatchResult<OutboundMessage> {
        let text = session.format_order(customer_name, payment)?;
        let message = OutboundMessage::new(self.destination.clone(), text);

        self.transport.send(&message)?;

        info!(
            message_id = message.id(),
            destination = %self.destination,
            total = %session.cart_total(),
            "Order dispatched"
        );
        Ok(message)
    }
}

impl<L: LinkLauncher> OrderDispatcher<WhatsAppTransport<L>> {
    /// Dispatcher for the configured WhatsApp number.
    pub fn whatsapp(config: &DispatchConfig, launcher: L) -> DispatchResult<Self> {
        let transport = WhatsAppTransport::from_settings(&config.whatsapp, launcher)?;
        Self::new(transport, &config.whatsapp.destination)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
