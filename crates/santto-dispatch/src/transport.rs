//! # Message Transport
//!
//! Hands a finished order to the messaging app.
//!
//! ## Hand-off Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    WhatsApp Hand-off                                    │
//! │                                                                         │
//! │  OutboundMessage                                                        │
//! │  { destination: "5591984497134", text: "*Novo Pedido ..." }            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  WhatsAppTransport::link_for                                           │
//! │  https://wa.me/5591984497134?text=*Novo%20Pedido%20...                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  LinkLauncher::launch  (browser / OS opener / log / test recorder)     │
//! │                                                                         │
//! │  Fire-and-forget: no delivery receipt, no retry. Sending twice opens   │
//! │  two identical links.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};
use url::Url;

use crate::config::WhatsAppSettings;
use crate::error::{DispatchError, DispatchResult};
use crate::message::OutboundMessage;

/// Shortest and longest phone numbers accepted (E.164 digits).
const MIN_DESTINATION_DIGITS: usize = 10;
const MAX_DESTINATION_DIGITS: usize = 15;

// =============================================================================
// Traits
// =============================================================================

/// Delivers an outbound message somewhere outside the process.
pub trait MessageTransport {
    fn send(&self, message: &OutboundMessage) -> DispatchResult<()>;
}

/// Opens a link on the customer's device.
pub trait LinkLauncher {
    fn launch(&self, link: &Url) -> DispatchResult<()>;
}

/// Launcher that only logs the link. Used headless and in development.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLauncher;

impl LinkLauncher for LogLauncher {
    fn launch(&self, link: &Url) -> DispatchResult<()> {
        info!(link = %link, "Order link ready");
        Ok(())
    }
}

// =============================================================================
// Destination
// =============================================================================

/// Reduces a phone number to the digits-only form used in links.
///
/// Accepts `+`, spaces, dashes and parentheses as formatting.
///
/// ```rust
/// use santto_dispatch::transport::normalize_destination;
///
/// assert_eq!(normalize_destination("+55 (91) 98449-7134").unwrap(), "5591984497134");
/// assert!(normalize_destination("98449-7134").is_err());
/// assert!(normalize_destination("55 91 9844x7134").is_err());
/// ```
pub fn normalize_destination(raw: &str) -> DispatchResult<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect();

    let invalid = |reason: String| DispatchError::InvalidDestination {
        destination: raw.to_string(),
        reason,
    };

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("must contain only digits and formatting".to_string()));
    }

    if !(MIN_DESTINATION_DIGITS..=MAX_DESTINATION_DIGITS).contains(&digits.len()) {
        return Err(invalid(format!(
            "expected {} to {} digits, got {}",
            MIN_DESTINATION_DIGITS,
            MAX_DESTINATION_DIGITS,
            digits.len()
        )));
    }

    Ok(digits)
}

// =============================================================================
// WhatsApp Transport
// =============================================================================

/// Builds `wa.me` deep links and hands them to a launcher.
#[derive(Debug, Clone)]
pub struct WhatsAppTransport<L> {
    base_url: Url,
    launcher: L,
}

impl<L: LinkLauncher> WhatsAppTransport<L> {
    pub fn new(base_url: &str, launcher: L) -> DispatchResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DispatchError::InvalidUrl(format!(
                "{} cannot carry a phone number path",
                base_url
            )));
        }

        Ok(WhatsAppTransport { base_url, launcher })
    }

    pub fn from_settings(settings: &WhatsAppSettings, launcher: L) -> DispatchResult<Self> {
        Self::new(&settings.base_url, launcher)
    }

    /// Builds `{base_url}/{destination}?text={percent-encoded text}`.
    ///
    /// Spaces are written as `%20`, matching what browsers produce for
    /// `encodeURIComponent`.
    pub fn link_for(&self, message: &OutboundMessage) -> DispatchResult<Url> {
        let mut link = self.base_url.clone();

        link.path_segments_mut()
            .map_err(|_| DispatchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(message.destination());

        // form_urlencoded writes spaces as '+' and a literal '+' as %2B,
        // so every remaining '+' is a space.
        let text: String = url::form_urlencoded::byte_serialize(message.text().as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        link.set_query(Some(&format!("text={}", text)));

        Ok(link)
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

impl<L: LinkLauncher> MessageTransport for WhatsAppTransport<L> {
    fn send(&self, message: &OutboundMessage) -> DispatchResult<()> {
        let link = self.link_for(message)?;
        debug!(message_id = message.id(), len = link.as_str().len(), "Launching order link");
        self.launcher.launch(&link)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingLauncher {
        links: RefCell<Vec<Url>>,
    }

    impl LinkLauncher for RecordingLauncher {
        fn launch(&self, link: &Url) -> DispatchResult<()> {
            self.links.borrow_mut().push(link.clone());
            Ok(())
        }
    }

    struct FailingLauncher;

    impl LinkLauncher for FailingLauncher {
        fn launch(&self, _link: &Url) -> DispatchResult<()> {
            Err(DispatchError::LaunchFailed("no browser".to_string()))
        }
    }

    #[test]
    fn test_normalize_destination() {
        assert_eq!(normalize_destination("5591984497134").unwrap(), "5591984497134");
        assert_eq!(normalize_destination("+55 91 98449-7134").unwrap(), "5591984497134");
        assert!(normalize_destination("").is_err());
        assert!(normalize_destination("123456789").is_err());
        assert!(normalize_destination("1234567890123456").is_err());
        assert!(normalize_destination("55.91.98449.7134").is_err());
    }

    #[test]
    fn test_link_shape() {
        let transport = WhatsAppTransport::new("https://wa.me", LogLauncher).unwrap();
        let message = OutboundMessage::new("5591984497134", "*Total:* R$29.00\n+ Bacon");

        let link = transport.link_for(&message).unwrap();
        assert_eq!(
            link.as_str(),
            "https://wa.me/5591984497134?text=*Total%3A*%20R%2429.00%0A%2B%20Bacon"
        );
    }

    #[test]
    fn test_link_text_decodes_back() {
        let transport = WhatsAppTransport::new("https://wa.me/", LogLauncher).unwrap();
        let text = "*Novo Pedido - Santto Hambúrguer*\n*Cliente:* Maria & João\n  + Bacon, Queijo Cheddar";
        let link = transport
            .link_for(&OutboundMessage::new("5591984497134", text))
            .unwrap();

        assert_eq!(link.path(), "/5591984497134");
        let decoded: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(decoded, vec![("text".to_string(), text.to_string())]);
    }

    #[test]
    fn test_send_hands_link_to_launcher() {
        let transport =
            WhatsAppTransport::new("https://wa.me", RecordingLauncher::default()).unwrap();
        let message = OutboundMessage::new("5591984497134", "oi");

        transport.send(&message).unwrap();
        transport.send(&message).unwrap();

        let links = transport.launcher().links.borrow();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
        assert_eq!(links[0].as_str(), "https://wa.me/5591984497134?text=oi");
    }

    #[test]
    fn test_launch_failure_propagates() {
        let transport = WhatsAppTransport::new("https://wa.me", FailingLauncher).unwrap();
        let err = transport
            .send(&OutboundMessage::new("5591984497134", "oi"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::LaunchFailed(_)));
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(WhatsAppTransport::new("not a url", LogLauncher).is_err());
        assert!(WhatsAppTransport::new("mailto:orders@santto.com.br", LogLauncher).is_err());
    }
}
