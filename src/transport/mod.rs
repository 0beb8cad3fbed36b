//! Transport module - the serial bridge seam.
//!
//! The session never talks to a serial port directly; it drives a
//! [`SerialLink`] handed out by a [`LinkFactory`]. The host environment
//! supplies the real bridge (USB serial, BLE, a relay daemon); this crate
//! ships an in-memory [`MockLink`] for tests and demos.
//!
//! ```text
//! ┌─────────┐  Base64 frame   ┌────────────┐  Base64 payload  ┌───────┐
//! │ Session │ ──────────────► │ SerialLink │ ◄──────────────  │ Board │
//! └─────────┘                 └────────────┘   (LinkEvents)   └───────┘
//! ```
//!
//! Payloads cross this seam Base64-encoded in both directions, the way
//! serial bridges hand them to embedding hosts. Inbound traffic flows
//! back as [`LinkEvent`]s on an unbounded channel.

mod mock;

pub use mock::{MockFactory, MockLink, MockLinkHandle};

use tokio::sync::mpsc;

use crate::error::Result;

/// Events a link reports back to its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The bridge finished connecting to a peripheral.
    Connected,
    /// A payload arrived from the board, Base64-encoded by the bridge.
    Message(String),
    /// The bridge dropped outside a requested disconnect.
    Lost(String),
}

/// Receiving end of a link's event stream.
pub type LinkEvents = mpsc::UnboundedReceiver<LinkEvent>;

/// One open serial bridge.
///
/// Methods are synchronous; a link queues work and reports completion
/// through its event stream.
pub trait SerialLink: Send {
    /// Ask the bridge to connect to the peripheral with this ID.
    ///
    /// Completion arrives as [`LinkEvent::Connected`].
    fn connect_peripheral(&mut self, id: &str) -> Result<()>;

    /// Queue one Base64-encoded payload for the board.
    fn send(&mut self, payload: &str) -> Result<()>;

    /// Tear the bridge down. No event follows; the caller initiated it.
    fn disconnect(&mut self);

    /// Report a link-level failure such as stalled inbound data.
    ///
    /// The bridge closes and answers with [`LinkEvent::Lost`] carrying
    /// the reason.
    fn trigger_disconnect_error(&mut self, reason: &str);

    /// Whether the bridge currently holds an open peripheral connection.
    fn is_connected(&self) -> bool;
}

/// Opens fresh links. Every scan discards the previous link and builds a
/// new one through the factory.
pub trait LinkFactory: Send {
    /// Open a new link and hand back its event stream.
    fn open(&mut self) -> Result<(Box<dyn SerialLink>, LinkEvents)>;
}

/// Closures returning a link pair act as factories directly.
impl<F> LinkFactory for F
where
    F: FnMut() -> Result<(Box<dyn SerialLink>, LinkEvents)> + Send,
{
    fn open(&mut self) -> Result<(Box<dyn SerialLink>, LinkEvents)> {
        self()
    }
}
