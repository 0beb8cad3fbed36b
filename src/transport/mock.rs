//! In-memory serial bridge for tests and demos.
//!
//! A [`MockLink`] records everything the session sends and lets the test
//! side inject board traffic through a [`MockLinkHandle`]. The handle
//! Base64-encodes injected payloads the same way a real bridge does.
//!
//! # Example
//!
//! ```ignore
//! use aibot_link::transport::MockFactory;
//!
//! let factory = MockFactory::new();
//! let mut session = Session::new(LinkConfig::default(), factory.clone());
//! session.scan()?;
//! let handle = factory.latest().unwrap();
//! handle.emit_payload(&report_bytes);
//! ```

use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::sync::mpsc;

use super::{LinkEvent, LinkEvents, LinkFactory, SerialLink};
use crate::error::{AibotError, Result};

/// State shared between a link and its handle.
#[derive(Default)]
struct Shared {
    /// Whether a peripheral connection is open.
    connected: bool,
    /// ID passed to the last `connect_peripheral` call.
    peripheral: Option<String>,
    /// Base64 payloads the session pushed down, oldest first.
    sent: Vec<String>,
    /// How many times the session tore the bridge down.
    disconnects: u32,
    /// Reasons passed to `trigger_disconnect_error`, oldest first.
    disconnect_errors: Vec<String>,
}

/// In-memory [`SerialLink`] implementation.
pub struct MockLink {
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<LinkEvent>,
}

/// Test-side handle to a [`MockLink`].
///
/// Clones share the same underlying link.
#[derive(Clone)]
pub struct MockLinkHandle {
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<LinkEvent>,
}

impl MockLink {
    /// Open a link together with the handle that drives it.
    pub fn open() -> (Box<dyn SerialLink>, MockLinkHandle, LinkEvents) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let (tx, rx) = mpsc::unbounded_channel();

        let link = MockLink {
            shared: Arc::clone(&shared),
            events: tx.clone(),
        };
        let handle = MockLinkHandle { shared, events: tx };

        (Box::new(link), handle, rx)
    }
}

impl SerialLink for MockLink {
    /// Connects immediately and queues [`LinkEvent::Connected`].
    fn connect_peripheral(&mut self, id: &str) -> Result<()> {
        let mut shared = self.shared.lock().expect("mock state poisoned");
        shared.connected = true;
        shared.peripheral = Some(id.to_string());
        drop(shared);

        let _ = self.events.send(LinkEvent::Connected);
        Ok(())
    }

    fn send(&mut self, payload: &str) -> Result<()> {
        let mut shared = self.shared.lock().expect("mock state poisoned");
        if !shared.connected {
            return Err(AibotError::LinkClosed);
        }
        shared.sent.push(payload.to_string());
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut shared = self.shared.lock().expect("mock state poisoned");
        shared.connected = false;
        shared.peripheral = None;
        shared.disconnects += 1;
    }

    /// Closes the bridge and answers with [`LinkEvent::Lost`].
    fn trigger_disconnect_error(&mut self, reason: &str) {
        let mut shared = self.shared.lock().expect("mock state poisoned");
        shared.connected = false;
        shared.peripheral = None;
        shared.disconnect_errors.push(reason.to_string());
        drop(shared);

        let _ = self.events.send(LinkEvent::Lost(reason.to_string()));
    }

    fn is_connected(&self) -> bool {
        self.shared.lock().expect("mock state poisoned").connected
    }
}

impl MockLinkHandle {
    /// Push a raw event into the session's stream.
    pub fn emit(&self, event: LinkEvent) {
        let _ = self.events.send(event);
    }

    /// Deliver a board payload the way the bridge would: Base64-encoded
    /// inside [`LinkEvent::Message`].
    pub fn emit_payload(&self, payload: &[u8]) {
        self.emit(LinkEvent::Message(STANDARD.encode(payload)));
    }

    /// Frames the session sent down this link, oldest first, decoded
    /// from their Base64 payloads.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.shared
            .lock()
            .expect("mock state poisoned")
            .sent
            .iter()
            .map(|payload| STANDARD.decode(payload).expect("sent payloads are base64"))
            .collect()
    }

    /// Number of frames the session sent down this link.
    pub fn sent_count(&self) -> usize {
        self.shared.lock().expect("mock state poisoned").sent.len()
    }

    /// How many times the session tore this bridge down.
    pub fn disconnects(&self) -> u32 {
        self.shared.lock().expect("mock state poisoned").disconnects
    }

    /// Reasons passed to `trigger_disconnect_error`, oldest first.
    pub fn disconnect_errors(&self) -> Vec<String> {
        self.shared
            .lock()
            .expect("mock state poisoned")
            .disconnect_errors
            .clone()
    }

    /// Whether a peripheral connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.shared.lock().expect("mock state poisoned").connected
    }

    /// ID passed to the last `connect_peripheral` call, if any.
    pub fn connected_peripheral(&self) -> Option<String> {
        self.shared
            .lock()
            .expect("mock state poisoned")
            .peripheral
            .clone()
    }
}

/// Factory producing [`MockLink`]s, keeping a handle to the newest one.
#[derive(Clone, Default)]
pub struct MockFactory {
    latest: Arc<Mutex<Option<MockLinkHandle>>>,
}

impl MockFactory {
    /// Create a factory with no links opened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the most recently opened link, if any.
    pub fn latest(&self) -> Option<MockLinkHandle> {
        self.latest.lock().expect("mock state poisoned").clone()
    }
}

impl LinkFactory for MockFactory {
    fn open(&mut self) -> Result<(Box<dyn SerialLink>, LinkEvents)> {
        let (link, handle, events) = MockLink::open();
        *self.latest.lock().expect("mock state poisoned") = Some(handle);
        Ok((link, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_records_peripheral_and_queues_event() {
        let (mut link, handle, mut events) = MockLink::open();

        link.connect_peripheral("AIBOT-01").unwrap();

        assert!(link.is_connected());
        assert_eq!(handle.connected_peripheral().as_deref(), Some("AIBOT-01"));
        assert_eq!(events.try_recv().unwrap(), LinkEvent::Connected);
    }

    #[test]
    fn test_send_records_frames_in_order() {
        let (mut link, handle, _events) = MockLink::open();
        link.connect_peripheral("AIBOT-01").unwrap();

        link.send(&STANDARD.encode([1u8, 2, 3])).unwrap();
        link.send(&STANDARD.encode([4u8, 5])).unwrap();

        assert_eq!(handle.sent(), vec![vec![1, 2, 3], vec![4, 5]]);
        assert_eq!(handle.sent_count(), 2);
    }

    #[test]
    fn test_send_while_disconnected_fails() {
        let (mut link, handle, _events) = MockLink::open();

        let payload = STANDARD.encode([72u8]);
        assert!(matches!(link.send(&payload), Err(AibotError::LinkClosed)));
        assert_eq!(handle.sent_count(), 0);
    }

    #[test]
    fn test_disconnect_counts_and_emits_nothing() {
        let (mut link, handle, mut events) = MockLink::open();
        link.connect_peripheral("AIBOT-01").unwrap();
        let _ = events.try_recv();

        link.disconnect();

        assert!(!link.is_connected());
        assert_eq!(handle.disconnects(), 1);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_trigger_disconnect_error_closes_and_emits_lost() {
        let (mut link, handle, mut events) = MockLink::open();
        link.connect_peripheral("AIBOT-01").unwrap();
        let _ = events.try_recv();

        link.trigger_disconnect_error("serial data stopped");

        assert!(!link.is_connected());
        assert_eq!(handle.disconnect_errors(), vec!["serial data stopped"]);
        assert_eq!(
            events.try_recv().unwrap(),
            LinkEvent::Lost("serial data stopped".to_string())
        );
    }

    #[test]
    fn test_emit_payload_base64_round_trip() {
        let (_link, handle, mut events) = MockLink::open();

        handle.emit_payload(&[73, 1, 255]);

        match events.try_recv().unwrap() {
            LinkEvent::Message(encoded) => {
                assert_eq!(STANDARD.decode(encoded).unwrap(), vec![73, 1, 255]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_factory_tracks_latest_link() {
        let mut factory = MockFactory::new();
        assert!(factory.latest().is_none());

        let (mut link, _events) = factory.open().unwrap();
        let first = factory.latest().unwrap();
        link.connect_peripheral("one").unwrap();
        assert_eq!(first.connected_peripheral().as_deref(), Some("one"));

        let (_link2, _events2) = factory.open().unwrap();
        let second = factory.latest().unwrap();
        assert!(second.connected_peripheral().is_none());
    }
}
