//! Session state machine for one board link.
//!
//! A [`Session`] owns everything with connection lifetime: the open
//! [`SerialLink`], the connection state, the sensor table, the recorded
//! port modes, the send rate limiter, and the inbound-silence watchdog.
//!
//! ```text
//! scan() ─► factory.open() ─► connect(id) ─► Connecting
//!                                                │ LinkEvent::Connected
//!                                                ▼
//!            Disconnected ◄─ Lost / disconnect ─ Connected
//! ```
//!
//! Inbound traffic arrives as [`LinkEvent`]s. Callers either run the
//! async [`drive`](Session::drive) loop, which also enforces the
//! watchdog, or call [`pump`](Session::pump) to drain queued events
//! synchronously between commands.
//!
//! The watchdog is a single-shot deadline pushed back by every message.
//! When it fires, the session invokes the link's disconnect-error path
//! exactly once and disarms itself until traffic or a reconnect re-arms
//! it.
//!
//! # Usage
//!
//! ```ignore
//! use aibot_link::{LinkConfig, Session};
//! use aibot_link::transport::MockFactory;
//!
//! let factory = MockFactory::new();
//! let mut session = Session::new(LinkConfig::default(), factory.clone());
//! session.scan()?;
//! session.connect("AIBOT-01")?;
//! session.pump();
//! assert!(session.is_connected());
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace, warn};

use crate::config::LinkConfig;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::protocol::{apply_payload, target, Applied, CommandFrame};
use crate::sensors::SensorTable;
use crate::transport::{LinkEvent, LinkEvents, LinkFactory, SerialLink};

/// Number of ports whose configured mode the session tracks.
pub const PIN_MODE_SLOTS: usize = 8;

/// Sentinel mode for a port never configured this connection.
pub const PIN_MODE_UNSET: i32 = -1;

/// Reason reported to the link when the watchdog fires.
const STALL_REASON: &str = "serial data stopped";

/// Connection lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No peripheral connection.
    #[default]
    Disconnected,
    /// Peripheral connect issued; completion pending.
    Connecting,
    /// Link open; frames flow both ways.
    Connected,
}

/// What woke the drive loop.
enum Wakeup {
    /// A link event arrived.
    Event(LinkEvent),
    /// The watchdog deadline passed with no traffic.
    Stalled,
    /// The event stream closed; nothing more will arrive.
    Closed,
}

/// Owns one board link and every piece of per-connection state.
pub struct Session<F> {
    /// Pacing and watchdog knobs.
    config: LinkConfig,
    /// Opens a fresh link on every scan.
    factory: F,
    /// The open link, kept across disconnects until the next scan.
    link: Option<Box<dyn SerialLink>>,
    /// Event stream of the open link.
    events: Option<LinkEvents>,
    /// Current lifecycle state.
    state: ConnectionState,
    /// Latest decoded sensor and AIDesk values.
    sensors: SensorTable,
    /// Mode recorded per port, [`PIN_MODE_UNSET`] when never set.
    pin_modes: [i32; PIN_MODE_SLOTS],
    /// Counts rate-limited sends against the rolling window.
    limiter: RateLimiter,
    /// Armed stall deadline; `None` while disarmed.
    watchdog: Option<Instant>,
    /// Secondary status blocks seen since the last re-announce.
    secondary_seen: u32,
}

impl<F: LinkFactory> Session<F> {
    /// Create a session with no link open yet.
    pub fn new(config: LinkConfig, factory: F) -> Self {
        let limiter = RateLimiter::new(config.send_rate_max);
        Self {
            config,
            factory,
            link: None,
            events: None,
            state: ConnectionState::Disconnected,
            sensors: SensorTable::new(),
            pin_modes: [PIN_MODE_UNSET; PIN_MODE_SLOTS],
            limiter,
            watchdog: None,
            secondary_seen: 0,
        }
    }

    /// Tear down any existing link and open a fresh one.
    ///
    /// Two live links must never coexist; the previous one is closed
    /// before the factory runs.
    pub fn scan(&mut self) -> Result<()> {
        if let Some(link) = self.link.as_mut() {
            link.disconnect();
        }
        self.teardown();

        let (link, events) = self.factory.open()?;
        self.link = Some(link);
        self.events = Some(events);
        debug!("scan: opened a fresh link");
        Ok(())
    }

    /// Ask the link to connect to the peripheral with this ID.
    ///
    /// No-op while already connected; completion arrives as
    /// [`LinkEvent::Connected`].
    pub fn connect(&mut self, id: &str) -> Result<()> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }
        if let Some(link) = self.link.as_mut() {
            link.connect_peripheral(id)?;
            self.state = ConnectionState::Connecting;
            debug!("connecting to peripheral {}", id);
        }
        Ok(())
    }

    /// Close the peripheral connection and reset per-connection state.
    ///
    /// The link itself stays around for a later [`connect`](Self::connect);
    /// only [`scan`](Self::scan) replaces it.
    pub fn disconnect(&mut self) {
        if let Some(link) = self.link.as_mut() {
            link.disconnect();
        }
        self.teardown();
        debug!("disconnected");
    }

    /// Whether the session currently holds an open connection.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Latest decoded sensor values. Read-only; inbound frames mutate it.
    #[inline]
    pub fn sensors(&self) -> &SensorTable {
        &self.sensors
    }

    /// The configuration this session runs with.
    #[inline]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Mode recorded for a port this connection, or [`PIN_MODE_UNSET`].
    pub fn pin_mode(&self, port: usize) -> i32 {
        self.pin_modes.get(port).copied().unwrap_or(PIN_MODE_UNSET)
    }

    /// Record the mode a port was configured with. Out-of-range ports
    /// are ignored.
    pub(crate) fn record_pin_mode(&mut self, port: usize, mode: i32) {
        if let Some(slot) = self.pin_modes.get_mut(port) {
            *slot = mode;
        }
    }

    /// Queue one frame for the board.
    ///
    /// Does nothing while disconnected. With `use_limiter` set, a frame
    /// over the rolling send cap is dropped, never queued; commands are
    /// fire-and-forget either way. The wire bytes cross the link
    /// Base64-encoded.
    pub fn send(&mut self, frame: &CommandFrame, use_limiter: bool) {
        if self.state != ConnectionState::Connected {
            trace!("send dropped: not connected");
            return;
        }
        if use_limiter && !self.limiter.okay_to_send() {
            trace!("send dropped: over the rate cap");
            return;
        }
        let Some(link) = self.link.as_mut() else {
            return;
        };
        let payload = STANDARD.encode(frame.as_bytes());
        if let Err(e) = link.send(&payload) {
            warn!("send failed: {}", e);
        }
    }

    /// Apply one link event to the session.
    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected => {
                debug!("peripheral connected");
                self.state = ConnectionState::Connected;
                self.arm_watchdog();
            }
            LinkEvent::Message(payload) => {
                self.arm_watchdog();
                self.on_message(&payload);
            }
            LinkEvent::Lost(reason) => {
                warn!("link lost: {}", reason);
                self.teardown();
            }
        }
    }

    /// Drain every event already queued, without waiting.
    pub fn pump(&mut self) {
        loop {
            let event = match self.events.as_mut() {
                Some(events) => match events.try_recv() {
                    Ok(event) => event,
                    Err(_) => return,
                },
                None => return,
            };
            self.handle_event(event);
        }
    }

    /// Run the session until its event stream closes.
    ///
    /// Waits on link events and the watchdog deadline together. A stall
    /// fires the link's disconnect-error path once; the resulting
    /// [`LinkEvent::Lost`] then tears the connection down.
    pub async fn drive(&mut self) {
        loop {
            match self.next_wakeup().await {
                Wakeup::Event(event) => self.handle_event(event),
                Wakeup::Stalled => self.on_stall(),
                Wakeup::Closed => return,
            }
        }
    }

    /// Wait for the next thing the session must react to.
    async fn next_wakeup(&mut self) -> Wakeup {
        let Some(events) = self.events.as_mut() else {
            return Wakeup::Closed;
        };
        match self.watchdog {
            Some(deadline) => {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(event) => Wakeup::Event(event),
                        None => Wakeup::Closed,
                    },
                    _ = sleep_until(deadline) => Wakeup::Stalled,
                }
            }
            None => match events.recv().await {
                Some(event) => Wakeup::Event(event),
                None => Wakeup::Closed,
            },
        }
    }

    /// Decode one Base64 payload and fold it into the sensor table.
    ///
    /// Undecodable payloads are logged and dropped; the connection
    /// stays up.
    fn on_message(&mut self, payload: &str) {
        let raw = match STANDARD.decode(payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("undecodable payload dropped: {}", e);
                return;
            }
        };

        let applied = apply_payload(&Bytes::from(raw), &mut self.sensors);
        trace!("payload applied: {:?}", applied);

        // A streaming remote bank means the board came up after us and
        // missed the announce; repeat it past the threshold.
        if let Applied::Sensors { remote_bank: true } = applied {
            self.secondary_seen += 1;
            if self.secondary_seen > self.config.announce_threshold {
                self.secondary_seen = 0;
                debug!("remote bank streaming, re-announcing controller");
                self.send(&CommandFrame::announce(target::LOCAL), true);
            }
        }
    }

    /// Start the stall deadline over from now.
    fn arm_watchdog(&mut self) {
        self.watchdog = Some(Instant::now() + self.config.stall_timeout);
    }

    /// The stall deadline passed with no traffic.
    ///
    /// Fires the link's disconnect-error path at most once per stall;
    /// the deadline disarms until traffic or a reconnect re-arms it.
    fn on_stall(&mut self) {
        if self.watchdog.take().is_none() {
            return;
        }
        warn!(
            "no inbound data for {:?}, reporting a dead link",
            self.config.stall_timeout
        );
        if let Some(link) = self.link.as_mut() {
            link.trigger_disconnect_error(STALL_REASON);
        }
    }

    /// Reset every piece of per-connection state.
    fn teardown(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.watchdog = None;
        self.secondary_seen = 0;
        self.sensors.reset();
        self.pin_modes = [PIN_MODE_UNSET; PIN_MODE_SLOTS];
    }
}
