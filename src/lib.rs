//! # aibot-link
//!
//! Link layer for AIBOT servo robotics boards.
//!
//! This crate drives a six-module servo board (plus an optional remote
//! bank and the AIDesk function unit) over a host-provided serial
//! bridge: it encodes the board's fixed 14-byte command frames, decodes
//! its status reports into a sensor table, and runs the connection
//! lifecycle with a stall watchdog and a send rate limiter.
//!
//! ## Architecture
//!
//! - **Command path**: one 14-byte frame per operation, rate limited to
//!   what the bridge can forward, fire-and-forget
//! - **Report path**: 28-byte sensor and 14-byte AIDesk reports decoded
//!   into the session's [`SensorTable`]
//! - **Session**: connection state machine, inbound-silence watchdog,
//!   and the user-facing command facade
//!
//! ## Example
//!
//! ```ignore
//! use aibot_link::{LinkConfig, Session};
//! use aibot_link::transport::MockFactory;
//!
//! #[tokio::main]
//! async fn main() {
//!     let factory = MockFactory::new();
//!     let mut session = Session::new(LinkConfig::default(), factory.clone());
//!     session.scan().unwrap();
//!     session.connect("AIBOT-01").unwrap();
//!     session.pump();
//!
//!     session.set_angle(1, 90).await;
//!     println!("A0 = {}", session.read_digital(0));
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod protocol;
pub mod sensors;
pub mod transport;

mod commands;
mod limiter;
mod session;

pub use config::LinkConfig;
pub use error::AibotError;
pub use limiter::RateLimiter;
pub use sensors::SensorTable;
pub use session::{ConnectionState, Session, PIN_MODE_SLOTS, PIN_MODE_UNSET};
