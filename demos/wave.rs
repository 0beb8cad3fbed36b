//! Servo wave - scripted sweep on a mock link.
//!
//! This example demonstrates:
//! - Opening a session through a link factory
//! - The connect handshake and rate-limited command path
//! - Driving servo angles and reading the frames off the wire
//!
//! # Running
//!
//! ```bash
//! cargo run --example wave
//! ```

use std::time::Duration;

use aibot_link::transport::MockFactory;
use aibot_link::{LinkConfig, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    // Short settle delay keeps the sweep snappy.
    let config = LinkConfig::new().with_settle_delay(Duration::from_millis(25));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());

    session.scan()?;
    session.connect("AIBOT-01")?;
    session.pump();
    println!("connected: {}", session.is_connected());

    // Ease the arm in, then sweep servo 1 through a wave.
    // Nine frames total stays inside the once-per-second send cap.
    session.set_speed(2).await;
    for degrees in [0, 60, 120, 180, 120, 60, 0] {
        session.set_angle(1, degrees).await;
    }
    session.go_home().await;

    let handle = factory.latest().expect("scan opened a link");
    println!("frames on the wire:");
    for (i, frame) in handle.sent().iter().enumerate() {
        println!("  {:2}: {:?}", i, frame);
    }

    Ok(())
}
