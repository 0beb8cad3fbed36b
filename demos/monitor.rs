//! Sensor monitor - live report decoding and the stall watchdog.
//!
//! This example demonstrates:
//! - Feeding board status reports through a link handle
//! - Reading decoded analog, digital, and desk values
//! - The watchdog dropping the link once the feed goes quiet
//!
//! # Running
//!
//! ```bash
//! cargo run --example monitor
//! ```

use std::time::Duration;

use tokio::time::timeout;

use aibot_link::transport::MockFactory;
use aibot_link::{LinkConfig, Session};

/// 28-byte status report: digital pattern plus one moving analog value.
fn status_report(tick: i32) -> Vec<u8> {
    let mut raw = vec![0u8; 28];
    raw[0] = 73;
    raw[1] = 1;
    raw[2] = (tick % 2) as u8;
    let analog = 500 + tick as u16 * 25;
    raw[6..8].copy_from_slice(&analog.to_be_bytes());
    raw
}

/// 14-byte desk report carrying six signed readouts.
fn desk_report(tick: i32) -> Vec<u8> {
    let mut raw = vec![0u8; 14];
    raw[0] = 88;
    raw[1] = 1;
    // Sweeps the first readout through zero to show the signed decode.
    let value = -150 + tick * 30;
    let wire = (if value < 0 { value + 65536 } else { value }) as u16;
    raw[2..4].copy_from_slice(&wire.to_be_bytes());
    raw
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    let config = LinkConfig::new().with_stall_timeout(Duration::from_millis(400));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());

    session.scan()?;
    session.connect("AIBOT-01")?;
    session.pump();

    let handle = factory.latest().expect("scan opened a link");

    for tick in 0..10 {
        handle.emit_payload(&status_report(tick));
        handle.emit_payload(&desk_report(tick));
        session.pump();
        println!(
            "tick {:2}  digital0={}  analog0={:4}  desk1={:5}",
            tick,
            session.read_digital(0),
            session.read_analog(0),
            session.desk_value(1),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!("feed stopped, waiting out the stall watchdog");
    let _ = timeout(Duration::from_secs(1), session.drive()).await;
    println!("state after stall: {:?}", session.state());

    Ok(())
}
