//! Integration tests for aibot-link.
//!
//! These tests drive a full session over the in-memory mock link and
//! verify the pieces working together: lifecycle, command traffic,
//! report decoding, rate limiting, and the stall watchdog.

use std::time::Duration;

use tokio::time::timeout;

use aibot_link::transport::{LinkEvent, MockFactory, MockLinkHandle};
use aibot_link::{ConnectionState, LinkConfig, Session, PIN_MODE_UNSET};

/// 28-byte status report with recognizable values in the local bank.
fn local_report() -> Vec<u8> {
    let mut raw = vec![0u8; 28];
    raw[0] = 73;
    raw[1] = 1;
    raw[2] = 1;
    raw[6..8].copy_from_slice(&300u16.to_be_bytes());
    raw
}

/// Connected session plus the handle driving its mock link.
fn connected(config: LinkConfig) -> (Session<MockFactory>, MockLinkHandle) {
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());
    session.scan().expect("mock scan cannot fail");
    session.connect("AIBOT-01").expect("mock connect cannot fail");
    session.pump();
    let handle = factory.latest().expect("scan opened a link");
    (session, handle)
}

/// Test the full command flow: configure, actuate, and read back a report.
#[tokio::test]
async fn test_command_flow_round_trip() {
    let config = LinkConfig::new().with_settle_delay(Duration::from_millis(1));
    let (mut session, handle) = connected(config);
    assert!(session.is_connected());

    session.set_port_mode(0, 2).await;
    session.set_digital_out(1, 1).await;
    session.set_angle(2, 45).await;

    let sent = handle.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(
        sent[0],
        vec![80, 1, 0, 2, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255]
    );
    assert_eq!(
        sent[1],
        vec![68, 1, 1, 1, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255]
    );
    // 45 degrees encodes to 1150 = 0x047E in the second servo pair.
    assert_eq!(
        sent[2],
        vec![66, 1, 0, 0, 0x04, 0x7E, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(session.pin_mode(0), 2);

    handle.emit_payload(&local_report());
    session.pump();
    assert_eq!(session.read_digital(0), 1);
    assert_eq!(session.read_analog(0), 300);
}

/// Test that the rolling rate cap drops a frame volley's overflow.
#[tokio::test]
async fn test_rate_cap_drops_volley_overflow() {
    let config = LinkConfig::new()
        .with_send_rate_max(3)
        .with_settle_delay(Duration::from_millis(1));
    let (mut session, handle) = connected(config);

    for _ in 0..6 {
        session.go_home().await;
    }

    assert_eq!(handle.sent_count(), 3);
}

/// Test that commands issued while disconnected never reach the transport.
#[tokio::test]
async fn test_disconnected_commands_are_silent() {
    let config = LinkConfig::new().with_settle_delay(Duration::from_millis(1));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());
    session.scan().expect("mock scan cannot fail");

    session.go_home().await;
    session.play_melody(1).await;

    let handle = factory.latest().expect("scan opened a link");
    assert_eq!(handle.sent_count(), 0);
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

/// Test that a silent link trips the watchdog exactly once.
#[tokio::test]
async fn test_watchdog_reports_stalled_link_once() {
    let config = LinkConfig::new().with_stall_timeout(Duration::from_millis(50));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());
    session.scan().expect("mock scan cannot fail");
    session.connect("AIBOT-01").expect("mock connect cannot fail");

    // Room for the connect, one full stall interval, and dead air after.
    let _ = timeout(Duration::from_millis(250), session.drive()).await;

    let handle = factory.latest().expect("scan opened a link");
    assert_eq!(handle.disconnect_errors(), vec!["serial data stopped"]);
    assert!(!session.is_connected());
    assert!(!handle.is_connected());
}

/// Test that steady traffic keeps deferring the stall deadline.
#[tokio::test]
async fn test_traffic_defers_the_watchdog() {
    let config = LinkConfig::new().with_stall_timeout(Duration::from_millis(150));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());
    session.scan().expect("mock scan cannot fail");
    session.connect("AIBOT-01").expect("mock connect cannot fail");
    let handle = factory.latest().expect("scan opened a link");

    let feeder = handle.clone();
    let emitter = tokio::spawn(async move {
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(30)).await;
            feeder.emit_payload(&local_report());
        }
    });

    let _ = timeout(Duration::from_millis(500), session.drive()).await;
    emitter.await.expect("emitter task panicked");

    // One stall after the traffic stopped, none during it.
    assert_eq!(handle.disconnect_errors().len(), 1);
}

/// Test that the same link accepts a reconnect after a watchdog drop.
#[tokio::test]
async fn test_reconnect_after_watchdog_drop() {
    let config = LinkConfig::new().with_stall_timeout(Duration::from_millis(40));
    let factory = MockFactory::new();
    let mut session = Session::new(config, factory.clone());
    session.scan().expect("mock scan cannot fail");
    session.connect("AIBOT-01").expect("mock connect cannot fail");

    let _ = timeout(Duration::from_millis(150), session.drive()).await;
    assert!(!session.is_connected());

    session.connect("AIBOT-01").expect("mock connect cannot fail");
    session.pump();

    assert!(session.is_connected());
    let handle = factory.latest().expect("scan opened a link");
    assert_eq!(handle.disconnect_errors().len(), 1);
}

/// Test that scanning again opens a fresh link and resets carried state.
#[tokio::test]
async fn test_rescan_resets_session_state() {
    let config = LinkConfig::new().with_settle_delay(Duration::from_millis(1));
    let (mut session, first) = connected(config);

    session.set_port_mode(3, 1).await;
    first.emit_payload(&local_report());
    session.pump();
    assert_eq!(session.read_analog(0), 300);

    session.scan().expect("mock scan cannot fail");

    assert_eq!(first.disconnects(), 1);
    assert_eq!(session.read_analog(0), 0);
    assert_eq!(session.pin_mode(3), PIN_MODE_UNSET);
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

/// Test that a lost bridge tears the session down without a watchdog round.
#[tokio::test]
async fn test_lost_bridge_disconnects_session() {
    let (mut session, handle) = connected(LinkConfig::default());

    handle.emit(LinkEvent::Lost("bridge crashed".to_string()));
    session.pump();

    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(handle.disconnect_errors().is_empty());
}
