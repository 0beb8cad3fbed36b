//! User-facing command operations on a [`Session`].
//!
//! Each operation builds exactly one 14-byte frame and hands it to the
//! session's rate-limited send path. Write-style operations are async
//! and resolve only after the configured settle delay, giving the
//! actuator time to take effect; the delay is a pacing convention, not
//! an acknowledgement. Read-style operations answer synchronously from
//! the sensor table and perform no I/O.
//!
//! Ports split across the two servo banks: user ports `0..=3` address
//! the local bank directly, `4..=7` address ports `0..=3` of the remote
//! bank.

use tokio::time::sleep;

use crate::protocol::{encode_angle, encode_signed, target, CommandFrame};
use crate::session::Session;
use crate::transport::LinkFactory;

/// Split a user-facing port number into (target, bank-local port).
fn split_port(port: u8) -> (u8, u8) {
    if port >= 4 {
        (target::REMOTE, port - 4)
    } else {
        (target::LOCAL, port)
    }
}

/// Six angle slots with only the 1-based `servo` encoded; a zero slot
/// leaves that module where it is.
fn one_servo(servo: usize, degrees: i32) -> [u16; 6] {
    let mut encoded = [0u16; 6];
    if let Some(slot) = servo.checked_sub(1).and_then(|i| encoded.get_mut(i)) {
        *slot = encode_angle(degrees);
    }
    encoded
}

/// Encode the `Some` slots, leave the rest at zero.
fn encoded_slots(degrees: [Option<i32>; 6]) -> [u16; 6] {
    degrees.map(|d| d.map(encode_angle).unwrap_or(0))
}

impl<F: LinkFactory> Session<F> {
    /// Send one frame through the limiter, then wait out the settle delay.
    async fn write(&mut self, frame: CommandFrame) {
        self.send(&frame, true);
        sleep(self.config().settle_delay).await;
    }

    /// Read an analog input port (`0..=7`), latest reported value.
    pub fn read_analog(&self, port: usize) -> i32 {
        let slot = match port {
            0..=3 => port + 4,
            4..=7 => port + 8,
            other => other,
        };
        self.sensors().sensor(slot)
    }

    /// Read a digital input port (`0..=7`); any nonzero level reads as 1.
    pub fn read_digital(&self, port: usize) -> i32 {
        let slot = match port {
            0..=3 => port,
            4..=7 => port + 4,
            other => other,
        };
        if self.sensors().sensor(slot) == 0 {
            0
        } else {
            1
        }
    }

    /// Configure a port as digital in (0), digital out (1), or analog
    /// in (2), and record the mode for this connection.
    pub async fn set_port_mode(&mut self, port: u8, mode: u8) {
        let (target, bank_port) = split_port(port);
        self.record_pin_mode(port as usize, i32::from(mode));
        self.write(CommandFrame::port_mode(target, bank_port, mode)).await;
    }

    /// Drive a digital output port high (1) or low (0).
    pub async fn set_digital_out(&mut self, port: u8, level: u8) {
        let (target, bank_port) = split_port(port);
        self.write(CommandFrame::digital_out(target, bank_port, level))
            .await;
    }

    /// Play a built-in buzzer melody, 1-based; the wire index is one less.
    pub async fn play_melody(&mut self, melody: u8) {
        self.write(CommandFrame::melody(target::LOCAL, melody.wrapping_sub(1)))
            .await;
    }

    /// Set the local bank's servo travel speed step.
    pub async fn set_speed(&mut self, step: u8) {
        self.write(CommandFrame::speed(target::LOCAL, step)).await;
    }

    /// Set the remote bank's servo travel speed step.
    pub async fn remote_set_speed(&mut self, step: u8) {
        self.write(CommandFrame::speed(target::REMOTE, step)).await;
    }

    /// Move one local servo (`1..=6`) to an angle in degrees.
    pub async fn set_angle(&mut self, servo: usize, degrees: i32) {
        self.write(CommandFrame::servo_angles(
            target::LOCAL,
            one_servo(servo, degrees),
        ))
        .await;
    }

    /// Move one remote servo (`1..=6`) to an angle in degrees.
    pub async fn remote_set_angle(&mut self, servo: usize, degrees: i32) {
        self.write(CommandFrame::servo_angles(
            target::REMOTE,
            one_servo(servo, degrees),
        ))
        .await;
    }

    /// Move local servos 1..3 together.
    pub async fn set_angles_123(&mut self, d1: i32, d2: i32, d3: i32) {
        let slots = encoded_slots([Some(d1), Some(d2), Some(d3), None, None, None]);
        self.write(CommandFrame::servo_angles(target::LOCAL, slots))
            .await;
    }

    /// Move remote servos 1..3 together.
    pub async fn remote_set_angles_123(&mut self, d1: i32, d2: i32, d3: i32) {
        let slots = encoded_slots([Some(d1), Some(d2), Some(d3), None, None, None]);
        self.write(CommandFrame::servo_angles(target::REMOTE, slots))
            .await;
    }

    /// Move local servos 1..4 together.
    pub async fn set_angles_1234(&mut self, d1: i32, d2: i32, d3: i32, d4: i32) {
        let slots = encoded_slots([Some(d1), Some(d2), Some(d3), Some(d4), None, None]);
        self.write(CommandFrame::servo_angles(target::LOCAL, slots))
            .await;
    }

    /// Move remote servos 1..4 together.
    pub async fn remote_set_angles_1234(&mut self, d1: i32, d2: i32, d3: i32, d4: i32) {
        let slots = encoded_slots([Some(d1), Some(d2), Some(d3), Some(d4), None, None]);
        self.write(CommandFrame::servo_angles(target::REMOTE, slots))
            .await;
    }

    /// Move local servos 5 and 6 together.
    pub async fn set_angles_56(&mut self, d5: i32, d6: i32) {
        let slots = encoded_slots([None, None, None, None, Some(d5), Some(d6)]);
        self.write(CommandFrame::servo_angles(target::LOCAL, slots))
            .await;
    }

    /// Move remote servos 5 and 6 together.
    pub async fn remote_set_angles_56(&mut self, d5: i32, d6: i32) {
        let slots = encoded_slots([None, None, None, None, Some(d5), Some(d6)]);
        self.write(CommandFrame::servo_angles(target::REMOTE, slots))
            .await;
    }

    /// Move all six local servos at once.
    pub async fn set_angles_all(&mut self, degrees: [i32; 6]) {
        let slots = encoded_slots(degrees.map(Some));
        self.write(CommandFrame::servo_angles(target::LOCAL, slots))
            .await;
    }

    /// Move all six remote servos at once.
    pub async fn remote_set_angles_all(&mut self, degrees: [i32; 6]) {
        let slots = encoded_slots(degrees.map(Some));
        self.write(CommandFrame::servo_angles(target::REMOTE, slots))
            .await;
    }

    /// Return the local bank to its stored home posture.
    pub async fn go_home(&mut self) {
        self.write(CommandFrame::go_home(target::LOCAL)).await;
    }

    /// Return the remote bank to its stored home posture.
    pub async fn remote_go_home(&mut self) {
        self.write(CommandFrame::go_home(target::REMOTE)).await;
    }

    /// Capture one servo's (`1..=6`) current posture as its home position.
    pub async fn calibrate_home(&mut self, servo: usize) {
        let mut flags = [0u16; 6];
        if let Some(flag) = servo.checked_sub(1).and_then(|i| flags.get_mut(i)) {
            *flag = 1;
        }
        self.write(CommandFrame::home_position(flags)).await;
    }

    /// Reset stored servo settings to factory defaults.
    ///
    /// The firmware routes this through the remote bank regardless of
    /// which bank is affected.
    pub async fn factory_reset(&mut self) {
        self.write(CommandFrame::factory_reset(target::REMOTE)).await;
    }

    /// Pair the remote servo bank with this controller.
    pub async fn pair_remote(&mut self) {
        self.write(CommandFrame::remote_pair(target::REMOTE, 1, 1, 1))
            .await;
    }

    /// Read an AIDesk value slot, 1-based (`1..=6`).
    pub fn desk_value(&self, slot: usize) -> i32 {
        match slot.checked_sub(1) {
            Some(index) => self.sensors().desk(index),
            None => 0,
        }
    }

    /// Start a numbered AIDesk function with four signed arguments,
    /// each clamped to `-2000..=2000`.
    pub async fn start_desk_function(&mut self, func: u8, values: [i32; 4]) {
        let encoded = values.map(encode_signed);
        self.write(CommandFrame::desk_function(target::LOCAL, func, encoded))
            .await;
    }

    /// Stop a numbered AIDesk function.
    pub async fn stop_desk_function(&mut self, func: u8) {
        self.write(CommandFrame::desk_function(target::REMOTE, func, [0; 4]))
            .await;
    }
}
