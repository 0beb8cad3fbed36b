//! Outbound command frame encoding.
//!
//! Every command to the board is exactly 14 bytes:
//! ```text
//! ┌────────┬────────┬───────────────────────────────┐
//! │ Opcode │ Target │ Body                          │
//! │ 1 byte │ 1 byte │ 12 bytes, op-specific, padded │
//! └────────┴────────┴───────────────────────────────┘
//! ```
//!
//! Unused body slots carry the filler byte 255; the announce frame is the
//! one exception and pads with zeros. Multi-byte values are Big Endian.

/// Command frame size in bytes (fixed, exactly 14).
pub const COMMAND_SIZE: usize = 14;

/// Filler byte for unused body slots.
pub const PAD: u8 = 255;

/// Opcode constants (ASCII mnemonics the firmware matches on).
pub mod opcode {
    /// 'A' - announce this controller to the board.
    pub const ANNOUNCE: u8 = 65;
    /// 'B' - drive the six servo modules to encoded angles.
    pub const SET_ANGLE: u8 = 66;
    /// 'C' - calibration: factory reset (zero body) or home-position capture (flag body).
    pub const CALIBRATE: u8 = 67;
    /// 'D' - set a digital output port level.
    pub const DIGITAL_OUT: u8 = 68;
    /// 'H' - return all modules to the stored home posture.
    pub const GO_HOME: u8 = 72;
    /// 'K' - start or stop a numbered AIDesk function.
    pub const DESK_FUNCTION: u8 = 75;
    /// 'M' - play a built-in buzzer melody.
    pub const MELODY: u8 = 77;
    /// 'P' - configure a port as digital in, digital out, or analog in.
    pub const PORT_MODE: u8 = 80;
    /// 'S' - set the servo travel speed step.
    pub const SPEED: u8 = 83;
    /// 'Z' - pair the remote servo bank.
    pub const REMOTE_PAIR: u8 = 90;
}

/// Target identifiers (byte 1 of every frame).
pub mod target {
    /// Servo bank wired directly to the controller.
    pub const LOCAL: u8 = 1;
    /// Servo bank reached over the board's RF bridge.
    pub const REMOTE: u8 = 2;
    /// All modules at once; used by home-position capture.
    pub const BROADCAST: u8 = 4;
}

/// Encode a servo angle in degrees into the firmware's pulse units.
///
/// Angles clamp to `0..=180`; the wire value is `degrees * 10 + 700`,
/// spanning `700..=2500`.
///
/// # Example
///
/// ```
/// use aibot_link::protocol::encode_angle;
///
/// assert_eq!(encode_angle(90), 1600);
/// assert_eq!(encode_angle(90).to_be_bytes(), [6, 64]);
/// ```
pub fn encode_angle(degrees: i32) -> u16 {
    let clamped = degrees.clamp(0, 180);
    (clamped * 10 + 700) as u16
}

/// Encode a signed AIDesk argument as the firmware's 16-bit representation.
///
/// Values clamp to `-2000..=2000`; negatives wrap two's-complement.
pub fn encode_signed(value: i32) -> u16 {
    let clamped = value.clamp(-2000, 2000);
    if clamped < 0 {
        (clamped + 65536) as u16
    } else {
        clamped as u16
    }
}

/// A fixed 14-byte outbound command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame([u8; COMMAND_SIZE]);

impl CommandFrame {
    /// Frame with opcode and target set, body filled with [`PAD`].
    fn padded(opcode: u8, target: u8) -> Self {
        let mut raw = [PAD; COMMAND_SIZE];
        raw[0] = opcode;
        raw[1] = target;
        Self(raw)
    }

    /// Set a digital output port to the given level.
    pub fn digital_out(target: u8, port: u8, level: u8) -> Self {
        let mut frame = Self::padded(opcode::DIGITAL_OUT, target);
        frame.0[2] = port;
        frame.0[3] = level;
        frame
    }

    /// Configure a port's mode (digital in, digital out, analog in).
    pub fn port_mode(target: u8, port: u8, mode: u8) -> Self {
        let mut frame = Self::padded(opcode::PORT_MODE, target);
        frame.0[2] = port;
        frame.0[3] = mode;
        frame
    }

    /// Play a built-in buzzer melody (wire index, zero-based).
    pub fn melody(target: u8, index: u8) -> Self {
        let mut frame = Self::padded(opcode::MELODY, target);
        frame.0[2] = index;
        frame.0[3] = 0;
        frame.0[4] = 0;
        frame
    }

    /// Set the servo travel speed step.
    pub fn speed(target: u8, step: u8) -> Self {
        let mut frame = Self::padded(opcode::SPEED, target);
        frame.0[2] = step;
        frame.0[3] = 0;
        frame.0[4] = 0;
        frame
    }

    /// Return all modules of the target bank to their home posture.
    pub fn go_home(target: u8) -> Self {
        let mut frame = Self::padded(opcode::GO_HOME, target);
        frame.0[2] = 0;
        frame.0[3] = 0;
        frame.0[4] = 0;
        frame
    }

    /// Reset the target bank's stored settings to factory defaults.
    pub fn factory_reset(target: u8) -> Self {
        let mut frame = Self::padded(opcode::CALIBRATE, target);
        frame.0[2] = 0;
        frame.0[3] = 0;
        frame.0[4] = 0;
        frame
    }

    /// Capture the current posture as home for the flagged modules.
    ///
    /// One `1` per module to capture, `0` elsewhere; always broadcast.
    pub fn home_position(flags: [u16; 6]) -> Self {
        let mut frame = Self::padded(opcode::CALIBRATE, target::BROADCAST);
        put_wide(&mut frame.0, 2, &flags);
        frame
    }

    /// Drive the six servo modules to pre-encoded angles.
    ///
    /// Slots carry [`encode_angle`] values; a zero leaves that module alone.
    pub fn servo_angles(target: u8, encoded: [u16; 6]) -> Self {
        let mut frame = Self::padded(opcode::SET_ANGLE, target);
        put_wide(&mut frame.0, 2, &encoded);
        frame
    }

    /// Pair the remote servo bank.
    pub fn remote_pair(target: u8, v1: u8, v2: u8, v3: u8) -> Self {
        let mut frame = Self::padded(opcode::REMOTE_PAIR, target);
        frame.0[2] = v1;
        frame.0[3] = v2;
        frame.0[4] = v3;
        frame
    }

    /// Start or stop a numbered AIDesk function with four encoded arguments.
    pub fn desk_function(target: u8, func: u8, values: [u16; 4]) -> Self {
        let mut frame = Self::padded(opcode::DESK_FUNCTION, target);
        frame.0[2] = func;
        frame.0[3] = 0;
        put_wide(&mut frame.0, 4, &values);
        frame
    }

    /// Announce this controller to the board.
    ///
    /// The one frame padded with zeros instead of [`PAD`].
    pub fn announce(target: u8) -> Self {
        let mut raw = [0u8; COMMAND_SIZE];
        raw[0] = opcode::ANNOUNCE;
        raw[1] = target;
        Self(raw)
    }

    /// Opcode byte.
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.0[0]
    }

    /// Target byte.
    #[inline]
    pub fn target(&self) -> u8 {
        self.0[1]
    }

    /// The raw 14 wire bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; COMMAND_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Write Big Endian u16 values into consecutive byte pairs from `offset`.
fn put_wide(raw: &mut [u8; COMMAND_SIZE], offset: usize, values: &[u16]) {
    for (i, value) in values.iter().enumerate() {
        let [hi, lo] = value.to_be_bytes();
        raw[offset + 2 * i] = hi;
        raw[offset + 2 * i + 1] = lo;
    }
}
