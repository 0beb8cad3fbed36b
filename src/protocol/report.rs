//! Inbound status report extraction and decoding.
//!
//! The board streams two report shapes back over the serial bridge:
//!
//! ```text
//! I-class, 28 bytes                            X-class, 14 bytes
//! ┌────┬───┬─────────────────┬────┬───┬─────────────────┐  ┌────┬───┬──────────────┐
//! │ 73 │ 1 │ local bank      │ 73 │ 2 │ remote bank     │  │ 88 │ 1 │ six BE int16 │
//! │    │   │ 4×u8 + 4×u16 BE │    │   │ 4×u8 + 4×u16 BE │  │    │   │ AIDesk vals  │
//! └────┴───┴─────────────────┴────┴───┴─────────────────┘  └────┴───┴──────────────┘
//! ```
//!
//! Reports arrive embedded in whatever else the bridge buffered, so
//! extraction scans for a header pair and slices fixed-size windows out of
//! the payload. The remote-bank block never starts a report of its own; it
//! is only valid at offset 14 inside an I-class window.
//!
//! Decoding applies a single report per payload - the board publishes at
//! most one meaningful report per bridge message, and later windows in the
//! same payload are echoes.

use bytes::Bytes;

use crate::sensors::SensorTable;

/// Size of an I-class report (both sensor banks).
pub const REPORT_I_SIZE: usize = 28;

/// Size of an X-class report (AIDesk values).
pub const REPORT_X_SIZE: usize = 14;

/// First header byte of an I-class report.
pub const HEADER_I: u8 = 73;

/// First header byte of an X-class report.
pub const HEADER_X: u8 = 88;

/// Offset of the remote-bank block inside an I-class report.
const REMOTE_BANK_OFFSET: usize = 14;

/// AIDesk values outside the open interval (-2000, 2000) are discarded.
const DESK_RANGE: i32 = 2000;

/// What applying a report changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Nothing recognizable; the table is untouched.
    None,
    /// Sensor banks updated; `remote_bank` tells whether the offset-14
    /// block was present and decoded too.
    Sensors { remote_bank: bool },
    /// AIDesk slots updated (in-range values only).
    Desk,
}

/// Scan a raw payload and slice out every framed report in it.
///
/// Windows are zero-copy slices of `buf`. The scan advances past each
/// emitted window; a header whose window would overrun the payload emits
/// nothing and the scan resumes one byte later.
pub fn extract_frames(buf: &Bytes) -> Vec<Bytes> {
    let mut frames = Vec::new();
    let mut idx = 0;

    while idx + 1 < buf.len() {
        let window = match (buf[idx], buf[idx + 1]) {
            (HEADER_I, 1) => REPORT_I_SIZE,
            (HEADER_X, 1) => REPORT_X_SIZE,
            _ => {
                idx += 1;
                continue;
            }
        };
        if buf.len() - idx < window {
            idx += 1;
            continue;
        }
        frames.push(buf.slice(idx..idx + window));
        idx += window;
    }

    frames
}

/// Decode one extracted report into the sensor table.
///
/// Unrecognized data leaves the table untouched and reports
/// [`Applied::None`].
pub fn apply(frame: &[u8], table: &mut SensorTable) -> Applied {
    if frame.len() >= REPORT_I_SIZE && frame[0] == HEADER_I && frame[1] == 1 {
        for i in 0..4 {
            table.set_sensor(i, i32::from(frame[2 + i]));
        }
        for i in 0..4 {
            let raw = u16::from_be_bytes([frame[6 + 2 * i], frame[7 + 2 * i]]);
            table.set_sensor(4 + i, i32::from(raw));
        }

        let remote_bank =
            frame[REMOTE_BANK_OFFSET] == HEADER_I && frame[REMOTE_BANK_OFFSET + 1] == 2;
        if remote_bank {
            for i in 0..4 {
                table.set_sensor(8 + i, i32::from(frame[16 + i]));
            }
            for i in 0..4 {
                let raw = u16::from_be_bytes([frame[20 + 2 * i], frame[21 + 2 * i]]);
                table.set_sensor(12 + i, i32::from(raw));
            }
        }
        return Applied::Sensors { remote_bank };
    }

    if frame.len() >= REPORT_X_SIZE && frame[0] == HEADER_X && frame[1] == 1 {
        for i in 0..6 {
            let raw = i32::from(u16::from_be_bytes([frame[2 + 2 * i], frame[3 + 2 * i]]));
            let value = if raw > 32767 { raw - 65536 } else { raw };
            // Out-of-range values are discarded; the stale slot survives.
            if value > -DESK_RANGE && value < DESK_RANGE {
                table.set_desk(i, value);
            }
        }
        return Applied::Desk;
    }

    Applied::None
}

/// Decode a raw payload: extract its reports and apply the first.
pub fn apply_payload(buf: &Bytes, table: &mut SensorTable) -> Applied {
    match extract_frames(buf).first() {
        Some(frame) => apply(frame, table),
        None => Applied::None,
    }
}
