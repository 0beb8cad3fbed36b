//! Protocol module - command encoding and report decoding.
//!
//! This module implements the binary protocol for the board link:
//! - 14-byte command frame encoding
//! - Report extraction from raw bridge payloads
//! - Report decoding into the sensor table

mod command;
mod report;

pub use command::{encode_angle, encode_signed, opcode, target, CommandFrame, COMMAND_SIZE, PAD};
pub use report::{
    apply, apply_payload, extract_frames, Applied, HEADER_I, HEADER_X, REPORT_I_SIZE,
    REPORT_X_SIZE,
};
