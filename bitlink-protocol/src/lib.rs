//! Bitlink wire protocol
//!
//! This crate defines the frame format carried over the single-wire GPIO
//! link between the sender (e.g. a Raspberry Pi) and the receiver (e.g.
//! an ESP32). It is pure byte manipulation: no pins and no timing.
//!
//! # Frame layout
//!
//! ```text
//! ┌──────────┬──────────┬─────────────┬──────────┬──────────┐
//! │ CMD<<2   │ LEN<<1   │ PAYLOAD     │ FCS high │ FCS low  │
//! │ 1B       │ 1B       │ 0–63B       │ 1B       │ 1B       │
//! └──────────┴──────────┴─────────────┴──────────┴──────────┘
//! ```
//!
//! The command occupies 4 bits of byte 0 (shifted left 2) and the payload
//! length 6 bits of byte 1 (shifted left 1). The FCS is the count of set
//! bits over the header and payload, stored big-endian. A bit-count
//! checksum is deliberately simple and deliberately weak: it misses any
//! corruption that preserves total weight. See [`frame::bit_weight`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod frame;

pub use command::Command;
pub use frame::{
    decode, unpack_command, unpack_length, Frame, FrameError, CHECKSUM_SIZE, HEADER_SIZE,
    MAX_PAYLOAD_SIZE, MAX_WIRE_SIZE, OVERHEAD_BYTES,
};
