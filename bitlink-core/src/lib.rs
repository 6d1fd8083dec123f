//! Board-agnostic link layer for the bitlink GPIO protocol
//!
//! This crate contains everything between the frame codec
//! (`bitlink-protocol`) and the physical pin (`bitlink-hal`):
//!
//! - Bit-level transmitter (blocking, fixed-rate bit banging)
//! - Bit-level receiver state machine (non-blocking, poll driven)
//! - Line recovery after desynchronization
//! - Command dispatcher and statistics counters
//! - Indicator blinker serviced by the same cooperative loop
//! - Simulated line for host testing
//!
//! The receiver never blocks: each poll does O(1) work against a
//! caller-supplied millisecond timestamp, so the host loop can interleave
//! reception with other periodic duties such as the indicator blinker.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod blink;
pub mod dispatch;
pub mod rx;
pub mod session;
pub mod sim;
pub mod stats;
pub mod timing;
pub mod tx;

pub use blink::Blinker;
pub use dispatch::{Dispatcher, Render};
pub use rx::{Receiver, RxEvent, SyncError};
pub use session::LinkSession;
pub use stats::{BurstReport, Counters, LinkStats, BURST_SIZE};
pub use timing::{BitTiming, DEFAULT_BIT_RATE_BPS};
pub use tx::Transmitter;
