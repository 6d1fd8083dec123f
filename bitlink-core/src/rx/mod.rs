//! Bit-level receiver
//!
//! Recovers bytes from the line without a clock signal: synchronizes to
//! the falling start edge, samples at bit centers, validates framing and
//! the frame-wide parity bit, and recovers after desynchronization.

pub mod machine;
pub mod recovery;

pub use machine::{Receiver, RxEvent, RxState, SyncError};
pub use recovery::{LineRecovery, QUIET_WINDOW_MS};
