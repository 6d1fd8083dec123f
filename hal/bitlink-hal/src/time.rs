//! Time abstractions
//!
//! The link runs at millisecond granularity: at 10 bit/s one bit lasts
//! 100 ms, so a millisecond clock leaves ample sampling margin.

/// Blocking millisecond delay
///
/// Used only on the transmit side, which owns the line for the duration
/// of a frame. The receive side never blocks; it compares timestamps
/// passed into each poll instead.
pub trait Delay {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
