//! Bit-level transmitter
//!
//! Drives the line through the fixed-timing bit sequence: per frame byte
//! one start bit (LOW), 8 data bits LSB-first, two stop bits (HIGH);
//! after the last byte one frame-wide parity bit; then the line returns
//! to its HIGH idle state.
//!
//! Transmission is blocking by design: the sender owns the line for the
//! whole frame and has nothing else to do with it meanwhile. The
//! receiver's sampling schedule is derived from exactly this timing, so
//! the discipline here must not change independently.

use bitlink_hal::{Delay, OutputPin};

use crate::timing::BitTiming;

/// A pin that can be both driven and held for a bit period
pub trait TxLine: OutputPin + Delay {}

impl<T: OutputPin + Delay> TxLine for T {}

/// Fixed-rate frame transmitter owning the line
#[derive(Debug)]
pub struct Transmitter<L: TxLine> {
    line: L,
    timing: BitTiming,
}

impl<L: TxLine> Transmitter<L> {
    /// Create a transmitter and put the line into its idle state
    pub fn new(mut line: L, timing: BitTiming) -> Self {
        line.set_high();
        Self { line, timing }
    }

    /// Borrow the timing configuration
    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    /// Release the line
    pub fn release(self) -> L {
        self.line
    }

    /// Transmit one encoded wire frame, blocking for its full duration.
    ///
    /// `wire` is the output of the frame codec; this layer treats it as
    /// opaque bytes. Data bits go out LSB-first. The parity accumulator
    /// counts HIGH data bits across the entire frame (header, payload
    /// and checksum bytes alike); start and stop bits are not counted.
    pub fn send_frame(&mut self, wire: &[u8]) {
        let bit_ms = self.timing.bit_ms;
        let mut ones_sent: u32 = 0;

        for &byte in wire {
            // Start bit
            self.line.set_low();
            self.line.delay_ms(bit_ms);

            // 8 data bits, LSB first
            for bit in 0..8 {
                let level = (byte >> bit) & 0x01 != 0;
                self.line.set_state(level);
                if level {
                    ones_sent += 1;
                }
                self.line.delay_ms(bit_ms);
            }

            // Two stop bits; the second gives the receiver slack to
            // finish committing the byte before the next start edge
            self.line.set_high();
            self.line.delay_ms(bit_ms * 2);
        }

        // Frame parity bit: HIGH when the count of HIGH data bits is odd
        self.line.set_state(ones_sent % 2 != 0);
        self.line.delay_ms(bit_ms);

        // Final stop bit, then the line rests HIGH. The receiver samples
        // this position one bit after the parity bit, so it must be held
        // even when another frame follows immediately.
        self.line.set_high();
        self.line.delay_ms(bit_ms);
    }
}
