//! Bit timing shared by transmitter and receiver
//!
//! Both ends must be configured with the same bit period; there is no
//! clock line and no autobauding.

/// Default link speed in bits per second.
///
/// 10 bit/s (100 ms per bit) is extremely slow on purpose. The two ends
/// run free clocks, and the sender side typically lives on a
/// general-purpose OS whose scheduler can stall a bit-bang loop for
/// milliseconds at a time. At this rate, jitter and clock drift stay
/// well inside the half-bit sampling margin; faster rates were observed
/// to fail intermittently on real hardware.
pub const DEFAULT_BIT_RATE_BPS: u32 = 10;

/// Bits on the wire per frame byte: 1 start + 8 data + 2 stop
pub const BITS_PER_BYTE: u32 = 11;

/// Fixed per-bit timing for one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    /// Duration of one bit in milliseconds
    pub bit_ms: u32,
}

impl BitTiming {
    /// Timing for a given bit rate
    pub const fn from_bit_rate(bps: u32) -> Self {
        Self { bit_ms: 1000 / bps }
    }

    /// Half of one bit period, used to center the first sample
    pub const fn half_bit_ms(&self) -> u32 {
        self.bit_ms / 2
    }

    /// Total transmission time for a wire frame of `wire_len` bytes.
    ///
    /// Each byte costs 11 bit periods; the trailing frame parity bit and
    /// the return to idle add two more.
    pub const fn frame_duration_ms(&self, wire_len: usize) -> u64 {
        (wire_len as u64 * BITS_PER_BYTE as u64 + 2) * self.bit_ms as u64
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::from_bit_rate(DEFAULT_BIT_RATE_BPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate() {
        let timing = BitTiming::default();
        assert_eq!(timing.bit_ms, 100);
        assert_eq!(timing.half_bit_ms(), 50);
    }

    #[test]
    fn test_frame_duration() {
        let timing = BitTiming::from_bit_rate(10);
        // Empty-payload frame: 4 bytes * 11 bits + parity + final stop
        assert_eq!(timing.frame_duration_ms(4), 4600);
    }
}
