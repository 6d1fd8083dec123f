//! Periodic indicator blinker
//!
//! Serviced by the same cooperative loop that polls the receiver, which
//! is the whole reason the receiver must never block: a frame takes
//! seconds to arrive at 10 bit/s and the indicator has to keep blinking
//! throughout.

use bitlink_hal::OutputPin;

/// Lowest accepted blink frequency
pub const MIN_BLINK_HZ: u32 = 1;
/// Highest accepted blink frequency
pub const MAX_BLINK_HZ: u32 = 100;

const DEFAULT_BLINK_HZ: u32 = 1;

/// Indicator blink scheduler
#[derive(Debug, Clone, Copy)]
pub struct Blinker {
    enabled: bool,
    frequency_hz: u32,
    last_toggle_ms: u64,
}

impl Default for Blinker {
    fn default() -> Self {
        Self::new()
    }
}

impl Blinker {
    /// New blinker, disabled, at the default 1 Hz
    pub fn new() -> Self {
        Self {
            enabled: false,
            frequency_hz: DEFAULT_BLINK_HZ,
            last_toggle_ms: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Flip the enabled state; the pin is forced LOW when disabling so
    /// the indicator does not stay lit mid-cycle
    pub fn toggle_enabled<P: OutputPin>(&mut self, pin: &mut P) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            pin.set_low();
        }
        self.enabled
    }

    /// Set the blink frequency; values outside 1-100 Hz are rejected
    pub fn set_frequency(&mut self, hz: u32) -> bool {
        if !(MIN_BLINK_HZ..=MAX_BLINK_HZ).contains(&hz) {
            return false;
        }
        self.frequency_hz = hz;
        true
    }

    /// Service the blinker: toggle the pin when half a blink period has
    /// elapsed. O(1), never blocks.
    pub fn poll<P: OutputPin>(&mut self, now_ms: u64, pin: &mut P) {
        if !self.enabled {
            return;
        }

        let half_period_ms = (1000 / self.frequency_hz / 2) as u64;

        // Below the millisecond tick the toggle cadence is meaningless;
        // hold the pin HIGH instead
        if half_period_ms <= 1 {
            pin.set_high();
            return;
        }

        if now_ms - self.last_toggle_ms >= half_period_ms {
            self.last_toggle_ms = now_ms;
            pin.toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPin;

    #[test]
    fn test_disabled_blinker_is_silent() {
        let mut blinker = Blinker::new();
        let mut pin = SimPin::new();

        for t in 0..5000 {
            blinker.poll(t, &mut pin);
        }
        assert_eq!(pin.toggles, 0);
    }

    #[test]
    fn test_blinks_at_one_hz() {
        let mut blinker = Blinker::new();
        let mut pin = SimPin::new();
        blinker.toggle_enabled(&mut pin);

        // 1 Hz -> toggle every 500 ms -> 10 toggles in 5 s
        for t in 1..=5000 {
            blinker.poll(t, &mut pin);
        }
        assert_eq!(pin.toggles, 10);
    }

    #[test]
    fn test_frequency_bounds() {
        let mut blinker = Blinker::new();
        assert!(blinker.set_frequency(1));
        assert!(blinker.set_frequency(100));
        assert!(!blinker.set_frequency(0));
        assert!(!blinker.set_frequency(101));
        assert_eq!(blinker.frequency_hz(), 100);
    }

    #[test]
    fn test_disable_forces_pin_low() {
        let mut blinker = Blinker::new();
        let mut pin = SimPin::new();

        blinker.toggle_enabled(&mut pin);
        for t in 1..=700 {
            blinker.poll(t, &mut pin);
        }
        assert!(pin.is_set_high());

        blinker.toggle_enabled(&mut pin);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_fastest_frequency_still_toggles() {
        let mut blinker = Blinker::new();
        let mut pin = SimPin::new();
        blinker.toggle_enabled(&mut pin);
        // 100 Hz -> half period 5 ms, still toggling
        blinker.set_frequency(100);
        for t in 1..=100 {
            blinker.poll(t, &mut pin);
        }
        assert!(pin.toggles >= 19);
    }
}
