//! Line recovery after desynchronization
//!
//! A receiver that lost byte alignment mid-frame could mistake the tail
//! of the corrupted transmission for a fresh start edge and cascade
//! failures. Before re-arming, the line must therefore be observed
//! continuously HIGH for a full quiescence window; any LOW sample
//! restarts the wait.

use bitlink_hal::InputPin;

/// Required continuous line-HIGH time before the receiver re-arms
pub const QUIET_WINDOW_MS: u32 = 1000;

/// Poll-driven quiescence wait
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRecovery {
    quiet_since_ms: u64,
}

impl LineRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh quiescence window at `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.quiet_since_ms = now_ms;
    }

    /// One recovery step. Returns true once the line has been HIGH for
    /// the full window; a LOW sample restarts it. O(1), never blocks.
    pub fn poll<L: InputPin>(&mut self, now_ms: u64, line: &L) -> bool {
        if line.is_low() {
            self.quiet_since_ms = now_ms;
            return false;
        }
        now_ms - self.quiet_since_ms >= QUIET_WINDOW_MS as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ReplayLine;

    #[test]
    fn test_quiet_line_completes_after_window() {
        let line = ReplayLine::from_transitions(&[]);
        let mut recovery = LineRecovery::new();
        recovery.start(100);

        line.set_now(1099);
        assert!(!recovery.poll(1099, &line));
        line.set_now(1100);
        assert!(recovery.poll(1100, &line));
    }

    #[test]
    fn test_activity_restarts_window() {
        // Line dips LOW at t=500 for 10 ms
        let line = ReplayLine::from_transitions(&[(500, false), (510, true)]);
        let mut recovery = LineRecovery::new();
        recovery.start(0);

        for t in 0..1505 {
            line.set_now(t);
            assert!(!recovery.poll(t, &line), "completed early at t={t}");
        }

        // Window restarted at the last LOW sample (t=509)
        line.set_now(1509);
        assert!(recovery.poll(1509, &line));
    }
}
