//! Reception statistics
//!
//! Counters are split between burst-test traffic (command 1) and
//! everything else, so the burst test can measure detection rates
//! without the regular traffic skewing the percentages.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Burst test window size: percentages are reported and the burst
/// counters reset once this many burst frames have arrived
pub const BURST_SIZE: u32 = 10;

/// One class of traffic: successes plus the two failure classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Counters {
    /// Frames that passed framing, parity and checksum
    pub ok: u32,
    /// Frames with correct framing but a checksum mismatch (detected
    /// corruption)
    pub checksum_errors: u32,
    /// Framing or frame-parity failures; command identity unknown
    pub sync_errors: u32,
}

impl Counters {
    /// Total frames recorded in this class
    pub fn total(&self) -> u32 {
        self.ok + self.checksum_errors + self.sync_errors
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// All link statistics: burst-test traffic vs the rest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkStats {
    /// Burst test frames (command 1)
    pub burst: Counters,
    /// All other frames
    pub normal: Counters,
}

/// Percentages over one completed burst window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BurstReport {
    /// Frames in the window
    pub total: u32,
    /// Received intact
    pub ok_pct: f32,
    /// Corruption detected by the checksum
    pub detected_pct: f32,
    /// Framing/parity failures (corruption the checksum never saw)
    pub undetected_pct: f32,
}

impl LinkStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame whose header was framed correctly.
    ///
    /// `burst` selects the traffic class; `checksum_ok` the outcome.
    /// Returns a report when this record completes a burst window, in
    /// which case the burst counters have been reset.
    pub fn record_frame(&mut self, burst: bool, checksum_ok: bool) -> Option<BurstReport> {
        let class = if burst {
            &mut self.burst
        } else {
            &mut self.normal
        };
        if checksum_ok {
            class.ok += 1;
        } else {
            class.checksum_errors += 1;
        }
        self.close_burst_window()
    }

    /// Record a synchronization failure (framing or frame parity).
    ///
    /// An aborted frame never reveals its command, so sync errors always
    /// count against the normal class and never close a burst window.
    pub fn record_sync_error(&mut self) -> Option<BurstReport> {
        self.normal.sync_errors += 1;
        None
    }

    fn close_burst_window(&mut self) -> Option<BurstReport> {
        let total = self.burst.total();
        if total < BURST_SIZE {
            return None;
        }

        let pct = |n: u32| n as f32 / total as f32 * 100.0;
        let report = BurstReport {
            total,
            ok_pct: pct(self.burst.ok),
            detected_pct: pct(self.burst.checksum_errors),
            undetected_pct: pct(self.burst.sync_errors),
        };
        self.burst.reset();
        Some(report)
    }
}
