//! Simulated line for host testing
//!
//! No hardware is involved anywhere in this workspace's tests: the
//! transmitter records its level transitions against a virtual clock,
//! and the receiver replays them at poll time. Custom (corrupted)
//! waveforms can be bit-banged directly onto a [`RecordingLine`] since
//! it implements the same pin traits real hardware would.

use core::cell::Cell;

use heapless::{String, Vec};

use bitlink_hal::{Delay, InputPin, OutputPin};

use crate::dispatch::Render;

/// Maximum recorded level transitions.
///
/// A full 67-byte frame occupies 739 bit periods, so even a waveform
/// alternating on every bit fits.
pub const MAX_TRANSITIONS: usize = 1024;

/// Output pin plus virtual clock that records every level change
#[derive(Debug, Clone, Default)]
pub struct RecordingLine {
    now_ms: u64,
    level: bool,
    transitions: Vec<(u64, bool), MAX_TRANSITIONS>,
}

impl RecordingLine {
    /// New line, idle HIGH at t = 0
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            level: true,
            transitions: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Level of the line at virtual time `t`
    pub fn level_at(&self, t: u64) -> bool {
        self.transitions
            .iter()
            .rev()
            .find(|(at, _)| *at <= t)
            .map(|(_, level)| *level)
            .unwrap_or(true)
    }

    /// Recorded transitions, in time order
    pub fn transitions(&self) -> &[(u64, bool)] {
        &self.transitions
    }

    fn drive(&mut self, level: bool) {
        if self.level != level {
            self.level = level;
            // Capacity is sized for the longest legal frame
            let _ = self.transitions.push((self.now_ms, level));
        }
    }
}

impl OutputPin for RecordingLine {
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn toggle(&mut self) {
        let level = self.level;
        self.drive(!level);
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

impl Delay for RecordingLine {
    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += ms as u64;
    }
}

/// Input pin replaying a recorded waveform at a settable virtual time
#[derive(Debug, Clone)]
pub struct ReplayLine {
    transitions: Vec<(u64, bool), MAX_TRANSITIONS>,
    now_ms: Cell<u64>,
}

impl ReplayLine {
    /// Replay a transmission captured on a [`RecordingLine`]
    pub fn new(recording: &RecordingLine) -> Self {
        Self {
            transitions: recording.transitions.clone(),
            now_ms: Cell::new(0),
        }
    }

    /// Replay an explicit transition list (for hand-built waveforms)
    pub fn from_transitions(transitions: &[(u64, bool)]) -> Self {
        let mut vec = Vec::new();
        let _ = vec.extend_from_slice(transitions);
        Self {
            transitions: vec,
            now_ms: Cell::new(0),
        }
    }

    /// Advance the replay clock; subsequent pin reads see the line as it
    /// was at time `t`
    pub fn set_now(&self, t: u64) {
        self.now_ms.set(t);
    }

    fn level_at(&self, t: u64) -> bool {
        self.transitions
            .iter()
            .rev()
            .find(|(at, _)| *at <= t)
            .map(|(_, level)| *level)
            .unwrap_or(true)
    }
}

impl InputPin for ReplayLine {
    fn is_high(&self) -> bool {
        self.level_at(self.now_ms.get())
    }
}

/// Indicator pin double that counts toggles
#[derive(Debug, Clone, Copy, Default)]
pub struct SimPin {
    level: bool,
    /// Number of level changes observed
    pub toggles: u32,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputPin for SimPin {
    fn set_high(&mut self) {
        if !self.level {
            self.toggles += 1;
        }
        self.level = true;
    }

    fn set_low(&mut self) {
        if self.level {
            self.toggles += 1;
        }
        self.level = false;
    }

    fn toggle(&mut self) {
        self.level = !self.level;
        self.toggles += 1;
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

/// Render collaborator double capturing everything the dispatcher shows
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    /// Rendered lines, oldest first; capped, extra lines are dropped
    pub lines: Vec<String<128>, 32>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered line, if any
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(|s| s.as_str())
    }
}

impl Render for RecordingConsole {
    fn render(&mut self, text: &str) {
        let mut line = String::new();
        for ch in text.chars().take(128) {
            if line.push(ch).is_err() {
                break;
            }
        }
        let _ = self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_line_levels() {
        let mut line = RecordingLine::new();
        assert!(line.level_at(0));

        line.set_low();
        line.delay_ms(10);
        line.set_high();
        line.delay_ms(5);

        assert!(!line.level_at(0));
        assert!(!line.level_at(9));
        assert!(line.level_at(10));
        assert_eq!(line.now_ms(), 15);
    }

    #[test]
    fn test_replay_line_follows_clock() {
        let mut line = RecordingLine::new();
        line.delay_ms(20);
        line.set_low();
        line.delay_ms(10);
        line.set_high();

        let replay = ReplayLine::new(&line);
        replay.set_now(5);
        assert!(replay.is_high());
        replay.set_now(25);
        assert!(replay.is_low());
        replay.set_now(31);
        assert!(replay.is_high());
    }

    #[test]
    fn test_sim_pin_counts_toggles() {
        let mut pin = SimPin::new();
        pin.set_high();
        pin.set_high(); // no change, no count
        pin.set_low();
        pin.toggle();
        assert_eq!(pin.toggles, 3);
        assert!(pin.is_set_high());
    }
}
