//! Logical command set carried by the link
//!
//! Commands occupy 4 bits on the wire, so 0-15 are representable; 0-7
//! are assigned. The dispatcher treats unassigned values as unknown and
//! ignores them.

use crate::frame::{Frame, FrameError};

/// Commands understood by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Control/status ping, no payload; receiver renders a liveness message
    Ping,
    /// Burst test message (text); counted in the burst statistics window
    BurstTest,
    /// Display text on the receiver's screen
    ShowText,
    /// Display a temperature reading (text-encoded float, e.g. "23.5")
    ShowTemperature,
    /// Toggle the periodic indicator on or off
    ToggleIndicator,
    /// Set the indicator frequency (text-encoded integer, 1-100 Hz)
    SetIndicatorFrequency,
    /// Report accumulated statistics
    ReportStats,
    /// Display the last recorded numeric samples (preformatted text)
    ShowSamples,
}

impl Command {
    /// Parse a command from its 4-bit wire value
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Command::Ping),
            1 => Some(Command::BurstTest),
            2 => Some(Command::ShowText),
            3 => Some(Command::ShowTemperature),
            4 => Some(Command::ToggleIndicator),
            5 => Some(Command::SetIndicatorFrequency),
            6 => Some(Command::ReportStats),
            7 => Some(Command::ShowSamples),
            _ => None,
        }
    }

    /// Convert to the 4-bit wire value
    pub fn to_raw(self) -> u8 {
        match self {
            Command::Ping => 0,
            Command::BurstTest => 1,
            Command::ShowText => 2,
            Command::ShowTemperature => 3,
            Command::ToggleIndicator => 4,
            Command::SetIndicatorFrequency => 5,
            Command::ReportStats => 6,
            Command::ShowSamples => 7,
        }
    }

    /// Returns true if this command carries a payload
    pub fn carries_payload(&self) -> bool {
        !matches!(
            self,
            Command::Ping | Command::ToggleIndicator | Command::ReportStats
        )
    }

    /// Build a frame for this command (sender-side convenience)
    pub fn to_frame(self, payload: &[u8]) -> Result<Frame, FrameError> {
        Frame::new(self.to_raw(), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_roundtrip() {
        let commands = [
            Command::Ping,
            Command::BurstTest,
            Command::ShowText,
            Command::ShowTemperature,
            Command::ToggleIndicator,
            Command::SetIndicatorFrequency,
            Command::ReportStats,
            Command::ShowSamples,
        ];

        for command in commands {
            let raw = command.to_raw();
            let parsed = Command::from_raw(raw).unwrap();
            assert_eq!(command, parsed);
        }
    }

    #[test]
    fn test_unassigned_values_rejected() {
        for raw in 8..=15 {
            assert_eq!(Command::from_raw(raw), None);
        }
    }

    #[test]
    fn test_payload_expectations() {
        assert!(!Command::Ping.carries_payload());
        assert!(!Command::ToggleIndicator.carries_payload());
        assert!(!Command::ReportStats.carries_payload());
        assert!(Command::ShowText.carries_payload());
        assert!(Command::SetIndicatorFrequency.carries_payload());
    }

    #[test]
    fn test_to_frame() {
        let frame = Command::ShowTemperature.to_frame(b"23.5").unwrap();
        assert_eq!(frame.command, 3);
        assert_eq!(frame.payload_str(), "23.5");
    }
}
