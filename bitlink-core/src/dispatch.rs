//! Command dispatcher
//!
//! Routes validated frames to their handlers and keeps the statistics
//! counters. Display output goes through the [`Render`] collaborator;
//! all UI beyond "show this text" stays outside the link layer.

use core::fmt::Write;

use heapless::String;

use bitlink_hal::OutputPin;
use bitlink_protocol::{Command, Frame};

use crate::blink::Blinker;
use crate::stats::{BurstReport, LinkStats};

/// Display/indicator collaborator consumed by the dispatcher
pub trait Render {
    /// Show a line of text to the user
    fn render(&mut self, text: &str);
}

/// Maps received frames to handler actions and statistics
#[derive(Debug, Default)]
pub struct Dispatcher {
    stats: LinkStats,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated statistics
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Record a synchronization failure reported by the receiver.
    ///
    /// The command identity is unknown for these, so they only feed the
    /// counters; nothing is dispatched.
    pub fn record_sync_error(&mut self) {
        let _ = self.stats.record_sync_error();
    }

    /// Dispatch one correctly framed frame.
    ///
    /// Statistics are updated for every frame; the handler action runs
    /// only when the checksum verdict is `valid`. Unknown commands are
    /// logged and ignored.
    pub fn dispatch<R: Render, P: OutputPin>(
        &mut self,
        frame: &Frame,
        valid: bool,
        console: &mut R,
        blinker: &mut Blinker,
        indicator: &mut P,
    ) {
        let burst = frame.command == Command::BurstTest.to_raw();
        if let Some(report) = self.stats.record_frame(burst, valid) {
            self.render_burst_report(console, &report);
        }

        if !valid {
            #[cfg(feature = "defmt")]
            defmt::warn!("dropping corrupt payload for cmd {}", frame.command);
            return;
        }

        match Command::from_raw(frame.command) {
            Some(Command::Ping) => console.render("Device OK"),
            Some(Command::BurstTest) => {
                // Counted above; the payload itself carries no action
            }
            Some(Command::ShowText) | Some(Command::ShowSamples) => {
                console.render(frame.payload_str());
            }
            Some(Command::ShowTemperature) => {
                let mut text: String<80> = String::new();
                let _ = write!(text, "Temp: {} C", frame.payload_str());
                console.render(&text);
            }
            Some(Command::ToggleIndicator) => {
                let enabled = blinker.toggle_enabled(indicator);
                console.render(if enabled {
                    "Indicator blinking"
                } else {
                    "Indicator off"
                });
            }
            Some(Command::SetIndicatorFrequency) => {
                self.set_frequency(frame, console, blinker);
            }
            Some(Command::ReportStats) => self.render_stats(console),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("unknown command {} ignored", frame.command);
            }
        }
    }

    fn set_frequency<R: Render>(&mut self, frame: &Frame, console: &mut R, blinker: &mut Blinker) {
        match frame.payload_str().trim().parse::<u32>() {
            Ok(hz) if blinker.set_frequency(hz) => {
                let mut text: String<80> = String::new();
                let _ = write!(text, "Indicator frequency: {} Hz", hz);
                console.render(&text);
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("indicator frequency out of range: {}", frame.payload_str());
            }
        }
    }

    fn render_stats<R: Render>(&self, console: &mut R) {
        let normal = &self.stats.normal;
        let mut text: String<128> = String::new();
        let _ = write!(
            text,
            "Frames OK: {}  Checksum errors: {}  Sync errors: {}",
            normal.ok, normal.checksum_errors, normal.sync_errors
        );
        console.render(&text);
    }

    fn render_burst_report<R: Render>(&self, console: &mut R, report: &BurstReport) {
        let mut text: String<128> = String::new();
        let _ = write!(
            text,
            "Burst test ({} frames): ok {:.1}%  detected {:.1}%  undetected {:.1}%",
            report.total, report.ok_pct, report.detected_pct, report.undetected_pct
        );
        console.render(&text);
    }
}
