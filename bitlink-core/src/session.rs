//! Receive-side link session
//!
//! Owns the receiver, the dispatcher and the indicator blinker, and
//! advances all of them from one cooperative loop. The host calls
//! [`LinkSession::poll`] as often as it can (every millisecond is
//! plenty at 10 bit/s); each call does O(1) work, so a frame arriving
//! over several seconds never starves the blinker.

use bitlink_hal::{InputPin, OutputPin};

use crate::blink::Blinker;
use crate::dispatch::{Dispatcher, Render};
use crate::rx::{Receiver, RxEvent};
use crate::stats::LinkStats;
use crate::timing::BitTiming;

/// All receive-side state for one link
#[derive(Debug)]
pub struct LinkSession {
    receiver: Receiver,
    dispatcher: Dispatcher,
    blinker: Blinker,
}

impl LinkSession {
    pub fn new(timing: BitTiming) -> Self {
        Self {
            receiver: Receiver::new(timing),
            dispatcher: Dispatcher::new(),
            blinker: Blinker::new(),
        }
    }

    /// One scheduler tick: advance the receiver, route whatever it
    /// produced, then service the blinker.
    pub fn poll<L, P, R>(&mut self, now_ms: u64, line: &L, indicator: &mut P, console: &mut R)
    where
        L: InputPin,
        P: OutputPin,
        R: Render,
    {
        match self.receiver.poll(now_ms, line) {
            Some(RxEvent::Frame { frame, valid }) => {
                self.dispatcher
                    .dispatch(&frame, valid, console, &mut self.blinker, indicator);
            }
            Some(RxEvent::Desync(_)) => self.dispatcher.record_sync_error(),
            None => {}
        }

        self.blinker.poll(now_ms, indicator);
    }

    /// Accumulated statistics
    pub fn stats(&self) -> &LinkStats {
        self.dispatcher.stats()
    }

    /// Indicator blink state
    pub fn blinker(&self) -> &Blinker {
        &self.blinker
    }

    /// Receiver state, mostly for diagnostics
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}
