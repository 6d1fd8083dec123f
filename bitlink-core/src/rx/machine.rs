//! Receiver sampling state machine
//!
//! Driven by repeated non-blocking polls against a caller-supplied
//! millisecond timestamp. Synchronization works edge-to-center: when the
//! falling start edge is seen, the first data sample is scheduled one
//! and a half bit periods later, landing in the middle of the first data
//! bit where edge jitter matters least. Every later sample is scheduled
//! one bit period after the previous one.
//!
//! Between the bytes of a frame the machine returns to [`RxState::Idle`]
//! to hunt for the next start edge; the byte index and the frame parity
//! accumulator persist until the frame completes or aborts.

use bitlink_hal::InputPin;
use bitlink_protocol::{
    decode, unpack_length, Frame, MAX_PAYLOAD_SIZE, MAX_WIRE_SIZE, OVERHEAD_BYTES,
};

use crate::rx::recovery::LineRecovery;
use crate::timing::BitTiming;

/// Receiver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Waiting for a start edge (line falling LOW)
    Idle,
    /// Sampling the 8 data bits of the current byte
    ReceivingBits,
    /// Verifying the first stop bit (must read HIGH)
    VerifyStop1,
    /// Verifying the second stop bit (must read HIGH)
    VerifyStop2,
    /// Sampling the frame-wide parity bit after the last byte
    VerifyFrameParity,
    /// Verifying the final stop bit and closing out the frame
    VerifyFinalStop,
    /// Waiting out the quiescence window after a failure
    Flushing,
}

/// Synchronization failures; the in-flight frame is discarded and the
/// command identity is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// First stop bit read LOW
    StopBit1Low,
    /// Second stop bit read LOW
    StopBit2Low,
    /// Stop bit after the frame parity bit read LOW
    FinalStopLow,
    /// Sampled frame parity disagrees with the accumulated count
    ParityMismatch,
    /// Decoded LEN field exceeds the protocol maximum
    LengthOutOfRange,
}

/// What a poll produced
#[derive(Debug, Clone, PartialEq)]
pub enum RxEvent {
    /// A complete, correctly framed frame. `valid` is the checksum
    /// verdict: on `false` the command identity is trustworthy (the
    /// header framed correctly) but the payload is not.
    Frame { frame: Frame, valid: bool },
    /// The machine lost synchronization and entered line recovery
    Desync(SyncError),
}

/// Non-blocking bit-sampling receiver
#[derive(Debug)]
pub struct Receiver {
    timing: BitTiming,
    state: RxState,
    /// Absolute timestamp of the next scheduled line sample
    next_sample_ms: u64,
    /// Wire bytes of the frame under construction
    wire: [u8; MAX_WIRE_SIZE],
    byte_index: usize,
    bit_index: u8,
    current_byte: u8,
    /// HIGH data bits seen across the whole frame, for the parity check
    ones_seen: u32,
    /// Expected total wire length; 0 until the header is decoded
    wire_len: usize,
    parity_sample: bool,
    recovery: LineRecovery,
}

impl Receiver {
    pub fn new(timing: BitTiming) -> Self {
        Self {
            timing,
            state: RxState::Idle,
            next_sample_ms: 0,
            wire: [0; MAX_WIRE_SIZE],
            byte_index: 0,
            bit_index: 0,
            current_byte: 0,
            ones_seen: 0,
            wire_len: 0,
            parity_sample: false,
            recovery: LineRecovery::new(),
        }
    }

    /// Current machine state
    pub fn state(&self) -> RxState {
        self.state
    }

    /// True when the machine is between frames and not recovering
    pub fn is_idle(&self) -> bool {
        self.state == RxState::Idle && self.byte_index == 0
    }

    /// One scheduler tick: O(1) work, never blocks.
    ///
    /// `now_ms` must be monotonic across calls. Returns an event when a
    /// frame completed or synchronization was lost; `None` otherwise.
    pub fn poll<L: InputPin>(&mut self, now_ms: u64, line: &L) -> Option<RxEvent> {
        let bit_ms = self.timing.bit_ms as u64;

        match self.state {
            RxState::Idle => {
                if line.is_low() {
                    // Start edge: sample the center of the first data
                    // bit, one and a half periods from here
                    self.next_sample_ms = now_ms + self.timing.half_bit_ms() as u64 + bit_ms;
                    self.current_byte = 0;
                    self.bit_index = 0;
                    self.state = RxState::ReceivingBits;
                }
                None
            }

            RxState::ReceivingBits => {
                if now_ms >= self.next_sample_ms {
                    if line.is_high() {
                        self.current_byte |= 1 << self.bit_index;
                    }
                    self.bit_index += 1;
                    self.next_sample_ms = now_ms + bit_ms;
                    if self.bit_index >= 8 {
                        self.state = RxState::VerifyStop1;
                    }
                }
                None
            }

            RxState::VerifyStop1 => {
                if now_ms >= self.next_sample_ms {
                    if line.is_low() {
                        return self.abort(now_ms, SyncError::StopBit1Low);
                    }
                    self.next_sample_ms = now_ms + bit_ms;
                    self.state = RxState::VerifyStop2;
                }
                None
            }

            RxState::VerifyStop2 => {
                if now_ms >= self.next_sample_ms {
                    if line.is_low() {
                        return self.abort(now_ms, SyncError::StopBit2Low);
                    }
                    return self.commit_byte(now_ms);
                }
                None
            }

            RxState::VerifyFrameParity => {
                if now_ms >= self.next_sample_ms {
                    self.parity_sample = line.is_high();
                    self.next_sample_ms = now_ms + bit_ms;
                    self.state = RxState::VerifyFinalStop;
                }
                None
            }

            RxState::VerifyFinalStop => {
                if now_ms >= self.next_sample_ms {
                    return self.finish_frame(now_ms, line);
                }
                None
            }

            RxState::Flushing => {
                if self.recovery.poll(now_ms, line) {
                    self.state = RxState::Idle;
                }
                None
            }
        }
    }

    /// Store the completed byte and steer the machine: more bytes, or
    /// the frame parity bit after the last one
    fn commit_byte(&mut self, now_ms: u64) -> Option<RxEvent> {
        self.wire[self.byte_index] = self.current_byte;
        self.ones_seen += self.current_byte.count_ones();
        self.byte_index += 1;

        if self.byte_index == 2 {
            // Header complete: the LEN field tells us how many more
            // bytes to expect. It must not be trusted to index further
            // reads if it is out of protocol range.
            let length = unpack_length(self.wire[1]) as usize;
            if length > MAX_PAYLOAD_SIZE {
                return self.abort(now_ms, SyncError::LengthOutOfRange);
            }
            self.wire_len = length + OVERHEAD_BYTES;

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "rx header: cmd={} len={}",
                bitlink_protocol::unpack_command(self.wire[0]),
                length
            );
        }

        if self.wire_len != 0 && self.byte_index >= self.wire_len {
            self.next_sample_ms = now_ms + self.timing.bit_ms as u64;
            self.state = RxState::VerifyFrameParity;
        } else {
            // Hunt for the start edge of the next byte
            self.state = RxState::Idle;
        }
        None
    }

    /// Final stop bit and parity verdict, then checksum validation
    fn finish_frame<L: InputPin>(&mut self, now_ms: u64, line: &L) -> Option<RxEvent> {
        if line.is_low() {
            return self.abort(now_ms, SyncError::FinalStopLow);
        }

        let parity_computed = self.ones_seen % 2 != 0;
        if self.parity_sample != parity_computed {
            return self.abort(now_ms, SyncError::ParityMismatch);
        }

        let wire_len = self.wire_len;
        self.reset_frame();

        match decode(&self.wire[..wire_len]) {
            Ok((frame, true)) => {
                self.state = RxState::Idle;
                Some(RxEvent::Frame { frame, valid: true })
            }
            Ok((frame, false)) => {
                // Corrupted payload can leave trailing garbage on the
                // line; wait it out before re-arming
                self.enter_flush(now_ms);
                Some(RxEvent::Frame {
                    frame,
                    valid: false,
                })
            }
            Err(_) => self.abort(now_ms, SyncError::LengthOutOfRange),
        }
    }

    fn abort(&mut self, now_ms: u64, error: SyncError) -> Option<RxEvent> {
        #[cfg(feature = "defmt")]
        defmt::warn!("rx desync in {:?}: {:?}", self.state, error);

        self.reset_frame();
        self.enter_flush(now_ms);
        Some(RxEvent::Desync(error))
    }

    fn enter_flush(&mut self, now_ms: u64) {
        self.recovery.start(now_ms);
        self.state = RxState::Flushing;
    }

    fn reset_frame(&mut self) {
        self.byte_index = 0;
        self.bit_index = 0;
        self.current_byte = 0;
        self.ones_seen = 0;
        self.wire_len = 0;
    }
}
