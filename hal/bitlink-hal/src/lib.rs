//! Bitlink Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the link layer is written
//! against, so the same transmitter/receiver code runs on any platform
//! that can read and write one GPIO line and measure time in
//! milliseconds (Raspberry Pi, ESP32, or a simulated wire in host
//! tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Link layer (bitlink-core)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bitlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ platform GPIO │       │ simulated     │
//! │ bindings      │       │ wire (tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`time::Delay`] - Blocking millisecond delays (transmit side only)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use time::Delay;
