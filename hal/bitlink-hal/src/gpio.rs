//! GPIO pin abstractions
//!
//! Provides traits for the single link line and the indicator output.
//! Implementations handle the actual register (or syscall) manipulation
//! for the specific platform.

/// Digital output pin
///
/// The transmit side drives the link line through this trait; the
/// indicator LED uses it as well.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// The receive side samples the link line through this trait. Reads must
/// be cheap: the receiver polls the line every scheduler tick.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
