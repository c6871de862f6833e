//! GPIO button bank.
//!
//! Each pin is read back-to-back on every poll; the resulting bitmask is
//! what the debouncer sees.
//!
//! # Pins
//!
//! | Input | GPIO | Pull |
//! |-------|------|------|
//! | 0-11  | 0-11 | Down |
//! | 12-13 | 12-13 | Up  |
//! | 14    | 14   | Down |

use embedded_hal::digital::InputPin;
use pad_core::{DigitalInputSource, InputError, RawInputSample, INPUT_COUNT};

/// Bank of `N` input pins; pin `i` becomes input bit `i`.
pub struct ButtonBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> ButtonBank<P, N> {
    /// Create a bank from already-configured input pins.
    #[must_use]
    pub fn new(pins: [P; N]) -> Self {
        const { assert!(N <= INPUT_COUNT, "more pins than monitored inputs") };
        Self { pins }
    }
}

impl<P: InputPin, const N: usize> DigitalInputSource for ButtonBank<P, N> {
    fn read_bank(&mut self) -> Result<RawInputSample, InputError> {
        let mut bits = 0u16;
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_high().map_err(|_| InputError::Io)? {
                bits |= 1 << i;
            }
        }
        Ok(RawInputSample::new(bits))
    }
}
