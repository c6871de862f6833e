//! Activity LED shared between the poll loop and the USB event handlers.

use core::cell::RefCell;

use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pad_core::ActivityIndicator;

/// Storage for the LED pin.
pub type LedCell = Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>>;

/// Handle to a shared LED. Does nothing until a pin is installed.
#[derive(Clone, Copy)]
pub struct SharedLed {
    cell: &'static LedCell,
}

impl SharedLed {
    /// Install `pin` into `cell` and return a handle to it.
    pub fn install(cell: &'static LedCell, pin: Output<'static>) -> Self {
        cell.lock(|led| *led.borrow_mut() = Some(pin));
        Self { cell }
    }

    fn with_pin(&self, f: impl FnOnce(&mut Output<'static>)) {
        self.cell.lock(|led| {
            if let Some(pin) = led.borrow_mut().as_mut() {
                f(pin);
            }
        });
    }
}

impl ActivityIndicator for SharedLed {
    fn on(&mut self) {
        self.with_pin(|pin| pin.set_high());
    }

    fn off(&mut self) {
        self.with_pin(|pin| pin.set_low());
    }
}
