//! 15-button, 3-axis USB arcade pad for RP2040.
//!
//! This crate binds the hardware-independent [`pad_core`] engine to the
//! RP2040's GPIO, ADC and USB peripherals.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Polls 15 button inputs every 2 ms and debounces them
//! 2. Samples three analog axes in the background
//! 3. Sends a USB HID joystick report whenever something changed and the
//!    previous report has been taken by the host
//!
//! # Hardware Configuration
//!
//! | Function | GPIO  | Description |
//! |----------|-------|-------------|
//! | Buttons  | 0-11, 14 | Pull-down, pressed = high |
//! | Buttons  | 12-13 | Pull-up, pressed = low |
//! | X axis   | 26    | ADC0 |
//! | Y axis   | 27    | ADC1 |
//! | Z axis   | 28    | ADC2 |
//! | LED      | 25    | On-board LED (heartbeat) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **USB Task**: Runs the USB device stack and its device callbacks
//! - **Poll Task**: Runs [`PollEngine::poll_once`](pad_core::PollEngine::poll_once) on a fixed ticker
//! - **Writer Task**: Writes queued reports to the interrupt endpoint
//! - **ADC Task**: Converts the axis channels on request
//!
//! Tasks talk through Embassy's [`Signal`](embassy_sync::signal::Signal)
//! and share the [`TransferStateMachine`](pad_core::TransferStateMachine)
//! and [`ReportSlot`](pad_core::ReportSlot) as statics.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`diagnostic-mode`** (default): Log pressed button names after the diagnostic button is hit

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

pub use pad_core::{
    DiagnosticMode, GamepadReport, PadConfig, PollEngine, PollOutcome, ReportSignal, ReportSlot,
    SignalReportSink, TransferStateMachine, TransportEvent, DEFAULT_CONFIG,
};

pub mod adc;
pub mod buttons;
pub mod led;
pub mod usb_output;

pub use adc::{run_sequencer, AdcRequest, AdcResult, SignalAdc};
pub use buttons::ButtonBank;
pub use led::{LedCell, SharedLed};
pub use usb_output::{
    configure_usb_hid, run_writer, DeviceEventHandler, GamepadRequestHandler, ReportWriter,
    UsbDriver, REPORT_DESCRIPTOR,
};
