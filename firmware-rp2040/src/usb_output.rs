//! USB HID joystick transport.
//!
//! Maps embassy-usb's device callbacks onto [`TransportEvent`]s, serves
//! GET_REPORT from the [`ReportSlot`], and runs the interrupt-IN writer
//! that ends each transfer through [`finish_write`].

use defmt::{info, trace, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Handler};
use pad_core::{
    dispatch, finish_write, ActivityIndicator, GamepadReport, ReportSignal, ReportSlot,
    TransferStateMachine, TransportEvent,
};

/// USB driver type used throughout the firmware.
pub type UsbDriver = Driver<'static, USB>;

/// HID writer sized for one [`GamepadReport`].
pub type ReportWriter = HidWriter<'static, UsbDriver, { GamepadReport::SIZE }>;

/// HID Joystick Report Descriptor.
///
/// This descriptor defines a joystick with:
/// - 4 axes (X, Y, Z, Rx), each a signed 10-bit value padded to 16 bits
/// - 16 buttons
#[rustfmt::skip]
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01,       // Usage Page (Generic Desktop)
    0x09, 0x04,       // Usage (Joystick)
    0xA1, 0x01,       // Collection (Application)
    0x05, 0x01,       //   Usage Page (Generic Desktop)
    0x09, 0x01,       //   Usage (Pointer)
    0xA1, 0x00,       //   Collection (Physical)
    //
    // --- Axes ---
    0x16, 0x00, 0xFE, //     Logical Minimum (-512)
    0x26, 0xFF, 0x01, //     Logical Maximum (511)
    0x09, 0x30,       //     Usage (X)
    0x75, 0x0A,       //     Report Size (10)
    0x95, 0x01,       //     Report Count (1)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0x75, 0x06,       //     Report Size (6)
    0x81, 0x01,       //     Input (Constant)
    0x09, 0x31,       //     Usage (Y)
    0x75, 0x0A,       //     Report Size (10)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0x75, 0x06,       //     Report Size (6)
    0x81, 0x01,       //     Input (Constant)
    0x09, 0x32,       //     Usage (Z)
    0x75, 0x0A,       //     Report Size (10)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0x75, 0x06,       //     Report Size (6)
    0x81, 0x01,       //     Input (Constant)
    0x09, 0x33,       //     Usage (Rx)
    0x75, 0x0A,       //     Report Size (10)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0x75, 0x06,       //     Report Size (6)
    0x81, 0x01,       //     Input (Constant)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09,       //     Usage Page (Button)
    0x19, 0x01,       //     Usage Minimum (Button 1)
    0x29, 0x10,       //     Usage Maximum (Button 16)
    0x15, 0x00,       //     Logical Minimum (0)
    0x25, 0x01,       //     Logical Maximum (1)
    0x35, 0x00,       //     Physical Minimum (0)
    0x45, 0x01,       //     Physical Maximum (1)
    0x75, 0x01,       //     Report Size (1)
    0x95, 0x10,       //     Report Count (16)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0xC0,             //   End Collection
    0xC0,             // End Collection
];

/// Write queued reports to the interrupt-IN endpoint forever.
///
/// Every write ends the transfer, successful or not: a failed report is
/// dropped and superseded by the next one. A write that outlives a reset or
/// suspend does not end the transfer of the new session.
pub async fn run_writer<L: ActivityIndicator>(
    writer: &mut ReportWriter,
    signal: &'static ReportSignal,
    transfer: &'static TransferStateMachine,
    mut led: L,
) -> ! {
    writer.ready().await;
    info!("HID endpoint ready");

    loop {
        let report = signal.wait().await;
        let epoch = transfer.epoch();
        match writer.write(&report.as_bytes()).await {
            Ok(()) => trace!("report sent: {:?}", report),
            Err(e) => warn!("report write failed: {:?}", e),
        }
        finish_write(transfer, epoch, &mut led);
    }
}

/// Device-level USB callbacks.
pub struct DeviceEventHandler<L> {
    transfer: &'static TransferStateMachine,
    queue: &'static ReportSignal,
    led: L,
}

impl<L: ActivityIndicator> DeviceEventHandler<L> {
    #[must_use]
    pub fn new(
        transfer: &'static TransferStateMachine,
        queue: &'static ReportSignal,
        led: L,
    ) -> Self {
        Self {
            transfer,
            queue,
            led,
        }
    }

    fn apply(&mut self, event: TransportEvent) {
        dispatch(self.transfer, self.queue, event, &mut self.led);
    }
}

impl<L: ActivityIndicator> Handler for DeviceEventHandler<L> {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            self.apply(TransportEvent::Disconnected);
        }
    }

    fn reset(&mut self) {
        self.apply(TransportEvent::Disconnected);
    }

    fn configured(&mut self, configured: bool) {
        let event = if configured {
            TransportEvent::Connected
        } else {
            TransportEvent::Disconnected
        };
        self.apply(event);
    }

    fn suspended(&mut self, suspended: bool) {
        let event = if suspended {
            TransportEvent::Suspend
        } else {
            TransportEvent::Resume
        };
        self.apply(event);
    }
}

/// HID request handler.
///
/// GET_REPORT returns a copy of the last published report.
pub struct GamepadRequestHandler {
    transfer: &'static TransferStateMachine,
    slot: &'static ReportSlot,
}

impl GamepadRequestHandler {
    #[must_use]
    pub fn new(transfer: &'static TransferStateMachine, slot: &'static ReportSlot) -> Self {
        Self { transfer, slot }
    }
}

impl RequestHandler for GamepadRequestHandler {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        self.transfer.handle(TransportEvent::GetReport);

        let bytes = self.slot.snapshot().as_bytes();
        let out = buf.get_mut(..bytes.len())?;
        out.copy_from_slice(&bytes);
        Some(bytes.len())
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by [`run_writer`].
pub fn configure_usb_hid(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut State<'static>,
    request_handler: &'static mut GamepadRequestHandler,
    poll_ms: u8,
) -> ReportWriter {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms,
        max_packet_size: 16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
