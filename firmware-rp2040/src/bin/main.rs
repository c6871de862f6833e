#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Async, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use usb_arcade_pad_rp2040::{
    configure_usb_hid, run_sequencer, run_writer, AdcRequest, AdcResult, ButtonBank,
    DeviceEventHandler, GamepadRequestHandler, LedCell, PadConfig, PollEngine, PollOutcome,
    ReportSignal, ReportSlot, ReportWriter, SharedLed, SignalAdc, SignalReportSink,
    TransferStateMachine, UsbDriver, DEFAULT_CONFIG,
};

#[cfg(feature = "diagnostic-mode")]
use usb_arcade_pad_rp2040::DiagnosticMode;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
    ADC_IRQ_FIFO => embassy_rp::adc::InterruptHandler;
});

/// Number of wired button inputs.
const BUTTONS: usize = 15;

static CONFIG: PadConfig = DEFAULT_CONFIG;

/// Transfer state, shared by the poll loop and the USB callbacks.
static TRANSFER: TransferStateMachine = TransferStateMachine::new();

/// Last report built, served to GET_REPORT.
static REPORT_SLOT: ReportSlot = ReportSlot::new();

/// Report hand-off from the poll loop to the writer.
static REPORT_SIGNAL: ReportSignal = Signal::new();

static ADC_REQUEST: AdcRequest = Signal::new();
static ADC_RESULT: AdcResult = Signal::new();

static LED: LedCell = Mutex::new(RefCell::new(None));

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<GamepadRequestHandler> = StaticCell::new();
static DEVICE_HANDLER: StaticCell<DeviceEventHandler<SharedLed>> = StaticCell::new();

type Engine = PollEngine<
    'static,
    ButtonBank<Input<'static>, BUTTONS>,
    SignalAdc,
    SignalReportSink<'static>,
    SharedLed,
>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Arcade pad starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- LED ---
    let led = SharedLed::install(&LED, Output::new(p.PIN_25, Level::Low));

    // --- Buttons ---
    let buttons = ButtonBank::new([
        Input::new(p.PIN_0, Pull::Down),
        Input::new(p.PIN_1, Pull::Down),
        Input::new(p.PIN_2, Pull::Down),
        Input::new(p.PIN_3, Pull::Down),
        Input::new(p.PIN_4, Pull::Down),
        Input::new(p.PIN_5, Pull::Down),
        Input::new(p.PIN_6, Pull::Down),
        Input::new(p.PIN_7, Pull::Down),
        Input::new(p.PIN_8, Pull::Down),
        Input::new(p.PIN_9, Pull::Down),
        Input::new(p.PIN_10, Pull::Down),
        Input::new(p.PIN_11, Pull::Down),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
        Input::new(p.PIN_14, Pull::Down),
    ]);

    // --- ADC Setup ---
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
    ];

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let identity = &CONFIG.usb;
    let mut usb_config = UsbConfig::new(identity.vid, identity.pid);
    usb_config.manufacturer = Some(identity.manufacturer);
    usb_config.product = Some(identity.product);
    usb_config.serial_number = Some(identity.serial_number);
    usb_config.max_power = identity.max_power_ma;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    builder.handler(DEVICE_HANDLER.init(DeviceEventHandler::new(&TRANSFER, &REPORT_SIGNAL, led)));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(GamepadRequestHandler::new(&TRANSFER, &REPORT_SLOT));
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler, CONFIG.hid_poll_ms);

    // Build the USB device
    let usb_device = builder.build();

    // --- Poll engine ---
    let engine = unwrap!(PollEngine::new(
        buttons,
        SignalAdc::new(&ADC_REQUEST, &ADC_RESULT),
        SignalReportSink::new(&REPORT_SIGNAL),
        led,
        &TRANSFER,
        &REPORT_SLOT,
        &CONFIG,
    ));

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(adc_task(adc, channels).unwrap());
    spawner.spawn(writer_task(hid_writer, led).unwrap());
    spawner.spawn(poll_task(engine).unwrap());

    info!(
        "Arcade pad initialized, polling every {} ms ({} ms debounce)",
        CONFIG.poll_interval_ms,
        CONFIG.debounce_window_ms()
    );
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver>) {
    device.run().await;
}

/// ADC task - converts the axis channels whenever the poll loop asks.
#[embassy_executor::task]
async fn adc_task(mut adc: Adc<'static, Async>, mut channels: [Channel<'static>; 3]) {
    run_sequencer(&mut adc, &mut channels, &ADC_REQUEST, &ADC_RESULT).await
}

/// Writer task - sends queued reports and reports completion.
#[embassy_executor::task]
async fn writer_task(mut writer: ReportWriter, led: SharedLed) {
    run_writer(&mut writer, &REPORT_SIGNAL, &TRANSFER, led).await
}

/// Poll task - samples inputs at a fixed rate and sends reports.
#[embassy_executor::task]
async fn poll_task(mut engine: Engine) {
    let mut ticker = Ticker::every(Duration::from_millis(CONFIG.poll_interval_ms));

    #[cfg(feature = "diagnostic-mode")]
    let mut diagnostic_mode = DiagnosticMode::new();

    loop {
        ticker.next().await;

        match engine.poll_once() {
            Ok(PollOutcome::Sent {
                report, diagnostic, ..
            }) => {
                #[cfg(feature = "diagnostic-mode")]
                {
                    if diagnostic {
                        diagnostic_mode.toggle();
                    }
                    diagnostic_mode.show(&report, &CONFIG.layout);
                }
                #[cfg(not(feature = "diagnostic-mode"))]
                let _ = (report, diagnostic);
            }
            Ok(PollOutcome::NotIdle(_) | PollOutcome::Unchanged) => {}
            Err(e) => warn!("poll failed: {:?}", e),
        }
    }
}
