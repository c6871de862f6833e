//! ADC sequencer for the X/Y/Z axes.
//!
//! The poll loop never waits on the ADC: triggering raises a request
//! signal, [`run_sequencer`] converts every channel asynchronously and
//! signals the codes back, and the loop collects them on a later poll.
//!
//! # Pins
//!
//! | Axis | GPIO | ADC channel |
//! |------|------|-------------|
//! | X    | 26   | 0 |
//! | Y    | 27   | 1 |
//! | Z    | 28   | 2 |

use defmt::warn;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use pad_core::{AnalogSource, AXIS_CHANNELS};

/// Conversion request from the poll loop.
pub type AdcRequest = Signal<CriticalSectionRawMutex, ()>;

/// Finished conversion, one raw code per channel.
pub type AdcResult = Signal<CriticalSectionRawMutex, [u16; AXIS_CHANNELS]>;

/// [`AnalogSource`] backed by the sequencer task.
pub struct SignalAdc {
    request: &'static AdcRequest,
    result: &'static AdcResult,
    latest: Option<[u16; AXIS_CHANNELS]>,
}

impl SignalAdc {
    #[must_use]
    pub fn new(request: &'static AdcRequest, result: &'static AdcResult) -> Self {
        Self {
            request,
            result,
            latest: None,
        }
    }
}

impl AnalogSource for SignalAdc {
    fn trigger_conversion(&mut self) {
        self.latest = None;
        self.request.signal(());
    }

    fn is_complete(&mut self) -> bool {
        if self.latest.is_none() {
            self.latest = self.result.try_take();
        }
        self.latest.is_some()
    }

    fn read_results(&mut self, codes: &mut [u16; AXIS_CHANNELS]) {
        if let Some(latest) = self.latest.take() {
            *codes = latest;
        }
    }
}

/// Serve conversion requests forever.
///
/// A failed conversion reports the channel at mid-scale so the axis reads
/// as centered rather than stuck at an extreme.
pub async fn run_sequencer(
    adc: &mut Adc<'static, Async>,
    channels: &mut [Channel<'static>; AXIS_CHANNELS],
    request: &'static AdcRequest,
    result: &'static AdcResult,
) -> ! {
    loop {
        request.wait().await;

        let mut codes = [0x7ff; AXIS_CHANNELS];
        for (i, (code, channel)) in codes.iter_mut().zip(channels.iter_mut()).enumerate() {
            match adc.read(channel).await {
                Ok(value) => *code = value,
                Err(e) => warn!("ADC channel {} failed: {:?}", i, e),
            }
        }

        result.signal(codes);
    }
}
