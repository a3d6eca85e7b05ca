//! ADC test points on the RP2040.
//!
//! The RP2040 converts to 12 bits; readings are shifted down to the 10-bit
//! range the calibration is written for.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};

use laser_monitor_rs::sampler::AnalogInputs;

pub struct TestPoints<'d> {
    adc: Adc<'d, Blocking>,
    regulator: Channel<'d>,
    diode: Channel<'d>,
}

impl<'d> TestPoints<'d> {
    pub fn new(adc: Adc<'d, Blocking>, regulator: Channel<'d>, diode: Channel<'d>) -> Self {
        Self { adc, regulator, diode }
    }
}

impl AnalogInputs for TestPoints<'_> {
    fn read_regulator(&mut self) -> u16 {
        read_10bit(&mut self.adc, &mut self.regulator)
    }

    fn read_diode(&mut self) -> u16 {
        read_10bit(&mut self.adc, &mut self.diode)
    }
}

/// A failed conversion reads as zero and gets clamped downstream.
fn read_10bit(adc: &mut Adc<'_, Blocking>, channel: &mut Channel<'_>) -> u16 {
    match adc.blocking_read(channel) {
        Ok(raw) => raw >> 2,
        Err(_) => {
            warn!("ADC conversion error");
            0
        }
    }
}
