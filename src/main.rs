//! Laser cutter monitor firmware for the Raspberry Pi Pico (RP2040).
//!
//! Shows diode current on a gauge and temperature on a slider, on an SH1107
//! 128x64 OLED. The front-panel selector picks power only, temperature only or
//! auto-cycling between the two.

#![no_std]
#![no_main]

mod analog;
mod display;
mod sensor;

use defmt::*;

use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel as AdcChannel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::pio_programs::onewire::{PioOneWire, PioOneWireProgram};
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;

use display_interface_spi::SPIInterface;

use {defmt_rtt as _, panic_probe as _};

use laser_monitor_rs::calibration::{ACTIVE_PRESET, Calibration};
use laser_monitor_rs::ds18b20::Resolution;
use laser_monitor_rs::monitor::{Meter, Monitor};
use laser_monitor_rs::selector::{ModeSelector, SelectorState};
use laser_monitor_rs::sh1107::Sh1107;
use laser_monitor_rs::temperature::TemperatureReader;
use laser_monitor_rs::{LOOP_DELAY_MS, SPLASH_MS, VERSION};

use crate::analog::TestPoints;
use crate::display::{display_spi_config, show_splash};
use crate::sensor::Ds18b20;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Laser monitor v{} start", VERSION);
    let p = embassy_rp::init(Default::default());
    let mut delay = Delay;

    // Display pins
    let dc = Output::new(p.PIN_8, Level::Low); // Data/Command
    let cs = Output::new(p.PIN_9, Level::High); // Chip Select
    let sclk = p.PIN_10; // Serial Clock
    let mosi = p.PIN_11; // Master Out Slave In
    let rst = Output::new(p.PIN_12, Level::Low); // Reset

    let spi = Spi::new_txonly(p.SPI1, sclk, mosi, p.DMA_CH0, display_spi_config());
    let spi_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let mut oled = Sh1107::new(SPIInterface::new(spi_device, dc), rst);

    if let Err(e) = oled.init(&mut delay).await {
        error!("Display init failed: {}", Debug2Format(&e));
    }
    if let Err(e) = show_splash(&mut oled).await {
        warn!("Splash screen failed: {}", Debug2Format(&e));
    }
    info!("Display initialized");

    // Thermometer on the PIO one-wire program
    let mut pio = Pio::new(p.PIO0, Irqs);
    let prg = PioOneWireProgram::new(&mut pio.common);
    let onewire = PioOneWire::new(&mut pio.common, pio.sm0, p.PIN_16, &prg);
    let mut thermometer = Ds18b20::new(onewire);
    thermometer.set_resolution(Resolution::Bits9).await;

    // Current test points
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let regulator = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let diode = AdcChannel::new_pin(p.PIN_27, Pull::None);
    let mut test_points = TestPoints::new(adc, regulator, diode);

    // Mode selector (active-low with internal pull-up)
    let mut selector = ModeSelector::new(Input::new(p.PIN_2, Pull::Up), Input::new(p.PIN_3, Pull::Up));

    let calibration = Calibration::for_preset(ACTIVE_PRESET);
    info!(
        "Calibration: {} ohm, {} A full scale",
        calibration.resistor_ohms, calibration.max_current
    );
    let mut monitor: Monitor = Monitor::new(calibration, TemperatureReader::default());

    Timer::after_millis(SPLASH_MS).await;

    info!("Begin loop logic");
    let mut last_state: Option<SelectorState> = None;
    loop {
        let state = match selector.read_selector() {
            Ok(state) => state,
            Err(never) => match never {},
        };
        if last_state != Some(state) {
            info!("Selector: {}", state.label());
            last_state = Some(state);
        }

        match monitor.step(state, &mut test_points, &mut thermometer, &mut oled).await {
            Ok(reading) => {
                if reading.switched {
                    info!("Showing {} meter", reading.meter.label());
                }
                match reading.meter {
                    Meter::Power => debug!(
                        "current = {} A (~{} W optical)",
                        reading.value,
                        monitor.calibration().optical_power(reading.value)
                    ),
                    Meter::Temperature => debug!("temp = {} deg C", reading.value),
                }
            }
            Err(e) => warn!("Drawing meter failed: {}", Debug2Format(&e)),
        }

        if let Err(e) = oled.show().await {
            warn!("Display update failed: {}", Debug2Format(&e));
        }

        Timer::after_millis(LOOP_DELAY_MS).await;
    }
}
