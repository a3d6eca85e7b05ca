//! SH1107 panel wiring and the boot splash.
//!
//! Pin mapping:
//! - DC: GPIO8
//! - CS: GPIO9
//! - SCLK: GPIO10 (SPI1 CLK)
//! - MOSI: GPIO11 (SPI1 TX)
//! - RST: GPIO12

use display_interface::{AsyncWriteOnlyDataCommand, DisplayError};
use embassy_rp::spi::{Config, Phase, Polarity};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::digital::OutputPin;
use heapless::String;

use core::fmt::Write;

use laser_monitor_rs::sh1107::{HEIGHT, Sh1107, WIDTH};
use laser_monitor_rs::VERSION;

/// SPI configuration for the SH1107 (mode 3).
pub fn display_spi_config() -> Config {
    let mut config = Config::default();
    config.frequency = 2_000_000;
    config.phase = Phase::CaptureOnSecondTransition;
    config.polarity = Polarity::IdleHigh;
    config
}

/// Framed title and firmware version.
pub async fn show_splash<DI, RST>(display: &mut Sh1107<DI, RST>) -> Result<(), DisplayError>
where
    DI: AsyncWriteOnlyDataCommand,
    RST: OutputPin,
{
    display.clear(BinaryColor::Off)?;
    display.draw_rectangle(Point::zero(), Size::new(WIDTH as u32, HEIGHT as u32), BinaryColor::On, false)?;

    let mut version: String<16> = String::new();
    let _ = write!(version, "v{}", VERSION);
    display.draw_text("Laser Monitor", Point::new(12, 26), BinaryColor::On)?;
    display.draw_text(&version, Point::new(44, 44), BinaryColor::On)?;
    display.show().await
}
