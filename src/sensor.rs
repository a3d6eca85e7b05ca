use defmt::{debug, warn};
use embassy_rp::pio;
use embassy_rp::pio_programs::onewire::PioOneWire;
use embassy_time::Timer;

use laser_monitor_rs::ds18b20::{
    self, CMD_CONVERT_T, CMD_READ_SCRATCHPAD, CMD_SKIP_ROM, Resolution, SCRATCHPAD_LEN, SensorError,
};
use laser_monitor_rs::temperature::Thermometer;

/// DS18B20 temperature sensor driver, single device on the bus
pub struct Ds18b20<'d, PIO: pio::Instance, const SM: usize> {
    wire: PioOneWire<'d, PIO, SM>,
    resolution: Resolution,
}

impl<'d, PIO: pio::Instance, const SM: usize> Ds18b20<'d, PIO, SM> {
    pub fn new(wire: PioOneWire<'d, PIO, SM>) -> Self {
        // Power-on default of the sensor
        Self {
            wire,
            resolution: Resolution::Bits12,
        }
    }

    /// Set the resolution for all devices (broadcast)
    pub async fn set_resolution(&mut self, resolution: Resolution) {
        self.wire.write_bytes(&ds18b20::resolution_command(resolution)).await;
        self.resolution = resolution;
        debug!("DS18B20 resolution set, conversion takes {} ms", resolution.conversion_time_ms());
    }

    /// Start a new measurement. Allow `conversion_time_ms` before reading `temperature`.
    pub async fn start(&mut self) {
        self.wire.write_bytes(&[CMD_SKIP_ROM, CMD_CONVERT_T]).await;
    }

    /// Read the temperature of the only device on the bus.
    pub async fn temperature(&mut self) -> Result<f32, SensorError> {
        self.wire.write_bytes(&[CMD_SKIP_ROM, CMD_READ_SCRATCHPAD]).await;
        let mut data = [0; SCRATCHPAD_LEN];
        self.wire.read_bytes(&mut data).await;
        ds18b20::decode_scratchpad(&data, self.resolution)
    }

    async fn convert(&mut self) -> Result<f32, SensorError> {
        self.start().await;
        // Nothing else runs on this core while the sensor converts
        Timer::after_millis(self.resolution.conversion_time_ms()).await;
        self.temperature().await
    }
}

impl<'d, PIO: pio::Instance, const SM: usize> Thermometer for Ds18b20<'d, PIO, SM> {
    async fn measure(&mut self) -> Result<f32, SensorError> {
        let mut result = self.convert().await;
        if let Err(SensorError::ResolutionMismatch(actual)) = result {
            // Sensor was (re)attached after boot and came up at its default
            warn!(
                "DS18B20 reports {} ms conversions, reconfiguring",
                actual.conversion_time_ms()
            );
            self.set_resolution(self.resolution).await;
            result = self.convert().await;
        }
        match result {
            Err(SensorError::CrcMismatch) => warn!("DS18B20 scratchpad CRC mismatch, sensor disconnected?"),
            Err(SensorError::ResolutionMismatch(_)) => warn!("DS18B20 ignored the resolution command"),
            Ok(_) => {}
        }
        result
    }
}
