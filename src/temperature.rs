//! Temperature readout with range clamping.

use crate::ds18b20::{DISCONNECTED_C, SensorError};
use crate::{MAX_TEMP, MIN_TEMP};

/// A single temperature sensor on the bus.
pub trait Thermometer {
    /// Start a conversion, wait until it has finished and fetch the result in °C.
    ///
    /// The wait is part of the call: nothing else runs until it returns.
    async fn measure(&mut self) -> Result<f32, SensorError>;
}

/// Clamps readings into the range the slider can show.
///
/// A missing sensor reads as [`DISCONNECTED_C`] and therefore lands on the
/// lower bound, same as a genuinely cold reading.
pub struct TemperatureReader {
    min: f32,
    max: f32,
}

impl TemperatureReader {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub async fn read_temperature<T: Thermometer>(&self, sensor: &mut T) -> f32 {
        let raw = sensor.measure().await.unwrap_or(DISCONNECTED_C);
        self.clamp(raw)
    }

    pub fn clamp(&self, celsius: f32) -> f32 {
        if celsius.is_nan() {
            return self.min;
        }
        celsius.clamp(self.min, self.max)
    }

    pub const fn min(&self) -> f32 {
        self.min
    }

    pub const fn max(&self) -> f32 {
        self.max
    }
}

impl Default for TemperatureReader {
    fn default() -> Self {
        Self::new(MIN_TEMP, MAX_TEMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct FakeSensor(Result<f32, SensorError>);

    impl Thermometer for FakeSensor {
        async fn measure(&mut self) -> Result<f32, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_in_range_passes_through() {
        let reader = TemperatureReader::default();
        for celsius in [1.0, 23.5, 42.0, 98.9, 99.0] {
            assert_eq!(reader.clamp(celsius), celsius);
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let reader = TemperatureReader::default();
        assert_eq!(reader.clamp(-55.0), MIN_TEMP);
        assert_eq!(reader.clamp(0.5), MIN_TEMP);
        assert_eq!(reader.clamp(125.0), MAX_TEMP);
        assert_eq!(reader.clamp(f32::NAN), MIN_TEMP);
    }

    #[test]
    fn test_clamp_covers_sensor_range() {
        let reader = TemperatureReader::default();
        // Full DS18B20 span in 0.0625 °C steps
        for raw in (-55 * 16)..=(125 * 16) {
            let celsius = reader.clamp(raw as f32 / 16.0);
            assert!((MIN_TEMP..=MAX_TEMP).contains(&celsius));
        }
    }

    #[test]
    fn test_read_from_sensor() {
        let reader = TemperatureReader::default();
        let mut sensor = FakeSensor(Ok(36.5));
        assert_eq!(block_on(reader.read_temperature(&mut sensor)), 36.5);
    }

    #[test]
    fn test_disconnected_sensor_reads_minimum() {
        let reader = TemperatureReader::default();
        let mut sensor = FakeSensor(Err(SensorError::CrcMismatch));
        assert_eq!(block_on(reader.read_temperature(&mut sensor)), MIN_TEMP);
    }
}
