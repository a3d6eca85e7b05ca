//! Diode current from the two analog test points.
//!
//! The regulator output and the diode anode are both brought out through a
//! divider. The difference between them is the drop over the current-limiting
//! resistor, which gives the diode current directly.

use crate::calibration::Calibration;

/// Source of the two raw ADC readings, already scaled to `0..=adc_max`.
pub trait AnalogInputs {
    /// Raw count at the regulator test point.
    fn read_regulator(&mut self) -> u16;

    /// Raw count at the diode test point.
    fn read_diode(&mut self) -> u16;
}

pub struct AnalogSampler {
    calibration: Calibration,
}

impl AnalogSampler {
    pub const fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Sample both test points and return the clamped diode current.
    pub fn read_current<A: AnalogInputs>(&self, inputs: &mut A) -> f32 {
        let regulator = inputs.read_regulator();
        let diode = inputs.read_diode();
        self.current_from_raw(regulator, diode)
    }

    /// Clamped current for a pair of raw counts.
    pub fn current_from_raw(&self, regulator: u16, diode: u16) -> f32 {
        let current = self.current_from_voltages(self.calibration.voltage(regulator), self.calibration.voltage(diode));
        self.clamp(current)
    }

    /// Unclamped current for a pair of test-point voltages.
    #[inline]
    pub fn current_from_voltages(&self, regulator: f32, diode: f32) -> f32 {
        (regulator - diode) / self.calibration.resistor_ohms
    }

    #[inline]
    pub fn clamp(&self, current: f32) -> f32 {
        current.clamp(0.0, self.calibration.max_current)
    }
}

impl Default for AnalogSampler {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{ADC_MAX, CurrentPreset};

    struct FixedInputs {
        regulator: u16,
        diode: u16,
    }

    impl AnalogInputs for FixedInputs {
        fn read_regulator(&mut self) -> u16 {
            self.regulator
        }

        fn read_diode(&mut self) -> u16 {
            self.diode
        }
    }

    #[test]
    fn test_known_voltages_give_one_amp() {
        let sampler = AnalogSampler::default();
        assert_eq!(sampler.current_from_voltages(3.0, 1.9), 1.0);
    }

    #[test]
    fn test_output_always_in_range() {
        let sampler = AnalogSampler::default();
        for regulator in 0..=ADC_MAX {
            for diode in 0..=ADC_MAX {
                let current = sampler.current_from_raw(regulator, diode);
                assert!((0.0..=2.5).contains(&current), "({regulator}, {diode}) -> {current}");
            }
        }
    }

    #[test]
    fn test_reversed_drop_clamps_to_zero() {
        let sampler = AnalogSampler::default();
        assert_eq!(sampler.current_from_raw(100, 900), 0.0);
    }

    #[test]
    fn test_full_drop_clamps_to_max() {
        let sampler = AnalogSampler::default();
        assert_eq!(sampler.current_from_raw(ADC_MAX, 0), 2.5);
    }

    #[test]
    fn test_read_current_uses_inputs() {
        let sampler = AnalogSampler::default();
        // 50 counts ≈ 0.58 V after the divider, ≈ 0.53 A over 1.1 Ω
        let mut inputs = FixedInputs { regulator: 600, diode: 550 };
        let current = sampler.read_current(&mut inputs);
        let expected = 50.0 * (3.3 / 1023.0) * 3.61 / 1.1;
        assert!((current - expected).abs() < 1e-4);
    }

    #[test]
    fn test_preset_changes_limit() {
        let sampler = AnalogSampler::new(Calibration::for_preset(CurrentPreset::Amps0_5));
        assert_eq!(sampler.current_from_raw(ADC_MAX, 0), 0.5);
    }
}
