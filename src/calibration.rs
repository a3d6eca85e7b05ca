//! Calibration constants for the current measurement.
//!
//! The driver board has a jumper block that fits one of five current-limiting
//! resistors. `ACTIVE_PRESET` has to match the jumper, otherwise the power
//! gauge reads wrong by the ratio of the two resistor values.

pub const ADC_MAX: u16 = 1023; // Full-scale count of the 10-bit conversion
pub const ADC_REFERENCE_VOLTAGE: f32 = 3.3; // ADC reference (V)
pub const PROBE_SCALE: f32 = 3.61; // Voltage divider on the test points
pub const OPTICAL_GAIN: f32 = 1.1; // Optical output per amp of diode current (W/A)

pub const ACTIVE_PRESET: CurrentPreset = CurrentPreset::Amps2_5;

/// Resistor presets selectable by the hardware jumpers.
///
/// Every preset drops the same 2.75 V at its rated current.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CurrentPreset {
    Amps0_5,
    Amps1_0,
    Amps1_5,
    Amps2_0,
    Amps2_5,
}

impl CurrentPreset {
    /// Rated (and displayed maximum) current in amps.
    pub const fn max_current(self) -> f32 {
        match self {
            Self::Amps0_5 => 0.5,
            Self::Amps1_0 => 1.0,
            Self::Amps1_5 => 1.5,
            Self::Amps2_0 => 2.0,
            Self::Amps2_5 => 2.5,
        }
    }

    /// Current-limiting resistor in ohms.
    pub const fn resistor_ohms(self) -> f32 {
        match self {
            Self::Amps0_5 => 5.5,
            Self::Amps1_0 => 2.75,
            Self::Amps1_5 => 1.83,
            Self::Amps2_0 => 1.375,
            Self::Amps2_5 => 1.1,
        }
    }
}

/// Conversion parameters for turning ADC counts into diode current.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Calibration {
    pub reference_voltage: f32,
    pub adc_max: u16,
    pub probe_scale: f32,
    pub resistor_ohms: f32,
    pub max_current: f32,
    pub optical_gain: f32,
}

impl Calibration {
    pub const fn for_preset(preset: CurrentPreset) -> Self {
        Self {
            reference_voltage: ADC_REFERENCE_VOLTAGE,
            adc_max: ADC_MAX,
            probe_scale: PROBE_SCALE,
            resistor_ohms: preset.resistor_ohms(),
            max_current: preset.max_current(),
            optical_gain: OPTICAL_GAIN,
        }
    }

    /// Volts at the test point for a raw ADC count.
    #[inline]
    pub fn voltage(&self, raw: u16) -> f32 {
        raw as f32 * (self.reference_voltage / self.adc_max as f32) * self.probe_scale
    }

    /// Estimated optical output at the workpiece for a diode current.
    #[inline]
    pub fn optical_power(&self, current: f32) -> f32 {
        current * self.optical_gain
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::for_preset(ACTIVE_PRESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: [CurrentPreset; 5] = [
        CurrentPreset::Amps0_5,
        CurrentPreset::Amps1_0,
        CurrentPreset::Amps1_5,
        CurrentPreset::Amps2_0,
        CurrentPreset::Amps2_5,
    ];

    #[test]
    fn test_default_is_active_preset() {
        let cal = Calibration::default();
        assert_eq!(cal.max_current, 2.5);
        assert_eq!(cal.resistor_ohms, 1.1);
        assert_eq!(cal.adc_max, 1023);
    }

    #[test]
    fn test_presets_share_drop_voltage() {
        for preset in PRESETS {
            let drop = preset.max_current() * preset.resistor_ohms();
            assert!((drop - 2.75).abs() < 0.01, "{preset:?} drops {drop} V");
        }
    }

    #[test]
    fn test_voltage_full_scale() {
        let cal = Calibration::default();
        assert_eq!(cal.voltage(0), 0.0);
        let full = cal.voltage(ADC_MAX);
        assert!((full - ADC_REFERENCE_VOLTAGE * PROBE_SCALE).abs() < 1e-4);
    }

    #[test]
    fn test_optical_power() {
        let cal = Calibration::default();
        assert!((cal.optical_power(2.0) - 2.2).abs() < 1e-6);
    }
}
