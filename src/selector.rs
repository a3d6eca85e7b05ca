//! Two-bit mode selector switch.
//!
//! Both inputs are pulled up and the switch pulls them to ground, so a LOW pin
//! is a set bit. SWITCH1 is bit 0, SWITCH2 is bit 1.

use embedded_hal::digital::InputPin;

/// Display mode chosen by the selector switch.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum SelectorState {
    /// Alternate between power and temperature.
    #[default]
    AutoCycle,
    PowerOnly,
    TempOnly,
    /// Both bits set. Not wired on the front panel, shown as power.
    Unused,
}

impl SelectorState {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::AutoCycle,
            1 => Self::PowerOnly,
            2 => Self::TempOnly,
            _ => Self::Unused,
        }
    }

    /// Decode from the pin levels (`true` = pin reads LOW).
    pub const fn from_pins(switch1_low: bool, switch2_low: bool) -> Self {
        Self::from_bits(((switch2_low as u8) << 1) | switch1_low as u8)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AutoCycle => "auto",
            Self::PowerOnly => "power",
            Self::TempOnly => "temp",
            Self::Unused => "unused",
        }
    }
}

/// The two selector inputs.
pub struct ModeSelector<P1, P2> {
    switch1: P1,
    switch2: P2,
}

impl<P1, P2, E> ModeSelector<P1, P2>
where
    P1: InputPin<Error = E>,
    P2: InputPin<Error = E>,
{
    pub fn new(switch1: P1, switch2: P2) -> Self {
        Self { switch1, switch2 }
    }

    /// Read both pins. No debouncing, a switch caught mid-travel just shows
    /// for one iteration.
    pub fn read_selector(&mut self) -> Result<SelectorState, E> {
        let switch1_low = self.switch1.is_low()?;
        let switch2_low = self.switch2.is_low()?;
        Ok(SelectorState::from_pins(switch1_low, switch2_low))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct Pin {
        low: bool,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl InputPin for Pin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.low)
        }
    }

    /// Levels given as (SWITCH2, SWITCH1), `true` = HIGH.
    fn read(switch2_high: bool, switch1_high: bool) -> SelectorState {
        let mut selector = ModeSelector::new(Pin { low: !switch1_high }, Pin { low: !switch2_high });
        selector.read_selector().unwrap()
    }

    #[test]
    fn test_pin_truth_table() {
        assert_eq!(read(true, true), SelectorState::AutoCycle);
        assert_eq!(read(true, false), SelectorState::PowerOnly);
        assert_eq!(read(false, true), SelectorState::TempOnly);
        assert_eq!(read(false, false), SelectorState::Unused);
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(SelectorState::from_bits(0), SelectorState::AutoCycle);
        assert_eq!(SelectorState::from_bits(1), SelectorState::PowerOnly);
        assert_eq!(SelectorState::from_bits(2), SelectorState::TempOnly);
        assert_eq!(SelectorState::from_bits(3), SelectorState::Unused);
    }

    #[derive(Debug, PartialEq)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    /// Input behind an expander that may fail to answer.
    struct RemotePin {
        low: bool,
        fault: bool,
    }

    impl ErrorType for RemotePin {
        type Error = PinFault;
    }

    impl InputPin for RemotePin {
        fn is_high(&mut self) -> Result<bool, PinFault> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, PinFault> {
            if self.fault {
                Err(PinFault)
            } else {
                Ok(self.low)
            }
        }
    }

    #[test]
    fn test_pin_error_propagates() {
        let healthy = || RemotePin { low: true, fault: false };
        let broken = || RemotePin { low: true, fault: true };

        let mut selector = ModeSelector::new(broken(), healthy());
        assert_eq!(selector.read_selector(), Err(PinFault));
        let mut selector = ModeSelector::new(healthy(), broken());
        assert_eq!(selector.read_selector(), Err(PinFault));
        let mut selector = ModeSelector::new(healthy(), healthy());
        assert_eq!(selector.read_selector(), Ok(SelectorState::Unused));
    }

    #[test]
    fn test_default_is_auto() {
        assert_eq!(SelectorState::default(), SelectorState::AutoCycle);
    }
}
