//! Per-iteration control flow: pick a meter, take its reading, draw it.
//!
//! [`Monitor`] owns all state that has to survive between iterations (the
//! current filter, the cycle counter and the widget on screen), so the
//! firmware loop only has to hand it the hardware each time round.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::calibration::Calibration;
use crate::filter::CurrentFilter;
use crate::meters::{Gauge, POWER_STYLE, Slider, TEMPERATURE_STYLE};
use crate::sampler::{AnalogInputs, AnalogSampler};
use crate::scheduler::CycleScheduler;
use crate::selector::SelectorState;
use crate::temperature::{TemperatureReader, Thermometer};
use crate::{DWELL_ITERATIONS, METER_COUNT, SAMPLE_COUNT};

/// Which readout is on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Meter {
    Power,
    Temperature,
}

impl Meter {
    /// Map a scheduler meter number (1-based) to a meter.
    pub const fn from_index(index: u32) -> Self {
        match index {
            2 => Self::Temperature,
            _ => Self::Power,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Temperature => "temperature",
        }
    }
}

/// Outcome of one iteration.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Reading {
    pub meter: Meter,
    /// Filtered current (A) or clamped temperature (°C).
    pub value: f32,
    /// The widget was rebuilt this iteration.
    pub switched: bool,
}

/// The widget currently owning the screen.
enum ActiveMeter {
    Power(Gauge),
    Temperature(Slider),
}

impl ActiveMeter {
    const fn meter(&self) -> Meter {
        match self {
            Self::Power(_) => Meter::Power,
            Self::Temperature(_) => Meter::Temperature,
        }
    }

    fn draw<D>(&mut self, value: f32, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match self {
            Self::Power(gauge) => {
                gauge.set_value(value);
                gauge.draw(target)
            }
            Self::Temperature(slider) => {
                slider.set_value(value);
                slider.draw(target)
            }
        }
    }
}

pub struct Monitor<const N: usize = SAMPLE_COUNT> {
    sampler: AnalogSampler,
    filter: CurrentFilter<N>,
    reader: TemperatureReader,
    scheduler: CycleScheduler,
    active: Option<ActiveMeter>,
    meter_count: u32,
    dwell: u32,
}

impl<const N: usize> Monitor<N> {
    pub fn new(calibration: Calibration, reader: TemperatureReader) -> Self {
        Self {
            sampler: AnalogSampler::new(calibration),
            filter: CurrentFilter::new(),
            reader,
            scheduler: CycleScheduler::new(),
            active: None,
            meter_count: METER_COUNT,
            dwell: DWELL_ITERATIONS,
        }
    }

    /// Override how long auto-cycle mode stays on each meter.
    pub fn with_dwell(mut self, dwell: u32) -> Self {
        self.dwell = dwell;
        self
    }

    pub const fn calibration(&self) -> &Calibration {
        self.sampler.calibration()
    }

    /// Meter currently on screen, if any.
    pub fn active_meter(&self) -> Option<Meter> {
        self.active.as_ref().map(ActiveMeter::meter)
    }

    /// Resolve the selector to a meter. Advances the cycle counter in auto mode only.
    pub fn select_meter(&mut self, selector: SelectorState) -> Meter {
        match selector {
            SelectorState::AutoCycle => Meter::from_index(self.scheduler.next_meter(self.meter_count, self.dwell)),
            SelectorState::TempOnly => Meter::Temperature,
            SelectorState::PowerOnly | SelectorState::Unused => Meter::Power,
        }
    }

    /// Sample the test points, feed the filter and return the filtered current.
    pub fn read_power<A: AnalogInputs>(&mut self, analog: &mut A) -> f32 {
        let current = self.sampler.read_current(analog);
        self.filter.push_sample(current);
        self.filter.mean_current()
    }

    /// Run one iteration and leave the frame in `display`.
    ///
    /// The caller flushes the frame and sleeps until the next iteration.
    pub async fn step<A, T, D>(
        &mut self,
        selector: SelectorState,
        analog: &mut A,
        thermometer: &mut T,
        display: &mut D,
    ) -> Result<Reading, D::Error>
    where
        A: AnalogInputs,
        T: Thermometer,
        D: DrawTarget<Color = BinaryColor>,
    {
        let meter = self.select_meter(selector);
        let value = match meter {
            Meter::Power => self.read_power(analog),
            Meter::Temperature => self.reader.read_temperature(thermometer).await,
        };

        let switched = self.active_meter() != Some(meter);
        if switched {
            display.clear(BinaryColor::Off)?;
            self.active = Some(self.build_widget(meter));
        }
        if let Some(active) = self.active.as_mut() {
            active.draw(value, display)?;
        }

        Ok(Reading { meter, value, switched })
    }

    fn build_widget(&self, meter: Meter) -> ActiveMeter {
        match meter {
            Meter::Power => ActiveMeter::Power(Gauge::new(0.0, self.calibration().max_current, POWER_STYLE)),
            Meter::Temperature => {
                ActiveMeter::Temperature(Slider::new(self.reader.min(), self.reader.max(), TEMPERATURE_STYLE))
            }
        }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(Calibration::default(), TemperatureReader::default())
    }
}
