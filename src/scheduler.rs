//! Dwell-based meter rotation for auto-cycle mode.

/// Counts auto-cycle iterations and maps them to a meter number.
#[derive(Default, Debug)]
pub struct CycleScheduler {
    counter: u32,
}

impl CycleScheduler {
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Meter number in `1..=meter_count` for this call, then advance.
    ///
    /// Each meter is held for `dwell` consecutive calls. The counter wraps at
    /// `u32::MAX`, which only causes a short dwell once every few years.
    pub fn next_meter(&mut self, meter_count: u32, dwell: u32) -> u32 {
        let mode = (self.counter / dwell.max(1)) % meter_count.max(1) + 1;
        self.counter = self.counter.wrapping_add(1);
        mode
    }

    #[cfg(test)]
    pub const fn counter(&self) -> u32 {
        self.counter
    }
}
