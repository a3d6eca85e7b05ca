//! Laser monitor library: sampling, filtering and mode selection for the
//! laser-cutter power/temperature display.
//!
//! Everything in here is hardware-agnostic and runs on the host:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu
//! ```
//! The RP2040 binary (`main.rs`) wires these pieces to the ADC, the one-wire
//! bus, the selector switch and the SH1107 panel.

// Tests need std for the harness, the firmware does not
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod calibration;
pub mod ds18b20;
pub mod filter;
pub mod meters;
pub mod monitor;
pub mod sampler;
pub mod scheduler;
pub mod selector;
pub mod sh1107;
pub mod temperature;

pub const MIN_TEMP: f32 = 1.0; // Lowest temperature shown on the slider (°C)
pub const MAX_TEMP: f32 = 99.0; // Highest temperature shown on the slider (°C)
pub const SAMPLE_COUNT: usize = 8; // Current samples in the moving average
pub const METER_COUNT: u32 = 2; // Meters visited in auto-cycle mode (power, temperature)
pub const DWELL_ITERATIONS: u32 = 50; // Loop iterations spent on each meter in auto-cycle mode
pub const LOOP_DELAY_MS: u64 = 100; // Pause at the end of every loop iteration
pub const SPLASH_MS: u64 = 2000; // Boot splash duration

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
