//! DS18B20 protocol helpers that don't touch the bus.
//!
//! The bus transactions live in the firmware (`sensor.rs`); decoding and CRC
//! checking are here so they can be tested on the host.

pub const CMD_SKIP_ROM: u8 = 0xCC;
pub const CMD_CONVERT_T: u8 = 0x44;
pub const CMD_WRITE_SCRATCHPAD: u8 = 0x4E;
pub const CMD_READ_SCRATCHPAD: u8 = 0xBE;

pub const SCRATCHPAD_LEN: usize = 9;

/// What the sensor library reports for a device that doesn't answer (°C).
pub const DISCONNECTED_C: f32 = -127.0;

/// Resolution settings for temperature readings
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resolution {
    Bits9 = 0x1F,  // 0.5°C resolution, 93.75ms conversion time
    Bits10 = 0x3F, // 0.25°C resolution, 187.5ms conversion time
    Bits11 = 0x5F, // 0.125°C resolution, 375ms conversion time
    Bits12 = 0x7F, // 0.0625°C resolution, 750ms conversion time
}

impl Resolution {
    /// Worst-case conversion time, rounded up to whole milliseconds.
    pub const fn conversion_time_ms(self) -> u64 {
        match self {
            Self::Bits9 => 94,
            Self::Bits10 => 188,
            Self::Bits11 => 375,
            Self::Bits12 => 750,
        }
    }

    /// Resolution encoded in the scratchpad configuration byte.
    pub const fn from_config(config: u8) -> Self {
        match (config >> 5) & 0x03 {
            0 => Self::Bits9,
            1 => Self::Bits10,
            2 => Self::Bits11,
            _ => Self::Bits12,
        }
    }

    /// Mask for the temperature LSBs that are defined at this resolution.
    const fn lsb_mask(self) -> i16 {
        match self {
            Self::Bits9 => !0x07,
            Self::Bits10 => !0x03,
            Self::Bits11 => !0x01,
            Self::Bits12 => !0x00,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SensorError {
    /// Scratchpad failed the CRC check (usually nothing on the bus).
    CrcMismatch,
    /// The sensor runs at a different resolution than configured, so the
    /// conversion may not have finished (a freshly powered sensor is at 12 bits).
    ResolutionMismatch(Resolution),
}

/// Write Scratchpad payload that sets the resolution (alarm registers zeroed).
pub const fn resolution_command(resolution: Resolution) -> [u8; 5] {
    [CMD_SKIP_ROM, CMD_WRITE_SCRATCHPAD, 0x00, 0x00, resolution as u8]
}

/// Dallas/Maxim CRC-8 (polynomial 0x31, reflected)
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut data_byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ data_byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            data_byte >>= 1;
        }
    }
    crc
}

/// Temperature in °C from a raw scratchpad read.
///
/// `expected` is the resolution the conversion was timed for; a scratchpad
/// reporting another one is rejected.
pub fn decode_scratchpad(data: &[u8; SCRATCHPAD_LEN], expected: Resolution) -> Result<f32, SensorError> {
    // CRC over all nine bytes is zero when the trailing CRC byte matches
    if crc8(data) != 0 {
        return Err(SensorError::CrcMismatch);
    }
    let resolution = Resolution::from_config(data[4]);
    if resolution != expected {
        return Err(SensorError::ResolutionMismatch(resolution));
    }
    let raw = i16::from_le_bytes([data[0], data[1]]) & resolution.lsb_mask();
    Ok(raw as f32 / 16.0)
}
