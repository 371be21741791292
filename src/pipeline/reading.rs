//! Reading model and normalisation.
//!
//! A `RawReading` is what the sensor put on the wire. A `Reading` is what ends
//! up in the `weather` table: three text columns, stamped locally at insert
//! time (the sensor sends no capture time).

use chrono::{DateTime, Local};

/// Suffix appended to every stored temperature.
pub const UNIT_SUFFIX: &str = " °C";

/// `strftime` layout of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoded wire record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    /// Location label (`l` on the wire), kept verbatim.
    pub city: String,
    /// Temperature in °C (`t` on the wire).
    pub temperature: f64,
}

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub date:        String,
    pub city:        String,
    pub temperature: String,
}

/// Round to the nearest whole degree, ties to even. Never returns `-0.0`.
pub fn round_temperature(value: f64) -> f64 {
    let rounded = value.round_ties_even();
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Whole degrees plus unit. Kept as a float so large values print exactly
/// instead of clamping to the integer range.
pub fn format_temperature(value: f64) -> String {
    format!("{:.0}{}", round_temperature(value), UNIT_SUFFIX)
}

/// Turn a wire record into a storable row stamped with `now`.
pub fn normalize(raw: RawReading, now: DateTime<Local>) -> Reading {
    Reading {
        date:        now.format(DATE_FORMAT).to_string(),
        city:        raw.city,
        temperature: format_temperature(raw.temperature),
    }
}
