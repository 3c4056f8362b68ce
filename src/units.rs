//! Conversions from toolpath units to ISEL integer units.
//!
//! Toolpaths are in millimeters and millimeters per minute. The controller
//! wants micrometers (µm) for positions and micrometers per second (µm/s)
//! for velocities, always as integers.

use thiserror::Error;

/// Micrometers in one millimeter
pub const UM_PER_MM: f64 = 1000.0;

/// Seconds in one minute
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Unit system announced in the operation header
pub const SPEED_UNIT: &str = "mm/min";

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConversionError {
    #[error("value {value} is not a finite number")]
    NonFinite { value: f64 },
}

fn finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::NonFinite { value })
    }
}

/// Length in mm to the nearest µm.
pub fn length(mm: f64) -> Result<i64, ConversionError> {
    Ok((finite(mm)? * UM_PER_MM).round() as i64)
}

/// Feed rate in mm/min to µm/s, truncated.
pub fn velocity(mm_per_min: f64) -> Result<i64, ConversionError> {
    Ok((finite(mm_per_min)? * UM_PER_MM / SECONDS_PER_MINUTE).trunc() as i64)
}

/// Unitless count (tool number, spindle RPM) to the nearest integer.
pub fn natural(value: f64) -> Result<i64, ConversionError> {
    Ok(finite(value)?.round() as i64)
}
