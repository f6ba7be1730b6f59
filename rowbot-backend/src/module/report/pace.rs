//! Fixed-point time and pace arithmetic.
//!
//! Every value is an integer count of tenths of a second, so nothing here
//! touches floating point.

use rowbot_common::Tenths;

use super::error::ReportError;

/// Reference distance for pace, in meters
pub const PACE_DISTANCE: u64 = 500;

const TENTHS_PER_SECOND: u64 = 10;
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Format tenths of a second as `MM:SS.T`, or `HH:MM:SS.T` from one hour up.
///
/// The tenths digit is `value % 10`; nothing is rounded.
pub fn format_time(value: Tenths) -> String {
    let total_seconds = value / TENTHS_PER_SECOND;
    let tenths = value % TENTHS_PER_SECOND;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, tenths)
    } else {
        format!("{:02}:{:02}.{}", minutes, seconds, tenths)
    }
}

/// Time per 500 m, in tenths of a second.
///
/// Floor division gives the same digits `format_time` would show for the
/// exact quotient, since the display truncates to tenths anyway.
pub fn calculate_pace(distance: u32, time: Tenths) -> Result<Tenths, ReportError> {
    if distance == 0 {
        return Err(ReportError::UndefinedPace { time });
    }
    let scaled = time
        .checked_mul(PACE_DISTANCE)
        .ok_or(ReportError::PaceOverflow { time })?;
    Ok(scaled / u64::from(distance))
}

pub fn format_distance(meters: u32) -> String {
    meters.to_string()
}

pub fn format_stroke_rate(rate: Option<u32>) -> String {
    rate.unwrap_or(0).to_string()
}
