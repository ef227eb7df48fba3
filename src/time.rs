use std::sync::LazyLock;

use hifitime::Epoch;
use regex::Regex;

use crate::{constants::JulianDay, horizons_errors::HorizonsError};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static HORIZONS_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-([A-Z][a-z]{2})-(\d{1,2})\s+(\d{1,2}):(\d{2})$")
        .expect("static timestamp regex")
});

/// Transformation from a calendar date `YYYY-M-D` to a julian day (UTC, at midnight)
///
/// Argument
/// --------
/// * `date`: a date such as `2000-1-1` or `2013-09-01`
///
/// Return
/// ------
/// * the julian day, or a `Config` error naming the expected format
pub fn calendar_to_jd(date: &str) -> Result<JulianDay, HorizonsError> {
    let invalid = || HorizonsError::Config(format!("Expected YYYY-M-D, got {date}"));

    let parts: Vec<&str> = date.trim().split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let day: u8 = day.parse().map_err(|_| invalid())?;

    let epoch =
        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|_| invalid())?;
    Ok(epoch_to_jd(epoch))
}

/// Julian day (UTC) of an epoch
pub fn epoch_to_jd(epoch: Epoch) -> JulianDay {
    epoch.to_jde_utc_days()
}

/// Epoch of a julian day expressed in UTC
pub fn jd_to_epoch(jd: JulianDay) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// Parse the `YYYY-Mon-DD HH:MM` timestamps of Horizons observer tables (UTC).
///
/// Return
/// ------
/// * `None` if the text does not follow the pattern or names an impossible date
pub fn parse_horizons_timestamp(text: &str) -> Option<Epoch> {
    let caps = HORIZONS_TIMESTAMP.captures(text.trim())?;

    let year: i32 = caps[1].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == &caps[2])? as u8 + 1;
    let day: u8 = caps[3].parse().ok()?;
    let hour: u8 = caps[4].parse().ok()?;
    let minute: u8 = caps[5].parse().ok()?;

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, 0, 0).ok()
}
