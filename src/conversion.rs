use crate::constants::{Degree, DEG_PER_HOUR};

/// Split a sexagesimal string into its three numeric components.
///
/// The sign of the first component is returned separately so that `-00 30 14.2`
/// keeps its negative sign even though `-00` parses to zero.
fn split_sexagesimal(text: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [first, minutes, seconds] = parts.as_slice() else {
        return None;
    };

    let sign = if first.starts_with('-') { -1.0 } else { 1.0 };
    let whole: f64 = first.trim_start_matches(['-', '+']).parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;

    if whole < 0.0 || !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some((sign, whole, minutes, seconds))
}

/// Parse a right ascension string to degrees
///
/// Arguments
/// ---------
/// * `ra`: a string representing the right ascension in the format `HH MM SS.SS`
///
/// Returns
/// -------
/// * the right ascension in degrees, `None` if the input format is invalid
pub fn hms_to_deg(ra: &str) -> Option<Degree> {
    let (sign, h, m, s) = split_sexagesimal(ra)?;
    if sign < 0.0 {
        return None;
    }
    Some((h + m / 60.0 + s / 3600.0) * DEG_PER_HOUR)
}

/// Parse a declination string to degrees
///
/// Arguments
/// ---------
/// * `dec`: a string representing the declination in the format `±DD MM SS.SS`
///
/// Returns
/// -------
/// * the declination in degrees, `None` if the input format is invalid
pub fn dms_to_deg(dec: &str) -> Option<Degree> {
    let (sign, d, m, s) = split_sexagesimal(dec)?;
    Some(sign * (d + m / 60.0 + s / 3600.0))
}
