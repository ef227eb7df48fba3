//! # Horizons table parsers
//!
//! Turn a [`RawEphemerisBlock`] into a typed [`EphemerisSeries`].
//!
//! * [`parse_vectors`] reads `VECTORS` tables produced with `CSV format = YES`. Each record
//!   holds eleven comma-separated fields (many lines end with a trailing comma):
//!
//!   ```text
//!   JDTDB, Calendar Date (TDB), X, Y, Z, VX, VY, VZ, LT, RG, RR,
//!   ```
//!
//! * [`parse_ra_dec`] reads whitespace-separated observer tables whose first columns are
//!
//!   ```text
//!   YYYY-Mon-DD HH:MM [flags] HH MM SS.ff ±DD MM SS.f ...
//!   ```
//!
//!   Solar/lunar presence flags (`*`, `C`, `N`, `A`, `m`, `r`, `e`, `t`, `s`) between the time
//!   and the right ascension are skipped; extra trailing columns are ignored.
//!
//! Both parsers are all-or-nothing: the first malformed line aborts the whole block and no
//! partial series is returned.
use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use nalgebra::Vector3;

use crate::{
    constants::SECONDS_PER_DAY,
    conversion::{dms_to_deg, hms_to_deg},
    horizons_errors::ParseEphemError,
    time::parse_horizons_timestamp,
};

use super::{
    raw_block::RawEphemerisBlock,
    samples::{EphemerisSeries, RaDecSample, VectorSample},
};

/// Number of fields of a CSV `VECTORS` record
pub const VECTOR_FIELDS: usize = 11;

/// Minimum number of whitespace tokens of an observer record (date, time, RA×3, Dec×3)
pub const RADEC_TOKENS: usize = 8;

fn number(line: usize, field: &'static str, value: &str) -> Result<f64, ParseEphemError> {
    value
        .parse::<f64>()
        .map_err(|_| ParseEphemError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

/// Parse a CSV `VECTORS` block.
///
/// Arguments
/// ---------
/// * `block`: the raw table, one record per data line
///
/// Return
/// ------
/// * the samples in input order, light time converted from days to seconds
/// * `ParseEphemError::FieldCount` when a line does not hold exactly eleven non-empty fields
pub fn parse_vectors(
    block: &RawEphemerisBlock,
) -> Result<EphemerisSeries<VectorSample>, ParseEphemError> {
    let mut samples = Vec::with_capacity(block.len());

    for (index, raw_line) in block.data_lines.iter().enumerate() {
        let line = index + 1;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(raw_line.as_bytes());

        let fields: Vec<String> = match reader.records().next() {
            Some(Ok(record)) => record
                .iter()
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Err(_)) | None => Vec::new(),
        };

        let [jd, calendar, x, y, z, vx, vy, vz, lt, rg, rr] = fields.as_slice() else {
            return Err(ParseEphemError::FieldCount {
                line,
                expected: VECTOR_FIELDS,
                found: fields.len(),
            });
        };

        samples.push(VectorSample {
            jd: number(line, "JDTDB", jd)?,
            calendar: calendar.clone(),
            position: Vector3::new(
                number(line, "X", x)?,
                number(line, "Y", y)?,
                number(line, "Z", z)?,
            ),
            velocity: Vector3::new(
                number(line, "VX", vx)?,
                number(line, "VY", vy)?,
                number(line, "VZ", vz)?,
            ),
            light_time: number(line, "LT", lt)? * SECONDS_PER_DAY,
            range: number(line, "RG", rg)?,
            range_rate: number(line, "RR", rr)?,
        });
    }

    EphemerisSeries::new(samples)
}

fn is_presence_flag(token: &str) -> bool {
    token
        .chars()
        .all(|c| matches!(c, '*' | 'C' | 'N' | 'A' | 'm' | 'r' | 'e' | 't' | 's'))
}

/// Parse a whitespace-separated observer (RA/Dec) block.
///
/// Arguments
/// ---------
/// * `block`: the raw table, one record per data line
///
/// Return
/// ------
/// * the samples in input order, RA and Dec in decimal degrees
/// * `ParseEphemError::TokenCount` when a line is too short, or the matching
///   `InvalidTimestamp` / `InvalidRa` / `InvalidDec` variant
pub fn parse_ra_dec(
    block: &RawEphemerisBlock,
) -> Result<EphemerisSeries<RaDecSample>, ParseEphemError> {
    let mut samples = Vec::with_capacity(block.len());

    for (index, raw_line) in block.data_lines.iter().enumerate() {
        let line = index + 1;
        let tokens: Vec<&str> = raw_line.split_whitespace().collect();
        let token_count = || ParseEphemError::TokenCount {
            line,
            expected: RADEC_TOKENS,
            found: tokens.len(),
        };

        if tokens.len() < RADEC_TOKENS {
            return Err(token_count());
        }

        let stamp = tokens[..2].iter().join(" ");
        let epoch =
            parse_horizons_timestamp(&stamp).ok_or_else(|| ParseEphemError::InvalidTimestamp {
                line,
                value: stamp.clone(),
            })?;

        let angles: Vec<&str> = tokens[2..]
            .iter()
            .copied()
            .skip_while(|token| is_presence_flag(token))
            .collect();
        if angles.len() < 6 {
            return Err(token_count());
        }

        let ra_text = angles[..3].iter().join(" ");
        let ra = hms_to_deg(&ra_text).ok_or(ParseEphemError::InvalidRa {
            line,
            value: ra_text.clone(),
        })?;

        let dec_text = angles[3..6].iter().join(" ");
        let dec = dms_to_deg(&dec_text).ok_or(ParseEphemError::InvalidDec {
            line,
            value: dec_text.clone(),
        })?;

        samples.push(RaDecSample { epoch, ra, dec });
    }

    EphemerisSeries::new(samples)
}
