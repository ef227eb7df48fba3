//! # Typed ephemeris samples and series
//!
//! Two sample shapes come out of a Horizons session:
//!
//! * [`VectorSample`]: one row of a `VECTORS` table (state vector, light time, range),
//! * [`RaDecSample`]: one row of an observer table reduced to the astrometric RA/Dec.
//!
//! Both implement [`Sample`], which exposes the julian day used for ordering, so a single
//! [`EphemerisSeries`] container serves both. A series is built once by the parser, checked
//! for non-decreasing epochs, and is immutable afterwards.
//!
//! ## Bracketing
//!
//! [`EphemerisSeries::lookup_bracket`] finds the two samples surrounding a julian day with a
//! strict interior-only rule: the index of the earlier sample must lie strictly inside
//! `(0, len - 1)`. Queries at or before the first sample, after the last one, or falling in
//! the very first interval are rejected with [`HorizonsError::OutOfRange`]. A query equal to
//! the last epoch is accepted and bracketed by the final interval.
use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{Degree, JulianDay, Seconds},
    horizons_errors::{HorizonsError, ParseEphemError},
    time::epoch_to_jd,
};

/// Anything that can be placed on the julian-day axis of a series.
pub trait Sample {
    fn jd(&self) -> JulianDay;
}

/// One record of a Horizons `VECTORS` table in CSV format.
///
/// Units follow the dialogue choices (AU and days for the series mode),
/// except `light_time` which is converted to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSample {
    pub jd: JulianDay,
    pub calendar: String,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub light_time: Seconds,
    pub range: f64,
    pub range_rate: f64,
}

impl Sample for VectorSample {
    fn jd(&self) -> JulianDay {
        self.jd
    }
}

/// One record of a Horizons observer table: UTC epoch and astrometric RA/Dec in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RaDecSample {
    pub epoch: Epoch,
    pub ra: Degree,
    pub dec: Degree,
}

impl Sample for RaDecSample {
    fn jd(&self) -> JulianDay {
        epoch_to_jd(self.epoch)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSeries<S> {
    samples: Vec<S>,
}

impl<S: Sample> EphemerisSeries<S> {
    /// Build a series, keeping the input order.
    ///
    /// Return
    /// ------
    /// * `ParseEphemError::DecreasingEpoch` if an epoch is earlier than its predecessor;
    ///   `line` is the 1-based position of the offending sample
    pub fn new(samples: Vec<S>) -> Result<Self, ParseEphemError> {
        for (i, pair) in samples.windows(2).enumerate() {
            let (previous, jd) = (pair[0].jd(), pair[1].jd());
            if jd < previous {
                return Err(ParseEphemError::DecreasingEpoch {
                    line: i + 2,
                    jd,
                    previous,
                });
            }
        }
        Ok(EphemerisSeries { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&S> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.samples.last()
    }

    pub fn epochs(&self) -> Vec<JulianDay> {
        self.samples.iter().map(Sample::jd).collect()
    }

    pub fn into_samples(self) -> Vec<S> {
        self.samples
    }

    /// Find the two samples bracketing `jd`.
    ///
    /// Arguments
    /// ---------
    /// * `jd`: the julian day to bracket
    ///
    /// Return
    /// ------
    /// * `(before, after)` with `before` at index `i = (#epochs < jd) - 1`, `after` at `i + 1`
    /// * `HorizonsError::OutOfRange` unless `0 < i < len - 1`
    pub fn lookup_bracket(&self, jd: JulianDay) -> Result<(&S, &S), HorizonsError> {
        let out_of_range = || HorizonsError::OutOfRange {
            jd,
            first: self.first().map_or(f64::NAN, Sample::jd),
            last: self.last().map_or(f64::NAN, Sample::jd),
        };

        let insertion = self.samples.partition_point(|s| s.jd() < jd);
        let Some(i) = insertion.checked_sub(1) else {
            return Err(out_of_range());
        };
        if i == 0 || i + 1 >= self.samples.len() {
            return Err(out_of_range());
        }
        Ok((&self.samples[i], &self.samples[i + 1]))
    }
}

impl<'a, S> IntoIterator for &'a EphemerisSeries<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
