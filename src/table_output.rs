//! Flat-file output of the fetched ephemerides.
//!
//! Parsed series are flattened into serde rows ([`RaDecRow`], [`VectorRow`]) and written with
//! the `csv` writer; headers come from the field names.
use camino::Utf8Path;
use serde::Serialize;

use crate::{
    constants::{Degree, JulianDay, Seconds},
    ephemeris::samples::{EphemerisSeries, RaDecSample, Sample, VectorSample},
    horizons_errors::HorizonsError,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaDecRow {
    pub jd: JulianDay,
    pub ra: Degree,
    pub dec: Degree,
}

impl From<&RaDecSample> for RaDecRow {
    fn from(sample: &RaDecSample) -> Self {
        RaDecRow {
            jd: sample.jd(),
            ra: sample.ra,
            dec: sample.dec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorRow {
    /// Position of the requested epoch this sample answers
    pub epoch_index: usize,
    pub jd: JulianDay,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub light_time: Seconds,
    pub range: f64,
    pub range_rate: f64,
}

impl VectorRow {
    pub fn new(epoch_index: usize, sample: &VectorSample) -> Self {
        VectorRow {
            epoch_index,
            jd: sample.jd,
            x: sample.position.x,
            y: sample.position.y,
            z: sample.position.z,
            vx: sample.velocity.x,
            vy: sample.velocity.y,
            vz: sample.velocity.z,
            light_time: sample.light_time,
            range: sample.range,
            range_rate: sample.range_rate,
        }
    }
}

pub fn ra_dec_rows(series: &EphemerisSeries<RaDecSample>) -> Vec<RaDecRow> {
    series.iter().map(RaDecRow::from).collect()
}

pub fn vector_rows(epoch_index: usize, series: &EphemerisSeries<VectorSample>) -> Vec<VectorRow> {
    series
        .iter()
        .map(|sample| VectorRow::new(epoch_index, sample))
        .collect()
}

/// Write `rows` as a CSV table with a header line.
pub fn write_table_csv<R: Serialize>(path: &Utf8Path, rows: &[R]) -> Result<(), HorizonsError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_text_file(path: &Utf8Path) -> Result<String, HorizonsError> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn write_text_file(path: &Utf8Path, content: &str) -> Result<(), HorizonsError> {
    Ok(std::fs::write(path, content)?)
}

#[cfg(test)]
mod table_output_test {
    use camino::Utf8PathBuf;
    use hifitime::Epoch;
    use nalgebra::Vector3;

    use super::*;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_write_ra_dec_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "ison-ephem.csv");

        let series = EphemerisSeries::new(vec![
            RaDecSample {
                epoch: Epoch::from_gregorian_utc_at_midnight(2013, 9, 1),
                ra: 150.125,
                dec: 5.5,
            },
            RaDecSample {
                epoch: Epoch::from_gregorian_utc_at_midnight(2013, 9, 2),
                ra: 150.5,
                dec: -0.25,
            },
        ])
        .unwrap();

        write_table_csv(&path, &ra_dec_rows(&series)).unwrap();
        assert_eq!(
            read_text_file(&path).unwrap(),
            "jd,ra,dec\n2456536.5,150.125,5.5\n2456537.5,150.5,-0.25\n"
        );
    }

    #[test]
    fn test_write_vector_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "vectors.csv");

        let sample = VectorSample {
            jd: 2454156.5,
            calendar: "A.D. 2007-Feb-24 00:00:00.0000".into(),
            position: Vector3::new(1.0, 2.0, 3.0),
            velocity: Vector3::new(0.5, 0.25, 0.125),
            light_time: 432.0,
            range: 0.75,
            range_rate: -0.5,
        };
        let series = EphemerisSeries::new(vec![sample]).unwrap();

        write_table_csv(&path, &vector_rows(3, &series)).unwrap();
        let content = read_text_file(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("epoch_index,jd,x,y,z,vx,vy,vz,light_time,range,range_rate")
        );
        assert_eq!(
            lines.next(),
            Some("3,2454156.5,1.0,2.0,3.0,0.5,0.25,0.125,432.0,0.75,-0.5")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_text_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "txt0");
        write_text_file(&path, "$$SOE\r\n$$EOE\r\n").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "$$SOE\r\n$$EOE\r\n");
        assert!(read_text_file(&temp_path(&dir, "missing")).is_err());
    }
}
