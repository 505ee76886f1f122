//! Two-line element sets.
//!
//! Only the fields needed for a mean Keplerian element set are read:
//!
//! ```text
//! Line 1: 1 NNNNNC NNNNNAAA YYDDD.DDDDDDDD ...
//! Line 2: 2 NNNNN III.IIII OOO.OOOO EEEEEEE WWW.WWWW MMM.MMMM NN.NNNNNNNN...
//! ```
//!
//! Checksums and the drag terms are ignored.
use std::num::{ParseFloatError, ParseIntError};
use std::ops::Range;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::orbit::semi_major_axis_for_period;
use crate::time::add_seconds;
use crate::{Num, Orbit, OrbitBuilder, OrbitError, OrbitKinematics, DEG, SECONDS_PER_DAY};

/// Both lines must reach the end of the mean motion field
const MIN_LINE_LENGTH: usize = 63;

#[derive(Error, Debug)]
pub enum TleError {
    #[error("Line 1 must start with '1', got '{0}'")]
    InvalidLine1Start(char),

    #[error("Line 2 must start with '2', got '{0}'")]
    InvalidLine2Start(char),

    #[error("Line {line} must be at least 63 characters, got {length}")]
    LineTooShort { line: u8, length: usize },

    #[error("Line {0} contains non-ASCII characters")]
    NonAscii(u8),

    #[error("Catalog numbers don't match between lines: {0} vs {1}")]
    CatalogNumberMismatch(u32, u32),

    #[error("Failed to parse field '{field}': {source}")]
    ParseField {
        field: &'static str,
        source: ParseFloatError,
    },

    #[error("Failed to parse integer field '{field}': {source}")]
    ParseIntField {
        field: &'static str,
        source: ParseIntError,
    },

    #[error("Failed to parse implied-decimal field '{0}'")]
    ImpliedDecimal(String),

    #[error("Epoch day {0} lies outside the epoch year")]
    InvalidEpochDay(Num),

    #[error("Mean motion must be positive, got {0} rev/day")]
    InvalidMeanMotion(Num),
}

/// Mean elements of a two-line element set, in the units of the format.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tle {
    pub catalog_number: u32,
    pub epoch: DateTime<Utc>,
    pub inclination_deg: Num,
    pub raan_deg: Num,
    pub eccentricity: Num,
    pub argument_of_perigee_deg: Num,
    pub mean_anomaly_deg: Num,
    /// Revolutions per day
    pub mean_motion: Num,
}

impl Tle {
    pub fn parse(line1: &str, line2: &str) -> Result<Self, TleError> {
        let l1 = check_line(line1, 1)?;
        let l2 = check_line(line2, 2)?;

        let c1 = l1.as_bytes()[0] as char;
        if c1 != '1' {
            return Err(TleError::InvalidLine1Start(c1));
        }
        let c2 = l2.as_bytes()[0] as char;
        if c2 != '2' {
            return Err(TleError::InvalidLine2Start(c2));
        }

        let catalog_number = parse_int(l1, 2..7, "catalog_number (line 1)")?;
        let catalog_number_2 = parse_int(l2, 2..7, "catalog_number (line 2)")?;
        if catalog_number != catalog_number_2 {
            return Err(TleError::CatalogNumberMismatch(catalog_number, catalog_number_2));
        }

        let epoch_year = parse_int(l1, 18..20, "epoch_year")?;
        let epoch_day = parse_float(l1, 20..32, "epoch_day")?;
        let epoch = epoch_from_year_and_day(epoch_year, epoch_day)?;

        let mean_motion = parse_float(l2, 52..63, "mean_motion")?;
        if mean_motion.is_nan() || mean_motion <= 0.0 {
            return Err(TleError::InvalidMeanMotion(mean_motion));
        }

        let tle = Self {
            catalog_number,
            epoch,
            inclination_deg: parse_float(l2, 8..16, "inclination")?,
            raan_deg: parse_float(l2, 17..25, "raan")?,
            eccentricity: parse_implied_decimal(&l2[26..33])?,
            argument_of_perigee_deg: parse_float(l2, 34..42, "argument_of_perigee")?,
            mean_anomaly_deg: parse_float(l2, 43..51, "mean_anomaly")?,
            mean_motion,
        };

        tracing::debug!(catalog_number, %epoch, "parsed two-line element set");

        Ok(tle)
    }

    /// Semi-major axis (m) implied by the mean motion.
    pub fn semi_major_axis(&self) -> Num {
        semi_major_axis_for_period(SECONDS_PER_DAY / self.mean_motion)
    }

    pub fn to_orbit<K: OrbitKinematics>(&self) -> Result<Orbit<K>, OrbitError> {
        OrbitBuilder::new()
            .semi_major_axis(self.semi_major_axis())
            .eccentricity(self.eccentricity)
            .inclination(self.inclination_deg * DEG)
            .right_ascension_of_the_ascending_node(self.raan_deg * DEG)
            .argument_of_perigee(self.argument_of_perigee_deg * DEG)
            .mean_anomaly_at_epoch(self.mean_anomaly_deg * DEG)
            .epoch(self.epoch)
            .build()
    }
}

fn check_line(line: &str, number: u8) -> Result<&str, TleError> {
    let line = line.trim_end();

    if !line.is_ascii() {
        return Err(TleError::NonAscii(number));
    }
    if line.len() < MIN_LINE_LENGTH {
        return Err(TleError::LineTooShort {
            line: number,
            length: line.len(),
        });
    }

    Ok(line)
}

fn parse_float(line: &str, columns: Range<usize>, field: &'static str) -> Result<Num, TleError> {
    line[columns]
        .trim()
        .parse()
        .map_err(|source| TleError::ParseField { field, source })
}

fn parse_int(line: &str, columns: Range<usize>, field: &'static str) -> Result<u32, TleError> {
    line[columns]
        .trim()
        .parse()
        .map_err(|source| TleError::ParseIntField { field, source })
}

/// Parse implied-decimal fields like "0007417" -> 0.0007417
fn parse_implied_decimal(s: &str) -> Result<Num, TleError> {
    let digits = s.trim();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TleError::ImpliedDecimal(s.to_string()));
    }

    format!("0.{digits}")
        .parse()
        .map_err(|_| TleError::ImpliedDecimal(s.to_string()))
}

/// Two-digit years below 50 are in the 21st century.
fn epoch_from_year_and_day(year: u32, day: Num) -> Result<DateTime<Utc>, TleError> {
    let century = if year < 50 { 2000 } else { 1900 };
    let year = (century + year) as i32;
    let new_year = |year: i32| {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or(TleError::InvalidEpochDay(day))
    };
    let start = new_year(year)?;
    let days_in_year = (new_year(year + 1)? - start).num_days() as Num;

    // Day 1.0 is midnight on January 1st
    if !(1.0..days_in_year + 1.0).contains(&day) {
        return Err(TleError::InvalidEpochDay(day));
    }

    Ok(add_seconds(start, (day - 1.0) * SECONDS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{Datelike, Timelike};

    use super::*;
    use crate::{MeanJ2, TwoBody};

    const ISS_LINE1: &str = "1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9003";
    const ISS_LINE2: &str = "2 25544  51.6400 208.5000 0007417  68.0000 292.1000 15.49560000400000";

    #[test]
    fn parses_iss() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();

        assert_eq!(tle.catalog_number, 25544);
        assert_eq!(tle.epoch, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(tle.inclination_deg, 51.64);
        assert_eq!(tle.raan_deg, 208.5);
        assert_relative_eq!(tle.eccentricity, 0.0007417, max_relative = 1e-12);
        assert_eq!(tle.argument_of_perigee_deg, 68.0);
        assert_eq!(tle.mean_anomaly_deg, 292.1);
        assert_eq!(tle.mean_motion, 15.4956);
    }

    #[test]
    fn converts_to_orbit() {
        let orbit: Orbit<TwoBody> = Orbit::from_tle(ISS_LINE1, ISS_LINE2).unwrap();

        assert_relative_eq!(orbit.semi_major_axis, 6.796147e6, max_relative = 1e-6);
        assert_relative_eq!(orbit.period(), 5575.776, max_relative = 1e-6);
        assert_relative_eq!(orbit.inclination, 51.64 * DEG, max_relative = 1e-12);
        assert_relative_eq!(orbit.right_ascension_of_the_ascending_node, 208.5 * DEG, max_relative = 1e-12);
        assert_relative_eq!(orbit.argument_of_perigee, 68.0 * DEG, max_relative = 1e-12);
        assert_relative_eq!(orbit.mean_anomaly_at_epoch, 292.1 * DEG, max_relative = 1e-12);

        let j2: Orbit<MeanJ2> = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap().to_orbit().unwrap();
        assert_eq!(j2.epoch, orbit.epoch);
    }

    #[test]
    fn century_pivot() {
        let line1 = ISS_LINE1.replacen("24001.50000000", "98264.25000000", 1);
        let tle = Tle::parse(&line1, ISS_LINE2).unwrap();

        assert_eq!(tle.epoch.year(), 1998);
        assert_eq!(tle.epoch.ordinal(), 264);
        assert_eq!(tle.epoch.hour(), 6);

        let line1 = ISS_LINE1.replacen("24001", "49001", 1);
        assert_eq!(Tle::parse(&line1, ISS_LINE2).unwrap().epoch.year(), 2049);

        let line1 = ISS_LINE1.replacen("24001", "50001", 1);
        assert_eq!(Tle::parse(&line1, ISS_LINE2).unwrap().epoch.year(), 1950);
    }

    #[test]
    fn epoch_day_must_fall_within_its_year() {
        let leap = ISS_LINE1.replacen("24001.50000000", "24366.50000000", 1);
        let epoch = Tle::parse(&leap, ISS_LINE2).unwrap().epoch;
        assert_eq!((epoch.year(), epoch.month(), epoch.day(), epoch.hour()), (2024, 12, 31, 12));

        for day in ["23366.50000000", "24367.00000000", "24000.50000000"] {
            let line1 = ISS_LINE1.replacen("24001.50000000", day, 1);
            let result = Tle::parse(&line1, ISS_LINE2);
            assert!(matches!(result, Err(TleError::InvalidEpochDay(_))), "{day} gave {result:?}");
        }

        let line1 = ISS_LINE1.replacen("24001.50000000", "23365.99000000", 1);
        assert_eq!(Tle::parse(&line1, ISS_LINE2).unwrap().epoch.year(), 2023);
    }

    #[test]
    fn checksum_and_trailing_whitespace_are_ignored() {
        let line1 = format!("{}   ", &ISS_LINE1[..68]);
        let line2 = &ISS_LINE2[..63];

        assert!(Tle::parse(&line1, line2).is_ok());
    }

    #[test]
    fn rejects_swapped_lines() {
        let err = Tle::parse(ISS_LINE2, ISS_LINE1).unwrap_err();

        assert!(matches!(err, TleError::InvalidLine1Start('2')));
    }

    #[test]
    fn rejects_short_lines() {
        let err = Tle::parse(ISS_LINE1, &ISS_LINE2[..60]).unwrap_err();

        assert!(matches!(err, TleError::LineTooShort { line: 2, length: 60 }));
    }

    #[test]
    fn rejects_mismatched_catalog_numbers() {
        let line2 = ISS_LINE2.replacen("25544", "25545", 1);
        let err = Tle::parse(ISS_LINE1, &line2).unwrap_err();

        assert!(matches!(err, TleError::CatalogNumberMismatch(25544, 25545)));
    }

    #[test]
    fn reports_the_broken_field() {
        let line2 = ISS_LINE2.replacen("208.5000", "208.5x00", 1);
        let err = Tle::parse(ISS_LINE1, &line2).unwrap_err();
        assert!(matches!(err, TleError::ParseField { field: "raan", .. }));

        let line2 = ISS_LINE2.replacen("0007417", "00-7417", 1);
        let err = Tle::parse(ISS_LINE1, &line2).unwrap_err();
        assert!(matches!(err, TleError::ImpliedDecimal(_)));
    }

    #[test]
    fn rejects_zero_mean_motion() {
        let line2 = ISS_LINE2.replacen("15.49560000", " 0.00000000", 1);
        let err = Tle::parse(ISS_LINE1, &line2).unwrap_err();

        assert!(matches!(err, TleError::InvalidMeanMotion(_)));
    }

    #[test]
    fn tle_errors_convert_into_orbit_errors() {
        let result: Result<Orbit, _> = Orbit::from_tle("", ISS_LINE2);

        assert!(matches!(
            result,
            Err(OrbitError::Tle(TleError::LineTooShort { line: 1, .. }))
        ));
    }
}
