use chrono::{DateTime, Duration, Utc};

use crate::Num;

/// Seconds elapsed from `from` to `to` (negative when `to` is earlier).
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> Num {
    let delta = to - from;

    match delta.num_nanoseconds() {
        Some(ns) => ns as Num * 1e-9,
        // Spans longer than ~292 years overflow the nanosecond count
        None => delta.num_milliseconds() as Num * 1e-3,
    }
}

/// Offsets an instant by a (possibly fractional) number of seconds.
///
/// Whole seconds and the nanosecond remainder are applied separately, so
/// offsets beyond the ~292 year range of an `i64` nanosecond count keep
/// their full length.
pub fn add_seconds(t: DateTime<Utc>, seconds: Num) -> DateTime<Utc> {
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1e9).round() as i64;

    t + Duration::seconds(whole as i64) + Duration::nanoseconds(nanos)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fractional_seconds_survive_the_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2004, 3, 3, 4, 30, 0).unwrap();
        let t1 = add_seconds(t0, 5400.25);

        assert_abs_diff_eq!(elapsed_seconds(t0, t1), 5400.25, epsilon = 1e-9);
        assert_abs_diff_eq!(elapsed_seconds(t1, t0), -5400.25, epsilon = 1e-9);
    }

    #[test]
    fn long_spans_fall_back_to_milliseconds() {
        let t0 = Utc.with_ymd_and_hms(1700, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();

        let days = elapsed_seconds(t0, t1) / 86_400.0;
        assert_abs_diff_eq!(days, (t1 - t0).num_days() as Num, epsilon = 1e-6);
    }

    #[test]
    fn offsets_longer_than_the_nanosecond_range_are_kept() {
        let t0 = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        // 600 Julian years
        let seconds = 219_150.0 * 86_400.0 + 0.5;

        let t1 = add_seconds(t0, seconds);

        assert_eq!(t1, t0 + Duration::days(219_150) + Duration::milliseconds(500));
        assert_abs_diff_eq!(elapsed_seconds(t0, t1), seconds, epsilon = 1e-3);
        assert_abs_diff_eq!(elapsed_seconds(t1, t0), -seconds, epsilon = 1e-3);
    }
}
