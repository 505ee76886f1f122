use crate::Num;

pub use std::f64::consts::PI;

pub const TWO_PI: Num = 2.0 * PI;

/// One degree in radians
pub const DEG: Num = PI / 180.0;

pub const SECONDS_PER_DAY: Num = 86_400.0;
