//! The time model used throughout the crate.
//!
//! Execution times are scaled by core speed factors and resource
//! interfaces have fractional bandwidths, so time is continuous and
//! represented as `f64`. All comparisons between demand and supply go
//! through the tolerance-aware helpers in this module.

/// This library uses a continuous time model.
pub type Time = f64;

/// Syntactic sugar to give a hint that a time value indicates a
/// point in time or some offset.
pub type Instant = Time;

/// Syntactic sugar to give a hint that a time value denotes an
/// interval length.
pub type Duration = Time;

/// Syntactic sugar to give a hint that a time value represents some
/// amount of processor service.
pub type Service = Time;

/// Absolute tolerance applied to all "demand ≤ supply" comparisons.
pub const EPSILON: f64 = 1e-9;

/// The largest scaling factor tried when computing the hyperperiod of
/// non-integral periods.
const MAX_PERIOD_SCALE: f64 = 1e6;

/// `a ≤ b`, up to [EPSILON].
pub fn approx_le(a: Time, b: Time) -> bool {
    a <= b + EPSILON
}

/// `a == b`, up to [EPSILON].
pub fn approx_eq(a: Time, b: Time) -> bool {
    (a - b).abs() <= EPSILON
}

// Snap a quotient to the nearest integer if it is within the tolerance.
fn snap(q: f64) -> f64 {
    let r = q.round();
    if (q - r).abs() <= EPSILON * r.abs().max(1.0) {
        r
    } else {
        q
    }
}

/// `floor(a / b)`, robust against rounding noise at exact multiples.
pub fn floor_div(a: Duration, b: Duration) -> f64 {
    snap(a / b).floor()
}

/// `ceil(a / b)`, robust against rounding noise at exact multiples.
pub fn ceil_div(a: Duration, b: Duration) -> f64 {
    snap(a / b).ceil()
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// Least common multiple of the given periods.
///
/// Non-integral periods are first scaled by the smallest power of ten
/// that makes all of them integral. Returns `None` if no such scale up to
/// 10⁶ exists or if the result overflows. The hyperperiod of an empty
/// set of periods is `1`.
pub fn hyperperiod<I>(periods: I) -> Option<Duration>
where
    I: IntoIterator<Item = Duration>,
{
    let periods: Vec<Duration> = periods.into_iter().collect();
    if periods.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return None;
    }
    let mut scale = 1.0;
    while periods.iter().any(|p| snap(p * scale).fract() != 0.0) {
        scale *= 10.0;
        if scale > MAX_PERIOD_SCALE {
            return None;
        }
    }
    let mut h: u64 = 1;
    for p in periods {
        let scaled = snap(p * scale);
        if scaled > u64::MAX as f64 {
            return None;
        }
        h = lcm(h, scaled as u64)?;
    }
    Some(h as f64 / scale)
}
