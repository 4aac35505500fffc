//! Approximate floating point comparisons
//!
//! Positions drift after repeated integration, so every collision boundary
//! test goes through these predicates instead of raw `<` / `>`. Two values are
//! close when their difference fits inside a band that scales with their
//! magnitude, plus a constant offset so values near zero still compare sanely.

/// Machine epsilon for f64
pub const EPSILON: f64 = 2.220_446_049_250_313e-16;

/// Constant added to the magnitudes before scaling by [`EPSILON`]
const ABSOLUTE_OFFSET: f64 = 10.0;

/// Half-width of the "close" band around `a` and `b`
#[inline]
fn band(a: f64, b: f64) -> f64 {
    (a.abs() + b.abs() + ABSOLUTE_OFFSET) * EPSILON
}

/// True when `a` and `b` are equal within the relative+absolute band
#[inline]
pub fn close_enough(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= band(a, b)
}

/// `a < b`, excluding values that are close
#[inline]
pub fn less_than(a: f64, b: f64) -> bool {
    a < b && !close_enough(a, b)
}

/// `a > b`, excluding values that are close
#[inline]
pub fn greater_than(a: f64, b: f64) -> bool {
    a > b && !close_enough(a, b)
}

/// `a < b` or close to it
#[inline]
pub fn less_or_close(a: f64, b: f64) -> bool {
    a < b || close_enough(a, b)
}

/// `a > b` or close to it
#[inline]
pub fn greater_or_close(a: f64, b: f64) -> bool {
    a > b || close_enough(a, b)
}

#[inline]
pub fn is_zero(value: f64) -> bool {
    close_enough(value, 0.0)
}

#[inline]
pub fn is_one(value: f64) -> bool {
    close_enough(value, 1.0)
}
