//! Easing functions for scroll animations
//!
//! An easing function maps elapsed window time to a value:
//! `f(elapsed, start, delta, duration)` must return `start` at `elapsed == 0`
//! and `start + delta` at `elapsed == duration`.

/// Pure easing function: `(elapsed, start, delta, duration) -> value`
pub type EasingFn = fn(f64, f64, f64, f64) -> f64;

/// Sinusoidal ease-in-out.
///
/// Zero velocity at both ends of the window, monotonic in between.
pub fn sine_in_out(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    -delta / 2.0 * ((std::f64::consts::PI * elapsed / duration).cos() - 1.0) + start
}

/// The curve used when none is configured
pub const DEFAULT_EASING: EasingFn = sine_in_out;

/// Round to two decimal places, normalising `-0.0` to `0.0`
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
