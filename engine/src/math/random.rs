//! Random Number Helpers
//!
//! Thin wrappers over `rand` that accept reversed or equal bounds, which
//! happens constantly with "value ± deviation" style parameters.

use rand::Rng;

/// Uniform float between `a` and `b`, in either order. Equal bounds return `a`.
pub fn rand_f32<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi || !lo.is_finite() || !hi.is_finite() {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Uniform integer between `a` and `b` inclusive, in either order.
pub fn rand_i32<R: Rng + ?Sized>(rng: &mut R, a: i32, b: i32) -> i32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Symmetric deviation: uniform in `[-dev, dev]`.
pub fn rand_dev<R: Rng + ?Sized>(rng: &mut R, dev: f32) -> f32 {
    rand_f32(rng, -dev, dev)
}
