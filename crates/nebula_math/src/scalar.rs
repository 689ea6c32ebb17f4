//! Scalar helpers shared by every vector type
//!
//! Fuzzy comparisons, clamping, angle helpers, alignment arithmetic and an
//! explicit seeded generator.

use rand::distr::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Epsilon used by plane, bbox and line tests
pub const TINY: f32 = 0.000_000_1;
pub const PI: f32 = core::f32::consts::PI;
pub const TWO_PI: f32 = core::f32::consts::TAU;
pub const HALF_PI: f32 = core::f32::consts::FRAC_PI_2;
pub const LN_2: f32 = core::f32::consts::LN_2;
pub const INFINITY: f32 = f32::INFINITY;

/// Fuzzy equality with an open tolerance interval.
#[inline]
pub fn fequal(f0: f32, f1: f32, tol: f32) -> bool {
    let f = f0 - f1;
    f > -tol && f < tol
}

/// Fuzzy equality, inclusive: `|a - b| <= epsilon`.
#[inline]
pub fn nearequal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

#[inline]
pub fn fless(f0: f32, f1: f32, tol: f32) -> bool {
    (f0 - f1) < tol
}

#[inline]
pub fn fgreater(f0: f32, f1: f32, tol: f32) -> bool {
    (f0 - f1) > tol
}

/// Sign as `-1.0` or `1.0`; zero counts as positive.
#[inline]
pub fn sgn(a: f32) -> f32 {
    if a < 0.0 { -1.0 } else { 1.0 }
}

#[inline]
pub fn deg2rad(d: f32) -> f32 {
    ((d as f64 * core::f64::consts::PI) / 180.0) as f32
}

#[inline]
pub fn rad2deg(r: f32) -> f32 {
    ((r as f64 * 180.0) / core::f64::consts::PI) as f32
}

#[inline]
pub fn clamp(val: f32, lower: f32, upper: f32) -> f32 {
    if val < lower {
        lower
    } else if val > upper {
        upper
    } else {
        val
    }
}

#[inline]
pub fn iclamp(val: i32, lower: i32, upper: i32) -> i32 {
    if val < lower {
        lower
    } else if val > upper {
        upper
    } else {
        val
    }
}

/// Clamp to `[0, 1]`
#[inline]
pub fn saturate(val: f32) -> f32 {
    clamp(val, 0.0, 1.0)
}

/// `x + l * (y - x)`
#[inline]
pub fn lerp(x: f32, y: f32, l: f32) -> f32 {
    x + l * (y - x)
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let x = saturate((x - edge0) / (edge1 - edge0));
    x * x * (3.0 - 2.0 * x)
}

/// Wrap an angle in radians into `[0, 2π)`.
#[inline]
pub fn modangle(a: f32) -> f32 {
    let a = a % TWO_PI;
    if a < 0.0 { a + TWO_PI } else { a }
}

/// Shortest signed angular distance from `from` to `to`, in radians.
pub fn angulardistance(from: f32, to: f32) -> f32 {
    let dist = modangle(to) - modangle(from);
    if dist < -PI {
        dist + TWO_PI
    } else if dist > PI {
        dist - TWO_PI
    } else {
        dist
    }
}

/// True for zero and denormalized floats (exponent bits all clear).
#[inline]
pub fn is_denormal(s: f32) -> bool {
    (s.to_bits() & 0x7f80_0000) == 0
}

/// Flush denormals to zero.
#[inline]
pub fn undenormalize(s: f32) -> f32 {
    if is_denormal(s) { 0.0 } else { s }
}

#[inline]
pub fn cot(x: f32) -> f32 {
    1.0 / x.tan()
}

#[inline]
pub fn sincos(x: f32) -> (f32, f32) {
    x.sin_cos()
}

/// `acos` with the argument clamped to `[-1, 1]`
#[inline]
pub fn acos(x: f32) -> f32 {
    clamp(x, -1.0, 1.0).acos()
}

/// `asin` with the argument clamped to `[-1, 1]`
#[inline]
pub fn asin(x: f32) -> f32 {
    clamp(x, -1.0, 1.0).asin()
}

#[inline]
pub fn log2(f: f32) -> f32 {
    f.log2()
}

#[inline]
pub fn exp2(f: f32) -> f32 {
    f.exp2()
}

/// Round half up to the nearest integer.
#[inline]
pub fn frnd(f: f32) -> i32 {
    (f + 0.5).floor() as i32
}

/// Truncate towards zero.
#[inline]
pub fn fchop(f: f32) -> i32 {
    f as i32
}

/// Round `value` up to a multiple of `alignment` (a power of two).
///
/// # Panics
///
/// Panics if the rounded value does not fit in a `u32`. A zero or
/// non-power-of-two `alignment` is caught by a debug assertion.
#[inline]
pub const fn align(value: u32, alignment: u32) -> u32 {
    debug_assert!(alignment.is_power_of_two(), "alignment must be a power of two");
    let mask = alignment.wrapping_sub(1);
    match value.checked_add(mask) {
        Some(v) => v & !mask,
        None => panic!("align overflows u32"),
    }
}

/// Round `value` down to a multiple of `alignment` (a power of two).
#[inline]
pub const fn align_down(value: u32, alignment: u32) -> u32 {
    debug_assert!(alignment.is_power_of_two(), "alignment must be a power of two");
    value & !alignment.wrapping_sub(1)
}

/// # Panics
///
/// Panics if `divider` is zero.
#[inline]
pub const fn divandroundup(dividend: u32, divider: u32) -> u32 {
    if dividend % divider != 0 {
        dividend / divider + 1
    } else {
        dividend / divider
    }
}

/// One-based position of the highest set bit, `0` for zero.
#[inline]
pub const fn most_significant(val: u32) -> u32 {
    32 - val.leading_zeros()
}

/// Seeded pseudo-random generator owned by its caller
///
/// Replaces process-global `rand()`: every call site owns or borrows its
/// generator, so sequences are reproducible and threads never share state.
/// Also usable anywhere a [`rand::Rng`] is expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandXorState(SmallRng);

impl RandXorState {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Generates a float in [0, 1)
    pub fn rand(&mut self) -> f32 {
        self.0.random()
    }

    /// Generates a float in [min, max), or `min` when the range is empty
    pub fn rand_range(&mut self, min: f32, max: f32) -> f32 {
        sample_range(&mut self.0, min, max)
    }

    /// Generates an integer in [min, max], both inclusive; `min` when
    /// `max < min`
    pub fn irand(&mut self, min: i32, max: i32) -> i32 {
        if max < min {
            return min;
        }
        self.0.random_range(min..=max)
    }
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min.is_nan() || max.is_nan() || min >= max {
        return min;
    }
    // Uniform only promises samples <= its upper bound
    match Uniform::new_inclusive(min, next_below(max)) {
        Ok(dist) => dist.sample(rng),
        Err(_) => min,
    }
}

/// Largest `f32` strictly below a finite `x`.
fn next_below(x: f32) -> f32 {
    if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

impl Default for RandXorState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngCore for RandXorState {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.0.fill_bytes(dst)
    }
}

impl SeedableRng for RandXorState {
    type Seed = <SmallRng as SeedableRng>::Seed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self(SmallRng::from_seed(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
