//! 16-bit floating point storage type
//!
//! `Half` packs 1 sign bit, 5 exponent bits (bias 15) and 10 mantissa bits.
//! Conversion from `f32` truncates the mantissa instead of rounding, and
//! anything above the largest half exponent becomes infinity. Arithmetic is
//! done in `f32` and converted back.
//!
//! # Example
//!
//! ```ignore
//! use nebula_math::half::Half;
//!
//! let mut h = Half::from_f32(60000.0);
//! assert!(h.is_finite());
//! h += 60000.0;
//! assert_eq!(h, Half::INFINITY);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

const SIGN_MASK: u16 = 0x8000;
const EXP_MASK: u16 = 0x7c00;
const FRAC_MASK: u16 = 0x03ff;

/// Scale of a denormal half with mantissa `1024`
const DENORM_SCALE: f32 = 1.0 / 16384.0;

/// Half-precision float. Equality compares bit patterns.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Half(u16);

impl Half {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(0x3c00);
    /// Smallest positive normal value, `2^-14`
    pub const MIN: Self = Self(0x0400);
    /// Largest finite value, `65504`
    pub const MAX: Self = Self(0x7bff);
    /// Smallest positive denormal, `2^-24`
    pub const DENORM_MIN: Self = Self(0x0001);
    pub const EPSILON: Self = Self(0x13ff);
    pub const ROUND_ERROR: Self = Self(0x0fff);
    pub const INFINITY: Self = Self(EXP_MASK);
    pub const NEG_INFINITY: Self = Self(SIGN_MASK | EXP_MASK);
    /// The NaN pattern produced by [`Half::from_f32`]
    pub const NAN: Self = Self(EXP_MASK | 1);

    pub const DIGITS: u32 = 10;
    pub const DIGITS10: u32 = 2;
    pub const BIAS: i32 = 15;
    pub const MIN_EXPONENT: i32 = -Self::BIAS;
    pub const MAX_EXPONENT: i32 = Self::BIAS;
    pub const MIN_EXPONENT10: i32 = -9;
    pub const MAX_EXPONENT10: i32 = 9;

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Encode with mantissa truncation. Denormal `f32` inputs flush to a
    /// signed zero, any NaN payload collapses to a single mantissa bit.
    pub fn from_f32(f: f32) -> Self {
        let bits = f.to_bits();
        let sign = ((bits >> 16) as u16) & SIGN_MASK;
        let exp = (bits >> 23) & 0xff;
        let frac = bits & 0x007f_ffff;

        let magnitude = match exp {
            0 => 0,
            0xff => EXP_MASK | u16::from(frac != 0),
            _ => {
                let e = exp as i32 - 127;
                if e < -24 {
                    0
                } else if e < -14 {
                    // denormal: the implicit leading one moves into the mantissa
                    let shift = (-14 - e) as u32;
                    ((1024 >> shift) + (frac >> (13 + shift))) as u16
                } else if e > 15 {
                    EXP_MASK
                } else {
                    (((e + Self::BIAS) as u16) << 10) | (frac >> 13) as u16
                }
            }
        };
        Self(sign | magnitude)
    }

    pub fn to_f32(self) -> f32 {
        let sign = u32::from(self.0 & SIGN_MASK) << 16;
        let exp = u32::from((self.0 & EXP_MASK) >> 10);
        let frac = u32::from(self.0 & FRAC_MASK);

        match exp {
            0 if frac == 0 => f32::from_bits(sign),
            0 => {
                let s = if sign != 0 { -1.0 } else { 1.0 };
                s * (frac as f32 / 1024.0) * DENORM_SCALE
            }
            31 => f32::from_bits(sign | 0x7f80_0000 | u32::from(frac != 0)),
            _ => f32::from_bits(sign | ((exp + 112) << 23) | (frac << 13)),
        }
    }

    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & EXP_MASK == EXP_MASK && self.0 & FRAC_MASK != 0
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 & !SIGN_MASK == EXP_MASK
    }

    #[inline]
    pub const fn is_finite(self) -> bool {
        self.0 & EXP_MASK != EXP_MASK
    }

    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }
}

impl From<f32> for Half {
    #[inline]
    fn from(f: f32) -> Self {
        Self::from_f32(f)
    }
}

impl From<Half> for f32 {
    #[inline]
    fn from(h: Half) -> Self {
        h.to_f32()
    }
}

impl fmt::Debug for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Half({} / {:#06x})", self.to_f32(), self.0)
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl PartialEq<f32> for Half {
    #[inline]
    fn eq(&self, other: &f32) -> bool {
        self.to_f32() == *other
    }
}

/// Ordered by value: `-0` and `+0` compare equal, NaN is unordered.
impl PartialOrd for Half {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl PartialOrd<f32> for Half {
    #[inline]
    fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
        self.to_f32().partial_cmp(other)
    }
}

impl Neg for Half {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0 ^ SIGN_MASK)
    }
}

macro_rules! impl_half_op {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident, $op:tt) => {
        impl $trait for Half {
            type Output = Half;
            #[inline]
            fn $fn(self, rhs: Half) -> Half {
                Half::from_f32(self.to_f32() $op rhs.to_f32())
            }
        }

        impl $trait<f32> for Half {
            type Output = Half;
            #[inline]
            fn $fn(self, rhs: f32) -> Half {
                Half::from_f32(self.to_f32() $op rhs)
            }
        }

        impl $trait<Half> for f32 {
            type Output = f32;
            #[inline]
            fn $fn(self, rhs: Half) -> f32 {
                self $op rhs.to_f32()
            }
        }

        impl $assign_trait for Half {
            #[inline]
            fn $assign_fn(&mut self, rhs: Half) {
                *self = *self $op rhs;
            }
        }

        impl $assign_trait<f32> for Half {
            #[inline]
            fn $assign_fn(&mut self, rhs: f32) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_half_op!(Add, add, AddAssign, add_assign, +);
impl_half_op!(Sub, sub, SubAssign, sub_assign, -);
impl_half_op!(Mul, mul, MulAssign, mul_assign, *);
impl_half_op!(Div, div, DivAssign, div_assign, /);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values() {
        for v in [0.0, 1.0, -2.0, 0.5, 0.25, 1024.0, 65504.0, -0.125, 3.140625] {
            assert_eq!(Half::from_f32(v).to_f32(), v);
        }
        assert_eq!(Half::from_f32(1.0), Half::ONE);
        assert_eq!(Half::from_f32(65504.0), Half::MAX);
        assert_eq!(Half::MIN.to_f32(), 2.0_f32.powi(-14));
    }

    #[test]
    fn test_overflow_to_infinity() {
        let mut h = Half::from_f32(60000.0);
        assert_ne!(h, Half::INFINITY);
        assert_eq!(h.to_bits(), 0x7b53);
        h += 60000.0;
        assert_eq!(h, Half::INFINITY);

        let sum = Half::from_f32(60000.0) + Half::from_f32(60000.0);
        assert!(sum.is_infinite());
        assert_eq!(Half::from_f32(-1.0e9), Half::NEG_INFINITY);
        assert_eq!(Half::from_f32(f32::INFINITY), Half::INFINITY);
    }

    #[test]
    fn test_truncation() {
        // 1 + 2^-11 is below half precision and truncates rather than rounds
        assert_eq!(Half::from_f32(1.0 + 2.0_f32.powi(-11)), Half::ONE);
        assert_eq!(Half::from_f32(1.0 + 2.0_f32.powi(-10) * 1.9).to_f32(), 1.0 + 2.0_f32.powi(-10));
        assert_eq!(Half::from_f32(0.00097656), Half::EPSILON);
        assert_eq!(Half::from_f32(0.00097656 / 2.0), Half::ROUND_ERROR);
    }

    #[test]
    fn test_denormals() {
        let tiny = 2.0_f32.powi(-24);
        assert_eq!(Half::from_f32(tiny), Half::DENORM_MIN);
        assert_eq!(Half::DENORM_MIN.to_f32(), tiny);
        assert_eq!(Half::from_f32(2.0_f32.powi(-15)).to_bits(), 0x0200);
        assert_eq!(Half::from_bits(0x0200).to_f32(), 2.0_f32.powi(-15));
        assert_eq!(Half::from_f32(-3.0 * 2.0_f32.powi(-20)).to_f32(), -3.0 * 2.0_f32.powi(-20));

        // below the smallest denormal
        assert_eq!(Half::from_f32(2.0_f32.powi(-26)), Half::ZERO);
        assert_eq!(Half::from_f32(-2.0_f32.powi(-26)).to_bits(), 0x8000);
    }

    #[test]
    fn test_nan() {
        let h = Half::from_f32(f32::NAN);
        assert!(h.is_nan());
        assert!(!h.is_finite());
        assert!(h.to_f32().is_nan());
        assert!(Half::NAN.is_nan());
        assert_eq!(h, Half::NAN);
        assert_eq!(Half::from_f32(-f32::NAN).to_bits(), 0xfc01);
        assert!(!Half::INFINITY.is_nan());
        assert!(h.partial_cmp(&Half::ONE).is_none());
    }

    #[test]
    fn test_sign_and_ordering() {
        let one = Half::ONE;
        assert_eq!((-one).to_f32(), -1.0);
        assert_eq!(-(-one), one);
        assert!((-Half::ZERO).is_sign_negative());

        assert!(Half::from_f32(-1.0) < Half::from_f32(1.0));
        assert!(Half::from_f32(-2.0) < Half::from_f32(-1.0));
        assert!(Half::MAX < Half::INFINITY);
        assert_eq!((-Half::ZERO).partial_cmp(&Half::ZERO), Some(Ordering::Equal));
        assert_ne!(-Half::ZERO, Half::ZERO);
        assert!(Half::from_f32(0.5) < 0.75);
        assert!(Half::from_f32(0.5) == 0.5);
    }

    #[test]
    fn test_arithmetic() {
        let a = Half::from_f32(1.5);
        let b = Half::from_f32(0.5);
        assert_eq!(a + b, Half::from_f32(2.0));
        assert_eq!(a - b, Half::ONE);
        assert_eq!(a * b, Half::from_f32(0.75));
        assert_eq!(a / b, Half::from_f32(3.0));
        assert_eq!(a * 2.0, Half::from_f32(3.0));
        assert_eq!(2.0 * a, 3.0);
        assert_eq!(1.0 - b, 0.5);

        let mut c = a;
        c -= b;
        c *= Half::from_f32(4.0);
        c /= 2.0;
        assert_eq!(c, Half::from_f32(2.0));
    }

    #[test]
    fn test_bytes() {
        let halves = [Half::ONE, Half::MAX];
        let bytes: &[u8] = bytemuck::cast_slice(&halves);
        assert_eq!(bytes, &[0x00, 0x3c, 0xff, 0x7b]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_half_serialization() {
        let h = Half::from_f32(-6.5);
        let serialized = bincode::serialize(&h).unwrap();
        let deserialized: Half = bincode::deserialize(&serialized).unwrap();
        assert_eq!(h, deserialized);
    }
}
