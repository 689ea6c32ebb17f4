//! Three-lane vector padded to a full register

use crate::error::IndexError;
use crate::vec4::Vec4;
use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// 3D vector - the workhorse of 3D graphics
///
/// Occupies a 16-byte register; the fourth lane is padding and never takes
/// part in arithmetic or comparisons.
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[cfg_attr(feature = "serde", serde(skip))]
    _pad: f32,
}

impl PartialEq for Vec3 {
    #[inline]
    fn eq(&self, o: &Self) -> bool {
        self.x == o.x && self.y == o.y && self.z == o.z
    }
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, _pad: 0.0 }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Widen to a register with the given w lane.
    #[inline]
    pub const fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Result<f32, IndexError> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(IndexError::new("vec3 lane", index, 3)),
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), IndexError> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => return Err(IndexError::new("vec3 lane", index, 3)),
        }
        Ok(())
    }

    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    #[inline]
    fn zip(self, o: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, o.x), f(self.y, o.y), f(self.z, o.z))
    }

    #[inline]
    fn mask(self, o: Self, f: impl Fn(f32, f32) -> bool) -> [bool; 3] {
        [f(self.x, o.x), f(self.y, o.y), f(self.z, o.z)]
    }

    #[inline]
    pub fn dot(self, o: Self) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    #[inline]
    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    #[inline]
    pub fn lengthsq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.lengthsq().sqrt()
    }

    /// Returns `self` unchanged when it is exactly zero.
    #[inline]
    pub fn normalize(self) -> Self {
        if self == Self::ZERO {
            return self;
        }
        self / self.length()
    }

    #[inline]
    pub fn normalizeapprox(self) -> Self {
        self.normalize()
    }

    pub fn checked_normalize(self) -> crate::Result<Self> {
        let length = self.length();
        if length <= crate::scalar::TINY || !length.is_finite() {
            log::warn!("rejecting normalize of {:?} (length {})", self, length);
            return Err(crate::MathError::ZeroLength { length });
        }
        Ok(self / length)
    }

    #[inline]
    pub fn reciprocal(self) -> Self {
        self.map(|v| 1.0 / v)
    }

    #[inline]
    pub fn reciprocalapprox(self) -> Self {
        self.reciprocal()
    }

    #[inline]
    pub fn multiply(self, o: Self) -> Self {
        self.zip(o, |a, b| a * b)
    }

    #[inline]
    pub fn multiplyadd(v0: Self, v1: Self, v2: Self) -> Self {
        Self::new(
            v0.x.mul_add(v1.x, v2.x),
            v0.y.mul_add(v1.y, v2.y),
            v0.z.mul_add(v1.z, v2.z),
        )
    }

    #[inline]
    pub fn divide(self, o: Self) -> Self {
        self.zip(o, |a, b| a / b)
    }

    #[inline]
    pub fn abs(self) -> Self {
        self.map(f32::abs)
    }

    #[inline]
    pub fn floor(self) -> Self {
        self.map(f32::floor)
    }

    #[inline]
    pub fn ceil(self) -> Self {
        self.map(f32::ceil)
    }

    #[inline]
    pub fn barycentric(v0: Self, v1: Self, v2: Self, f: f32, g: f32) -> Self {
        Vec4::barycentric(v0.extend(0.0), v1.extend(0.0), v2.extend(0.0), f, g).xyz()
    }

    pub fn catmullrom(v0: Self, v1: Self, v2: Self, v3: Self, s: f32) -> Self {
        Vec4::catmullrom(v0.extend(0.0), v1.extend(0.0), v2.extend(0.0), v3.extend(0.0), s).xyz()
    }

    pub fn hermite(v1: Self, t1: Self, v2: Self, t2: Self, s: f32) -> Self {
        Vec4::hermite(v1.extend(0.0), t1.extend(0.0), v2.extend(0.0), t2.extend(0.0), s).xyz()
    }

    /// Angle between two directions, in radians.
    pub fn angle(v0: Self, v1: Self) -> f32 {
        crate::scalar::acos(v0.dot(v1) / (v0.length() * v1.length()))
    }

    #[inline]
    pub fn lerp(self, o: Self, s: f32) -> Self {
        self + (o - self) * s
    }

    #[inline]
    pub fn maximize(self, o: Self) -> Self {
        self.zip(o, f32::max)
    }

    #[inline]
    pub fn minimize(self, o: Self) -> Self {
        self.zip(o, f32::min)
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.maximize(min).minimize(max)
    }

    /// `incident - 2 * dot(incident, normal) * normal`
    #[inline]
    pub fn reflect(normal: Self, incident: Self) -> Self {
        incident - normal * (2.0 * incident.dot(normal))
    }

    #[inline]
    pub fn splat_x(self) -> Self {
        Self::splat(self.x)
    }

    #[inline]
    pub fn splat_y(self) -> Self {
        Self::splat(self.y)
    }

    #[inline]
    pub fn splat_z(self) -> Self {
        Self::splat(self.z)
    }

    #[inline]
    pub fn splat_lane(self, element: usize) -> Result<Self, IndexError> {
        self.get(element).map(Self::splat)
    }

    /// Generalized shuffle over six input lanes: `0..=2` read `v0`,
    /// `4..=6` read `v1` (the padding lanes 3 and 7 are not addressable).
    pub fn permute(v0: Self, v1: Self, i0: u32, i1: u32, i2: u32) -> Result<Self, IndexError> {
        let pick = |i: u32| -> Result<f32, IndexError> {
            match i {
                0..=2 => v0.get(i as usize),
                4..=6 => v1.get(i as usize - 4),
                _ => Err(IndexError::new("vec3 permute selector", i as usize, 7)),
            }
        };
        Ok(Self::new(pick(i0)?, pick(i1)?, pick(i2)?))
    }

    #[inline]
    pub fn select(v0: Self, v1: Self, i0: u32, i1: u32, i2: u32) -> Result<Self, IndexError> {
        Self::permute(v0, v1, i0, i1, i2)
    }

    /// Per-lane blend: a non-zero `control` lane takes `v1`.
    #[inline]
    pub fn select_mask(v0: Self, v1: Self, control: Self) -> Self {
        let pick = |a: f32, b: f32, c: f32| if c != 0.0 { b } else { a };
        Self::new(
            pick(v0.x, v1.x, control.x),
            pick(v0.y, v1.y, control.y),
            pick(v0.z, v1.z, control.z),
        )
    }

    #[inline]
    pub fn less(self, o: Self) -> Self {
        self.zip(o, |a, b| if a < b { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn greater(self, o: Self) -> Self {
        self.zip(o, |a, b| if a > b { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn equal(self, o: Self) -> Self {
        self.zip(o, |a, b| if a == b { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn less_any(self, o: Self) -> bool {
        self.mask(o, |a, b| a < b).contains(&true)
    }

    #[inline]
    pub fn less_all(self, o: Self) -> bool {
        !self.mask(o, |a, b| a < b).contains(&false)
    }

    #[inline]
    pub fn lessequal_any(self, o: Self) -> bool {
        self.mask(o, |a, b| a <= b).contains(&true)
    }

    #[inline]
    pub fn lessequal_all(self, o: Self) -> bool {
        !self.mask(o, |a, b| a <= b).contains(&false)
    }

    #[inline]
    pub fn greater_any(self, o: Self) -> bool {
        self.mask(o, |a, b| a > b).contains(&true)
    }

    #[inline]
    pub fn greater_all(self, o: Self) -> bool {
        !self.mask(o, |a, b| a > b).contains(&false)
    }

    #[inline]
    pub fn greaterequal_any(self, o: Self) -> bool {
        self.mask(o, |a, b| a >= b).contains(&true)
    }

    #[inline]
    pub fn greaterequal_all(self, o: Self) -> bool {
        !self.mask(o, |a, b| a >= b).contains(&false)
    }

    #[inline]
    pub fn equal_any(self, o: Self) -> bool {
        self.mask(o, |a, b| a == b).contains(&true)
    }

    #[inline]
    pub fn equal_all(self, o: Self) -> bool {
        self == o
    }

    /// Every lane within the per-lane `epsilon` (inclusive).
    #[inline]
    pub fn nearequal(self, o: Self, epsilon: Self) -> bool {
        !(self - o).abs().mask(epsilon, |d, e| d <= e).contains(&false)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        self.map(|v| v / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vec3 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;
    #[inline]
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("{}", IndexError::new("vec3 lane", index, 3)),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("{}", IndexError::new("vec3 lane", index, 3)),
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cross_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n.x, 0.6, epsilon = 1e-6);
        assert!(Vec3::ZERO.checked_normalize().is_err());
    }

    #[test]
    fn test_padding_is_ignored() {
        let raw: [f32; 4] = [1.0, 2.0, 3.0, 99.0];
        let v: Vec3 = bytemuck::cast(raw);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        let back: [f32; 4] = bytemuck::cast(Vec3::new(5.0, 6.0, 7.0));
        assert_eq!(back, [5.0, 6.0, 7.0, 0.0]);
    }

    #[test]
    fn test_comparisons() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::splat(2.0);
        assert!(a.less_any(b));
        assert!(!a.less_all(b));
        assert!(a.greaterequal_any(b));
        assert!(a.equal_any(b));
        assert!(a.lessequal_all(Vec3::splat(3.0)));
        assert!(a.greater_all(Vec3::ZERO));
        assert!(a.nearequal(Vec3::new(1.05, 2.0, 2.95), Vec3::splat(0.1)));
        assert_eq!(a.less(b), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_permute() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(Vec3::permute(a, b, 2, 4, 1).unwrap(), Vec3::new(3.0, 4.0, 2.0));
        assert!(Vec3::permute(a, b, 3, 0, 0).is_err());
        assert!(Vec3::permute(a, b, 0, 7, 0).is_err());
    }

    #[test]
    fn test_angle_reflect_lerp() {
        assert_abs_diff_eq!(Vec3::angle(Vec3::X, Vec3::Z), crate::scalar::HALF_PI, epsilon = 1e-6);
        assert_eq!(Vec3::reflect(Vec3::Y, Vec3::new(1.0, -2.0, 0.0)), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(Vec3::ZERO.lerp(Vec3::splat(4.0), 0.25), Vec3::ONE);
        assert_eq!(Vec3::barycentric(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_vec3_serialization() {
        let v = Vec3::new(1.5, 2.5, 3.5);
        let serialized = bincode::serialize(&v).unwrap();
        let deserialized: Vec3 = bincode::deserialize(&serialized).unwrap();
        assert_eq!(v, deserialized);
    }
}
