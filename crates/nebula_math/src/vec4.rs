//! Four-lane vector, the register type every other primitive is built on
//!
//! `Vec4` is the single portable 4-wide backend: points, directions,
//! planes, quaternions and matrix rows all reduce to it. Operations are
//! written lane-wise so the compiler can map them onto whatever SIMD unit
//! the target offers.

use crate::error::IndexError;
use crate::vec3::Vec3;
use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Lane selectors for [`Vec4::permute`]: `0X..0W` pick from the first
/// operand, `1X..1W` from the second.
pub mod permute {
    pub const PERMUTE_0X: u32 = 0;
    pub const PERMUTE_0Y: u32 = 1;
    pub const PERMUTE_0Z: u32 = 2;
    pub const PERMUTE_0W: u32 = 3;
    pub const PERMUTE_1X: u32 = 4;
    pub const PERMUTE_1Y: u32 = 5;
    pub const PERMUTE_1Z: u32 = 6;
    pub const PERMUTE_1W: u32 = 7;
}

/// 4D vector - homogeneous coordinates, planes and matrix rows
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Nebula's older name for the same register type
pub type Float4 = Vec4;

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    #[inline]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Checked lane read.
    #[inline]
    pub fn get(&self, index: usize) -> Result<f32, IndexError> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            3 => Ok(self.w),
            _ => Err(IndexError::new("vec4 lane", index, 4)),
        }
    }

    /// Checked lane write.
    #[inline]
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), IndexError> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            3 => self.w = value,
            _ => return Err(IndexError::new("vec4 lane", index, 4)),
        }
        Ok(())
    }

    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z), f(self.w))
    }

    #[inline]
    fn zip(self, o: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, o.x), f(self.y, o.y), f(self.z, o.z), f(self.w, o.w))
    }

    #[inline]
    fn mask(self, o: Self, f: impl Fn(f32, f32) -> bool) -> [bool; 4] {
        [f(self.x, o.x), f(self.y, o.y), f(self.z, o.z), f(self.w, o.w)]
    }

    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.lengthsq().sqrt()
    }

    #[inline]
    pub fn length3(self) -> f32 {
        self.lengthsq3().sqrt()
    }

    #[inline]
    pub fn lengthsq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn lengthsq3(self) -> f32 {
        self.dot3(self)
    }

    #[inline]
    pub fn reciprocal(self) -> Self {
        self.map(|v| 1.0 / v)
    }

    /// Same result as [`Vec4::reciprocal`] on the portable backend.
    #[inline]
    pub fn reciprocalapprox(self) -> Self {
        self.reciprocal()
    }

    /// Lane-wise product
    #[inline]
    pub fn multiply(self, o: Self) -> Self {
        self.zip(o, |a, b| a * b)
    }

    /// `v0 * v1 + v2`, lane-wise
    #[inline]
    pub fn multiplyadd(v0: Self, v1: Self, v2: Self) -> Self {
        Self::new(
            v0.x.mul_add(v1.x, v2.x),
            v0.y.mul_add(v1.y, v2.y),
            v0.z.mul_add(v1.z, v2.z),
            v0.w.mul_add(v1.w, v2.w),
        )
    }

    /// Lane-wise quotient
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

    /// Cross product of the xyz lanes; the w lane is zero.
    #[inline]
    pub fn cross3(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
            0.0,
        )
    }

    #[inline]
    pub fn dot(self, o: Self) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z + self.w * o.w
    }

    #[inline]
    pub fn dot3(self, o: Self) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    /// `v0 + f * (v1 - v0) + g * (v2 - v0)`
    #[inline]
    pub fn barycentric(v0: Self, v1: Self, v2: Self, f: f32, g: f32) -> Self {
        v0 + (v1 - v0) * f + (v2 - v0) * g
    }

    /// Catmull-Rom spline through `v1..v2` with `v0`/`v3` as neighbours.
    pub fn catmullrom(v0: Self, v1: Self, v2: Self, v3: Self, s: f32) -> Self {
        let s2 = s * s;
        let s3 = s2 * s;
        let p0 = (-s3 + 2.0 * s2 - s) * 0.5;
        let p1 = (3.0 * s3 - 5.0 * s2 + 2.0) * 0.5;
        let p2 = (-3.0 * s3 + 4.0 * s2 + s) * 0.5;
        let p3 = (s3 - s2) * 0.5;
        v0 * p0 + v1 * p1 + v2 * p2 + v3 * p3
    }

    /// Hermite spline from `v1` (tangent `t1`) to `v2` (tangent `t2`).
    pub fn hermite(v1: Self, t1: Self, v2: Self, t2: Self, s: f32) -> Self {
        let s2 = s * s;
        let s3 = s2 * s;
        let h1 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h2 = -2.0 * s3 + 3.0 * s2;
        let h3 = s3 - 2.0 * s2 + s;
        let h4 = s3 - s2;
        v1 * h1 + v2 * h2 + t1 * h3 + t2 * h4
    }

    /// Angle between two directions. Lengths use xyz only, the dot product
    /// uses all four lanes.
    pub fn angle(v0: Self, v1: Self) -> f32 {
        let cos = v0.dot(v1) / (v0.length3() * v1.length3());
        crate::scalar::acos(cos)
    }

    #[inline]
    pub fn lerp(self, o: Self, s: f32) -> Self {
        self + (o - self) * s
    }

    /// Lane-wise maximum
    #[inline]
    pub fn maximize(self, o: Self) -> Self {
        self.zip(o, f32::max)
    }

    /// Lane-wise minimum
    #[inline]
    pub fn minimize(self, o: Self) -> Self {
        self.zip(o, f32::min)
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.maximize(min).minimize(max)
    }

    /// Returns `self` unchanged when every lane is zero, otherwise `self / length()`.
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

    /// Normalizes xyz and keeps w; zero xyz is returned unchanged.
    #[inline]
    pub fn normalize3(self) -> Self {
        if self.x == 0.0 && self.y == 0.0 && self.z == 0.0 {
            return self;
        }
        let inv = 1.0 / self.length3();
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w)
    }

    #[inline]
    pub fn normalizeapprox3(self) -> Self {
        self.normalize3()
    }

    /// Normalize, reporting zero or non-finite length instead of passing it through.
    pub fn checked_normalize(self) -> crate::Result<Self> {
        let length = self.length();
        if length <= crate::scalar::TINY || !length.is_finite() {
            log::warn!("rejecting normalize of {:?} (length {})", self, length);
            return Err(crate::MathError::ZeroLength { length });
        }
        Ok(self / length)
    }

    /// `incident - 2 * dot3(incident, normal) * normal`
    #[inline]
    pub fn reflect(normal: Self, incident: Self) -> Self {
        incident - normal * (2.0 * incident.dot3(normal))
    }

    /// Scale all four lanes by `1 / w`.
    #[inline]
    pub fn perspective_div(self) -> Self {
        self * (1.0 / self.w)
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
    pub fn splat_w(self) -> Self {
        Self::splat(self.w)
    }

    /// Broadcast lane `element` to all lanes.
    #[inline]
    pub fn splat_lane(self, element: usize) -> Result<Self, IndexError> {
        self.get(element).map(Self::splat)
    }

    /// Generalized shuffle: output lane `k` reads lane `ik` of `v0`
    /// (`ik < 4`) or lane `ik - 4` of `v1`. Indices above 7 are rejected.
    pub fn permute(v0: Self, v1: Self, i0: u32, i1: u32, i2: u32, i3: u32) -> Result<Self, IndexError> {
        let pick = |i: u32| -> Result<f32, IndexError> {
            match i {
                0..=3 => v0.get(i as usize),
                4..=7 => v1.get(i as usize - 4),
                _ => Err(IndexError::new("permute selector", i as usize, 8)),
            }
        };
        Ok(Self::new(pick(i0)?, pick(i1)?, pick(i2)?, pick(i3)?))
    }

    /// Per-lane selection by permute index.
    #[inline]
    pub fn select(v0: Self, v1: Self, i0: u32, i1: u32, i2: u32, i3: u32) -> Result<Self, IndexError> {
        Self::permute(v0, v1, i0, i1, i2, i3)
    }

    /// Per-lane blend: a non-zero `control` lane takes `v1`, zero keeps `v0`.
    /// Masks produced by [`Vec4::less`], [`Vec4::greater`] and
    /// [`Vec4::equal`] plug in directly.
    #[inline]
    pub fn select_mask(v0: Self, v1: Self, control: Self) -> Self {
        let pick = |a: f32, b: f32, c: f32| if c != 0.0 { b } else { a };
        Self::new(
            pick(v0.x, v1.x, control.x),
            pick(v0.y, v1.y, control.y),
            pick(v0.z, v1.z, control.z),
            pick(v0.w, v1.w, control.w),
        )
    }

    /// `1.0` where `self < o`, `0.0` elsewhere
    #[inline]
    pub fn less(self, o: Self) -> Self {
        self.zip(o, |a, b| if a < b { 1.0 } else { 0.0 })
    }

    /// `1.0` where `self > o`, `0.0` elsewhere
    #[inline]
    pub fn greater(self, o: Self) -> Self {
        self.zip(o, |a, b| if a > b { 1.0 } else { 0.0 })
    }

    /// `1.0` where `self == o`, `0.0` elsewhere
    #[inline]
    pub fn equal(self, o: Self) -> Self {
        self.zip(o, |a, b| if a == b { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn less_any(self, o: Self) -> bool {
        any4(self.mask(o, |a, b| a < b))
    }

    #[inline]
    pub fn less_all(self, o: Self) -> bool {
        all4(self.mask(o, |a, b| a < b))
    }

    #[inline]
    pub fn lessequal_any(self, o: Self) -> bool {
        any4(self.mask(o, |a, b| a <= b))
    }

    #[inline]
    pub fn lessequal_all(self, o: Self) -> bool {
        all4(self.mask(o, |a, b| a <= b))
    }

    #[inline]
    pub fn greater_any(self, o: Self) -> bool {
        any4(self.mask(o, |a, b| a > b))
    }

    #[inline]
    pub fn greater_all(self, o: Self) -> bool {
        all4(self.mask(o, |a, b| a > b))
    }

    #[inline]
    pub fn greaterequal_any(self, o: Self) -> bool {
        any4(self.mask(o, |a, b| a >= b))
    }

    #[inline]
    pub fn greaterequal_all(self, o: Self) -> bool {
        all4(self.mask(o, |a, b| a >= b))
    }

    #[inline]
    pub fn equal_any(self, o: Self) -> bool {
        any4(self.mask(o, |a, b| a == b))
    }

    #[inline]
    pub fn equal_all(self, o: Self) -> bool {
        all4(self.mask(o, |a, b| a == b))
    }

    /// All four lanes within `epsilon` (inclusive).
    #[inline]
    pub fn nearequal(self, o: Self, epsilon: f32) -> bool {
        self.nearequal_v(o, Self::splat(epsilon))
    }

    /// All four lanes within the per-lane `epsilon` (inclusive).
    #[inline]
    pub fn nearequal_v(self, o: Self, epsilon: Self) -> bool {
        all4((self - o).abs().mask(epsilon, |d, e| d <= e))
    }

    #[inline]
    pub fn less3_any(self, o: Self) -> bool {
        any3(self.mask(o, |a, b| a < b))
    }

    #[inline]
    pub fn less3_all(self, o: Self) -> bool {
        all3(self.mask(o, |a, b| a < b))
    }

    #[inline]
    pub fn lessequal3_any(self, o: Self) -> bool {
        any3(self.mask(o, |a, b| a <= b))
    }

    #[inline]
    pub fn lessequal3_all(self, o: Self) -> bool {
        all3(self.mask(o, |a, b| a <= b))
    }

    #[inline]
    pub fn greater3_any(self, o: Self) -> bool {
        any3(self.mask(o, |a, b| a > b))
    }

    #[inline]
    pub fn greater3_all(self, o: Self) -> bool {
        all3(self.mask(o, |a, b| a > b))
    }

    #[inline]
    pub fn greaterequal3_any(self, o: Self) -> bool {
        any3(self.mask(o, |a, b| a >= b))
    }

    #[inline]
    pub fn greaterequal3_all(self, o: Self) -> bool {
        all3(self.mask(o, |a, b| a >= b))
    }

    #[inline]
    pub fn equal3_any(self, o: Self) -> bool {
        any3(self.mask(o, |a, b| a == b))
    }

    #[inline]
    pub fn equal3_all(self, o: Self) -> bool {
        all3(self.mask(o, |a, b| a == b))
    }

    /// x, y and z within the per-lane `epsilon` (inclusive).
    #[inline]
    pub fn nearequal3(self, o: Self, epsilon: Self) -> bool {
        all3((self - o).abs().mask(epsilon, |d, e| d <= e))
    }
}

#[inline]
fn any4(m: [bool; 4]) -> bool {
    m[0] || m[1] || m[2] || m[3]
}

#[inline]
fn all4(m: [bool; 4]) -> bool {
    m[0] && m[1] && m[2] && m[3]
}

#[inline]
fn any3(m: [bool; 4]) -> bool {
    m[0] || m[1] || m[2]
}

#[inline]
fn all3(m: [bool; 4]) -> bool {
    m[0] && m[1] && m[2]
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Mul<Vec4> for f32 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        rhs * self
    }
}

impl Div<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        self.map(|v| v / rhs)
    }
}

impl Div for Vec4 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.divide(rhs)
    }
}

impl Neg for Vec4 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl MulAssign for Vec4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vec4 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

/// Panics on an out-of-range lane; use [`Vec4::get`] for a checked read.
impl Index<usize> for Vec4 {
    type Output = f32;
    #[inline]
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("{}", IndexError::new("vec4 lane", index, 4)),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("{}", IndexError::new("vec4 lane", index, 4)),
        }
    }
}

impl From<[f32; 4]> for Vec4 {
    #[inline]
    fn from(a: [f32; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vec4> for [f32; 4] {
    #[inline]
    fn from(v: Vec4) -> Self {
        v.to_array()
    }
}
