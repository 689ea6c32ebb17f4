//! Two-component vector for texture coordinates and screen positions

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Float2 {
    pub x: f32,
    pub y: f32,
}

impl Float2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.lengthsq().sqrt()
    }

    #[inline]
    pub fn lengthsq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// True if any component is non-zero
    #[inline]
    pub fn any(self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    /// True if every component is non-zero
    #[inline]
    pub fn all(self) -> bool {
        self.x != 0.0 && self.y != 0.0
    }

    /// `1.0` where `v0 < v1`
    #[inline]
    pub fn lt(v0: Self, v1: Self) -> Self {
        Self::new(mask(v0.x < v1.x), mask(v0.y < v1.y))
    }

    #[inline]
    pub fn le(v0: Self, v1: Self) -> Self {
        Self::new(mask(v0.x <= v1.x), mask(v0.y <= v1.y))
    }

    #[inline]
    pub fn gt(v0: Self, v1: Self) -> Self {
        Self::new(mask(v0.x > v1.x), mask(v0.y > v1.y))
    }

    #[inline]
    pub fn ge(v0: Self, v1: Self) -> Self {
        Self::new(mask(v0.x >= v1.x), mask(v0.y >= v1.y))
    }

    /// Unit vector; a zero vector normalizes to `+X`.
    #[inline]
    pub fn normalize(self) -> Self {
        let l = self.length();
        if l > 0.0 {
            Self::new(self.x / l, self.y / l)
        } else {
            Self::X
        }
    }

    #[inline]
    pub fn multiply(self, o: Self) -> Self {
        Self::new(self.x * o.x, self.y * o.y)
    }

    #[inline]
    pub fn maximize(self, o: Self) -> Self {
        Self::new(self.x.max(o.x), self.y.max(o.y))
    }

    #[inline]
    pub fn minimize(self, o: Self) -> Self {
        Self::new(self.x.min(o.x), self.y.min(o.y))
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.maximize(min).minimize(max)
    }

    #[inline]
    pub fn lerp(self, o: Self, s: f32) -> Self {
        self + (o - self) * s
    }

    #[inline]
    pub fn nearequal(self, o: Self, epsilon: f32) -> bool {
        crate::scalar::nearequal(self.x, o.x, epsilon) && crate::scalar::nearequal(self.y, o.y, epsilon)
    }
}

#[inline]
fn mask(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

impl Add for Float2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Float2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Float2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Float2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Float2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Float2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Float2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float2_ops() {
        let a = Float2::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a.lengthsq(), 25.0);
        assert_eq!(a + Float2::ONE, Float2::new(4.0, 5.0));
        assert_eq!(-a, Float2::new(-3.0, -4.0));
        assert_eq!(a.multiply(Float2::new(2.0, 0.5)), Float2::new(6.0, 2.0));
        assert!(a.normalize().nearequal(Float2::new(0.6, 0.8), 1e-6));
    }

    #[test]
    fn test_float2_zero_normalizes_to_x() {
        assert_eq!(Float2::ZERO.normalize(), Float2::X);
    }

    #[test]
    fn test_float2_masks() {
        let a = Float2::new(1.0, 5.0);
        let b = Float2::new(2.0, 5.0);
        assert_eq!(Float2::lt(a, b), Float2::new(1.0, 0.0));
        assert_eq!(Float2::le(a, b), Float2::ONE);
        assert_eq!(Float2::gt(a, b), Float2::ZERO);
        assert_eq!(Float2::ge(a, b), Float2::new(0.0, 1.0));
        assert!(Float2::lt(a, b).any());
        assert!(!Float2::lt(a, b).all());
    }
}
