//! Quaternion rotations
//!
//! Quaternions are not normalized implicitly; rotation results assume unit
//! input. [`Quat::multiply`] composes in application order (`q0` first,
//! then `q1`), matching how [`Mat4::multiply`](crate::Mat4::multiply)
//! composes the equivalent rotation matrices.

use crate::matrix::Mat4;
use crate::point::Vector;
use crate::scalar::{self, TINY};
use crate::vec3::Vec3;
use crate::vec4::Vec4;
use core::ops::{Add, Mul, Neg, Sub};

/// Quaternion for rotations
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    #[inline]
    pub const fn vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[inline]
    pub fn dot(self, o: Self) -> f32 {
        self.vec4().dot(o.vec4())
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.vec4().length()
    }

    #[inline]
    pub fn lengthsq(self) -> f32 {
        self.vec4().lengthsq()
    }

    /// Flush denormal components to zero.
    #[inline]
    pub fn undenormalize(self) -> Self {
        Self::new(
            scalar::undenormalize(self.x),
            scalar::undenormalize(self.y),
            scalar::undenormalize(self.z),
            scalar::undenormalize(self.w),
        )
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// `conjugate / lengthsq`; a near-zero quaternion inverts to zero.
    #[inline]
    pub fn inverse(self) -> Self {
        let len = self.lengthsq();
        if len > 0.00001 {
            Self::from_vec4(self.conjugate().vec4() * (1.0 / len))
        } else {
            Self::ZERO
        }
    }

    /// Unit quaternion; zero is returned unchanged.
    #[inline]
    pub fn normalize(self) -> Self {
        Self::from_vec4(self.vec4().normalize())
    }

    pub fn checked_normalize(self) -> crate::Result<Self> {
        self.vec4().checked_normalize().map(Self::from_vec4)
    }

    /// Hamilton product `a·b` (rotate by `b`, then by `a`)
    #[inline]
    fn hamilton(a: Self, b: Self) -> Self {
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    /// Rotation `q0` followed by `q1`
    #[inline]
    pub fn multiply(q0: Self, q1: Self) -> Self {
        Self::hamilton(q1, q0)
    }

    /// Rotation of `angle` radians around `axis`; the axis is normalized first.
    pub fn rotationquataxis(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Roll around Z, then pitch around X, then yaw around Y.
    pub fn rotationquatyawpitchroll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sy, cy) = (0.5 * yaw).sin_cos();
        let (sp, cp) = (0.5 * pitch).sin_cos();
        let (sr, cr) = (0.5 * roll).sin_cos();
        Self::new(
            -(cr * sp * cy + sr * cp * sy),
            -(cr * cp * sy - sr * sp * cy),
            -(sr * cp * cy - cr * sp * sy),
            -(cr * cp * cy + sr * sp * sy),
        )
    }

    /// Euler angles in radians, `(pitch, yaw, roll)` packed as `(x, y, z)`.
    #[inline]
    pub fn from_euler(angles: Vec3) -> Self {
        Self::rotationquatyawpitchroll(angles.y, angles.x, angles.z)
    }

    /// Extract the rotation of a pure-rotation matrix.
    ///
    /// Picks the trace branch when it is positive, otherwise the branch of
    /// the largest diagonal element, to avoid cancellation.
    pub fn rotationmatrix(m: &Mat4) -> Self {
        let r = &m.rows;
        let trace = r[0].x + r[1].y + r[2].z;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (r[1].z - r[2].y) / s,
                (r[2].x - r[0].z) / s,
                (r[0].y - r[1].x) / s,
                0.25 * s,
            )
        } else if r[0].x > r[1].y && r[0].x > r[2].z {
            let s = (1.0 + r[0].x - r[1].y - r[2].z).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (r[0].y + r[1].x) / s,
                (r[2].x + r[0].z) / s,
                (r[1].z - r[2].y) / s,
            )
        } else if r[1].y > r[2].z {
            let s = (1.0 + r[1].y - r[0].x - r[2].z).sqrt() * 2.0;
            Self::new(
                (r[0].y + r[1].x) / s,
                0.25 * s,
                (r[1].z + r[2].y) / s,
                (r[2].x - r[0].z) / s,
            )
        } else {
            let s = (1.0 + r[2].z - r[0].x - r[1].y).sqrt() * 2.0;
            Self::new(
                (r[2].x + r[0].z) / s,
                (r[1].z + r[2].y) / s,
                0.25 * s,
                (r[0].y - r[1].x) / s,
            )
        }
    }

    /// Axis (xyz, w = 0) and angle `2 * acos(w)`. `w` is clamped first so
    /// drift past `±1` cannot produce NaN.
    pub fn to_axisangle(self) -> (Vec4, f32) {
        let axis = Vec4::new(self.x, self.y, self.z, 0.0);
        (axis, 2.0 * scalar::acos(self.w))
    }

    /// Spherical interpolation along the shorter arc.
    ///
    /// Falls back to a plain lerp once the inputs are within `acos(0.95)`;
    /// that result is not renormalized.
    pub fn slerp(q1: Self, q2: Self, t: f32) -> Self {
        let mut cos = q1.dot(q2);
        let mut to = q2;
        if cos < 0.0 {
            cos = -cos;
            to = -q2;
        }

        if cos < 0.95 {
            let angle = scalar::acos(cos);
            let sin = angle.sin();
            let inv = 1.0 / sin;
            let s0 = ((1.0 - t) * angle).sin() * inv;
            let s1 = (t * angle).sin() * inv;
            Self::from_vec4(q1.vec4() * s0 + to.vec4() * s1)
        } else {
            Self::from_vec4(q1.vec4() * (1.0 - t) + to.vec4() * t)
        }
    }

    /// Barycentric blend of three rotations via nested slerps.
    pub fn barycentric(q0: Self, q1: Self, q2: Self, f: f32, g: f32) -> Self {
        let s = f + g;
        if s != 0.0 {
            let a = Self::slerp(q0, q1, s);
            let b = Self::slerp(q0, q2, s);
            Self::slerp(a, b, g / s)
        } else {
            q0
        }
    }

    /// Spherical quadrangle interpolation between `q1` and `c` with inner
    /// control points `a` and `b` (see [`Quat::squadsetup`]).
    pub fn squad(q1: Self, a: Self, b: Self, c: Self, t: f32) -> Self {
        let outer = Self::slerp(q1, c, t);
        let inner = Self::slerp(a, b, t);
        Self::slerp(outer, inner, 2.0 * t * (1.0 - t))
    }

    /// Control points for [`Quat::squad`] across the segment `q1..q2`, with
    /// `q0` and `q3` as neighbours. Returns `(a, b, c)`.
    pub fn squadsetup(q0: Self, q1: Self, q2: Self, q3: Self) -> (Self, Self, Self) {
        let q2 = if (q1 + q2).lengthsq() < (q1 - q2).lengthsq() { -q2 } else { q2 };
        let q0 = if (q0 + q1).lengthsq() < (q0 - q1).lengthsq() { -q0 } else { q0 };
        let q3 = if (q2 + q3).lengthsq() < (q2 - q3).lengthsq() { -q3 } else { q3 };

        let inv_q1 = q1.inverse();
        let inv_q2 = q2.inverse();

        let ln_q0 = Self::multiply(inv_q1, q0).ln();
        let ln_q2 = Self::multiply(inv_q1, q2).ln();
        let ln_q1 = Self::multiply(inv_q2, q1).ln();
        let ln_q3 = Self::multiply(inv_q2, q3).ln();

        let exp_q02 = Self::from_vec4((ln_q0.vec4() + ln_q2.vec4()) * -0.25).exp();
        let exp_q13 = Self::from_vec4((ln_q1.vec4() + ln_q3.vec4()) * -0.25).exp();

        let a = Self::multiply(q1, exp_q02);
        let b = Self::multiply(q2, exp_q13);
        (a, b, q2)
    }

    /// Exponential of a pure quaternion (w ignored).
    pub fn exp(self) -> Self {
        let v = Vec4::new(self.x, self.y, self.z, 0.0);
        let theta = v.length3();
        let (sin, cos) = theta.sin_cos();
        // sin(θ)/θ → 1 as θ → 0
        let k = if theta > TINY { sin / theta } else { 1.0 };
        Self::new(v.x * k, v.y * k, v.z * k, cos)
    }

    /// Logarithm of a unit quaternion; the identity maps to zero.
    pub fn ln(self) -> Self {
        let a = scalar::acos(self.w);
        let sin = a.sin();
        if sin > TINY {
            let k = a / sin;
            Self::new(self.x * k, self.y * k, self.z * k, 0.0)
        } else {
            Self::ZERO
        }
    }

    /// Rotate a direction by this unit quaternion.
    pub fn rotate(self, v: Vector) -> Vector {
        let p = Self::new(v.x, v.y, v.z, 0.0);
        let r = Self::hamilton(Self::hamilton(self, p), self.conjugate());
        Vector::new(r.x, r.y, r.z)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` rotates by `b` first, then by `a`.
impl Mul for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::multiply(rhs, self)
    }
}

impl Mul<Vector> for Quat {
    type Output = Vector;
    #[inline]
    fn mul(self, rhs: Vector) -> Vector {
        self.rotate(rhs)
    }
}

impl Mul<f32> for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::from_vec4(self.vec4() * rhs)
    }
}

impl Add for Quat {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_vec4(self.vec4() + rhs.vec4())
    }
}

impl Sub for Quat {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_vec4(self.vec4() - rhs.vec4())
    }
}

impl Neg for Quat {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::from_vec4(-self.vec4())
    }
}
