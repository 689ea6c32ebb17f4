//! Row-major 4x4 matrix for affine and projective transforms
//!
//! Vectors are rows: a point transforms as `p * M`, so row 3 holds the
//! translation and `Mat4::multiply(&a, &b)` applies `a` first, then `b`.
//! The `*` operator reads right to left instead (`a * b` applies `b`
//! first), which keeps expressions like `translation * rotation` in the
//! familiar column-vector order.

use crate::error::{IndexError, MathError};
use crate::plane::Plane;
use crate::point::{Point, Vector};
use crate::quaternion::Quat;
use crate::scalar::{self, TINY};
use crate::vec3::Vec3;
use crate::vec4::Vec4;
use core::ops::{Index, IndexMut, Mul, MulAssign};

/// 4x4 matrix stored as four row vectors
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Mat4 {
    pub rows: [Vec4; 4],
}

/// Whether the polar iteration in [`Mat4::decompose`] settled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    /// 100 iterations ran without the residual dropping below `1e-5`;
    /// the rotation is the last iterate.
    IterationCapReached,
}

/// Result of [`Mat4::decompose`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
    pub convergence: Convergence,
}

const DECOMPOSE_MAX_ITERATIONS: usize = 100;
const DECOMPOSE_TOLERANCE: f32 = 0.00001;

impl Mat4 {
    pub const IDENTITY: Self = Self::new(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);
    pub const ZERO: Self = Self::new(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);

    #[inline]
    pub const fn new(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self { rows: [r0, r1, r2, r3] }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build from 16 floats in row order.
    pub fn from_array(a: [f32; 16]) -> Self {
        Self::new(
            Vec4::new(a[0], a[1], a[2], a[3]),
            Vec4::new(a[4], a[5], a[6], a[7]),
            Vec4::new(a[8], a[9], a[10], a[11]),
            Vec4::new(a[12], a[13], a[14], a[15]),
        )
    }

    pub fn to_array(&self) -> [f32; 16] {
        let [r0, r1, r2, r3] = self.rows;
        [
            r0.x, r0.y, r0.z, r0.w, r1.x, r1.y, r1.z, r1.w, r2.x, r2.y, r2.z, r2.w, r3.x, r3.y,
            r3.z, r3.w,
        ]
    }

    #[inline]
    pub fn x_axis(&self) -> Vec4 {
        self.rows[0]
    }

    #[inline]
    pub fn y_axis(&self) -> Vec4 {
        self.rows[1]
    }

    #[inline]
    pub fn z_axis(&self) -> Vec4 {
        self.rows[2]
    }

    #[inline]
    pub fn position(&self) -> Vec4 {
        self.rows[3]
    }

    #[inline]
    pub fn set_position(&mut self, p: Vec4) {
        self.rows[3] = p;
    }

    pub fn row(&self, index: usize) -> Result<Vec4, IndexError> {
        self.rows
            .get(index)
            .copied()
            .ok_or(IndexError::new("mat4 row", index, 4))
    }

    pub fn set_row(&mut self, index: usize, row: Vec4) -> Result<(), IndexError> {
        let slot = self
            .rows
            .get_mut(index)
            .ok_or(IndexError::new("mat4 row", index, 4))?;
        *slot = row;
        Ok(())
    }

    /// Standard product: row `i` of the result is row `i` of `m0`
    /// transformed by `m1`.
    pub fn multiply(m0: &Self, m1: &Self) -> Self {
        let mut out = Self::ZERO;
        for (dst, r) in out.rows.iter_mut().zip(m0.rows.iter()) {
            *dst = m1.rows[0] * r.x + m1.rows[1] * r.y + m1.rows[2] * r.z + m1.rows[3] * r.w;
        }
        out
    }

    /// Transform a homogeneous row vector: `x*r0 + y*r1 + z*r2 + w*r3`.
    #[inline]
    pub fn transform(&self, v: Vec4) -> Vec4 {
        self.rows[0] * v.x + self.rows[1] * v.y + self.rows[2] * v.z + self.rows[3] * v.w
    }

    /// Transform a direction; row 3 is ignored.
    #[inline]
    pub fn transform_vector(&self, v: Vector) -> Vector {
        Vector::from_vec4(self.rows[0] * v.x + self.rows[1] * v.y + self.rows[2] * v.z)
    }

    /// Transform a position and divide through by the resulting `w`.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::from_vec4(self.transform(p.vec4()).perspective_div())
    }

    pub fn transpose(&self) -> Self {
        let [r0, r1, r2, r3] = self.rows;
        Self::new(
            Vec4::new(r0.x, r1.x, r2.x, r3.x),
            Vec4::new(r0.y, r1.y, r2.y, r3.y),
            Vec4::new(r0.z, r1.z, r2.z, r3.z),
            Vec4::new(r0.w, r1.w, r2.w, r3.w),
        )
    }

    pub fn determinant(&self) -> f32 {
        Cofactors::new(self).determinant()
    }

    /// Inverse via the adjugate. A singular matrix yields non-finite
    /// entries; use [`Mat4::try_inverse`] to detect that case.
    pub fn inverse(&self) -> Self {
        let c = Cofactors::new(self);
        c.adjugate(self) * (1.0 / c.determinant())
    }

    pub fn try_inverse(&self) -> crate::Result<Self> {
        let c = Cofactors::new(self);
        let det = c.determinant();
        if det.abs() < TINY || !det.is_finite() {
            log::warn!("refusing to invert singular matrix (determinant {det})");
            return Err(MathError::SingularMatrix { determinant: det });
        }
        Ok(c.adjugate(self) * (1.0 / det))
    }

    /// Exact equality with the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Affine when the fourth column is `(0, 0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        self.rows[0].w == 0.0 && self.rows[1].w == 0.0 && self.rows[2].w == 0.0 && self.rows[3].w == 1.0
    }

    pub fn nearequal(&self, o: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .zip(o.rows.iter())
            .all(|(a, b)| a.nearequal(*b, epsilon))
    }

    /// Lengths of the three basis rows.
    pub fn get_scale(&self) -> Vec3 {
        Vec3::new(self.rows[0].length3(), self.rows[1].length3(), self.rows[2].length3())
    }

    pub fn translate(&mut self, t: Vec3) {
        self.rows[3] += t.extend(0.0);
    }

    /// Scale every row by `(s, 1)`, including the translation.
    pub fn scale(&mut self, s: Vec3) {
        let scl = s.extend(1.0);
        for r in &mut self.rows {
            *r = r.multiply(scl);
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[3] = Vec4::new(x, y, z, 1.0);
        m
    }

    #[inline]
    pub fn translation_vec3(t: Vec3) -> Self {
        Self::translation(t.x, t.y, t.z)
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self::new(
            Vec4::new(sx, 0.0, 0.0, 0.0),
            Vec4::new(0.0, sy, 0.0, 0.0),
            Vec4::new(0.0, 0.0, sz, 0.0),
            Vec4::W,
        )
    }

    #[inline]
    pub fn scaling_uniform(s: f32) -> Self {
        Self::scaling(s, s, s)
    }

    #[inline]
    pub fn scaling_vec3(s: Vec3) -> Self {
        Self::scaling(s.x, s.y, s.z)
    }

    pub fn rotationx(angle: f32) -> Self {
        let (s, c) = scalar::sincos(angle);
        Self::new(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    pub fn rotationy(angle: f32) -> Self {
        let (s, c) = scalar::sincos(angle);
        Self::new(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    pub fn rotationz(angle: f32) -> Self {
        let (s, c) = scalar::sincos(angle);
        Self::new(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Rotation about an arbitrary axis; the axis is normalized first.
    pub fn rotationaxis(axis: Vec3, angle: f32) -> Self {
        let n = axis.normalize();
        let (s, c) = scalar::sincos(angle);
        let t = 1.0 - c;
        Self::new(
            Vec4::new(t * n.x * n.x + c, t * n.x * n.y + s * n.z, t * n.x * n.z - s * n.y, 0.0),
            Vec4::new(t * n.x * n.y - s * n.z, t * n.y * n.y + c, t * n.y * n.z + s * n.x, 0.0),
            Vec4::new(t * n.x * n.z + s * n.y, t * n.y * n.z - s * n.x, t * n.z * n.z + c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation matrix of `q`, scaled by `2 / |q|²` so a slightly
    /// denormalized quaternion still yields a rotation.
    pub fn rotationquat(q: Quat) -> Self {
        let s = 2.0 / q.lengthsq();
        let (xs, ys, zs) = (q.x * s, q.y * s, q.z * s);
        let (wx, wy, wz) = (q.w * xs, q.w * ys, q.w * zs);
        let (xx, xy, xz) = (q.x * xs, q.x * ys, q.x * zs);
        let (yy, yz, zz) = (q.y * ys, q.y * zs, q.z * zs);
        Self::new(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    #[inline]
    pub fn rotationyawpitchroll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::rotationquat(Quat::rotationquatyawpitchroll(yaw, pitch, roll))
    }

    /// Translation, rotation, scale shorthand for [`Mat4::affine`].
    #[inline]
    pub fn trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self::affine(scale, rotation, position)
    }

    /// Cross-product matrix: `v × u` equals `skewsymmetric(v)` applied to `u`
    /// as a column vector.
    pub fn skewsymmetric(v: Vec3) -> Self {
        Self::new(
            Vec4::new(0.0, -v.z, v.y, 0.0),
            Vec4::new(v.z, 0.0, -v.x, 0.0),
            Vec4::new(-v.y, v.x, 0.0, 0.0),
            Vec4::ZERO,
        )
    }

    /// Reflection through a plane.
    pub fn reflect(plane: &Plane) -> Self {
        let n = plane.normalize().vec4();
        let s = Vec4::new(-2.0 * n.x, -2.0 * n.y, -2.0 * n.z, 0.0);
        Self::new(
            Vec4::X + s * n.x,
            Vec4::Y + s * n.y,
            Vec4::Z + s * n.z,
            Vec4::W + s * n.w,
        )
    }

    /// Rotation scaled per axis, then translated.
    pub fn affine(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        let mut m = Self::rotationquat(rotation);
        let s = scale.extend(1.0);
        for r in &mut m.rows[..3] {
            *r = r.multiply(s);
        }
        m.rows[3] = translation.extend(1.0);
        m
    }

    /// Scale, then rotate about `rotation_center`, then translate.
    pub fn affine_centered(scale: Vec3, rotation_center: Vec3, rotation: Quat, translation: Vec3) -> Self {
        let rotc = rotation_center.extend(0.0);
        let mut m = Self::scaling_vec3(scale);
        m.rows[3] -= rotc;
        m = Self::multiply(&m, &Self::rotationquat(rotation));
        m.rows[3] += rotc + translation.extend(0.0);
        m
    }

    /// Like [`Mat4::affine`] with the rotation given as euler angles
    /// (`x` pitch, `y` yaw, `z` roll).
    pub fn affine_euler(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        let mut m = Self::rotationyawpitchroll(rotation.y, rotation.x, rotation.z);
        let s = scale.extend(1.0);
        for r in &mut m.rows[..3] {
            *r = r.multiply(s);
        }
        m.rows[3] = translation.extend(1.0);
        m
    }

    #[inline]
    pub fn affinetransformation(scale: f32, rotation_center: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self::affine_centered(Vec3::splat(scale), rotation_center, rotation, translation)
    }

    /// Full transformation: scaling about `scaling_center` along the frame
    /// of `scaling_rotation`, then rotation about `rotation_center`, then
    /// translation.
    pub fn transformation(
        scaling_center: Vec3,
        scaling_rotation: Quat,
        scale: Vec3,
        rotation_center: Vec3,
        rotation: Quat,
        translation: Vec3,
    ) -> Self {
        let rotc = rotation_center.extend(0.0);
        let mscalerotate = Self::rotationquat(scaling_rotation);

        let mut m = Self::multiply(&Self::translation_vec3(-scaling_center), &mscalerotate.transpose());
        m = Self::multiply(&m, &Self::scaling_vec3(scale));
        m = Self::multiply(&m, &mscalerotate);
        m.rows[3] += scaling_center.extend(0.0) - rotc;
        m = Self::multiply(&m, &Self::rotationquat(rotation));
        m.rows[3] += rotc + translation.extend(0.0);
        m
    }

    /// Rotation from XYZ euler angles in radians.
    pub fn fromeuler(angles: Vec3) -> Self {
        let (si, ci) = scalar::sincos(angles.x);
        let (sj, cj) = scalar::sincos(angles.y);
        let (sh, ch) = scalar::sincos(angles.z);
        let (cc, cs) = (ci * ch, ci * sh);
        let (sc, ss) = (si * ch, si * sh);
        Self::new(
            Vec4::new(cj * ch, sj * sc - cs, sj * cc + ss, 0.0),
            Vec4::new(cj * sh, sj * ss + cc, sj * cs - sc, 0.0),
            Vec4::new(-sj, cj * si, cj * ci, 0.0),
            Vec4::W,
        )
    }

    /// XYZ euler angles of the rotation part, in degrees.
    pub fn aseuler(&self) -> Vec3 {
        let m = &self.rows;
        let cy = (m[0].x * m[0].x + m[1].x * m[1].x).sqrt();
        let (x, y, z) = if cy > 16.0 * f32::EPSILON {
            (m[2].y.atan2(m[2].z), (-m[2].x).atan2(cy), m[1].x.atan2(m[0].x))
        } else {
            ((-m[1].z).atan2(m[1].y), (-m[2].x).atan2(cy), 0.0)
        };
        Vec3::new(scalar::rad2deg(x), scalar::rad2deg(y), scalar::rad2deg(z))
    }

    /// Split an affine matrix into scale, rotation and translation.
    ///
    /// The rotation is found by polar decomposition: the upper 3x3 is
    /// averaged with its inverse transpose until successive iterates differ
    /// by less than `1e-5` per row, or 100 iterations have run. A single
    /// negative scale cannot be told apart from a rotation, so it is always
    /// reported on `x`.
    pub fn decompose(&self) -> Decomposed {
        let mut mcopy = *self;
        let translation = mcopy.rows[3].xyz();
        mcopy.rows[3] = Vec4::W;

        let mut rotation = mcopy;
        let mut convergence = Convergence::IterationCapReached;
        let mut norm = f32::MAX;
        for _ in 0..DECOMPOSE_MAX_ITERATIONS {
            let inv_transpose = rotation.transpose().inverse();
            let mut next = Self::ZERO;
            for i in 0..4 {
                next.rows[i] = (rotation.rows[i] + inv_transpose.rows[i]) * 0.5;
            }

            norm = (0..3)
                .map(|i| (rotation.rows[i] - next.rows[i]).abs().dot3(Vec4::ONE))
                .fold(0.0, f32::max);
            rotation = next;

            if norm <= DECOMPOSE_TOLERANCE {
                convergence = Convergence::Converged;
                break;
            }
        }
        if convergence == Convergence::IterationCapReached {
            log::debug!("decompose stopped after {DECOMPOSE_MAX_ITERATIONS} iterations (residual {norm})");
        }

        let rot = Quat::rotationmatrix(&rotation);
        let mut scale = Self::multiply(&mcopy, &rotation.inverse()).get_scale();

        let nr = Self::new(
            mcopy.rows[0].normalize(),
            mcopy.rows[1].normalize(),
            mcopy.rows[2].normalize(),
            Vec4::W,
        );
        if nr.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        Decomposed {
            scale,
            rotation: rot,
            translation,
            convergence,
        }
    }

    /// True if `p` transformed by `m` lies within the clip volume
    /// `-w <= x, y, z <= w`.
    pub fn is_point_inside(p: Vec4, m: &Self) -> bool {
        let p1 = m.transform(p);
        let w = p1.w;
        -w <= p1.x && p1.x <= w && -w <= p1.y && p1.y <= w && -w <= p1.z && p1.z <= w
    }
}

/// 2x2 sub-determinants shared by `determinant` and `inverse`
struct Cofactors {
    s: [f32; 6],
    c: [f32; 6],
}

impl Cofactors {
    fn new(m: &Mat4) -> Self {
        let [a0, a1, a2, a3] = m.rows;
        Self {
            s: [
                a0.x * a1.y - a0.y * a1.x,
                a0.x * a1.z - a0.z * a1.x,
                a0.x * a1.w - a0.w * a1.x,
                a0.y * a1.z - a0.z * a1.y,
                a0.y * a1.w - a0.w * a1.y,
                a0.z * a1.w - a0.w * a1.z,
            ],
            c: [
                a2.x * a3.y - a2.y * a3.x,
                a2.x * a3.z - a2.z * a3.x,
                a2.x * a3.w - a2.w * a3.x,
                a2.y * a3.z - a2.z * a3.y,
                a2.y * a3.w - a2.w * a3.y,
                a2.z * a3.w - a2.w * a3.z,
            ],
        }
    }

    fn determinant(&self) -> f32 {
        let (s, c) = (&self.s, &self.c);
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    fn adjugate(&self, m: &Mat4) -> Mat4 {
        let (s, c) = (&self.s, &self.c);
        let [a0, a1, a2, a3] = m.rows;
        Mat4::new(
            Vec4::new(
                a1.y * c[5] - a1.z * c[4] + a1.w * c[3],
                -a0.y * c[5] + a0.z * c[4] - a0.w * c[3],
                a3.y * s[5] - a3.z * s[4] + a3.w * s[3],
                -a2.y * s[5] + a2.z * s[4] - a2.w * s[3],
            ),
            Vec4::new(
                -a1.x * c[5] + a1.z * c[2] - a1.w * c[1],
                a0.x * c[5] - a0.z * c[2] + a0.w * c[1],
                -a3.x * s[5] + a3.z * s[2] - a3.w * s[1],
                a2.x * s[5] - a2.z * s[2] + a2.w * s[1],
            ),
            Vec4::new(
                a1.x * c[4] - a1.y * c[2] + a1.w * c[0],
                -a0.x * c[4] + a0.y * c[2] - a0.w * c[0],
                a3.x * s[4] - a3.y * s[2] + a3.w * s[0],
                -a2.x * s[4] + a2.y * s[2] - a2.w * s[0],
            ),
            Vec4::new(
                -a1.x * c[3] + a1.y * c[1] - a1.z * c[0],
                a0.x * c[3] - a0.y * c[1] + a0.z * c[0],
                -a3.x * s[3] + a3.y * s[1] - a3.z * s[0],
                a2.x * s[3] - a2.y * s[1] + a2.z * s[0],
            ),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::multiply(&rhs, &self)
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.rows[0] * rhs, self.rows[1] * rhs, self.rows[2] * rhs, self.rows[3] * rhs)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform(rhs)
    }
}

/// The result keeps its `w` so projective matrices can be divided later.
impl Mul<Point> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Point) -> Vec4 {
        self.transform(rhs.vec4())
    }
}

impl Mul<Vector> for Mat4 {
    type Output = Vector;

    #[inline]
    fn mul(self, rhs: Vector) -> Vector {
        self.transform_vector(rhs)
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Vec4 {
        match self.rows.get(index) {
            Some(r) => r,
            None => panic!("{}", IndexError::new("mat4 row", index, 4)),
        }
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, index: usize) -> &mut Vec4 {
        match self.rows.get_mut(index) {
            Some(r) => r,
            None => panic!("{}", IndexError::new("mat4 row", index, 4)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const E: f32 = 0.00001;

    fn rows3(m: &Mat4, expected: [[f32; 3]; 3]) -> bool {
        (0..3).all(|i| {
            let r = m.rows[i];
            let e = expected[i];
            (r.x - e[0]).abs() < 1e-5 && (r.y - e[1]).abs() < 1e-5 && (r.z - e[2]).abs() < 1e-5
        })
    }

    fn rot_one_x_trans123() -> Mat4 {
        Mat4::translation(1.0, 2.0, 3.0) * Mat4::rotationx(1.0)
    }

    #[test]
    fn test_mat4_identity() {
        let m = Mat4::default();
        assert!(m.is_identity());
        assert_eq!(Mat4::identity() * Vec4::new(1.0, 2.0, 3.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert!(!Mat4::translation(0.0, 1.0, 0.0).is_identity());
    }

    #[test]
    fn test_mat4_composition_order() {
        let m = rot_one_x_trans123();
        let expected = Mat4::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.540302, 0.841471, 0.0),
            Vec4::new(0.0, -0.841471, 0.540302, 0.0),
            Vec4::new(1.0, 2.0, 3.0, 1.0),
        );
        assert!(m.nearequal(&expected, E));
        assert_eq!(m, Mat4::multiply(&Mat4::rotationx(1.0), &Mat4::translation(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_mat4_transform_points() {
        let m = rot_one_x_trans123();
        assert!((m * Point::new(1.0, 0.0, 0.0)).nearequal(Vec4::new(2.0, 2.0, 3.0, 1.0), E));
        assert!((m * Point::new(0.0, 1.0, 0.0)).nearequal(Vec4::new(1.0, 2.540302, 3.841471, 1.0), E));

        let v = m * Vector::new(0.0, 1.0, 0.0);
        assert!(v.vec4().nearequal(Vec4::new(0.0, 0.540302, 0.841471, 0.0), E));
    }

    #[test]
    fn test_mat4_inverse() {
        let m = rot_one_x_trans123();
        let inv = m.inverse();
        let expected = Mat4::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.540302, -0.841471, 0.0),
            Vec4::new(0.0, 0.841471, 0.540302, 0.0),
            Vec4::new(-1.0, -3.605018, 0.062035, 1.0),
        );
        assert!(inv.nearequal(&expected, E));
        assert!(Mat4::multiply(&m, &inv).nearequal(&Mat4::IDENTITY, E));
        assert!(m.try_inverse().is_ok());
    }

    #[test]
    fn test_mat4_singular() {
        let err = Mat4::ZERO.try_inverse().unwrap_err();
        assert_eq!(err, MathError::SingularMatrix { determinant: 0.0 });
        assert!(!Mat4::ZERO.inverse().rows[0].x.is_finite());
    }

    #[test]
    fn test_mat4_transpose_determinant() {
        let m = rot_one_x_trans123();
        let t = m.transpose();
        assert_eq!(t.rows[0].w, 1.0);
        assert_eq!(t.rows[1].w, 2.0);
        assert_eq!(t.rows[2].w, 3.0);
        assert_eq!(t.rows[3].w, 1.0);
        assert_eq!(t.transpose(), m);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = E);
        assert_abs_diff_eq!(Mat4::scaling(2.0, 3.0, 4.0).determinant(), 24.0, epsilon = E);
    }

    #[test]
    fn test_mat4_rotations() {
        assert!(rows3(
            &Mat4::rotationx(2.0),
            [[1.0, 0.0, 0.0], [0.0, -0.416147, 0.909297], [0.0, -0.909297, -0.416147]]
        ));
        assert!(rows3(
            &Mat4::rotationy(-1.7),
            [[-0.128845, 0.0, 0.991665], [0.0, 1.0, 0.0], [-0.991665, 0.0, -0.128845]]
        ));
        assert!(rows3(
            &Mat4::rotationz(3.1),
            [[-0.999135, 0.041581, 0.0], [-0.041581, -0.999135, 0.0], [0.0, 0.0, 1.0]]
        ));
        assert!(rows3(
            &Mat4::rotationaxis(Vec3::new(1.0, 0.2, 2.0), -2.53652),
            [
                [-0.460861, -0.434427, 0.773873],
                [0.579067, -0.807997, -0.108734],
                [0.672524, 0.398013, 0.623936],
            ]
        ));
        assert!(Mat4::rotationaxis(Vec3::X, 0.7).nearequal(&Mat4::rotationx(0.7), E));
    }

    #[test]
    fn test_mat4_yawpitchroll() {
        assert!(rows3(
            &Mat4::rotationyawpitchroll(1.0, -0.462, 3.036),
            [
                [-0.537292838, 0.056945987, -0.841470957],
                [0.278640598, -0.9297086, -0.240833968],
                [-0.796037436, -0.363866359, 0.483658552],
            ]
        ));
        assert!(rows3(
            &Mat4::rotationyawpitchroll(-7.0, 3.0, -2.0),
            [
                [-0.313734174, -0.685521364, 0.656986594],
                [-0.861614943, 0.496286869, 0.106390685],
                [-0.398986936, -0.532691121, -0.74635756],
            ]
        ));
    }

    #[test]
    fn test_mat4_scale_translate() {
        let mut m = rot_one_x_trans123();
        m.scale(Vec3::new(0.5, 1.5, -3.0));
        let expected = Mat4::new(
            Vec4::new(0.5, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.810453, -2.524413, 0.0),
            Vec4::new(0.0, -1.262206, -1.620907, 0.0),
            Vec4::new(0.5, 3.0, -9.0, 1.0),
        );
        assert!(m.nearequal(&expected, E));

        let mut t = Mat4::IDENTITY;
        t.translate(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.position(), Vec4::new(2.0, 2.0, 3.0, 1.0));

        assert!(Mat4::scaling(2.0, 3.0, 4.0).get_scale() == Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_mat4_reflect() {
        let m = Mat4::reflect(&Plane::new(0.0, 1.0, 0.0, 0.0));
        assert!(m.nearequal(&Mat4::scaling(1.0, -1.0, 1.0), E));
        assert!((m * Point::new(1.0, 2.0, 3.0)).nearequal(Vec4::new(1.0, -2.0, 3.0, 1.0), E));

        // plane y = 1
        let m = Mat4::reflect(&Plane::new(0.0, 1.0, 0.0, -1.0));
        assert!((m * Point::new(0.0, 3.0, 0.0)).nearequal(Vec4::new(0.0, -1.0, 0.0, 1.0), E));
    }

    #[test]
    fn test_mat4_decompose() {
        let m = rot_one_x_trans123() * Mat4::scaling(0.5, 2.0, 3.0);
        let d = m.decompose();
        assert_eq!(d.convergence, Convergence::Converged);
        assert!(d.scale.nearequal(Vec3::new(0.5, 2.0, 3.0), Vec3::splat(0.001)));
        assert!(d.rotation.vec4().nearequal(Vec4::new(0.479426, 0.0, 0.0, 0.877583), E));
        assert!(d.translation.nearequal(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(E)));
    }

    #[test]
    fn test_mat4_decompose_negative_scale() {
        let m = Mat4::scaling(-2.0, 1.0, 1.0);
        let d = m.decompose();
        assert!(d.scale.x < 0.0);
        assert_abs_diff_eq!(d.scale.x.abs(), 2.0, epsilon = 0.001);
    }

    #[test]
    fn test_mat4_trs_matches_affine() {
        let q = Quat::rotationquataxis(Vec3::Y, 0.3);
        let pos = Vec3::new(1.0, -2.0, 5.0);
        let scl = Vec3::new(2.0, 2.0, 2.0);
        let m = Mat4::trs(pos, q, scl);
        let expected = Mat4::translation_vec3(pos) * Mat4::rotationquat(q) * Mat4::scaling_vec3(scl);
        assert!(m.nearequal(&expected, E));
    }

    #[test]
    fn test_mat4_affinetransformation() {
        let q = Quat::rotationquataxis(Vec3::X, 1.0);
        let m = Mat4::affinetransformation(0.1, Vec3::new(0.5, 3.0, -1.7), q, Vec3::new(-20.0, 17.0, 9.0));
        let expected = Mat4::new(
            Vec4::new(0.1, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.054030, 0.084147, 0.0),
            Vec4::new(0.0, -0.084147, 0.054030, 0.0),
            Vec4::new(-20.0, 16.948593, 5.694101, 1.0),
        );
        assert!(m.nearequal(&expected, E));
    }

    #[test]
    fn test_mat4_transformation() {
        let q = Quat::rotationquataxis(Vec3::X, 1.0);
        let m = Mat4::transformation(
            Vec3::new(10.0, -3.0, 4.6),
            q,
            Vec3::new(2.0, -1.0, 3.0),
            Vec3::new(4.0, 5.0, -2.0),
            q,
            Vec3::new(-33.0, 10.0, 15.0),
        );
        let expected = Mat4::new(
            Vec4::new(2.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.520287, 0.559231, 0.0),
            Vec4::new(0.0, -1.123711, -1.439683, 0.0),
            Vec4::new(-43.0, 17.853806, 18.134460, 1.0),
        );
        assert!(m.nearequal(&expected, 0.0001));
    }

    #[test]
    fn test_mat4_euler_roundtrip() {
        let angles = Vec3::new(0.3, -0.5, 1.1);
        let m = Mat4::fromeuler(angles);
        let back = m.aseuler();
        assert_abs_diff_eq!(back.x, scalar::rad2deg(0.3), epsilon = 0.001);
        assert_abs_diff_eq!(back.y, scalar::rad2deg(-0.5), epsilon = 0.001);
        assert_abs_diff_eq!(back.z, scalar::rad2deg(1.1), epsilon = 0.001);
        assert!(Mat4::fromeuler(Vec3::new(0.4, 0.0, 0.0)).nearequal(&Mat4::rotationx(-0.4), E));
    }

    #[test]
    fn test_mat4_skewsymmetric() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let u = Vec3::new(-4.0, 0.5, 2.0);
        let m = Mat4::skewsymmetric(v);
        // column-vector product
        let r = m.transpose().transform(u.extend(0.0)).xyz();
        assert!(r.nearequal(v.cross(u), Vec3::splat(E)));
    }

    #[test]
    fn test_mat4_point_inside() {
        let m = Mat4::IDENTITY;
        assert!(Mat4::is_point_inside(Vec4::new(0.5, -0.5, 0.9, 1.0), &m));
        assert!(!Mat4::is_point_inside(Vec4::new(1.5, 0.0, 0.0, 1.0), &m));
    }

    #[test]
    fn test_mat4_checked_rows() {
        let mut m = Mat4::IDENTITY;
        assert_eq!(m.row(3), Ok(Vec4::W));
        assert!(m.row(4).is_err());
        assert!(m.set_row(1, Vec4::ONE).is_ok());
        assert_eq!(m[1], Vec4::ONE);
        assert_eq!(m.set_row(9, Vec4::ONE), Err(IndexError::new("mat4 row", 9, 4)));
    }

    #[test]
    #[should_panic]
    fn test_mat4_index_out_of_range() {
        let m = Mat4::IDENTITY;
        let _ = m[4];
    }

    #[test]
    fn test_mat4_array_roundtrip() {
        let m = rot_one_x_trans123();
        assert_eq!(Mat4::from_array(m.to_array()), m);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_mat4_serde() {
        let m = rot_one_x_trans123();
        let bytes = bincode::serialize(&m).unwrap();
        let back: Mat4 = bincode::deserialize(&bytes).unwrap();
        assert_eq!(m, back);
    }
}
