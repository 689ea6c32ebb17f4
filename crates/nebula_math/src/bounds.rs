//! Bounding volumes for spatial queries and culling

use crate::clip::{ClipFlags, ClipStatus};
use crate::error::{IndexError, MathError};
use crate::frustum::Frustum;
use crate::matrix::Mat4;
use crate::plane::Plane;
use crate::point::{Point, Vector};
use crate::vec3::Vec3;
use crate::vec4::Vec4;

/// Sentinel used by [`BBox::begin_extend`]
const EXTEND_SENTINEL: f32 = 1_000_000.0;

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub pmin: Point,
    pub pmax: Point,
}

impl Default for BBox {
    /// Unit cube around the origin.
    fn default() -> Self {
        Self::from_min_max(Point::new(-0.5, -0.5, -0.5), Point::new(0.5, 0.5, 0.5))
    }
}

impl BBox {
    /// Create from center and half-extents
    #[inline]
    pub fn new(center: Point, extents: Vector) -> Self {
        Self {
            pmin: center - extents,
            pmax: center + extents,
        }
    }

    #[inline]
    pub const fn from_min_max(pmin: Point, pmax: Point) -> Self {
        Self { pmin, pmax }
    }

    /// Box around a transform: the translation is the center, the summed
    /// absolute basis rows give the size.
    pub fn from_mat4(m: &Mat4) -> Self {
        let extents = (m.x_axis().abs() + m.y_axis().abs() + m.z_axis().abs()).xyz() * 0.5;
        Self::new(Point::from_vec3(m.position().xyz()), Vector::from_vec3(extents))
    }

    #[inline]
    pub fn set(&mut self, center: Point, extents: Vector) {
        *self = Self::new(center, extents);
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.pmin + (self.pmax - self.pmin) * 0.5
    }

    /// Half-extents
    #[inline]
    pub fn extents(&self) -> Vector {
        (self.pmax - self.pmin) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        (self.pmax - self.pmin).xyz()
    }

    #[inline]
    pub fn diagonal_size(&self) -> f32 {
        (self.pmax - self.pmin).length()
    }

    /// Invert the box so the next [`BBox::extend`] snaps to its input.
    pub fn begin_extend(&mut self) {
        self.pmin = Point::new(EXTEND_SENTINEL, EXTEND_SENTINEL, EXTEND_SENTINEL);
        self.pmax = Point::new(-EXTEND_SENTINEL, -EXTEND_SENTINEL, -EXTEND_SENTINEL);
    }

    #[inline]
    pub fn extend(&mut self, p: Point) {
        self.pmin = self.pmin.minimize(p);
        self.pmax = self.pmax.maximize(p);
    }

    #[inline]
    pub fn extend_bbox(&mut self, b: &BBox) {
        self.pmin = self.pmin.minimize(b.pmin);
        self.pmax = self.pmax.maximize(b.pmax);
    }

    /// Collapse to a zero box at the origin if nothing was added since
    /// [`BBox::begin_extend`].
    pub fn end_extend(&mut self) {
        let untouched = self.pmin == Point::new(EXTEND_SENTINEL, EXTEND_SENTINEL, EXTEND_SENTINEL)
            && self.pmax == Point::new(-EXTEND_SENTINEL, -EXTEND_SENTINEL, -EXTEND_SENTINEL);
        if untouched {
            self.pmin = Point::ORIGIN;
            self.pmax = Point::ORIGIN;
        }
    }

    /// Box around a set of points, zero-sized for an empty slice.
    pub fn from_points(points: &[Point]) -> Self {
        let mut b = Self::default();
        b.begin_extend();
        for &p in points {
            b.extend(p);
        }
        b.end_extend();
        b
    }

    /// Corners in the order `pmin`, then around the near face, `pmax`, then
    /// around the far face.
    pub fn corner_point(&self, index: usize) -> Result<Point, IndexError> {
        let (lo, hi) = (self.pmin, self.pmax);
        let p = match index {
            0 => lo,
            1 => Point::new(lo.x, hi.y, lo.z),
            2 => Point::new(hi.x, hi.y, lo.z),
            3 => Point::new(hi.x, lo.y, lo.z),
            4 => hi,
            5 => Point::new(lo.x, hi.y, hi.z),
            6 => Point::new(lo.x, lo.y, hi.z),
            7 => Point::new(hi.x, lo.y, hi.z),
            _ => return Err(IndexError::new("bbox corner", index, 8)),
        };
        Ok(p)
    }

    pub fn corners(&self) -> [Point; 8] {
        let (lo, hi) = (self.pmin, self.pmax);
        [
            lo,
            Point::new(lo.x, hi.y, lo.z),
            Point::new(hi.x, hi.y, lo.z),
            Point::new(hi.x, lo.y, lo.z),
            hi,
            Point::new(lo.x, hi.y, hi.z),
            Point::new(lo.x, lo.y, hi.z),
            Point::new(hi.x, lo.y, hi.z),
        ]
    }

    /// Axis-aligned box around all eight corners after transforming them
    /// by `m`, with a perspective divide.
    pub fn transform(&mut self, m: &Mat4) {
        let mut min = Vec4::splat(EXTEND_SENTINEL);
        let mut max = Vec4::splat(-EXTEND_SENTINEL);
        for corner in self.corners() {
            let p = m.transform(corner.vec4()).perspective_div();
            min = min.minimize(p);
            max = max.maximize(p);
        }
        self.pmin = Point::from_vec4(min);
        self.pmax = Point::from_vec4(max);
    }

    /// Faster [`BBox::transform`] for affine `m`, working per basis axis.
    pub fn affine_transform(&mut self, m: &Mat4) {
        if !m.is_affine() {
            log::warn!("bbox affine_transform called with a non-affine matrix");
        }
        let xa = m.x_axis() * self.pmin.x;
        let xb = m.x_axis() * self.pmax.x;
        let ya = m.y_axis() * self.pmin.y;
        let yb = m.y_axis() * self.pmax.y;
        let za = m.z_axis() * self.pmin.z;
        let zb = m.z_axis() * self.pmax.z;

        let pos = m.position();
        self.pmin = Point::from_vec4(xa.minimize(xb) + ya.minimize(yb) + za.minimize(zb) + pos);
        self.pmax = Point::from_vec4(xa.maximize(xb) + ya.maximize(yb) + za.maximize(zb) + pos);
    }

    /// Like [`BBox::affine_transform`], but rejects a projective `m`.
    pub fn try_affine_transform(&mut self, m: &Mat4) -> crate::Result<()> {
        if !m.is_affine() {
            return Err(MathError::NotAffine);
        }
        self.affine_transform(m);
        Ok(())
    }

    /// Overlap test, touching faces count as intersecting.
    pub fn intersects(&self, b: &BBox) -> bool {
        let lt = self.pmax.xyz().less_any(b.pmin.xyz());
        let gt = self.pmin.xyz().greater_any(b.pmax.xyz());
        !(lt || gt)
    }

    /// `b` lies strictly inside on the min side, inclusively on the max side.
    pub fn contains(&self, b: &BBox) -> bool {
        self.pmin.xyz().less_all(b.pmin.xyz()) && self.pmax.xyz().greaterequal_all(b.pmax.xyz())
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.pmin.xyz().less_all(p.xyz()) && self.pmax.xyz().greaterequal_all(p.xyz())
    }

    /// Transform that maps the unit cube onto this box.
    pub fn to_mat4(&self) -> Mat4 {
        let mut m = Mat4::scaling_vec3(self.size());
        m.set_position(self.center().vec4());
        m
    }

    /// Classify `b` against this box.
    pub fn clipstatus_bbox(&self, b: &BBox) -> ClipStatus {
        if self.contains(b) {
            ClipStatus::Inside
        } else if self.intersects(b) {
            ClipStatus::Clipped
        } else {
            ClipStatus::Outside
        }
    }

    /// Classify against the clip volume of `view_proj`. Orthographic
    /// projections skip the `w` computation.
    pub fn clipstatus(&self, view_proj: &Mat4, is_ortho: bool) -> ClipStatus {
        let (and_flags, or_flags) = self.corners().iter().fold((0xffff_u32, 0_u32), |(and, or), corner| {
            let p = view_proj.transform(corner.vec4());
            let w = if is_ortho { 1.0 } else { p.w };
            let flags = ClipFlags::of_clip_point(p.x, p.y, p.z, w).bits();
            (and & flags, or | flags)
        });
        ClipStatus::from_masks(and_flags, or_flags)
    }

    /// Treat the box as a region of clip space and return its faces as
    /// world-space planes, ordered like a [`Frustum`].
    pub fn clipplanes(&self, view_proj: &Mat4) -> Frustum {
        let to_world = view_proj.transpose();
        let (lo, hi) = (self.pmin, self.pmax);
        let clip_planes = [
            Vec4::new(0.0, 0.0, -1.0, lo.z),
            Vec4::new(0.0, 0.0, 1.0, -hi.z),
            Vec4::new(-1.0, 0.0, 0.0, lo.x),
            Vec4::new(1.0, 0.0, 0.0, -hi.x),
            Vec4::new(0.0, 1.0, 0.0, -hi.y),
            Vec4::new(0.0, -1.0, 0.0, lo.y),
        ];
        Frustum {
            planes: clip_planes.map(|p| Plane::from_vec4(to_world.transform(p))),
        }
    }
}

/// Bounding sphere
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Point,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        (p - self.center).lengthsq() <= self.radius * self.radius
    }

    /// Sphere-sphere overlap without a square root.
    #[inline]
    pub fn intersects(&self, other: &Sphere) -> bool {
        let r = self.radius + other.radius;
        (other.center - self.center).lengthsq() <= r * r
    }

    /// Squared distance from the center to the closest point of `b`.
    pub fn intersects_bbox(&self, b: &BBox) -> bool {
        let c = self.center.xyz();
        let closest = c.clamp(b.pmin.xyz(), b.pmax.xyz());
        (c - closest).lengthsq() <= self.radius * self.radius
    }

    /// `Inside` when every corner of `b` is inside the sphere.
    pub fn clipstatus(&self, b: &BBox) -> ClipStatus {
        if !self.intersects_bbox(b) {
            ClipStatus::Outside
        } else if b.corners().iter().all(|&c| self.contains_point(c)) {
            ClipStatus::Inside
        } else {
            ClipStatus::Clipped
        }
    }

    /// Sphere enclosing this one after transforming by `m`; the radius
    /// grows by the largest axis scale.
    pub fn transform(&self, m: &Mat4) -> Self {
        let s = m.get_scale();
        Self {
            center: m.transform_point(self.center),
            radius: self.radius * s.x.max(s.y).max(s.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit() -> BBox {
        BBox::new(Point::ORIGIN, Vector::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_bbox_basics() {
        let d = BBox::default();
        assert_eq!(d.pmin, Point::new(-0.5, -0.5, -0.5));
        assert_eq!(d.pmax, Point::new(0.5, 0.5, 0.5));

        let b = BBox::new(Point::new(1.0, 2.0, 3.0), Vector::new(1.0, 2.0, 3.0));
        assert_eq!(b.pmin, Point::ORIGIN);
        assert_eq!(b.center(), Point::new(1.0, 2.0, 3.0));
        assert_eq!(b.extents(), Vector::new(1.0, 2.0, 3.0));
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 6.0));
        assert_abs_diff_eq!(b.diagonal_size(), 56.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_bbox_from_mat4() {
        let m = Mat4::trs(Vec3::new(5.0, 0.0, 0.0), crate::quaternion::Quat::IDENTITY, Vec3::new(2.0, 4.0, 6.0));
        let b = BBox::from_mat4(&m);
        assert_eq!(b.center(), Point::new(5.0, 0.0, 0.0));
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 6.0));
        assert!(b.to_mat4().nearequal(&m, 1e-6));
    }

    #[test]
    fn test_bbox_extend() {
        let mut b = BBox::default();
        b.begin_extend();
        b.end_extend();
        assert_eq!(b, BBox::from_min_max(Point::ORIGIN, Point::ORIGIN));

        b.begin_extend();
        b.extend(Point::new(1.0, -2.0, 3.0));
        b.extend(Point::new(-1.0, 4.0, 0.0));
        b.end_extend();
        assert_eq!(b.pmin, Point::new(-1.0, -2.0, 0.0));
        assert_eq!(b.pmax, Point::new(1.0, 4.0, 3.0));

        b.extend_bbox(&unit());
        assert_eq!(b.pmin, Point::new(-1.0, -2.0, -1.0));

        let pts = BBox::from_points(&[Point::new(2.0, 2.0, 2.0), Point::new(3.0, 1.0, 2.0)]);
        assert_eq!(pts.pmin, Point::new(2.0, 1.0, 2.0));
        assert_eq!(pts.pmax, Point::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_bbox_corners() {
        let b = unit();
        assert_eq!(b.corner_point(0), Ok(b.pmin));
        assert_eq!(b.corner_point(4), Ok(b.pmax));
        assert_eq!(b.corner_point(7), Ok(Point::new(1.0, -1.0, 1.0)));
        assert!(b.corner_point(8).is_err());
        for (i, c) in b.corners().iter().enumerate() {
            assert_eq!(b.corner_point(i).as_ref(), Ok(c));
        }
    }

    #[test]
    fn test_bbox_transform() {
        let mut b = unit();
        b.transform(&Mat4::rotationz(crate::scalar::PI * 0.25));
        let r = 2.0_f32.sqrt();
        assert!(b.pmax.vec4().nearequal(Vec4::new(r, r, 1.0, 1.0), 1e-5));
        assert!(b.pmin.vec4().nearequal(Vec4::new(-r, -r, -1.0, 1.0), 1e-5));

        let m = Mat4::multiply(&Mat4::scaling(2.0, 1.0, 1.0), &Mat4::translation(1.0, 0.0, 0.0));
        let mut fast = unit();
        fast.affine_transform(&m);
        let mut slow = unit();
        slow.transform(&m);
        assert!(fast.pmin.vec4().nearequal(slow.pmin.vec4(), 1e-6));
        assert!(fast.pmax.vec4().nearequal(slow.pmax.vec4(), 1e-6));
        assert_eq!(fast.pmax, Point::new(3.0, 1.0, 1.0));

        let proj = Mat4::perspfovrh(1.0, 1.0, 0.1, 10.0);
        assert_eq!(unit().try_affine_transform(&proj), Err(MathError::NotAffine));
    }

    #[test]
    fn test_bbox_overlap() {
        let a = unit();
        let inner = BBox::new(Point::ORIGIN, Vector::new(0.5, 0.5, 0.5));
        let touching = BBox::new(Point::new(2.0, 0.0, 0.0), Vector::new(1.0, 1.0, 1.0));
        let apart = BBox::new(Point::new(5.0, 0.0, 0.0), Vector::new(1.0, 1.0, 1.0));

        assert!(a.intersects(&inner));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(a.contains(&inner));
        assert!(!inner.contains(&a));
        assert!(!a.contains(&a));

        assert!(a.contains_point(Point::new(0.5, 0.5, 1.0)));
        assert!(!a.contains_point(Point::new(-1.0, 0.0, 0.0)));

        assert_eq!(a.clipstatus_bbox(&inner), ClipStatus::Inside);
        assert_eq!(a.clipstatus_bbox(&touching), ClipStatus::Clipped);
        assert_eq!(a.clipstatus_bbox(&apart), ClipStatus::Outside);
    }

    #[test]
    fn test_bbox_clipstatus_ortho() {
        let proj = Mat4::scaling(0.1, 0.1, 0.1);
        assert_eq!(unit().clipstatus(&proj, true), ClipStatus::Inside);
        let big = BBox::new(Point::ORIGIN, Vector::new(20.0, 1.0, 1.0));
        assert_eq!(big.clipstatus(&proj, true), ClipStatus::Clipped);
        let off = BBox::new(Point::new(0.0, 50.0, 0.0), Vector::new(1.0, 1.0, 1.0));
        assert_eq!(off.clipstatus(&proj, true), ClipStatus::Outside);
    }

    #[test]
    fn test_bbox_clipstatus_perspective() {
        let view = Mat4::lookatrh(Point::new(0.0, 0.0, 10.0), Point::ORIGIN, Vector::UP).inverse();
        let proj = Mat4::perspfovrh(crate::scalar::deg2rad(60.0), 1.0, 1.0, 100.0);
        let view_proj = Mat4::multiply(&view, &proj);
        assert_eq!(unit().clipstatus(&view_proj, false), ClipStatus::Inside);
        let aside = BBox::new(Point::new(100.0, 0.0, 0.0), Vector::new(1.0, 1.0, 1.0));
        assert_eq!(aside.clipstatus(&view_proj, false), ClipStatus::Outside);
        let wide = BBox::new(Point::ORIGIN, Vector::new(100.0, 1.0, 1.0));
        assert_eq!(wide.clipstatus(&view_proj, false), ClipStatus::Clipped);
    }

    #[test]
    fn test_bbox_clipplanes() {
        let view_proj = Mat4::scaling(0.1, 0.1, 0.1);
        let region = BBox::from_min_max(Point::new(-0.5, -0.5, -1.0), Point::new(0.5, 0.5, 1.0));
        let f = region.clipplanes(&view_proj);
        assert!(f.inside(Point::ORIGIN));
        assert!(f.inside(Point::new(4.0, -4.0, 0.0)));
        assert!(!f.inside(Point::new(6.0, 0.0, 0.0)));
        assert!(!f.inside(Point::new(0.0, 0.0, -11.0)));
    }

    #[test]
    fn test_sphere_intersection() {
        let a = Sphere::new(Point::ORIGIN, 1.0);
        let b = Sphere::new(Point::new(1.5, 0.0, 0.0), 1.0);
        let c = Sphere::new(Point::new(3.0, 0.0, 0.0), 0.5);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(b.intersects(&c));
        assert!(a.contains_point(Point::new(0.0, 1.0, 0.0)));
        assert!(!a.contains_point(Point::new(0.0, 1.1, 0.0)));
    }

    #[test]
    fn test_sphere_bbox() {
        let s = Sphere::new(Point::ORIGIN, 2.0);
        let inner = BBox::new(Point::ORIGIN, Vector::new(1.0, 1.0, 1.0));
        let corner = BBox::new(Point::new(2.0, 2.0, 0.0), Vector::new(0.5, 0.5, 0.5));
        let straddling = BBox::new(Point::new(2.0, 0.0, 0.0), Vector::new(0.5, 0.5, 0.5));

        assert!(s.intersects_bbox(&inner));
        assert!(!s.intersects_bbox(&corner));
        assert!(s.intersects_bbox(&straddling));

        assert_eq!(s.clipstatus(&inner), ClipStatus::Inside);
        assert_eq!(s.clipstatus(&corner), ClipStatus::Outside);
        assert_eq!(s.clipstatus(&straddling), ClipStatus::Clipped);
    }

    #[test]
    fn test_sphere_transform() {
        let s = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0);
        let m = Mat4::multiply(&Mat4::scaling(1.0, 3.0, 2.0), &Mat4::translation(0.0, 5.0, 0.0));
        let t = s.transform(&m);
        assert!(t.center.vec4().nearequal(Vec4::new(1.0, 5.0, 0.0, 1.0), 1e-6));
        assert_abs_diff_eq!(t.radius, 3.0, epsilon = 1e-6);
    }
}
