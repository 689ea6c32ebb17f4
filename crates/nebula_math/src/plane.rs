//! Planes in `ax + by + cz + d = 0` form

use crate::clip::ClipStatus;
use crate::error::MathError;
use crate::line::Line;
use crate::matrix::Mat4;
use crate::point::{Point, Vector};
use crate::scalar::TINY;
use crate::vec4::Vec4;

/// Plane with normal `(a, b, c)` and offset `d`
///
/// Points with a positive [`Plane::dot`] lie on the side the normal points
/// to.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub const fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    #[inline]
    pub const fn vec4(self) -> Vec4 {
        Vec4::new(self.a, self.b, self.c, self.d)
    }

    /// Plane through three points. The normal is `(p0 - p1) × (p0 - p2)`,
    /// normalized.
    pub fn setup_from_points(p0: Point, p1: Point, p2: Point) -> Self {
        let n = (p0 - p1).cross(p0 - p2).normalize();
        Self::new(n.x, n.y, n.z, -n.dot(Vector::from_vec4(p0.vec4())))
    }

    /// Like [`Plane::setup_from_points`], but rejects collinear points.
    pub fn try_setup_from_points(p0: Point, p1: Point, p2: Point) -> crate::Result<Self> {
        let cr = (p0 - p1).cross(p0 - p2);
        let n = cr.checked_normalize().map_err(|err| {
            log::warn!("plane through collinear points {p0:?} {p1:?} {p2:?}");
            err
        })?;
        Ok(Self::new(n.x, n.y, n.z, -n.dot(Vector::from_vec4(p0.vec4()))))
    }

    /// Plane through `p` with normal `n`; `n` is used as given.
    pub fn setup_from_point_and_normal(p: Point, n: Vector) -> Self {
        Self::new(n.x, n.y, n.z, -n.dot(Vector::from_vec4(p.vec4())))
    }

    /// Four-lane dot product with `v`. For a point (`w = 1`) this is the
    /// signed distance scaled by the normal's length.
    #[inline]
    pub fn dot(&self, v: Vec4) -> f32 {
        self.vec4().dot(v)
    }

    #[inline]
    pub fn distance(&self, p: Point) -> f32 {
        self.dot(p.vec4())
    }

    #[inline]
    pub fn get_normal(&self) -> Vector {
        Vector::new(self.a, self.b, self.c)
    }

    /// Point on the plane closest to the origin. Assumes a unit normal.
    #[inline]
    pub fn get_point(&self) -> Point {
        Point::ORIGIN + self.get_normal() * -self.d
    }

    /// Scale so the normal has unit length. A plane whose normal is shorter
    /// than `TINY` is returned unchanged.
    pub fn normalize(&self) -> Self {
        let len = self.vec4().length3();
        if len < TINY {
            return *self;
        }
        Self::from_vec4(self.vec4() * (1.0 / len))
    }

    /// Intersection with the infinite line through `start` and `end`.
    pub fn intersect_line(&self, start: Point, end: Point) -> Option<Point> {
        let n = self.vec4();
        let v1 = n.dot3(start.vec4());
        let v2 = n.dot3(end.vec4());
        let d = v1 - v2;
        if d.abs() < TINY {
            return None;
        }
        let t = self.distance(start) / d;
        Some(start + (end - start) * t)
    }

    /// Line along which two planes meet, `None` when they are parallel.
    pub fn intersect_plane(&self, other: &Plane) -> Option<Line> {
        let n0 = self.get_normal();
        let n1 = other.get_normal();
        let n00 = n0.dot(n0);
        let n01 = n0.dot(n1);
        let n11 = n1.dot(n1);
        let det = n00 * n11 - n01 * n01;
        if det.abs() < TINY {
            return None;
        }
        let inv_det = 1.0 / det;
        let c0 = (n01 * other.d - n11 * self.d) * inv_det;
        let c1 = (n01 * self.d - n00 * other.d) * inv_det;
        let base = Point::ORIGIN + n0 * c0 + n1 * c1;
        Some(Line::from_point_direction(base, n0.cross(n1)))
    }

    pub fn try_intersect_plane(&self, other: &Plane) -> crate::Result<Line> {
        self.intersect_plane(other).ok_or(MathError::Parallel)
    }

    /// Clip a segment to the positive half-space. Endpoints within `TINY`
    /// of the plane count as outside.
    pub fn clip(&self, l: &Line) -> (ClipStatus, Option<Line>) {
        let d0 = self.distance(l.start());
        let d1 = self.distance(l.end());
        if d0 >= TINY && d1 >= TINY {
            (ClipStatus::Inside, Some(*l))
        } else if d0 < TINY && d1 < TINY {
            (ClipStatus::Outside, None)
        } else {
            // the endpoints straddle the plane, so d0 != d1
            let Some(p) = self.intersect_line(l.start(), l.end()) else {
                return (ClipStatus::Outside, None);
            };
            let clipped = if d0 >= TINY {
                Line::new(l.start(), p)
            } else {
                Line::new(p, l.end())
            };
            (ClipStatus::Clipped, Some(clipped))
        }
    }

    /// Plane carried along with points transformed by `m`.
    pub fn transform(&self, m: &Mat4) -> Self {
        Self::from_vec4(m.inverse().transpose().transform(self.vec4()))
    }
}

impl From<Vec4> for Plane {
    #[inline]
    fn from(v: Vec4) -> Self {
        Self::from_vec4(v)
    }
}

impl From<Plane> for Vec4 {
    #[inline]
    fn from(p: Plane) -> Self {
        p.vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: f32 = 0.00001;

    #[test]
    fn test_plane_from_points() {
        let p = Plane::setup_from_points(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        );
        assert!(p.vec4().nearequal(Vec4::new(0.0, -1.0, 0.0, 0.0), E));

        let p = Plane::setup_from_points(
            Point::new(0.0, 2.0, 0.0),
            Point::new(0.0, 2.0, 1.0),
            Point::new(1.0, 2.0, 0.0),
        );
        assert!(p.vec4().nearequal(Vec4::new(0.0, 1.0, 0.0, -2.0), E));
        assert!((p.distance(Point::new(5.0, 3.0, 5.0)) - 1.0).abs() < E);
        assert!(p.get_point().vec4().nearequal(Vec4::new(0.0, 2.0, 0.0, 1.0), E));
    }

    #[test]
    fn test_plane_collinear() {
        let p0 = Point::new(0.0, 0.0, 0.0);
        let p1 = Point::new(1.0, 1.0, 1.0);
        let p2 = Point::new(2.0, 2.0, 2.0);
        assert!(Plane::try_setup_from_points(p0, p1, p2).is_err());
    }

    #[test]
    fn test_plane_point_and_normal() {
        let p = Plane::setup_from_point_and_normal(Point::new(0.0, 0.0, 4.0), Vector::Z);
        assert_eq!(p, Plane::new(0.0, 0.0, 1.0, -4.0));
    }

    #[test]
    fn test_plane_normalize() {
        let p = Plane::new(0.0, 2.0, 0.0, 4.0).normalize();
        assert_eq!(p, Plane::new(0.0, 1.0, 0.0, 2.0));
        let degenerate = Plane::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(degenerate.normalize(), degenerate);
    }

    #[test]
    fn test_plane_intersect_line() {
        let p = Plane::new(0.0, 1.0, 0.0, 0.0);
        let hit = p.intersect_line(Point::new(-2.0, -2.0, 1.0), Point::new(-2.0, 5.0, 1.0));
        assert!(hit.is_some_and(|h| h.vec4().nearequal(Vec4::new(-2.0, 0.0, 1.0, 1.0), E)));

        let parallel = p.intersect_line(Point::new(0.0, 1.0, 0.0), Point::new(5.0, 1.0, 0.0));
        assert!(parallel.is_none());
    }

    #[test]
    fn test_plane_clip() {
        let p = Plane::new(0.0, 1.0, 0.0, 0.0);
        let l = Line::new(Point::new(-2.0, -2.0, 1.0), Point::new(-2.0, 5.0, 1.0));
        let (status, clipped) = p.clip(&l);
        assert_eq!(status, ClipStatus::Clipped);
        let clipped = clipped.unwrap();
        assert!(clipped.start().vec4().nearequal(Vec4::new(-2.0, 0.0, 1.0, 1.0), E));
        assert!(clipped.end().vec4().nearequal(Vec4::new(-2.0, 5.0, 1.0, 1.0), E));

        let above = Line::new(Point::new(0.0, 1.0, 0.0), Point::new(3.0, 2.0, 0.0));
        assert_eq!(p.clip(&above), (ClipStatus::Inside, Some(above)));

        let below = Line::new(Point::new(0.0, -1.0, 0.0), Point::new(3.0, -2.0, 0.0));
        assert_eq!(p.clip(&below), (ClipStatus::Outside, None));

        // endpoint on the plane counts as outside
        let touching = Line::new(Point::new(0.0, 0.0, 0.0), Point::new(0.0, -1.0, 0.0));
        assert_eq!(p.clip(&touching).0, ClipStatus::Outside);
    }

    #[test]
    fn test_plane_intersect_plane() {
        let ground = Plane::new(0.0, 1.0, 0.0, 0.0);
        let wall = Plane::new(1.0, 0.0, 0.0, -2.0);
        let line = ground.intersect_plane(&wall).unwrap();
        assert!(line.start().vec4().nearequal(Vec4::new(2.0, 0.0, 0.0, 1.0), E));
        assert!(line.vec().vec4().nearequal(Vec4::new(0.0, 0.0, -1.0, 0.0), E));
        assert!(ground.distance(line.point_at(3.0)).abs() < E);
        assert!(wall.distance(line.point_at(3.0)).abs() < E);

        let shifted = Plane::new(0.0, 1.0, 0.0, -1.0);
        assert!(ground.intersect_plane(&shifted).is_none());
        assert_eq!(ground.try_intersect_plane(&shifted), Err(MathError::Parallel));
    }

    #[test]
    fn test_plane_transform() {
        let p = Plane::new(0.0, 1.0, 0.0, 0.0);
        let moved = p.transform(&Mat4::translation(0.0, 3.0, 0.0));
        assert!(moved.vec4().nearequal(Vec4::new(0.0, 1.0, 0.0, -3.0), E));

        let rotated = p.transform(&Mat4::rotationz(crate::scalar::HALF_PI));
        let probe = Mat4::rotationz(crate::scalar::HALF_PI) * Point::new(0.0, 1.0, 0.0);
        assert!((rotated.dot(probe) - 1.0).abs() < E);
    }
}
