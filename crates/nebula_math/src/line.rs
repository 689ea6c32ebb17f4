//! Lines and segments in parametric `b + m * t` form

use crate::error::MathError;
use crate::point::{Point, Vector};

/// Tolerance for degenerate directions in [`Line::intersect_line`]
const LINE_EPSILON: f32 = 2.22e-16;

/// Line through `b` with direction `m`. As a segment it spans `t` in
/// `[0, 1]`, from `b` to `b + m`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub b: Point,
    pub m: Vector,
}

impl Line {
    /// Segment from `start` to `end`.
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { b: start, m: end - start }
    }

    #[inline]
    pub const fn from_point_direction(b: Point, m: Vector) -> Self {
        Self { b, m }
    }

    #[inline]
    pub fn set(&mut self, start: Point, end: Point) {
        *self = Self::new(start, end);
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.b
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.b + self.m
    }

    #[inline]
    pub fn vec(&self) -> Vector {
        self.m
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.m.length()
    }

    #[inline]
    pub fn lengthsq(&self) -> f32 {
        self.m.lengthsq()
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Point {
        self.b + self.m * t
    }

    /// Parameter of the point on the line closest to `p`; `0` for a
    /// zero-length line.
    pub fn project(&self, p: Point) -> f32 {
        let l = self.m.dot(self.m);
        if l > 0.0 {
            self.m.dot(p - self.b) / l
        } else {
            0.0
        }
    }

    #[inline]
    pub fn closest_point(&self, p: Point) -> Point {
        self.point_at(self.project(p))
    }

    /// Distance from `p` to the infinite line.
    #[inline]
    pub fn distance_point(&self, p: Point) -> f32 {
        p.distance(self.closest_point(p))
    }

    /// Closest points between two infinite lines, one on each.
    ///
    /// Returns `None` when either direction is degenerate or the lines are
    /// parallel.
    pub fn intersect_line(&self, other: &Line) -> Option<(Point, Point)> {
        let p13 = self.b - other.b;
        let p43 = other.m;
        let p21 = self.m;
        if p43.lengthsq() < LINE_EPSILON || p21.lengthsq() < LINE_EPSILON {
            return None;
        }

        let d1343 = p13.dot(p43);
        let d4321 = p43.dot(p21);
        let d1321 = p13.dot(p21);
        let d4343 = p43.dot(p43);
        let d2121 = p21.dot(p21);

        let denom = d2121 * d4343 - d4321 * d4321;
        if denom.abs() < LINE_EPSILON {
            return None;
        }
        let numer = d1343 * d4321 - d1321 * d4343;

        let mua = numer / denom;
        let mub = (d1343 + d4321 * mua) / d4343;
        Some((self.point_at(mua), other.point_at(mub)))
    }

    pub fn try_intersect_line(&self, other: &Line) -> crate::Result<(Point, Point)> {
        self.intersect_line(other).ok_or(MathError::Parallel)
    }

    /// Shortest distance between two infinite lines, `None` when parallel.
    pub fn distance_line(&self, other: &Line) -> Option<f32> {
        self.intersect_line(other).map(|(pa, pb)| pa.distance(pb))
    }
}
