//! Six-plane clipping frustum
//!
//! Plane normals point out of the volume: a point is inside when its
//! [`Plane::dot`] is `<= 0` for every plane. Points exactly on a plane
//! count as inside.

use crate::bounds::BBox;
use crate::clip::ClipStatus;
use crate::error::IndexError;
use crate::line::Line;
use crate::matrix::Mat4;
use crate::plane::Plane;
use crate::point::Point;
use crate::vec4::Vec4;
use core::ops::Index;

/// Frustum plane slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PlaneIndex {
    Near = 0,
    Far,
    Left,
    Right,
    Top,
    Bottom,
}

impl PlaneIndex {
    pub const COUNT: usize = 6;
    pub const ALL: [Self; Self::COUNT] = [Self::Near, Self::Far, Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub fn from_index(index: usize) -> Result<Self, IndexError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(IndexError::new("frustum plane", index, Self::COUNT))
    }

    /// Bit set in [`Frustum::clipmask`] when a point is outside this plane.
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Frustum corners, named as seen from inside looking toward far
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Corner {
    TopLeftFar = 0,
    TopRightFar,
    BottomLeftFar,
    BottomRightFar,
    TopLeftNear,
    TopRightNear,
    BottomLeftNear,
    BottomRightNear,
}

impl Corner {
    pub const COUNT: usize = 8;
    pub const ALL: [Self; Self::COUNT] = [
        Self::TopLeftFar,
        Self::TopRightFar,
        Self::BottomLeftFar,
        Self::BottomRightFar,
        Self::TopLeftNear,
        Self::TopRightNear,
        Self::BottomLeftNear,
        Self::BottomRightNear,
    ];

    #[inline]
    fn is_top(self) -> bool {
        matches!(self, Self::TopLeftFar | Self::TopRightFar | Self::TopLeftNear | Self::TopRightNear)
    }

    #[inline]
    fn is_right(self) -> bool {
        matches!(self, Self::TopRightFar | Self::BottomRightFar | Self::TopRightNear | Self::BottomRightNear)
    }

    #[inline]
    fn is_far(self) -> bool {
        (self as usize) < 4
    }

    /// Corner of the clip-space volume `x, y in [-1, 1]`, `z in [0, 1]`.
    fn clip_space(self) -> Point {
        Point::new(
            if self.is_right() { 1.0 } else { -1.0 },
            if self.is_top() { 1.0 } else { -1.0 },
            if self.is_far() { 1.0 } else { 0.0 },
        )
    }

    /// Corner of a box: top is `pmax.y`, right is `pmax.x`, far is `pmax.z`.
    fn of_box(self, b: &BBox) -> Point {
        Point::new(
            if self.is_right() { b.pmax.x } else { b.pmin.x },
            if self.is_top() { b.pmax.y } else { b.pmin.y },
            if self.is_far() { b.pmax.z } else { b.pmin.z },
        )
    }
}

/// Clipping volume bounded by six planes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frustum {
    pub planes: [Plane; PlaneIndex::COUNT],
}

impl Frustum {
    /// Frustum of a camera, from the matrix taking clip space back to world
    /// space.
    pub fn from_inv_view_proj(inv_view_proj: &Mat4) -> Self {
        let world = Corner::ALL.map(|c| Point::from_vec4(inv_view_proj.transform(c.clip_space().vec4()).perspective_div()));
        Self::from_corners(&world)
    }

    /// Frustum enclosing `b` after transforming it by `transform`.
    pub fn from_bbox(b: &BBox, transform: &Mat4) -> Self {
        let world = Corner::ALL.map(|c| Point::from_vec4(transform.transform(c.of_box(b).vec4())));
        Self::from_corners(&world)
    }

    fn from_corners(p: &[Point; Corner::COUNT]) -> Self {
        use Corner::*;
        let at = |c: Corner| p[c as usize];
        let mut planes = [Plane::default(); PlaneIndex::COUNT];
        planes[PlaneIndex::Near as usize] = Plane::setup_from_points(at(TopLeftNear), at(TopRightNear), at(BottomLeftNear));
        planes[PlaneIndex::Far as usize] = Plane::setup_from_points(at(TopRightFar), at(TopLeftFar), at(BottomRightFar));
        planes[PlaneIndex::Left as usize] = Plane::setup_from_points(at(BottomLeftNear), at(BottomLeftFar), at(TopLeftNear));
        planes[PlaneIndex::Right as usize] = Plane::setup_from_points(at(BottomRightNear), at(TopRightNear), at(TopRightFar));
        planes[PlaneIndex::Top as usize] = Plane::setup_from_points(at(TopRightNear), at(TopLeftNear), at(TopRightFar));
        planes[PlaneIndex::Bottom as usize] = Plane::setup_from_points(at(BottomRightFar), at(BottomLeftFar), at(BottomRightNear));

        // mirroring transforms flip the winding, point every normal away from the centroid
        let sum = p.iter().fold(Vec4::ZERO, |acc, c| acc + c.vec4());
        let centroid = Point::from_vec4(sum * (1.0 / Corner::COUNT as f32));
        for plane in &mut planes {
            if plane.distance(centroid) > 0.0 {
                *plane = Plane::from_vec4(-plane.vec4());
            }
        }
        Self { planes }
    }

    #[inline]
    pub fn plane(&self, index: usize) -> Result<&Plane, IndexError> {
        self.planes
            .get(index)
            .ok_or(IndexError::new("frustum plane", index, PlaneIndex::COUNT))
    }

    pub fn inside(&self, p: Point) -> bool {
        self.planes.iter().all(|plane| plane.distance(p) <= 0.0)
    }

    /// Bit `1 << PlaneIndex` is set for every plane `p` lies outside of.
    pub fn clipmask(&self, p: Point) -> u32 {
        self.clipmask_vec4(p.vec4())
    }

    fn clipmask_vec4(&self, p: Vec4) -> u32 {
        PlaneIndex::ALL
            .iter()
            .filter(|&&i| self.planes[i as usize].dot(p) > 0.0)
            .fold(0, |mask, &i| mask | i.bit())
    }

    /// Clip a segment against all six planes in turn.
    pub fn clip(&self, l: &Line) -> (ClipStatus, Option<Line>) {
        let mut status = ClipStatus::Inside;
        let mut current = *l;
        for plane in &self.planes {
            // clip() keeps the positive side, the interior is the negative one
            let inward = Plane::from_vec4(-plane.vec4());
            match inward.clip(&current) {
                (ClipStatus::Outside, _) | (_, None) => return (ClipStatus::Outside, None),
                (ClipStatus::Clipped, Some(clipped)) => {
                    status = ClipStatus::Clipped;
                    current = clipped;
                }
                (ClipStatus::Inside, Some(same)) => current = same,
            }
        }
        (status, Some(current))
    }

    pub fn clipstatus(&self, b: &BBox) -> ClipStatus {
        self.corner_masks(b.corners().map(|c| c.vec4()))
    }

    /// Clip status of `b` after transforming it by `transform`.
    pub fn clipstatus_transformed(&self, b: &BBox, transform: &Mat4) -> ClipStatus {
        self.corner_masks(b.corners().map(|c| transform.transform(c.vec4())))
    }

    fn corner_masks(&self, corners: [Vec4; 8]) -> ClipStatus {
        let (and_flags, or_flags) = corners.iter().fold((0xffff_u32, 0_u32), |(and, or), &c| {
            let mask = self.clipmask_vec4(c);
            (and & mask, or | mask)
        });
        ClipStatus::from_masks(and_flags, or_flags)
    }

    /// Frustum carried along with points transformed by `m`.
    pub fn transform(&self, m: &Mat4) -> Self {
        let inv_t = m.inverse().transpose();
        Self {
            planes: self.planes.map(|p| Plane::from_vec4(inv_t.transform(p.vec4()))),
        }
    }
}

impl Index<PlaneIndex> for Frustum {
    type Output = Plane;

    #[inline]
    fn index(&self, index: PlaneIndex) -> &Plane {
        &self.planes[index as usize]
    }
}
