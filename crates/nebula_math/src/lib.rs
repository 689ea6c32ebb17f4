//! # nebula_math - Portable 4-wide Math Library
//!
//! Vectors, matrices, quaternions and the geometric primitives built on
//! them, for rendering, culling and animation code. Everything is a plain
//! `Copy` value; operations are pure functions.
//!
//! Matrices are row-major and transform row vectors, so `Mat4::multiply(a, b)`
//! applies `a` first. Projection builders target Direct3D clip space unless
//! the `vulkan` or `ogl4` feature is enabled.

pub mod scalar;
pub mod error;
pub mod float2;
pub mod vec3;
pub mod vec4;
pub mod point;
pub mod quaternion;
pub mod matrix;
pub mod projection;
pub mod clip;
pub mod plane;
pub mod line;
pub mod frustum;
pub mod bounds;
pub mod half;
pub mod extrapolator;

pub use error::{IndexError, MathError, Result};
pub use float2::Float2;
pub use vec3::Vec3;
pub use vec4::{Float4, Vec4};
pub use point::{Point, Vector};
pub use quaternion::Quat;
pub use matrix::{Convergence, Decomposed, Mat4};
pub use clip::{ClipFlags, ClipStatus};
pub use plane::Plane;
pub use line::Line;
pub use frustum::{Corner, Frustum, PlaneIndex};
pub use bounds::{BBox, Sphere};
pub use half::Half;
pub use extrapolator::{Estimate, Extrapolate, Extrapolator};

/// Common math constants
pub mod consts {
    pub use crate::scalar::{HALF_PI, INFINITY, LN_2, PI, TINY, TWO_PI};
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

pub mod prelude {
    pub use crate::bounds::{BBox, Sphere};
    pub use crate::clip::{ClipFlags, ClipStatus};
    pub use crate::error::{IndexError, MathError};
    pub use crate::float2::Float2;
    pub use crate::frustum::{Frustum, PlaneIndex};
    pub use crate::half::Half;
    pub use crate::line::Line;
    pub use crate::matrix::Mat4;
    pub use crate::plane::Plane;
    pub use crate::point::{Point, Vector};
    pub use crate::quaternion::Quat;
    pub use crate::scalar::{clamp, deg2rad, lerp, rad2deg, smoothstep};
    pub use crate::vec3::Vec3;
    pub use crate::vec4::Vec4;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_composed_transform_moves_origin() {
        let trans123 = Mat4::translation(1.0, 2.0, 3.0);
        let rot_one_x = Mat4::rotationx(1.0);
        let m = trans123 * rot_one_x;
        let p = m * Point::ORIGIN;
        assert!(p.nearequal(Vec4::new(1.0, 2.0, 3.0, 1.0), 0.00001));
    }

    #[test]
    fn test_culling_pipeline() {
        let eye = Point::new(0.0, 5.0, 20.0);
        let view = Mat4::lookatrh(eye, Point::ORIGIN, Vector::UP).inverse();
        let proj = Mat4::perspfovrh(deg2rad(45.0), 16.0 / 9.0, 0.5, 200.0);
        let view_proj = Mat4::multiply(&view, &proj);
        let frustum = Frustum::from_inv_view_proj(&view_proj.inverse());

        let visible = BBox::new(Point::ORIGIN, Vector::new(1.0, 1.0, 1.0));
        let hidden = BBox::new(Point::new(0.0, 0.0, 60.0), Vector::new(1.0, 1.0, 1.0));
        assert_eq!(frustum.clipstatus(&visible), ClipStatus::Inside);
        assert_eq!(visible.clipstatus(&view_proj, false), ClipStatus::Inside);
        assert_eq!(frustum.clipstatus(&hidden), ClipStatus::Outside);
        assert_eq!(hidden.clipstatus(&view_proj, false), ClipStatus::Outside);
    }
}
