//! Projection and view matrix builders
//!
//! The default clip space follows Direct3D (`z` in `[0, 1]`, `+y` up).
//! The `vulkan` feature flips the y scale and halves the depth range;
//! `ogl4` halves the depth range only. The choice is made at compile time.

use crate::error::MathError;
use crate::matrix::Mat4;
use crate::point::{Point, Vector};
use crate::scalar;
use crate::vec4::Vec4;

#[cfg(feature = "vulkan")]
const Y_SIGN: f32 = -1.0;
#[cfg(not(feature = "vulkan"))]
const Y_SIGN: f32 = 1.0;

#[cfg(any(feature = "vulkan", feature = "ogl4"))]
const DEPTH_SCALE: f32 = 0.5;
#[cfg(not(any(feature = "vulkan", feature = "ogl4")))]
const DEPTH_SCALE: f32 = 1.0;

fn check_span(a: f32, b: f32, what: &'static str) -> crate::Result<()> {
    if (a - b).abs() <= f32::EPSILON * a.abs().max(b.abs()).max(1.0) {
        log::warn!("degenerate projection: {what} span is zero ({a}, {b})");
        return Err(MathError::DegenerateProjection(what));
    }
    Ok(())
}

impl Mat4 {
    /// Left-handed orthographic projection of a `w` by `h` view volume.
    pub fn ortholh(w: f32, h: f32, zn: f32, zf: f32) -> Self {
        let dist = DEPTH_SCALE / (zf - zn);
        let h = h * Y_SIGN;
        Self::new(
            Vec4::new(2.0 / w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 0.0),
            Vec4::new(0.0, 0.0, -dist * zn, 1.0),
        )
    }

    pub fn orthorh(w: f32, h: f32, zn: f32, zf: f32) -> Self {
        let dist = DEPTH_SCALE / (zn - zf);
        let h = h * Y_SIGN;
        Self::new(
            Vec4::new(2.0 / w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 0.0),
            Vec4::new(0.0, 0.0, dist * zn, 1.0),
        )
    }

    /// Off-center orthographic projection. Note the `top, bottom` argument
    /// order.
    pub fn orthooffcenterlh(l: f32, r: f32, t: f32, b: f32, zn: f32, zf: f32) -> Self {
        let divheight = Y_SIGN / (t - b);
        let dist = DEPTH_SCALE / (zf - zn);
        Self::new(
            Vec4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * divheight, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 0.0),
            Vec4::new((l + r) / (l - r), -(t + b) * divheight, -dist * zn, 1.0),
        )
    }

    pub fn orthooffcenterrh(l: f32, r: f32, t: f32, b: f32, zn: f32, zf: f32) -> Self {
        let divheight = Y_SIGN / (t - b);
        let dist = DEPTH_SCALE / (zn - zf);
        Self::new(
            Vec4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * divheight, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 0.0),
            Vec4::new((l + r) / (l - r), -(t + b) * divheight, dist * zn, 1.0),
        )
    }

    /// Left-handed perspective projection from a vertical field of view in
    /// radians.
    pub fn perspfovlh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> Self {
        let height = scalar::cot(0.5 * fovy);
        let width = height / aspect;
        let dist = DEPTH_SCALE * zf / (zf - zn);
        Self::new(
            Vec4::new(width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, height * Y_SIGN, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 1.0),
            Vec4::new(0.0, 0.0, -dist * zn, 0.0),
        )
    }

    pub fn perspfovrh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> Self {
        let height = scalar::cot(0.5 * fovy);
        let width = height / aspect;
        let dist = DEPTH_SCALE * zf / (zn - zf);
        Self::new(
            Vec4::new(width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, height * Y_SIGN, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, -1.0),
            Vec4::new(0.0, 0.0, dist * zn, 0.0),
        )
    }

    /// Left-handed perspective projection of a `w` by `h` near plane.
    pub fn persplh(w: f32, h: f32, zn: f32, zf: f32) -> Self {
        let dist = DEPTH_SCALE * zf / (zf - zn);
        let h = h * Y_SIGN;
        Self::new(
            Vec4::new(2.0 * zn / w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * zn / h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, 1.0),
            Vec4::new(0.0, 0.0, -dist * zn, 0.0),
        )
    }

    pub fn persprh(w: f32, h: f32, zn: f32, zf: f32) -> Self {
        let dist = DEPTH_SCALE * zf / (zn - zf);
        let h = h * Y_SIGN;
        Self::new(
            Vec4::new(2.0 * zn / w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * zn / h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, dist, -1.0),
            Vec4::new(0.0, 0.0, dist * zn, 0.0),
        )
    }

    /// Off-center perspective projection. Unlike the orthographic variant
    /// this takes `bottom, top`.
    pub fn perspoffcenterlh(l: f32, r: f32, b: f32, t: f32, zn: f32, zf: f32) -> Self {
        let divwidth = 1.0 / (r - l);
        let divheight = Y_SIGN / (t - b);
        let dist = DEPTH_SCALE * zf / (zf - zn);
        Self::new(
            Vec4::new(2.0 * zn * divwidth, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * zn * divheight, 0.0, 0.0),
            Vec4::new(-(l + r) * divwidth, -(b + t) * divheight, dist, 1.0),
            Vec4::new(0.0, 0.0, -dist * zn, 0.0),
        )
    }

    pub fn perspoffcenterrh(l: f32, r: f32, b: f32, t: f32, zn: f32, zf: f32) -> Self {
        let divwidth = 1.0 / (r - l);
        let divheight = Y_SIGN / (t - b);
        let dist = DEPTH_SCALE * zf / (zn - zf);
        Self::new(
            Vec4::new(2.0 * zn * divwidth, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * zn * divheight, 0.0, 0.0),
            Vec4::new((l + r) * divwidth, (b + t) * divheight, dist, -1.0),
            Vec4::new(0.0, 0.0, dist * zn, 0.0),
        )
    }

    pub fn try_perspfovlh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_perspfov(fovy, aspect, zn, zf)?;
        Ok(Self::perspfovlh(fovy, aspect, zn, zf))
    }

    pub fn try_perspfovrh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_perspfov(fovy, aspect, zn, zf)?;
        Ok(Self::perspfovrh(fovy, aspect, zn, zf))
    }

    pub fn try_orthooffcenterlh(l: f32, r: f32, t: f32, b: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_span(l, r, "left/right")?;
        check_span(t, b, "top/bottom")?;
        check_span(zn, zf, "near/far")?;
        Ok(Self::orthooffcenterlh(l, r, t, b, zn, zf))
    }

    pub fn try_orthooffcenterrh(l: f32, r: f32, t: f32, b: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_span(l, r, "left/right")?;
        check_span(t, b, "top/bottom")?;
        check_span(zn, zf, "near/far")?;
        Ok(Self::orthooffcenterrh(l, r, t, b, zn, zf))
    }

    pub fn try_ortholh(w: f32, h: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_extents(w, h, zn, zf)?;
        Ok(Self::ortholh(w, h, zn, zf))
    }

    pub fn try_orthorh(w: f32, h: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_extents(w, h, zn, zf)?;
        Ok(Self::orthorh(w, h, zn, zf))
    }

    pub fn try_persplh(w: f32, h: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_extents(w, h, zn, zf)?;
        Ok(Self::persplh(w, h, zn, zf))
    }

    pub fn try_persprh(w: f32, h: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_extents(w, h, zn, zf)?;
        Ok(Self::persprh(w, h, zn, zf))
    }

    pub fn try_perspoffcenterlh(l: f32, r: f32, b: f32, t: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_span(l, r, "left/right")?;
        check_span(b, t, "top/bottom")?;
        check_span(zn, zf, "near/far")?;
        Ok(Self::perspoffcenterlh(l, r, b, t, zn, zf))
    }

    pub fn try_perspoffcenterrh(l: f32, r: f32, b: f32, t: f32, zn: f32, zf: f32) -> crate::Result<Self> {
        check_span(l, r, "left/right")?;
        check_span(b, t, "top/bottom")?;
        check_span(zn, zf, "near/far")?;
        Ok(Self::perspoffcenterrh(l, r, b, t, zn, zf))
    }

    /// Left-handed look-at. Returns the camera's world transform (not the
    /// view matrix), with `+z` toward `at`.
    pub fn lookatlh(eye: Point, at: Point, up: Vector) -> Self {
        lookat(eye, (at - eye).normalize(), up)
    }

    /// Right-handed look-at with `+z` pointing away from `at`.
    pub fn lookatrh(eye: Point, at: Point, up: Vector) -> Self {
        lookat(eye, (eye - at).normalize(), up)
    }
}

fn check_extents(w: f32, h: f32, zn: f32, zf: f32) -> crate::Result<()> {
    check_span(0.0, w, "width")?;
    check_span(0.0, h, "height")?;
    check_span(zn, zf, "near/far")
}

fn check_perspfov(fovy: f32, aspect: f32, zn: f32, zf: f32) -> crate::Result<()> {
    if (0.5 * fovy).sin() == 0.0 {
        log::warn!("degenerate projection: field of view {fovy}");
        return Err(MathError::DegenerateProjection("field of view"));
    }
    if aspect == 0.0 {
        log::warn!("degenerate projection: aspect ratio is zero");
        return Err(MathError::DegenerateProjection("aspect"));
    }
    check_span(zn, zf, "near/far")
}

fn lookat(eye: Point, zaxis: Vector, up: Vector) -> Mat4 {
    debug_assert!(up.length() > 0.0, "lookat needs a non-zero up vector");
    let mut up = up.normalize();
    if zaxis.dot(up).abs() > 0.9999999 {
        // up is parallel to the view direction, rotate its lanes
        up = Vector::new(up.y, up.z, up.x);
    }
    let xaxis = up.cross(zaxis).normalize();
    let yaxis = zaxis.cross(xaxis).normalize();
    Mat4::new(xaxis.vec4(), yaxis.vec4(), zaxis.vec4(), eye.vec4())
}
