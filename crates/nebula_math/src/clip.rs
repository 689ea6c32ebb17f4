//! Clip classification shared by planes, frusta and bounding volumes

/// Where a shape lies relative to a clipping volume
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipStatus {
    Inside,
    Outside,
    Clipped,
}

impl ClipStatus {
    /// Classify from corner masks accumulated over a shape: no corner
    /// outside any boundary is `Inside`, a boundary that rejects every
    /// corner is `Outside`, anything else straddles.
    #[inline]
    pub fn from_masks(and_flags: u32, or_flags: u32) -> Self {
        if or_flags == 0 {
            Self::Inside
        } else if and_flags != 0 {
            Self::Outside
        } else {
            Self::Clipped
        }
    }

    #[inline]
    pub fn is_visible(self) -> bool {
        self != Self::Outside
    }
}

bitflags::bitflags! {
    /// Clip-space boundaries a point lies beyond
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClipFlags: u32 {
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
        const TOP = 1 << 4;
        const NEAR = 1 << 5;
        const FAR = 1 << 6;
    }
}

impl ClipFlags {
    /// Flags for a clip-space position against `-w <= x, y, z <= w`.
    pub fn of_clip_point(x: f32, y: f32, z: f32, w: f32) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::LEFT, x < -w);
        flags.set(Self::RIGHT, x > w);
        flags.set(Self::BOTTOM, y < -w);
        flags.set(Self::TOP, y > w);
        flags.set(Self::FAR, z < -w);
        flags.set(Self::NEAR, z > w);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_masks() {
        assert_eq!(ClipStatus::from_masks(0xffff, 0), ClipStatus::Inside);
        assert_eq!(ClipStatus::from_masks(0b10, 0b110), ClipStatus::Outside);
        assert_eq!(ClipStatus::from_masks(0, 0b110), ClipStatus::Clipped);
        assert!(!ClipStatus::Outside.is_visible());
        assert!(ClipStatus::Clipped.is_visible());
    }

    #[test]
    fn test_clip_point_flags() {
        assert!(ClipFlags::of_clip_point(0.0, 0.0, 0.0, 1.0).is_empty());
        assert_eq!(ClipFlags::of_clip_point(-2.0, 0.0, 0.0, 1.0), ClipFlags::LEFT);
        assert_eq!(
            ClipFlags::of_clip_point(2.0, 3.0, 0.0, 1.0),
            ClipFlags::RIGHT | ClipFlags::TOP
        );
        assert_eq!(ClipFlags::NEAR.bits(), 32);
    }
}
