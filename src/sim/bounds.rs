//! Axis-aligned bounding boxes for balls and bricks
//!
//! Both entity types are stored as center + size. Their four corners are
//! derived data and are recomputed whenever the center or size is written.
//! Screen coordinates: origin top-left, y grows downward.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::approx::{greater_or_close, less_or_close};

/// The four corners of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: DVec2,
    pub top_right: DVec2,
    pub bottom_left: DVec2,
    pub bottom_right: DVec2,
}

impl Corners {
    /// Corners of a box centered on `center` with the given `size`
    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        let half = size / 2.0;
        let left = center.x - half.x;
        let right = center.x + half.x;
        let top = center.y - half.y;
        let bottom = center.y + half.y;

        Self {
            top_left: DVec2::new(left, top),
            top_right: DVec2::new(right, top),
            bottom_left: DVec2::new(left, bottom),
            bottom_right: DVec2::new(right, bottom),
        }
    }
}

/// Anything with a cached bounding box
pub trait Bounds {
    fn corners(&self) -> &Corners;

    #[inline]
    fn left(&self) -> f64 {
        self.corners().top_left.x
    }

    #[inline]
    fn right(&self) -> f64 {
        self.corners().top_right.x
    }

    #[inline]
    fn top(&self) -> f64 {
        self.corners().top_left.y
    }

    #[inline]
    fn bottom(&self) -> f64 {
        self.corners().bottom_left.y
    }
}

/// Inclusive overlap test between two bounding boxes (touching counts)
pub fn boxes_overlap(a: &impl Bounds, b: &impl Bounds) -> bool {
    greater_or_close(a.right(), b.left())
        && less_or_close(a.left(), b.right())
        && greater_or_close(a.bottom(), b.top())
        && less_or_close(a.top(), b.bottom())
}
