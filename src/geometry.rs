//! Mapping from scalar loop position to coordinates on the rectangular circuit.
//!
//! Loop position is measured from the bottom-left corner and increases counter-clockwise:
//! along the bottom side to the right, up the right side, back along the top and down the
//! left side. Coordinates use the same corner as origin with `y` pointing up.

use crate::config::LoopConfig;
use crate::math::{wrap_once, Scalar, R2};

/// One of the four sides of the loop, in traversal order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopSide {
    /// `[0, W)`, left to right along `y = 0`.
    Bottom,
    /// `[W, W + H)`, upwards along `x = W`.
    Right,
    /// `[W + H, 2W + H)`, right to left along `y = H`.
    Top,
    /// `[2W + H, P)`, downwards along `x = 0`.
    Left,
}

/// Rectangle the charges travel around.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopGeometry {
    width: Scalar,
    height: Scalar,
}

impl LoopGeometry {
    /// Builds the geometry from loop half-extents, i.e. a `2·length × 2·height` rectangle.
    #[must_use]
    pub fn from_half_extents(length: Scalar, height: Scalar) -> Self {
        Self {
            width: 2.0 * length,
            height: 2.0 * height,
        }
    }

    /// Builds the geometry described by `config`.
    #[must_use]
    pub fn from_config(config: &LoopConfig) -> Self {
        Self::from_half_extents(config.circuit_length, config.circuit_height)
    }

    /// Full width of the rectangle.
    #[must_use]
    pub fn width(&self) -> Scalar {
        self.width
    }

    /// Full height of the rectangle.
    #[must_use]
    pub fn height(&self) -> Scalar {
        self.height
    }

    /// Total path length around the loop.
    #[must_use]
    pub fn perimeter(&self) -> Scalar {
        2.0 * (self.width + self.height)
    }

    /// Loop positions at which each side begins, in traversal order.
    #[must_use]
    pub fn side_starts(&self) -> [Scalar; 4] {
        let w = self.width;
        let h = self.height;
        [0.0, w, w + h, 2.0 * w + h]
    }

    /// Corners of the rectangle, counter-clockwise from the origin.
    #[must_use]
    pub fn corners(&self) -> [R2; 4] {
        [
            R2::new(0.0, 0.0),
            R2::new(self.width, 0.0),
            R2::new(self.width, self.height),
            R2::new(0.0, self.height),
        ]
    }

    /// Folds any finite position into `[0, perimeter)`.
    #[must_use]
    pub fn normalize(&self, position: Scalar) -> Scalar {
        let perimeter = self.perimeter();
        if (0.0..perimeter).contains(&position) {
            position
        } else {
            wrap_once(position.rem_euclid(perimeter), perimeter)
        }
    }

    /// Side of the loop that `position` falls on.
    #[must_use]
    pub fn side_of(&self, position: Scalar) -> LoopSide {
        let s = self.normalize(position);
        let [_, right, top, left] = self.side_starts();
        if s < right {
            LoopSide::Bottom
        } else if s < top {
            LoopSide::Right
        } else if s < left {
            LoopSide::Top
        } else {
            LoopSide::Left
        }
    }

    /// Coordinates of loop position `position`.
    ///
    /// Each side interpolates one coordinate linearly while the other stays on the edge,
    /// so the map is continuous at all four corners.
    #[must_use]
    pub fn to_coordinates(&self, position: Scalar) -> R2 {
        let s = self.normalize(position);
        let w = self.width;
        let h = self.height;
        let [_, right, top, left] = self.side_starts();
        match self.side_of(s) {
            LoopSide::Bottom => R2::new(s, 0.0),
            LoopSide::Right => R2::new(w, s - right),
            LoopSide::Top => R2::new(w - (s - top), h),
            LoopSide::Left => R2::new(0.0, h - (s - left)),
        }
    }
}
