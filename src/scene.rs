//! Static drawing geometry handed to a render surface alongside each frame.

use crate::geometry::LoopGeometry;
use crate::math::{Scalar, R2};

/// Circuit element drawn on the loop.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// AC current source.
    Source,
    /// Resistor.
    Resistor,
    /// Inductor.
    Inductor,
    /// Capacitor.
    Capacitor,
}

impl ComponentKind {
    /// Short label printed on the component marker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Source => "~",
            Self::Resistor => "R",
            Self::Inductor => "L",
            Self::Capacitor => "C",
        }
    }
}

/// Labelled component marker anchored on the loop.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentMarker {
    /// Which element this marker stands for.
    pub kind: ComponentKind,
    /// Centre of the marker in loop coordinates.
    pub anchor: R2,
}

impl ComponentMarker {
    /// Places a `kind` marker centred on `anchor`.
    #[must_use]
    pub const fn new(kind: ComponentKind, anchor: R2) -> Self {
        Self { kind, anchor }
    }
}

/// Straight line between two points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: R2,
    /// Second endpoint.
    pub end: R2,
}

impl Segment {
    /// Segment from `start` to `end`.
    #[must_use]
    pub const fn new(start: R2, end: R2) -> Self {
        Self { start, end }
    }
}

/// Everything a render surface draws that does not change between frames.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// Rectangle corners, counter-clockwise from the origin.
    pub outline: [R2; 4],
    /// Horizontal and vertical axes through the loop centre.
    pub axes: [Segment; 2],
    /// Source, resistor, inductor and capacitor markers.
    pub components: [ComponentMarker; 4],
    /// Lower-left and upper-right corners of the drawable area.
    pub bounds: [R2; 2],
}

impl SceneLayout {
    /// Lays out the scene for `geometry`, padding the drawable area by `margin` on every side.
    ///
    /// The source sits at the middle of the bottom side, the resistor on the right, the
    /// inductor on top and the capacitor on the left.
    #[must_use]
    pub fn new(geometry: &LoopGeometry, margin: Scalar) -> Self {
        let w = geometry.width();
        let h = geometry.height();
        let centre = R2::new(w / 2.0, h / 2.0);
        let lower = R2::new(-margin, -margin);
        let upper = R2::new(w + margin, h + margin);
        Self {
            outline: geometry.corners(),
            axes: [
                Segment::new(R2::new(lower.x, centre.y), R2::new(upper.x, centre.y)),
                Segment::new(R2::new(centre.x, lower.y), R2::new(centre.x, upper.y)),
            ],
            components: [
                ComponentMarker::new(ComponentKind::Source, R2::new(centre.x, 0.0)),
                ComponentMarker::new(ComponentKind::Resistor, R2::new(w, centre.y)),
                ComponentMarker::new(ComponentKind::Inductor, R2::new(centre.x, h)),
                ComponentMarker::new(ComponentKind::Capacitor, R2::new(0.0, centre.y)),
            ],
            bounds: [lower, upper],
        }
    }

    /// Size of the drawable area.
    #[must_use]
    pub fn extent(&self) -> R2 {
        self.bounds[1] - self.bounds[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_sit_mid_side_in_loop_order() {
        let geometry = LoopGeometry::from_half_extents(500.0, 300.0);
        let scene = SceneLayout::new(&geometry, 50.0);
        let sides: Vec<_> = scene
            .components
            .iter()
            .map(|c| geometry.side_of(loop_position(&geometry, c.anchor)))
            .collect();
        assert_eq!(
            sides,
            vec![
                crate::geometry::LoopSide::Bottom,
                crate::geometry::LoopSide::Right,
                crate::geometry::LoopSide::Top,
                crate::geometry::LoopSide::Left,
            ]
        );
        let labels: String = scene.components.iter().map(|c| c.kind.label()).collect();
        assert_eq!(labels, "~RLC");
    }

    #[test]
    fn drawable_area_pads_the_loop() {
        let geometry = LoopGeometry::from_half_extents(500.0, 300.0);
        let scene = SceneLayout::new(&geometry, 50.0);
        assert_eq!(scene.extent(), R2::new(1100.0, 700.0));
        assert_eq!(scene.axes[0].start, R2::new(-50.0, 300.0));
        assert_eq!(scene.axes[1].end, R2::new(500.0, 650.0));
    }

    fn loop_position(geometry: &LoopGeometry, p: R2) -> Scalar {
        let [_, right, top, left] = geometry.side_starts();
        if p.y == 0.0 {
            p.x
        } else if p.x == geometry.width() {
            right + p.y
        } else if p.y == geometry.height() {
            top + (geometry.width() - p.x)
        } else {
            left + (geometry.height() - p.y)
        }
    }
}
