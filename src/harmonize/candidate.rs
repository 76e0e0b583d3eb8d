//! Snap-Kandidat: ein Kreisbogen mit Herkunft und Stützpunkten.

use crate::core::{Circle, FeatureId};
use glam::DVec2;

/// Ein Bogen, auf den (oder von dem) gesnappt werden kann.
///
/// Kurzlebig: wird pro Lauf frisch aus der Geometrie gelesen und nie gespeichert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    /// Feature, aus dem der Bogen stammt
    pub feature_id: FeatureId,
    /// Globaler Index des Bogen-Zwischenpunkts in der Geometrie
    pub mid_vertex_index: usize,
    /// Vorgänger des Zwischenpunkts
    pub start: DVec2,
    /// Bogen-Zwischenpunkt (der als Bogen markierte Vertex)
    pub mid: DVec2,
    /// Nachfolger des Zwischenpunkts
    pub end: DVec2,
    /// Höhe des Zwischenpunkts, falls vorhanden
    pub mid_z: Option<f64>,
}

impl SnapCandidate {
    /// Umkreis des Bogens, `None` wenn innerhalb der Toleranz kollinear
    pub fn circle(&self, tolerance: f64) -> Option<Circle> {
        Circle::from_three_points(self.start, self.mid, self.end, tolerance)
    }

    /// Endpunkte lexikographisch nach (x, y) sortiert, unabhängig von der Bogenrichtung
    pub fn ordered_endpoints(&self) -> (DVec2, DVec2) {
        if (self.end.x, self.end.y) < (self.start.x, self.start.y) {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_endpoints_ignore_direction() {
        let forward = SnapCandidate {
            feature_id: 1,
            mid_vertex_index: 1,
            start: DVec2::new(1.0, 0.0),
            mid: DVec2::new(0.5, 0.5),
            end: DVec2::new(0.0, 0.0),
            mid_z: None,
        };
        let backward = SnapCandidate {
            start: forward.end,
            end: forward.start,
            ..forward
        };

        assert_eq!(forward.ordered_endpoints(), backward.ordered_endpoints());
        assert_eq!(
            forward.ordered_endpoints(),
            (DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0))
        );
    }

    #[test]
    fn ordering_uses_y_on_equal_x() {
        let candidate = SnapCandidate {
            feature_id: 1,
            mid_vertex_index: 1,
            start: DVec2::new(2.0, 5.0),
            mid: DVec2::new(3.0, 4.0),
            end: DVec2::new(2.0, 3.0),
            mid_z: None,
        };

        assert_eq!(
            candidate.ordered_endpoints(),
            (DVec2::new(2.0, 3.0), DVec2::new(2.0, 5.0))
        );
    }
}
