//! Umkreis aus drei Punkten (Kreisbogen-Stützpunkte).

use super::Bounds;
use glam::DVec2;

/// Kreis, abgeleitet aus Start-, Zwischen- und Endpunkt eines Bogens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Mittelpunkt
    pub center: DVec2,
    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Berechnet den Umkreis durch `start`, `mid` und `end`.
    ///
    /// Gibt `None` zurück, wenn die Punkte innerhalb von `tolerance` kollinear
    /// sind: `mid` liegt höchstens `tolerance` von der Geraden durch `start`
    /// und `end` entfernt, oder `start` und `end` fallen zusammen.
    pub fn from_three_points(start: DVec2, mid: DVec2, end: DVec2, tolerance: f64) -> Option<Self> {
        let ab = mid - start;
        let ac = end - start;

        let chord = ac.length();
        if chord <= f64::EPSILON {
            return None;
        }

        let cross = ab.perp_dot(ac);
        if cross.abs() / chord <= tolerance || cross.abs() <= f64::EPSILON {
            return None;
        }

        // Umkreismittelpunkt relativ zu `start` (numerisch stabiler als absolut)
        let ab_sq = ab.length_squared();
        let ac_sq = ac.length_squared();
        let d = 2.0 * cross;
        let offset = DVec2::new(
            (ac.y * ab_sq - ab.y * ac_sq) / d,
            (ab.x * ac_sq - ac.x * ab_sq) / d,
        );

        let center = start + offset;
        if !center.is_finite() {
            return None;
        }

        Some(Self {
            center,
            radius: offset.length(),
        })
    }

    /// Achsenparallele Hülle des vollen Kreises
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: self.center - DVec2::splat(self.radius),
            max: self.center + DVec2::splat(self.radius),
        }
    }
}
