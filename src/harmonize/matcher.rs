//! Paarweiser Äquivalenz-Test zweier Bögen mit Toleranz.

use super::SnapCandidate;
use glam::DVec2;

/// Entscheidet, ob zwei Bögen denselben Kreis zwischen denselben Endpunkten beschreiben.
#[derive(Debug, Clone, Copy)]
pub struct SnapMatcher {
    tolerance: f64,
}

impl SnapMatcher {
    /// Erstellt einen Matcher mit gegebener Toleranz
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn almost_equal(&self, a: DVec2, b: DVec2) -> bool {
        a.distance(b) <= self.tolerance
    }

    /// Endpunkte gleich, in gleicher oder umgekehrter Richtung
    pub fn endpoints_match(&self, a: &SnapCandidate, b: &SnapCandidate) -> bool {
        (self.almost_equal(a.start, b.start) && self.almost_equal(a.end, b.end))
            || (self.almost_equal(a.start, b.end) && self.almost_equal(a.end, b.start))
    }

    /// Prüft, ob `a` auf `b` gesnappt werden darf.
    ///
    /// Nie innerhalb desselben Features. Danach Endpunkte (richtungsunabhängig),
    /// dann Mittelpunkte der Umkreise. Degenerierte Bögen passen nie.
    /// Der Radius wird nicht separat geprüft: gleiche Endpunkte und gleicher
    /// Mittelpunkt legen ihn fest. Symmetrisch in `a` und `b`.
    pub fn equivalent(&self, a: &SnapCandidate, b: &SnapCandidate) -> bool {
        if a.feature_id == b.feature_id {
            return false;
        }

        if !self.endpoints_match(a, b) {
            return false;
        }

        let (Some(circle_a), Some(circle_b)) = (a.circle(self.tolerance), b.circle(self.tolerance))
        else {
            return false;
        };

        self.almost_equal(circle_a.center, circle_b.center)
    }
}
