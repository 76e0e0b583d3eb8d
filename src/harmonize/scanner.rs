//! Liest Bogen-Kandidaten lazy aus einer Geometrie.

use super::SnapCandidate;
use crate::core::{FeatureId, Geometry, VertexKind};

/// Lazy Iterator über alle Bögen einer Geometrie.
///
/// Läuft über alle Vertices aller Ringe in Geometrie-Reihenfolge. Jeder als
/// Bogen markierte Vertex bildet mit seinem Vorgänger und Nachfolger einen
/// Kandidaten. Neustart: Scanner klonen oder neu erzeugen.
#[derive(Debug, Clone)]
pub struct ArcScanner<'a> {
    feature_id: FeatureId,
    geometry: &'a Geometry,
    ring: usize,
    local: usize,
    offset: usize,
}

impl<'a> ArcScanner<'a> {
    /// Erstellt einen Scanner über die Geometrie eines Features.
    pub fn new(feature_id: FeatureId, geometry: &'a Geometry) -> Self {
        Self {
            feature_id,
            geometry,
            ring: 0,
            local: 0,
            offset: 0,
        }
    }

    /// Prüft ohne Verbrauch des Scanners, ob mindestens ein Bogen existiert.
    pub fn has_arcs(&self) -> bool {
        self.geometry.has_curves() && self.clone().next().is_some()
    }
}

impl Iterator for ArcScanner<'_> {
    type Item = SnapCandidate;

    fn next(&mut self) -> Option<SnapCandidate> {
        loop {
            let ring = self.geometry.rings.get(self.ring)?;
            if self.local >= ring.len() {
                self.offset += ring.len();
                self.ring += 1;
                self.local = 0;
                continue;
            }

            let local = self.local;
            self.local += 1;

            let vertex = &ring.vertices[local];
            if vertex.kind != VertexKind::Curve {
                continue;
            }

            // Bogen-Markierung am offenen Ende: kein vollständiges Tripel
            let Some((prev, next)) = ring.adjacent(local) else {
                log::debug!(
                    "Ft. {}: Bogen-Vertex {} ohne beide Nachbarn, uebersprungen",
                    self.feature_id,
                    self.offset + local
                );
                continue;
            };

            return Some(SnapCandidate {
                feature_id: self.feature_id,
                mid_vertex_index: self.offset + local,
                start: ring.vertices[prev].position,
                mid: vertex.position,
                end: ring.vertices[next].position,
                mid_z: vertex.z,
            });
        }
    }
}
