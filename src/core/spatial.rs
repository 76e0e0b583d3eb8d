//! Spatial-Index (KD-Tree) über Feature-Hüllen für Nachbarschafts-Abfragen.

use std::collections::HashMap;

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::{Bounds, FeatureId, Geometry};

/// Hülle eines indexierten Features und der KD-Tree-Punkt, an dem es hängt
#[derive(Debug, Clone, Copy)]
struct IndexedBounds {
    bounds: Bounds,
    point: usize,
}

/// Spatial-Index über den Hüllen aller Features eines Layers.
///
/// Der KD-Tree enthält jeden Hüllen-Mittelpunkt genau einmal; Features mit
/// identischem Mittelpunkt (Duplikate, konzentrische Ringe) teilen sich einen
/// Punkt. Eine Abfrage sucht im Radius
/// `halbe Diagonale(Abfrage) + größte halbe Diagonale + Distanz` und filtert
/// danach exakt über die um `distance` vergrößerten Hüllen.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    tree: KdTree<f64, 2>,
    /// Feature-IDs pro KD-Tree-Punkt (Item = Index in diese Liste)
    point_features: Vec<Vec<FeatureId>>,
    point_by_center: HashMap<(u64, u64), usize>,
    entries: HashMap<FeatureId, IndexedBounds>,
    /// Wächst nur; ein veralteter Maximalwert vergrößert nur den Suchradius.
    max_half_diagonal: f64,
}

/// Bit-genauer Schlüssel eines Mittelpunkts, `-0.0` und `0.0` fallen zusammen.
fn center_key(center: DVec2) -> (u64, u64) {
    ((center.x + 0.0).to_bits(), (center.y + 0.0).to_bits())
}

/// Hülle einer Geometrie, sofern indexierbar (nicht leer, endlich).
fn indexable_bounds(id: FeatureId, geometry: &Geometry) -> Option<Bounds> {
    let bounds = geometry.bounds()?;
    if !bounds.center().is_finite() || !bounds.half_diagonal().is_finite() {
        log::warn!("Ft. {} hat keine endliche Huelle, nicht indexiert", id);
        return None;
    }
    Some(bounds)
}

impl FeatureIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            point_features: Vec::new(),
            point_by_center: HashMap::new(),
            entries: HashMap::new(),
            max_half_diagonal: 0.0,
        }
    }

    /// Baut einen Index aus Feature-Geometrien.
    ///
    /// Leere oder nicht-endliche Geometrien werden übersprungen.
    pub fn from_geometries<'a>(
        features: impl IntoIterator<Item = (FeatureId, &'a Geometry)>,
    ) -> Self {
        let mut index = Self::empty();
        let mut points: Vec<[f64; 2]> = Vec::new();

        for (id, geometry) in features {
            let Some(bounds) = indexable_bounds(id, geometry) else {
                continue;
            };
            let center = bounds.center();
            let point = *index
                .point_by_center
                .entry(center_key(center))
                .or_insert_with(|| {
                    points.push([center.x, center.y]);
                    index.point_features.push(Vec::new());
                    points.len() - 1
                });
            index.point_features[point].push(id);
            index.max_half_diagonal = index.max_half_diagonal.max(bounds.half_diagonal());
            index.entries.insert(id, IndexedBounds { bounds, point });
        }

        index.tree = (&points).into();
        index
    }

    /// Gibt die Anzahl indexierter Features zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Features im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Setzt die Hülle eines Features neu, ohne den Baum neu aufzubauen.
    pub fn update(&mut self, id: FeatureId, geometry: &Geometry) {
        self.remove(id);
        let Some(bounds) = indexable_bounds(id, geometry) else {
            return;
        };

        let center = bounds.center();
        let point = match self.point_by_center.get(&center_key(center)) {
            Some(&point) => point,
            None => {
                let point = self.point_features.len();
                self.tree.add(&[center.x, center.y], point as u64);
                self.point_features.push(Vec::new());
                self.point_by_center.insert(center_key(center), point);
                point
            }
        };

        self.point_features[point].push(id);
        self.max_half_diagonal = self.max_half_diagonal.max(bounds.half_diagonal());
        self.entries.insert(id, IndexedBounds { bounds, point });
    }

    /// Entfernt ein Feature. Der KD-Tree-Punkt bleibt (ggf. leer) bestehen.
    pub fn remove(&mut self, id: FeatureId) {
        if let Some(entry) = self.entries.remove(&id) {
            self.point_features[entry.point].retain(|&other| other != id);
        }
    }

    /// Findet alle Features, deren Hülle höchstens `distance` von der Hülle
    /// der Geometrie entfernt ist.
    ///
    /// Obermenge der tatsächlich nahen Features: Hüllen-Abstand ist nie größer
    /// als der Geometrie-Abstand. Sortiert nach Mittelpunkt-Abstand, dann ID.
    pub fn within_distance(&self, geometry: &Geometry, distance: f64) -> Vec<FeatureId> {
        let Some(query) = geometry.bounds() else {
            return Vec::new();
        };
        if self.is_empty() || !distance.is_finite() || distance.is_sign_negative() {
            return Vec::new();
        }

        let center = query.center();
        let radius = query.half_diagonal() + self.max_half_diagonal + distance;
        if !center.is_finite() || !radius.is_finite() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for neighbour in self
            .tree
            .within::<SquaredEuclidean>(&[center.x, center.y], radius * radius)
        {
            let Some(ids) = self.point_features.get(neighbour.item as usize) else {
                continue;
            };
            for &id in ids {
                let Some(entry) = self.entries.get(&id) else {
                    continue;
                };
                // Exakte Hüllen-Prüfung nach dem KD-Tree-Vorfilter
                if entry.bounds.expanded(distance).intersects(&query) {
                    results.push((id, neighbour.distance));
                }
            }
        }

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        results.into_iter().map(|(id, _)| id).collect()
    }
}
