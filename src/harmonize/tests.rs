use super::*;
use crate::core::{Feature, FeatureId, FeatureLayer, FeatureStore, Geometry, Ring, Vertex};
use crate::shared::{HarmonizeOptions, LookupMode};
use anyhow::Result;
use std::cell::Cell;

/// Offener Bogen von (0,0) nach (1,0) mit Mittelpunkt (0.5, h)
fn arc(h: f64) -> Geometry {
    let radius = (0.25 + h * h).sqrt();
    Geometry::from_ring(Ring::open(vec![
        Vertex::line(0.0, 0.0),
        Vertex::curve(0.5, h + radius),
        Vertex::line(1.0, 0.0),
    ]))
}

fn straight() -> Geometry {
    Geometry::from_ring(Ring::open(vec![
        Vertex::line(0.0, 0.0),
        Vertex::line(0.5, 0.5),
        Vertex::line(1.0, 0.0),
    ]))
}

/// Zählt Nachbar-Abfragen und Schreibzugriffe eines Layers.
struct RecordingStore {
    layer: FeatureLayer,
    near_queries: Cell<usize>,
    writes: Vec<FeatureId>,
}

impl RecordingStore {
    fn new(features: Vec<Feature>) -> Self {
        Self {
            layer: FeatureLayer::from_features(features).expect("IDs eindeutig"),
            near_queries: Cell::new(0),
            writes: Vec::new(),
        }
    }
}

impl FeatureStore for RecordingStore {
    fn geometry(&self, id: FeatureId) -> Option<&Geometry> {
        self.layer.geometry(id)
    }

    fn features_near(&self, geometry: &Geometry, distance: f64) -> Vec<FeatureId> {
        self.near_queries.set(self.near_queries.get() + 1);
        self.layer.features_near(geometry, distance)
    }

    fn replace_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()> {
        self.writes.push(id);
        self.layer.replace_geometry(id, geometry)
    }
}

#[test]
fn feature_without_arcs_skips_neighbour_query() {
    let mut store = RecordingStore::new(vec![
        Feature::new(1, straight()),
        Feature::new(2, arc(0.30)),
    ]);

    let report =
        HarmonizationPass::new(&HarmonizeOptions::with_tolerance(0.05)).run(&mut store, &[1]);

    assert_eq!(store.near_queries.get(), 0);
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_without_arcs, 1);
    assert!(store.writes.is_empty());
}

#[test]
fn only_scanned_feature_is_written() {
    let mut store = RecordingStore::new(vec![
        Feature::new(1, arc(0.30)),
        Feature::new(2, arc(0.32)),
    ]);

    let report =
        HarmonizationPass::new(&HarmonizeOptions::with_tolerance(0.05)).run(&mut store, &[1]);

    assert_eq!(store.writes, vec![1]);
    assert_eq!(report.changed_features, vec![1]);
    assert_eq!(report.snapped_vertices, 1);
    assert_eq!(store.layer.geometry(2), Some(&arc(0.32)));
    assert_eq!(store.layer.geometry(1), Some(&arc(0.32)));
}

#[test]
fn already_harmonized_feature_is_not_rewritten() {
    let mut store = RecordingStore::new(vec![
        Feature::new(1, arc(0.32)),
        Feature::new(2, arc(0.32)),
    ]);

    let report =
        HarmonizationPass::new(&HarmonizeOptions::with_tolerance(0.05)).run(&mut store, &[1, 2]);

    assert_eq!(report.matched_arcs, 2);
    assert_eq!(report.snapped_vertices, 0);
    assert!(!report.changed());
    assert!(store.writes.is_empty());
}

#[test]
fn missing_feature_is_counted_and_skipped() {
    let mut layer = FeatureLayer::from_features(vec![
        Feature::new(1, arc(0.30)),
        Feature::new(2, arc(0.32)),
    ])
    .expect("IDs eindeutig");

    let report =
        harmonize_arc_centers(&mut layer, &[42, 1], &HarmonizeOptions::with_tolerance(0.05));

    assert_eq!(report.missing_features, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.changed_features, vec![1]);
}

#[test]
fn locked_feature_does_not_abort_pass() {
    let mut layer = FeatureLayer::from_features(vec![
        Feature::new(1, arc(0.30)),
        Feature::new(2, arc(0.32)),
        Feature::new(3, arc(0.30)),
    ])
    .expect("IDs eindeutig");
    layer.set_locked(1, true);

    let report =
        harmonize_arc_centers(&mut layer, &[1, 3], &HarmonizeOptions::with_tolerance(0.05));

    assert_eq!(report.rejected_commits, 1);
    assert_eq!(layer.geometry(1), Some(&arc(0.30)));
    assert!(report.changed_features.contains(&3));
    assert_ne!(layer.geometry(3), Some(&arc(0.30)));
}

#[test]
fn empty_selection_is_a_no_op() {
    let mut layer = FeatureLayer::from_features(vec![Feature::new(1, arc(0.30))])
        .expect("IDs eindeutig");

    let report = harmonize_arc_centers(&mut layer, &[], &HarmonizeOptions::with_tolerance(0.05));

    assert_eq!(report, HarmonizeReport::default());
}

#[test]
fn pure_variant_leaves_input_untouched() {
    let layer = FeatureLayer::from_features(vec![
        Feature::new(1, arc(0.30)),
        Feature::new(2, arc(0.32)),
    ])
    .expect("IDs eindeutig");

    let (output, report) = harmonize_layer(&layer, &[1], &HarmonizeOptions::with_tolerance(0.05));

    assert!(report.changed());
    assert_eq!(layer.geometry(1), Some(&arc(0.30)));
    assert_eq!(output.geometry(1), Some(&arc(0.32)));
}

#[test]
fn neighborhood_mode_recovers_straddling_match() {
    // Endpunkt (0.0999, 0) vs. (0.1001, 0): bei Toleranz 0.05 liegt eine Zellgrenze bei x = 0.1
    let shifted = |x0: f64, h: f64| {
        let half = (1.0 - x0) * 0.5;
        let radius = (half * half + h * h).sqrt();
        Geometry::from_ring(Ring::open(vec![
            Vertex::line(x0, 0.0),
            Vertex::curve(x0 + half, h + radius),
            Vertex::line(1.0, 0.0),
        ]))
    };
    let layer = FeatureLayer::from_features(vec![
        Feature::new(1, shifted(0.0999, 0.30)),
        Feature::new(2, shifted(0.1001, 0.31)),
    ])
    .expect("IDs eindeutig");

    let exact = HarmonizeOptions::with_tolerance(0.05);
    let (_, exact_report) = harmonize_layer(&layer, &[1], &exact);
    assert!(!exact_report.changed());

    let neighborhood = exact.clone().with_lookup_mode(LookupMode::Neighborhood);
    let (_, neighborhood_report) = harmonize_layer(&layer, &[1], &neighborhood);
    assert_eq!(neighborhood_report.changed_features, vec![1]);
}

#[test]
fn rejected_move_is_counted_and_pass_continues() {
    let with_z = |h: f64, mid_z: f64| {
        let radius = (0.25 + h * h).sqrt();
        Geometry::from_ring(Ring::open(vec![
            Vertex::line(0.0, 0.0).with_z(1.0),
            Vertex::curve(0.5, h + radius).with_z(mid_z),
            Vertex::line(1.0, 0.0).with_z(1.0),
        ]))
    };
    let mut store = RecordingStore::new(vec![
        Feature::new(1, with_z(0.30, 1.0)),
        Feature::new(2, with_z(0.32, f64::NAN)),
    ]);

    let report =
        HarmonizationPass::new(&HarmonizeOptions::with_tolerance(0.05)).run(&mut store, &[1, 2]);

    // Ft. 1: Höhe des Nachbarn ist ungültig, Verschiebung abgelehnt
    assert_eq!(report.rejected_moves, 1);
    assert_eq!(store.layer.geometry(1), Some(&with_z(0.30, 1.0)));
    // Ft. 2 wird trotzdem bearbeitet und übernimmt Ft. 1
    assert_eq!(report.processed, 2);
    assert_eq!(report.changed_features, vec![2]);
    assert_eq!(store.writes, vec![2]);
    assert_eq!(store.layer.geometry(2), Some(&with_z(0.30, 1.0)));
}
