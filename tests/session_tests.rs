use arc_harmonizer::{
    EditSession, Feature, FeatureLayer, FeatureStore, Geometry, HarmonizeOptions, Ring, Vertex,
};

fn arc(h: f64) -> Geometry {
    let radius = (0.25 + h * h).sqrt();
    Geometry::from_ring(Ring::open(vec![
        Vertex::line(0.0, 0.0),
        Vertex::curve(0.5, h + radius),
        Vertex::line(1.0, 0.0),
    ]))
}

fn session(tolerance: f64) -> EditSession {
    let layer = FeatureLayer::from_features(vec![
        Feature::new(1, arc(0.30)),
        Feature::new(2, arc(0.32)),
    ])
    .expect("IDs eindeutig");
    EditSession::new(layer, HarmonizeOptions::with_tolerance(tolerance))
}

#[test]
fn harmonize_is_one_undo_step() {
    let mut session = session(0.05);

    let report = session.harmonize(&[1, 2]).expect("Optionen gueltig");
    assert!(report.changed());
    assert!(session.can_undo());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.32)));

    assert!(session.undo());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.30)));
    assert_eq!(session.layer().geometry(2), Some(&arc(0.32)));
    assert!(!session.can_undo());

    assert!(session.redo());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.32)));
}

#[test]
fn unchanged_pass_records_no_history() {
    let mut session = session(0.01);

    let report = session.harmonize(&[1]).expect("Optionen gueltig");

    assert!(!report.changed());
    assert!(!session.can_undo());
    assert!(!session.undo());
}

#[test]
fn invalid_tolerance_is_rejected_before_pass() {
    let mut session = session(0.05);
    session.options.tolerance = 0.0;

    assert!(session.harmonize(&[1]).is_err());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.30)));
}

#[test]
fn edit_then_harmonize_undoes_separately() {
    let mut session = session(0.05);

    session.set_geometry(1, arc(0.31)).expect("Feature vorhanden");
    session.harmonize(&[1]).expect("Optionen gueltig");
    assert_eq!(session.layer().geometry(1), Some(&arc(0.32)));

    assert!(session.undo());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.31)));
    assert!(session.undo());
    assert_eq!(session.layer().geometry(1), Some(&arc(0.30)));
}

#[test]
fn locked_feature_edit_fails_without_history() {
    let mut layer = FeatureLayer::from_features(vec![Feature::new(1, arc(0.30))])
        .expect("IDs eindeutig");
    layer.set_locked(1, true);
    let mut session = EditSession::new(layer, HarmonizeOptions::default());

    assert!(session.set_geometry(1, arc(0.40)).is_err());
    assert!(!session.can_undo());
    assert_eq!(session.into_layer().geometry(1), Some(&arc(0.30)));
}
