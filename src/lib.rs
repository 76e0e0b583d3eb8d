//! Arc Harmonizer Library.
//! Bogen-Mittelpunkt-Harmonisierung für Feature-Layer, als Library exportiert
//! für CLI, Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod harmonize;
pub mod shared;
pub mod xml;

pub use app::{EditHistory, EditSession, Snapshot};
pub use core::{
    Bounds, Circle, Feature, FeatureId, FeatureIndex, FeatureLayer, FeatureStore, Geometry, Ring,
    Vertex, VertexKind,
};
pub use harmonize::{
    harmonize_arc_centers, harmonize_layer, ArcScanner, HarmonizationPass, HarmonizeReport,
    ProximityIndex, SnapCandidate, SnapMatcher,
};
pub use shared::{HarmonizeOptions, LookupMode, DEFAULT_TOLERANCE};
pub use xml::{parse_layer, write_layer};
