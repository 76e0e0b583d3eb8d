//! Core-Domänentypen: Geometrien, Kreise, Feature-Layer, Spatial-Index.

pub mod circle;
/// Geometrie-Modell
///
/// - Geometry: geordnete Ringe bzw. Teile
/// - Ring: Vertex-Folge, offen oder geschlossen
/// - Vertex: Position mit Segment-Art (Linie oder Bogen)
pub mod geometry;
pub mod layer;
pub mod spatial;

pub use circle::Circle;
pub use geometry::{Bounds, Geometry, Ring, Vertex, VertexKind};
pub use layer::{Feature, FeatureId, FeatureLayer, FeatureStore};
pub use spatial::FeatureIndex;
