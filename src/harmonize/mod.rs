//! Bogen-Mittelpunkt-Harmonisierung.
//!
//! Findet Kreisbögen benachbarter Features mit denselben Endpunkten und
//! äquivalentem Kreis (Mittelpunkt innerhalb der Toleranz) und snappt den
//! Bogen-Zwischenpunkt des bearbeiteten Features auf den des Nachbarn.
//!
//! Ablauf pro Feature: `ArcScanner` → `ProximityIndex` → `SnapMatcher` →
//! Vertex verschieben → Geometrie übernehmen (`HarmonizationPass`).

pub mod candidate;
pub mod matcher;
pub mod pass;
pub mod proximity;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use candidate::SnapCandidate;
pub use matcher::SnapMatcher;
pub use pass::{harmonize_arc_centers, harmonize_layer, HarmonizationPass, HarmonizeReport};
pub use proximity::{CellKey, ProximityIndex};
pub use scanner::ArcScanner;
