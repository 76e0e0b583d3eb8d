//! Harmonisierungs-Lauf: Scannen → Indexieren → Vergleichen → Verschieben → Übernehmen.

use super::{ArcScanner, ProximityIndex, SnapCandidate, SnapMatcher};
use crate::core::{FeatureId, FeatureLayer, FeatureStore, Geometry};
use crate::shared::{HarmonizeOptions, LookupMode};
use serde::{Deserialize, Serialize};

/// Statistik eines Harmonisierungs-Laufs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonizeReport {
    /// Anzahl bearbeiteter Features (im Speicher vorhanden)
    pub processed: usize,
    /// Features ohne Bögen (kein Nachbar-Abgleich)
    pub skipped_without_arcs: usize,
    /// Selektierte IDs, die im Speicher fehlen
    pub missing_features: usize,
    /// Gefundene äquivalente Bogen-Paare
    pub matched_arcs: usize,
    /// Tatsächlich verschobene Bogen-Zwischenpunkte
    pub snapped_vertices: usize,
    /// Abgelehnte Vertex-Verschiebungen
    pub rejected_moves: usize,
    /// Abgelehnte Geometrie-Übernahmen (z.B. gesperrte Features)
    pub rejected_commits: usize,
    /// Features, deren Geometrie ersetzt wurde (in Bearbeitungs-Reihenfolge)
    pub changed_features: Vec<FeatureId>,
}

impl HarmonizeReport {
    /// Prüft, ob mindestens eine Geometrie ersetzt wurde.
    pub fn changed(&self) -> bool {
        !self.changed_features.is_empty()
    }
}

/// Ein Harmonisierungs-Lauf über eine Feature-Selektion.
///
/// Schreibt ausschließlich das jeweils gescannte Feature, nie den Nachbarn.
/// Später bearbeitete Features sehen die bereits gesnappte Geometrie früherer
/// Features; das Ergebnis hängt damit von der Reihenfolge der Selektion ab.
#[derive(Debug, Clone)]
pub struct HarmonizationPass {
    tolerance: f64,
    lookup_mode: LookupMode,
    matcher: SnapMatcher,
}

impl HarmonizationPass {
    /// Erstellt einen Lauf. Erwartet validierte Optionen (`HarmonizeOptions::validate`).
    pub fn new(options: &HarmonizeOptions) -> Self {
        Self {
            tolerance: options.tolerance,
            lookup_mode: options.lookup_mode,
            matcher: SnapMatcher::new(options.tolerance),
        }
    }

    /// Harmonisiert alle selektierten Features in Selektions-Reihenfolge.
    pub fn run<S: FeatureStore + ?Sized>(
        &self,
        store: &mut S,
        selection: &[FeatureId],
    ) -> HarmonizeReport {
        let mut report = HarmonizeReport::default();
        if selection.is_empty() {
            log::debug!("Bogen-Harmonisierung: leere Selektion");
            return report;
        }

        for &feature_id in selection {
            self.harmonize_feature(store, feature_id, &mut report);
        }

        log::info!(
            "Bogen-Harmonisierung: {} Features, {} Treffer, {} verschoben, {} geaendert",
            report.processed,
            report.matched_arcs,
            report.snapped_vertices,
            report.changed_features.len()
        );
        report
    }

    fn harmonize_feature<S: FeatureStore + ?Sized>(
        &self,
        store: &mut S,
        feature_id: FeatureId,
        report: &mut HarmonizeReport,
    ) {
        log::debug!("Arc-Snapping Ft. {}...", feature_id);

        let Some(geometry) = store.geometry(feature_id) else {
            log::warn!("Ft. {} nicht gefunden, uebersprungen", feature_id);
            report.missing_features += 1;
            return;
        };
        report.processed += 1;

        let scanner = ArcScanner::new(feature_id, geometry);
        if !scanner.has_arcs() {
            log::debug!("  keine Bogen-Segmente, uebersprungen");
            report.skipped_without_arcs += 1;
            return;
        }
        let candidates: Vec<SnapCandidate> = scanner.collect();

        let neighbour_candidates: Vec<SnapCandidate> = store
            .features_near(geometry, self.tolerance)
            .into_iter()
            .filter(|&id| id != feature_id)
            .filter_map(|id| store.geometry(id).map(|g| ArcScanner::new(id, g)))
            .flatten()
            .collect();

        let mut index = ProximityIndex::new(self.tolerance, self.lookup_mode);
        for neighbour in &neighbour_candidates {
            index.add(neighbour);
        }

        // Klon erst beim ersten Treffer
        let mut snapped: Option<Geometry> = None;

        for candidate in &candidates {
            log::debug!("  Bogen-Vertex {}", candidate.mid_vertex_index);

            for neighbour in index.query(candidate) {
                if !self.matcher.equivalent(candidate, neighbour) {
                    log::debug!(
                        "    Ft. {} Vertex {}: NO SNAP",
                        neighbour.feature_id,
                        neighbour.mid_vertex_index
                    );
                    continue;
                }
                report.matched_arcs += 1;

                let target = snapped.get_or_insert_with(|| geometry.clone());
                let moves = target
                    .vertex(candidate.mid_vertex_index)
                    .is_some_and(|v| v.position != neighbour.mid);

                match target.replace_vertex(
                    candidate.mid_vertex_index,
                    neighbour.mid,
                    neighbour.mid_z,
                ) {
                    Ok(()) => {
                        if moves {
                            report.snapped_vertices += 1;
                        }
                        log::debug!(
                            "    Ft. {} Vertex {}: SNAP",
                            neighbour.feature_id,
                            neighbour.mid_vertex_index
                        );
                    }
                    Err(e) => {
                        log::warn!(
                            "Snapping von Ft. {} Vertex {} fehlgeschlagen: {:#}",
                            feature_id,
                            candidate.mid_vertex_index,
                            e
                        );
                        report.rejected_moves += 1;
                    }
                }
            }
        }

        let Some(new_geometry) = snapped.filter(|g| g != geometry) else {
            return;
        };

        match store.replace_geometry(feature_id, new_geometry) {
            Ok(()) => report.changed_features.push(feature_id),
            Err(e) => {
                log::warn!("Geometrie von Ft. {} nicht uebernommen: {:#}", feature_id, e);
                report.rejected_commits += 1;
            }
        }
    }
}

/// Harmonisiert die Selektion direkt im Speicher.
pub fn harmonize_arc_centers<S: FeatureStore + ?Sized>(
    store: &mut S,
    selection: &[FeatureId],
    options: &HarmonizeOptions,
) -> HarmonizeReport {
    HarmonizationPass::new(options).run(store, selection)
}

/// Reine Variante: liefert einen neuen Layer und lässt die Eingabe unverändert.
pub fn harmonize_layer(
    layer: &FeatureLayer,
    selection: &[FeatureId],
    options: &HarmonizeOptions,
) -> (FeatureLayer, HarmonizeReport) {
    let mut output = layer.clone();
    let report = harmonize_arc_centers(&mut output, selection, options);
    (output, report)
}
