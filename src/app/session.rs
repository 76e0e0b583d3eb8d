//! Bearbeitungs-Sitzung: ein Layer mit Undo/Redo um Geometrie-Änderungen
//! und Harmonisierungs-Läufe.

use super::history::{EditHistory, Snapshot};
use crate::core::{FeatureId, FeatureLayer, FeatureStore, Geometry};
use crate::harmonize::{harmonize_arc_centers, HarmonizeReport};
use crate::shared::HarmonizeOptions;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Maximale Anzahl Undo-Schritte.
const HISTORY_DEPTH: usize = 200;

/// Sitzung über einem Feature-Layer.
///
/// Jeder Harmonisierungs-Lauf ist eine einzige rückgängig machbare Transaktion.
/// Die Sitzung ruft die Harmonisierung nie von sich aus auf; der Aufrufer
/// entscheidet, wann nach einer Bearbeitung harmonisiert wird.
pub struct EditSession {
    layer: Arc<FeatureLayer>,
    history: EditHistory,
    /// Optionen für Harmonisierungs-Läufe
    pub options: HarmonizeOptions,
}

impl EditSession {
    /// Erstellt eine Sitzung über einem Layer.
    pub fn new(layer: FeatureLayer, options: HarmonizeOptions) -> Self {
        Self {
            layer: Arc::new(layer),
            history: EditHistory::new_with_capacity(HISTORY_DEPTH),
            options,
        }
    }

    /// Aktueller Layer (read-only).
    pub fn layer(&self) -> &FeatureLayer {
        &self.layer
    }

    /// Gibt den Layer zurück; klont nur, wenn noch Snapshots darauf zeigen.
    pub fn into_layer(self) -> FeatureLayer {
        Arc::try_unwrap(self.layer).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Ersetzt die Geometrie eines Features als eigener Undo-Schritt.
    pub fn set_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()> {
        if self.layer.geometry(id) == Some(&geometry) {
            return Ok(());
        }

        let snapshot = Snapshot::of(&self.layer, format!("Geometrie Ft. {}", id));
        let mut layer = (*self.layer).clone();
        layer
            .replace_geometry(id, geometry)
            .with_context(|| format!("Geometrie von Ft. {} nicht gesetzt", id))?;

        self.layer = Arc::new(layer);
        self.history.record_snapshot(snapshot);
        Ok(())
    }

    /// Harmonisiert die Selektion als ein Undo-Schritt.
    ///
    /// Nur ungültige Optionen sind ein Fehler; einzelne abgelehnte
    /// Verschiebungen landen im Report.
    pub fn harmonize(&mut self, selection: &[FeatureId]) -> Result<HarmonizeReport> {
        self.options.validate()?;
        if selection.is_empty() {
            return Ok(HarmonizeReport::default());
        }

        let snapshot = Snapshot::of(&self.layer, "Bogen-Harmonisierung");
        let report =
            harmonize_arc_centers(Arc::make_mut(&mut self.layer), selection, &self.options);

        if report.changed() {
            self.history.record_snapshot(snapshot);
        }
        Ok(report)
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Macht den letzten Schritt rückgängig.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_undo_with_current(Arc::clone(&self.layer)) {
            Some(prev) => {
                log::info!("Undo: {}", prev.label);
                self.layer = prev.layer;
                true
            }
            None => false,
        }
    }

    /// Stellt den zuletzt rückgängig gemachten Schritt wieder her.
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo_with_current(Arc::clone(&self.layer)) {
            Some(next) => {
                log::info!("Redo: {}", next.label);
                self.layer = next.layer;
                true
            }
            None => false,
        }
    }
}
