//! Feature-Layer: Speicher aller Features mit persistentem Spatial-Index.

use super::{FeatureIndex, Geometry};
use anyhow::{bail, Result};
use indexmap::IndexMap;

/// Stabile Feature-ID innerhalb eines Layers
pub type FeatureId = u64;

/// Ein Feature mit Geometrie
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature-ID
    pub id: FeatureId,
    /// Geometrie (Ringe mit Linien- und Bogen-Vertices)
    pub geometry: Geometry,
    /// Gesperrte Features verweigern Geometrie-Änderungen
    pub locked: bool,
}

impl Feature {
    /// Erstellt ein editierbares Feature
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            locked: false,
        }
    }
}

/// Speicher- und Nachbarschafts-Schnittstelle, gegen die der Harmonisierungs-Lauf arbeitet.
pub trait FeatureStore {
    /// Aktuelle Geometrie eines Features
    fn geometry(&self, id: FeatureId) -> Option<&Geometry>;

    /// Features in höchstens `distance` Abstand zur Geometrie.
    ///
    /// Darf falsch-positive Treffer liefern, aber keine nahen Features auslassen.
    fn features_near(&self, geometry: &Geometry, distance: f64) -> Vec<FeatureId>;

    /// Ersetzt die gespeicherte Geometrie eines Features
    fn replace_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()>;
}

/// In-Memory-Layer mit Features in Einfüge-Reihenfolge
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    /// Optionaler Layer-Name
    pub name: Option<String>,
    features: IndexMap<FeatureId, Feature>,
    spatial_index: FeatureIndex,
}

impl Default for FeatureLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureLayer {
    /// Erstellt einen leeren Layer
    pub fn new() -> Self {
        Self {
            name: None,
            features: IndexMap::new(),
            spatial_index: FeatureIndex::empty(),
        }
    }

    /// Baut einen Layer aus mehreren Features, der Index wird nur einmal aufgebaut.
    ///
    /// Doppelte IDs sind ein Fehler.
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Result<Self> {
        let mut layer = Self::new();
        for feature in features {
            if layer.features.contains_key(&feature.id) {
                bail!("Doppelte Feature-ID {}", feature.id);
            }
            layer.features.insert(feature.id, feature);
        }
        layer.rebuild_spatial_index();
        Ok(layer)
    }

    /// Fügt ein Feature hinzu (ersetzt ein bestehendes mit gleicher ID)
    pub fn add_feature(&mut self, feature: Feature) {
        self.spatial_index.update(feature.id, &feature.geometry);
        self.features.insert(feature.id, feature);
    }

    /// Entfernt ein Feature
    pub fn remove_feature(&mut self, id: FeatureId) -> Option<Feature> {
        let removed = self.features.shift_remove(&id);
        if removed.is_some() {
            self.spatial_index.remove(id);
        }
        removed
    }

    /// Findet ein Feature
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Iterator über alle Features in Layer-Reihenfolge
    pub fn features_iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Alle Feature-IDs in Layer-Reihenfolge
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.keys().copied().collect()
    }

    /// Gibt die Anzahl der Features zurück
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Sperrt oder entsperrt ein Feature für Geometrie-Änderungen
    pub fn set_locked(&mut self, id: FeatureId, locked: bool) -> bool {
        if let Some(feature) = self.features.get_mut(&id) {
            feature.locked = locked;
            true
        } else {
            false
        }
    }

    /// Baut den persistenten Spatial-Index aus den aktuellen Geometrien neu auf.
    fn rebuild_spatial_index(&mut self) {
        self.spatial_index = FeatureIndex::from_geometries(
            self.features
                .values()
                .map(|feature| (feature.id, &feature.geometry)),
        );
    }
}

impl FeatureStore for FeatureLayer {
    fn geometry(&self, id: FeatureId) -> Option<&Geometry> {
        self.features.get(&id).map(|feature| &feature.geometry)
    }

    fn features_near(&self, geometry: &Geometry, distance: f64) -> Vec<FeatureId> {
        self.spatial_index.within_distance(geometry, distance)
    }

    fn replace_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()> {
        let Some(feature) = self.features.get_mut(&id) else {
            bail!("Feature {} existiert nicht", id);
        };
        if feature.locked {
            bail!("Feature {} ist gesperrt", id);
        }
        if feature.geometry == geometry {
            return Ok(());
        }

        feature.geometry = geometry;
        self.spatial_index.update(id, &feature.geometry);
        Ok(())
    }
}
