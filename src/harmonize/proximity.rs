//! Endpunkt-Hash: Bögen nach quantisierten Endpunkten gruppiert.
//!
//! Gleiche Grid-Technik wie bei der Duplikat-Erkennung von Punkten, nur mit
//! vier Dimensionen (beide Endpunkte) und `floor` statt `round`.

use super::SnapCandidate;
use crate::shared::LookupMode;
use std::collections::HashMap;

/// Zellschlüssel: quantisierte (x, y) beider sortierter Endpunkte
pub type CellKey = (i64, i64, i64, i64);

/// Spatial-Hash über Bogen-Kandidaten. Leiht die Kandidaten nur aus.
#[derive(Debug)]
pub struct ProximityIndex<'a> {
    tolerance: f64,
    lookup_mode: LookupMode,
    buckets: HashMap<CellKey, Vec<&'a SnapCandidate>>,
    len: usize,
}

impl<'a> ProximityIndex<'a> {
    /// Erstellt einen leeren Index; `tolerance` ist gleichzeitig die Zellgröße.
    pub fn new(tolerance: f64, lookup_mode: LookupMode) -> Self {
        Self {
            tolerance,
            lookup_mode,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    fn quantize(&self, value: f64) -> i64 {
        (value / self.tolerance).floor() as i64
    }

    /// Zellschlüssel eines Kandidaten (richtungsunabhängig).
    pub fn key(&self, candidate: &SnapCandidate) -> CellKey {
        let (a, b) = candidate.ordered_endpoints();
        (
            self.quantize(a.x),
            self.quantize(a.y),
            self.quantize(b.x),
            self.quantize(b.y),
        )
    }

    /// Fügt einen Kandidaten in die Zelle seines Schlüssels ein.
    pub fn add(&mut self, candidate: &'a SnapCandidate) {
        let key = self.key(candidate);
        self.buckets.entry(key).or_default().push(candidate);
        self.len += 1;
    }

    /// Gibt die Anzahl indexierter Kandidaten zurück.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Gibt `true` zurück, wenn keine Kandidaten im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mögliche Snap-Partner eines Kandidaten.
    ///
    /// `ExactCell` liefert nur die eigene Zelle. `Neighborhood` liefert alle
    /// 3⁴ angrenzenden Zellen, zusätzlich die Nachbarschaft des vertauschten
    /// Endpunkt-Paars (Sortierung kann bei fast gleichen Endpunkten kippen).
    pub fn query(&self, candidate: &SnapCandidate) -> Vec<&'a SnapCandidate> {
        let key = self.key(candidate);
        match self.lookup_mode {
            LookupMode::ExactCell => self.buckets.get(&key).cloned().unwrap_or_default(),
            LookupMode::Neighborhood => {
                let swapped = (key.2, key.3, key.0, key.1);
                let mut keys: Vec<CellKey> = neighborhood(key)
                    .chain(neighborhood(swapped))
                    .filter(|k| self.buckets.contains_key(k))
                    .collect();
                keys.sort_unstable();
                keys.dedup();

                keys.iter()
                    .filter_map(|k| self.buckets.get(k))
                    .flat_map(|bucket| bucket.iter().copied())
                    .collect()
            }
        }
    }
}

/// Alle Zellen, die in jeder Dimension höchstens eine Zelle entfernt sind (inkl. Zentrum).
fn neighborhood(key: CellKey) -> impl Iterator<Item = CellKey> {
    const OFFSETS: [i64; 3] = [-1, 0, 1];
    OFFSETS.into_iter().flat_map(move |d0| {
        OFFSETS.into_iter().flat_map(move |d1| {
            OFFSETS.into_iter().flat_map(move |d2| {
                OFFSETS
                    .into_iter()
                    .map(move |d3| (key.0 + d0, key.1 + d1, key.2 + d2, key.3 + d3))
            })
        })
    })
}
