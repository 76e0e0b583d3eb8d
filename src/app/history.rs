use crate::core::FeatureLayer;
use std::collections::VecDeque;
use std::sync::Arc;

/// Snapshot eines Layers für Undo/Redo.
///
/// Nutzt Arc-Clone (Copy-on-Write): Das Erstellen eines Snapshots ist O(1),
/// der teure Layer-Klon findet erst beim nächsten `Arc::make_mut()` statt.
#[derive(Clone)]
pub struct Snapshot {
    /// Layer zum Zeitpunkt des Snapshots
    pub layer: Arc<FeatureLayer>,
    /// Beschreibung der Bearbeitung, die auf den Snapshot folgte
    pub label: String,
}

impl Snapshot {
    /// Erstellt einen O(1)-Snapshot durch Arc-Clone statt Deep-Clone.
    pub fn of(layer: &Arc<FeatureLayer>, label: impl Into<String>) -> Self {
        Self {
            layer: Arc::clone(layer),
            label: label.into(),
        }
    }
}

/// Undo/Redo-Manager mit begrenzter Tiefe.
#[derive(Default)]
pub struct EditHistory {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::with_capacity(max_depth),
            max_depth,
        }
    }

    fn push_bounded(stack: &mut VecDeque<Snapshot>, snap: Snapshot, max_depth: usize) {
        if max_depth == 0 {
            return;
        }
        if stack.len() >= max_depth {
            stack.pop_front();
        }
        stack.push_back(snap);
    }

    /// Speichert den Zustand vor einer Bearbeitung; verwirft den Redo-Stack.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        Self::push_bounded(&mut self.undo_stack, snap, self.max_depth);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Beschreibung des nächsten Undo-Schritts
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.label.as_str())
    }

    /// Nimmt den letzten Undo-Eintrag und legt `current` auf den Redo-Stack.
    pub fn pop_undo_with_current(&mut self, current: Arc<FeatureLayer>) -> Option<Snapshot> {
        let prev = self.undo_stack.pop_back()?;
        let redo = Snapshot::of(&current, prev.label.clone());
        Self::push_bounded(&mut self.redo_stack, redo, self.max_depth);
        Some(prev)
    }

    /// Nimmt den letzten Redo-Eintrag und legt `current` auf den Undo-Stack.
    pub fn pop_redo_with_current(&mut self, current: Arc<FeatureLayer>) -> Option<Snapshot> {
        let next = self.redo_stack.pop_back()?;
        let undo = Snapshot::of(&current, next.label.clone());
        Self::push_bounded(&mut self.undo_stack, undo, self.max_depth);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_named(name: &str) -> Arc<FeatureLayer> {
        let mut layer = FeatureLayer::new();
        layer.name = Some(name.to_string());
        Arc::new(layer)
    }

    #[test]
    fn undo_redo_swaps_snapshots() {
        let mut history = EditHistory::new_with_capacity(4);
        let before = layer_named("vorher");
        let after = layer_named("nachher");

        history.record_snapshot(Snapshot::of(&before, "Harmonisierung"));
        assert_eq!(history.undo_label(), Some("Harmonisierung"));

        let restored = history
            .pop_undo_with_current(Arc::clone(&after))
            .expect("Undo erwartet");
        assert!(Arc::ptr_eq(&restored.layer, &before));
        assert!(history.can_redo());

        let redone = history
            .pop_redo_with_current(restored.layer)
            .expect("Redo erwartet");
        assert!(Arc::ptr_eq(&redone.layer, &after));
        assert!(history.can_undo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut history = EditHistory::new_with_capacity(2);
        for i in 0..5 {
            history.record_snapshot(Snapshot::of(&layer_named("x"), format!("Schritt {}", i)));
        }

        assert_eq!(history.undo_label(), Some("Schritt 4"));
        assert!(history.pop_undo_with_current(layer_named("a")).is_some());
        assert!(history.pop_undo_with_current(layer_named("b")).is_some());
        assert!(history.pop_undo_with_current(layer_named("c")).is_none());
    }

    #[test]
    fn new_record_clears_redo() {
        let mut history = EditHistory::new_with_capacity(4);
        history.record_snapshot(Snapshot::of(&layer_named("a"), "eins"));
        history.pop_undo_with_current(layer_named("b"));
        assert!(history.can_redo());

        history.record_snapshot(Snapshot::of(&layer_named("c"), "zwei"));
        assert!(!history.can_redo());
    }
}
