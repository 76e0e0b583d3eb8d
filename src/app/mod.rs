//! Anwendungs-Schicht: Bearbeitungs-Sitzung mit Undo/Redo.

pub mod history;
pub mod session;

pub use history::{EditHistory, Snapshot};
pub use session::EditSession;
