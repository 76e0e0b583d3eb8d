//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Konfiguration, die zwischen `harmonize`, `app` und der
//! Binary geteilt wird, um direkte Abhängigkeiten zu vermeiden.

pub mod options;

pub use options::{HarmonizeOptions, LookupMode};
pub use options::{DEFAULT_TOLERANCE, OPTIONS_FILE_NAME};
