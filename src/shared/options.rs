//! Konfiguration der Bogen-Harmonisierung.
//!
//! `HarmonizeOptions` wird explizit in jeden Aufruf gereicht; es gibt keinen
//! prozessweiten Zustand. Die `const`-Werte bleiben als Fallback/Default erhalten.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Standard-Toleranz (Koordinaten-Einheiten des Referenzsystems).
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Dateiname der Options-Datei neben der Binary.
pub const OPTIONS_FILE_NAME: &str = "arc_harmonizer.toml";

/// Abfrage-Strategie des Endpunkt-Hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Nur die exakte Zelle. Treffer, deren quantisierte Endpunkte auf
    /// verschiedenen Seiten einer Zellgrenze liegen, werden verfehlt.
    #[default]
    ExactCell,
    /// Alle in jeder quantisierten Dimension angrenzenden Zellen
    Neighborhood,
}

/// Laufzeit-Optionen eines Harmonisierungs-Laufs.
/// Wird als `arc_harmonizer.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonizeOptions {
    /// Toleranz für Endpunkt-Vergleich, Mittelpunkt-Vergleich und Zellgröße
    pub tolerance: f64,
    /// Abfrage-Strategie des Endpunkt-Hashes
    #[serde(default)]
    pub lookup_mode: LookupMode,
}

impl Default for HarmonizeOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            lookup_mode: LookupMode::default(),
        }
    }
}

impl HarmonizeOptions {
    /// Optionen mit gegebener Toleranz und Standard-Abfrage
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Setzt die Abfrage-Strategie
    pub fn with_lookup_mode(mut self, lookup_mode: LookupMode) -> Self {
        self.lookup_mode = lookup_mode;
        self
    }

    /// Prüft die Optionen vor einem Lauf.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            bail!(
                "Toleranz muss positiv und endlich sein (ist {})",
                self.tolerance
            );
        }
        Ok(())
    }

    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("arc_harmonizer"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(OPTIONS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = HarmonizeOptions::default();

        assert_eq!(options.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(options.lookup_mode, LookupMode::ExactCell);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        assert!(HarmonizeOptions::with_tolerance(0.0).validate().is_err());
        assert!(HarmonizeOptions::with_tolerance(-0.5).validate().is_err());
        assert!(HarmonizeOptions::with_tolerance(f64::NAN).validate().is_err());
        assert!(HarmonizeOptions::with_tolerance(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn toml_without_lookup_mode_uses_default() {
        let options: HarmonizeOptions = toml::from_str("tolerance = 0.05\n").expect("TOML gueltig");

        assert_eq!(options.tolerance, 0.05);
        assert_eq!(options.lookup_mode, LookupMode::ExactCell);
    }

    #[test]
    fn toml_roundtrip_keeps_lookup_mode() {
        let options =
            HarmonizeOptions::with_tolerance(0.01).with_lookup_mode(LookupMode::Neighborhood);

        let text = toml::to_string_pretty(&options).expect("Serialisierung");
        assert!(text.contains("lookup_mode = \"neighborhood\""));

        let parsed: HarmonizeOptions = toml::from_str(&text).expect("TOML gueltig");
        assert_eq!(parsed, options);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("arc_harmonizer_missing_options_test.toml");
        let _ = std::fs::remove_file(&path);

        assert_eq!(HarmonizeOptions::load_from_file(&path), HarmonizeOptions::default());
    }

    #[test]
    fn saved_options_are_loaded_again() {
        let tmp = std::env::temp_dir().join("arc_harmonizer_saved_options_test");
        std::fs::create_dir_all(&tmp).expect("Temp-Verzeichnis");
        let path = tmp.join(OPTIONS_FILE_NAME);
        let options =
            HarmonizeOptions::with_tolerance(0.02).with_lookup_mode(LookupMode::Neighborhood);

        options.save_to_file(&path).expect("Speichern erwartet");

        assert_eq!(HarmonizeOptions::load_from_file(&path), options);
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
