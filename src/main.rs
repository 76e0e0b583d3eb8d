//! Arc Harmonizer.
//!
//! Kommandozeilen-Werkzeug: lädt einen Feature-Layer (XML), gleicht die
//! Bogen-Mittelpunkte der Selektion an ihre Nachbarn an und schreibt den
//! Layer zurück.

use anyhow::{bail, Context, Result};
use arc_harmonizer::{
    parse_layer, write_layer, EditSession, FeatureId, HarmonizeOptions, HarmonizeReport,
    LookupMode,
};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Bogen-Mittelpunkt-Harmonisierung für Feature-Layer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Eingabe-Layer (XML)
    input: PathBuf,

    /// Zu harmonisierende Feature-IDs in Bearbeitungs-Reihenfolge (z.B. "3,1,7")
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<FeatureId>,

    /// Alle Features in Layer-Reihenfolge harmonisieren
    #[arg(long, conflicts_with = "select")]
    all: bool,

    /// Toleranz (überschreibt die Options-Datei)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Nachbarzellen im Endpunkt-Hash mit abfragen
    #[arg(long)]
    neighborhood: bool,

    /// Options-Datei (TOML); Standard: arc_harmonizer.toml neben der Binary
    #[arg(long)]
    options: Option<PathBuf>,

    /// Ausgabe-Datei; Standard: Eingabe überschreiben
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report als JSON auf stdout ausgeben
    #[arg(long)]
    report_json: bool,

    /// Wirksame Optionen (inkl. CLI-Überschreibungen) in die Options-Datei schreiben
    #[arg(long)]
    save_options: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Arc Harmonizer v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let options = resolve_options(args)?;
    if args.save_options {
        options.save_to_file(&options_path(args))?;
    }

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Datei nicht lesbar: {}", args.input.display()))?;
    let layer = parse_layer(&content)
        .with_context(|| format!("Layer nicht lesbar: {}", args.input.display()))?;

    let selection: Vec<FeatureId> = if args.all {
        layer.feature_ids()
    } else {
        args.select.clone()
    };
    if selection.is_empty() {
        bail!("Keine Features selektiert (--select oder --all)");
    }

    let mut session = EditSession::new(layer, options);
    let report = session.harmonize(&selection)?;

    let output_path = args.output.as_deref().unwrap_or(&args.input);
    save_layer(session.layer(), output_path)?;

    print_report(&report, args.report_json)
}

fn resolve_options(args: &Args) -> Result<HarmonizeOptions> {
    let path = options_path(args);
    let mut options = HarmonizeOptions::load_from_file(&path);

    if let Some(tolerance) = args.tolerance {
        options.tolerance = tolerance;
    }
    if args.neighborhood {
        options.lookup_mode = LookupMode::Neighborhood;
    }

    options.validate()?;
    Ok(options)
}

fn options_path(args: &Args) -> PathBuf {
    args.options
        .clone()
        .unwrap_or_else(HarmonizeOptions::config_path)
}

fn save_layer(layer: &arc_harmonizer::FeatureLayer, path: &Path) -> Result<()> {
    let xml = write_layer(layer)?;
    std::fs::write(path, xml)
        .with_context(|| format!("Datei nicht schreibbar: {}", path.display()))?;
    log::info!("Layer gespeichert nach: {}", path.display());
    Ok(())
}

fn print_report(report: &HarmonizeReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Bearbeitet:          {}", report.processed);
    println!("Ohne Boegen:         {}", report.skipped_without_arcs);
    println!("Nicht gefunden:      {}", report.missing_features);
    println!("Treffer:             {}", report.matched_arcs);
    println!("Verschoben:          {}", report.snapped_vertices);
    println!("Abgelehnt (Vertex):  {}", report.rejected_moves);
    println!("Abgelehnt (Feature): {}", report.rejected_commits);
    println!("Geaendert:           {:?}", report.changed_features);
    Ok(())
}
