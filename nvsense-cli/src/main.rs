//! nvsense command-line interface.
//!
//! `info` enumerates the discrete parameter domains present in a dataset
//! file; `render` runs one plot request and emits the composed curves as
//! TSV, with markers and non-fatal render errors reported on stderr.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

use nvsense_core::{
    AxisDomain, Composer, PlotRequest, RenderedCurveSet, Species, SpeciesSelection, UnitScale,
};
use nvsense_io::{read_dataset, TextOverlayReader};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    NvsenseIo(#[from] nvsense_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] nvsense_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidArguments(String),
}

/// Isotope species selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpeciesArg {
    /// Nitrogen-15 (keyed by misalignment angle)
    N15,
    /// Carbon-13 (keyed by hyperfine family)
    C13,
}

/// Axis domain selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    /// Pulse spacing tau
    Time,
    /// Resonance frequency f = 1/(2 tau)
    Frequency,
}

/// Presentation unit for the x axis (time unit; frequency pairs fixed).
#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    /// Nanoseconds / GHz
    Ns,
    /// Microseconds / MHz
    Us,
    /// Milliseconds / kHz
    Ms,
    /// Seconds / Hz
    S,
}

impl From<DomainArg> for AxisDomain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Time => AxisDomain::Time,
            DomainArg::Frequency => AxisDomain::Frequency,
        }
    }
}

impl From<UnitArg> for UnitScale {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Ns => UnitScale::Nanoseconds,
            UnitArg::Us => UnitScale::Microseconds,
            UnitArg::Ms => UnitScale::Milliseconds,
            UnitArg::S => UnitScale::Seconds,
        }
    }
}

/// Viewer backend for precomputed NV-center sensing curves.
#[derive(Parser)]
#[command(name = "nvsense")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parameter domains available in a dataset file
    Info {
        /// Dataset HDF5 file
        dataset: PathBuf,

        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compose one plot request and emit the curves as TSV
    Render {
        /// Dataset HDF5 file
        dataset: PathBuf,

        /// Isotope species
        #[arg(short, long, value_enum)]
        species: SpeciesArg,

        /// Electronic spin projection (ms = -1 or +1)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        ms: i32,

        /// XY8-M sequence order
        #[arg(short = 'M', long)]
        order: u32,

        /// Field strength in millitesla
        #[arg(short = 'B', long)]
        field: f64,

        /// Misalignment angle in degrees (N15 only)
        #[arg(long, default_value = "0.0")]
        angle: f64,

        /// Hyperfine family label (C13 only; repeatable)
        #[arg(short, long = "family")]
        families: Vec<String>,

        /// Axis domain
        #[arg(short, long, value_enum, default_value = "time")]
        domain: DomainArg,

        /// Axis unit
        #[arg(short, long, value_enum, default_value = "us")]
        unit: UnitArg,

        /// Isotope label to mark, e.g. "1-H" (repeatable)
        #[arg(short, long = "marker")]
        markers: Vec<String>,

        /// Experimental overlay file (two-column text, pre-scaled to the
        /// selected axis unit)
        #[arg(short = 'x', long)]
        overlay: Option<PathBuf>,

        /// Output TSV file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { dataset, json } => cmd_info(&dataset, json),
        Commands::Render {
            dataset,
            species,
            ms,
            order,
            field,
            angle,
            families,
            domain,
            unit,
            markers,
            overlay,
            output,
            verbose,
        } => {
            let selection = match species {
                SpeciesArg::N15 => SpeciesSelection::N15 { angle_deg: angle },
                SpeciesArg::C13 => {
                    if families.is_empty() {
                        return Err(CliError::InvalidArguments(
                            "c13 renders need at least one --family".to_string(),
                        ));
                    }
                    SpeciesSelection::C13 { families }
                }
            };
            let request = PlotRequest {
                ms,
                order,
                field_mt: field,
                selection,
                domain: domain.into(),
                scale: unit.into(),
                marker_labels: markers,
                overlay_enabled: overlay.is_some(),
                overlay_path: overlay,
            };
            cmd_render(&dataset, &request, output.as_deref(), verbose)
        }
    }
}

fn cmd_info(dataset_path: &std::path::Path, json: bool) -> Result<()> {
    let dataset = read_dataset(dataset_path)?;
    let store = &dataset.store;

    if json {
        let value = serde_json::json!({
            "n15": {
                "rows": store.len(Species::N15),
                "ms": store.ms_values(Species::N15),
                "orders": store.order_values(Species::N15),
                "fields_mt": store.field_values(Species::N15),
                "angles_deg": store.angle_values(),
            },
            "c13": {
                "rows": store.len(Species::C13),
                "ms": store.ms_values(Species::C13),
                "orders": store.order_values(Species::C13),
                "fields_mt": store.field_values(Species::C13),
                "families": dataset.constants.families(),
            },
            "isotopes": dataset.constants.gyro_entries().iter()
                .map(|e| serde_json::json!({
                    "label": e.label,
                    "mhz_per_tesla": e.mhz_per_tesla,
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Dataset: {}", dataset_path.display());
    println!();
    println!("N15 table: {} rows", store.len(Species::N15));
    println!("  ms:          {:?}", store.ms_values(Species::N15));
    println!("  orders:      {:?}", store.order_values(Species::N15));
    println!("  fields (mT): {:?}", store.field_values(Species::N15));
    println!("  angles (deg): {:?}", store.angle_values());
    println!();
    println!("C13 table: {} rows", store.len(Species::C13));
    println!("  ms:          {:?}", store.ms_values(Species::C13));
    println!("  orders:      {:?}", store.order_values(Species::C13));
    println!("  fields (mT): {:?}", store.field_values(Species::C13));
    println!("  families:    {:?}", dataset.constants.families());
    println!();
    println!("Gyromagnetic ratios (MHz/T):");
    for entry in dataset.constants.gyro_entries() {
        println!("  {:<8} {}", entry.label, entry.mhz_per_tesla);
    }
    Ok(())
}

fn cmd_render(
    dataset_path: &std::path::Path,
    request: &PlotRequest,
    output: Option<&std::path::Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("Reading dataset: {}", dataset_path.display());
        eprintln!("Request: {}", request.title());
    }

    let dataset = read_dataset(dataset_path)?;
    let composer = Composer::new(&dataset.store, &dataset.constants);
    let result = composer.render(request, &TextOverlayReader::new());

    report(&result, request);

    let mut writer: BufWriter<Box<dyn Write>> = match output {
        Some(path) => {
            if verbose {
                eprintln!("Writing output to: {}", path.display());
            }
            BufWriter::new(Box::new(File::create(path)?))
        }
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };
    write_tsv(&mut writer, &result, request)?;
    writer.flush()?;
    Ok(())
}

fn report(result: &RenderedCurveSet, request: &PlotRequest) {
    if !result.has_data() {
        eprintln!("No simulation results are available for these values");
    }
    for label in &result.placeholders {
        eprintln!("No data: {} ({})", label, request.title());
    }
    for marker in &result.markers {
        eprintln!("Marker {} at {}", marker.label, marker.position);
    }
    for err in &result.errors {
        eprintln!("Render error: {}", err);
    }
}

fn write_tsv<W: Write>(
    writer: &mut W,
    result: &RenderedCurveSet,
    request: &PlotRequest,
) -> Result<()> {
    writeln!(writer, "# {}", request.title())?;
    writeln!(writer, "# x axis: {}", request.domain.label(request.scale))?;
    for marker in &result.markers {
        writeln!(writer, "# marker\t{}\t{}", marker.label, marker.position)?;
    }
    for curve in &result.curves {
        writeln!(writer, "# curve\t{}\t{} points", curve.label, curve.x.len())?;
        for (x, y) in curve.x.iter().zip(&curve.y) {
            writeln!(writer, "{x}\t{y}")?;
        }
    }
    Ok(())
}
