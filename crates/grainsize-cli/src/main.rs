//! grainsize CLI: sand grain size analysis from a photo with a reference object.

use clap::{Args, Parser, Subcommand};
use grainsize::{AnalysisConfig, AnalysisResult, Analyzer, ReferenceCatalog, ReferenceShape};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "grainsize")]
#[command(about = "Estimate sand grain sizes from a photo with a note, card or coin in it")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one image and write a JSON report.
    Analyze(CliAnalyzeArgs),

    /// Print the active reference catalog.
    CatalogInfo {
        /// Catalog JSON to load instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print the Wentworth class of a single diameter.
    Classify {
        /// Grain diameter in millimetres.
        #[arg(long, allow_negative_numbers = true)]
        diameter: f64,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the analysis report (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Reference catalog JSON (defaults to the built-in catalog).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Analysis configuration JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude where the photo was taken, echoed in the report.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude where the photo was taken, echoed in the report.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Also save the image with the reference object masked out (PNG).
    #[arg(long)]
    masked_out: Option<PathBuf>,

    /// Override the accepted aspect-ratio deviation (fraction of the catalog aspect).
    #[arg(long)]
    aspect_tolerance: Option<f64>,

    /// Override the noise floor: regions at or below this area (px) are dropped.
    #[arg(long)]
    min_area_px: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, serde::Serialize)]
struct Report<'a> {
    location: Option<Location>,
    analysis: &'a AnalysisResult,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::CatalogInfo { catalog } => run_catalog_info(catalog.as_deref()),
        Commands::Classify { diameter } => run_classify(diameter),
    }
}

fn load_catalog(path: Option<&Path>) -> CliResult<ReferenceCatalog> {
    match path {
        Some(p) => {
            tracing::info!("Loading catalog: {}", p.display());
            Ok(ReferenceCatalog::from_json_file(p)?)
        }
        None => Ok(ReferenceCatalog::default()),
    }
}

// ── catalog-info ───────────────────────────────────────────────────────

fn run_catalog_info(path: Option<&Path>) -> CliResult<()> {
    let catalog = load_catalog(path)?;

    println!("grainsize reference catalog");
    println!("  name:     {}", catalog.name());
    println!("  objects:  {}", catalog.len());
    for obj in catalog.objects() {
        match obj.shape() {
            ReferenceShape::Rectangle => println!(
                "  {:<20} rectangle  {:>6.2} x {:>6.2} mm  aspect {:.4}",
                obj.label(),
                obj.width_mm(),
                obj.height_mm(),
                obj.aspect_ratio()
            ),
            ReferenceShape::Circle => println!(
                "  {:<20} circle     {:>6.2} mm diameter",
                obj.label(),
                obj.diameter_mm()
            ),
        }
    }
    Ok(())
}

// ── classify ───────────────────────────────────────────────────────────

fn run_classify(diameter: f64) -> CliResult<()> {
    println!("{} mm: {}", diameter, grainsize::classify_wentworth(diameter));
    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn build_config(args: &CliAnalyzeArgs) -> CliResult<AnalysisConfig> {
    let mut config = match &args.config {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            AnalysisConfig::from_json_file(p)?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(tol) = args.aspect_tolerance {
        if !(tol.is_finite() && tol > 0.0) {
            return Err(format!("--aspect-tolerance must be finite and > 0 (got {tol})").into());
        }
        config.reference.aspect_tolerance_frac = tol;
    }
    if let Some(area) = args.min_area_px {
        config.segmentation.min_area_px = area;
    }
    Ok(config)
}

fn location(args: &CliAnalyzeArgs) -> Option<Location> {
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(Location { latitude, longitude }),
        _ => None,
    }
}

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let image = grainsize::load_image(&args.image)?;
    let (w, h) = image.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let catalog = load_catalog(args.catalog.as_deref())?;
    let analyzer = Analyzer::with_config(catalog, build_config(args)?);

    let (result, masked) = match analyzer.analyze_with_masked(&image) {
        Ok(out) => out,
        Err(err) => {
            if err.is_reference_failure() {
                tracing::error!("Could not detect a valid scale reference: {}", err);
            } else {
                tracing::error!("Analysis failed: {}", err);
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        "{}: mean {:.4} mm (std {:.4}), {} grains, scale {:.2} px/mm from '{}' (confidence {:.3})",
        result.classification,
        result.mean_diameter_mm,
        result.std_deviation_mm,
        result.grain_count,
        result.pixels_per_mm,
        result.reference_label,
        result.detection_confidence
    );

    let report = Report {
        location: location(args),
        analysis: &result,
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    if let Some(path) = &args.masked_out {
        masked.save(path)?;
        tracing::info!("Masked image written to {}", path.display());
    }
    Ok(())
}
