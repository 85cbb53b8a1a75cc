//! spatialkde CLI - Kernel density / heatmap rasters from vector points

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use spatialkde_algorithms::kde::{kernel_density, KdeParams, NODATA};
use spatialkde_algorithms::sample_points;
use spatialkde_core::io::{read_geojson, write_ascii_grid, write_geotiff};
use spatialkde_core::CRS;

/// Create a spatial kernel density (heatmap) raster from an input vector.
///
/// The input must be a GeoJSON feature collection; non-point geometries
/// contribute their centroid. Distance calculations are planar, so take
/// care with data in geographic coordinate systems. Cells with no point
/// within the search radius receive the no-data value -9999.
#[derive(Parser)]
#[command(name = "spatialkde")]
#[command(author, version, about = "Kernel density (heatmap) rasters from vector points")]
struct Cli {
    /// Path to input vector file (GeoJSON)
    vector: PathBuf,

    /// Output path for the created raster
    output: PathBuf,

    /// Radius/bandwidth for the KDE. Same units as the CRS of the input.
    #[arg(short, long, default_value = "1.0")]
    radius: f64,

    /// Output pixel size (resolution). Same units as the CRS of the input.
    #[arg(short, long, default_value = "1.0")]
    pixel_size: f64,

    /// Output format: gtiff, aaigrid
    #[arg(short, long, default_value = "gtiff")]
    format: String,

    /// Optional field containing weights of each feature. Features where
    /// it is missing do not contribute to the KDE.
    #[arg(short, long)]
    weight_field: Option<String>,

    /// Output mathematically scaled values instead of raw ones
    #[arg(long)]
    scaled: bool,

    /// EPSG code to tag the output raster with (default: 4326)
    #[arg(long)]
    epsg: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

enum OutputFormat {
    GTiff,
    AsciiGrid,
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "gtiff" | "geotiff" | "tif" => Ok(OutputFormat::GTiff),
        "aaigrid" | "asc" | "ascii" => Ok(OutputFormat::AsciiGrid),
        _ => anyhow::bail!("Unknown format: {}. Use gtiff or aaigrid.", s),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let format = parse_format(&cli.format)?;

    let pb = spinner("Reading vector...");
    let features = read_geojson(&cli.vector).context("Failed to read input vector")?;
    pb.finish_and_clear();
    info!("Input: {} features", features.len());

    let points = sample_points(&features, cli.weight_field.as_deref())
        .context("Failed to extract sample points")?;
    info!("Extracted {} sample points", points.len());

    let params = KdeParams {
        radius: cli.radius,
        pixel_size: cli.pixel_size,
        scaled: cli.scaled,
        extent: None,
    };

    let pb = spinner("Computing kernel density...");
    let start = Instant::now();
    let mut raster =
        kernel_density(&points, &params).context("Failed to compute kernel density")?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    raster.set_crs(Some(cli.epsg.map(CRS::from_epsg).unwrap_or_default()));

    info!(
        "Output: {} x {} cells, nodata {}",
        raster.cols(),
        raster.rows(),
        NODATA
    );
    let stats = raster.statistics();
    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        info!(
            "Density range: {:.4} - {:.4} over {} valid cells",
            min, max, stats.valid_count
        );
    }

    let pb = spinner("Writing output...");
    match format {
        OutputFormat::GTiff => {
            write_geotiff(&raster, &cli.output).context("Failed to write GeoTIFF")?
        }
        OutputFormat::AsciiGrid => {
            write_ascii_grid(&raster, &cli.output).context("Failed to write ASCII grid")?
        }
    }
    pb.finish_and_clear();

    println!("Kernel density saved to: {}", cli.output.display());
    println!("  Processing time: {:.2?}", elapsed);

    Ok(())
}
