//! texnet CLI - GLCM texture descriptors at the optimal offset

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use texnet_algorithms::batch::{process, process_each, BatchParams, ImageTexture};
use texnet_algorithms::texture::{select_offset_with, Glcm, HaralickFeatures, FEATURE_NAMES};
use texnet_core::io::read_image;
use texnet_core::{Image, Offset, TextureConfig};
use texnet_parallel::{set_num_threads, ProcessingMode};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "texnet")]
#[command(author, version, about = "GLCM texture descriptors at the optimal offset", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions and intensity range of an image
    Info {
        /// Input image file
        input: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Score every candidate offset of one image
    Search {
        /// Input image file
        input: PathBuf,
        #[command(flatten)]
        offsets: OffsetArgs,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Haralick features at the optimal offset, one row per image
    Features {
        /// Input image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        offsets: OffsetArgs,
        #[command(flatten)]
        size: SizeArgs,
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Report and skip images that fail instead of stopping
        #[arg(long)]
        keep_going: bool,
        /// Print the best offset after each candidate
        #[arg(long)]
        trace: bool,
    },
}

#[derive(Args)]
struct OffsetArgs {
    /// Candidate distances, comma separated
    #[arg(short, long, default_value = "1")]
    distances: String,
    /// Candidate angles in degrees, comma separated
    #[arg(short, long, default_value = "0,45,90,135", allow_hyphen_values = true)]
    angles: String,
    /// Number of gray levels
    #[arg(long, default_value = "256")]
    levels: usize,
    /// Symmetrize the optimal matrix
    #[arg(long)]
    symmetric: bool,
}

#[derive(Args)]
struct SizeArgs {
    /// Resize to SIZE x SIZE before analysis
    #[arg(long, default_value = "256", conflicts_with = "native")]
    size: u32,
    /// Keep the native resolution
    #[arg(long)]
    native: bool,
}

impl SizeArgs {
    fn image_size(&self) -> Option<u32> {
        (!self.native).then_some(self.size)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn progress(len: usize, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:30.green}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(msg.to_string());
    pb
}

fn parse_list<T: std::str::FromStr>(s: &str, what: &str) -> Result<Vec<T>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse()
                .map_err(|_| anyhow::anyhow!("Invalid {}: '{}'", what, p))
        })
        .collect()
}

fn build_config(offsets: &OffsetArgs, size: &SizeArgs) -> Result<TextureConfig> {
    let config = TextureConfig {
        distances: parse_list(&offsets.distances, "distance")?,
        angles: parse_list(&offsets.angles, "angle")?,
        levels: offsets.levels,
        image_size: size.image_size(),
        symmetric: offsets.symmetric,
    };
    config.validate().context("Invalid offset configuration")?;
    Ok(config)
}

fn load(path: &Path, image_size: Option<u32>) -> Result<Image> {
    read_image(path, image_size).with_context(|| format!("Failed to read {}", path.display()))
}

/// One printed result line
struct Row<'a> {
    path: &'a Path,
    offset: Offset,
    features: HaralickFeatures,
    trace: Vec<Offset>,
}

impl<'a> Row<'a> {
    fn from_texture(path: &'a Path, texture: ImageTexture) -> Self {
        Self {
            path,
            offset: texture.offset,
            features: texture.features,
            trace: texture.trace,
        }
    }
}

fn print_header() {
    print!("{:<32} {:>5} {:>6}", "image", "dist", "angle");
    for name in FEATURE_NAMES {
        print!(" {:>18}", name);
    }
    println!();
}

fn print_row(path: &Path, offset: Offset, features: &HaralickFeatures) {
    print!(
        "{:<32} {:>5} {:>6}",
        path.display(),
        offset.distance,
        offset.angle
    );
    for value in features.to_array() {
        print!(" {:>18.6}", value);
    }
    println!();
}

fn print_trace(path: &Path, trace: &[Offset]) {
    let steps: Vec<String> = trace.iter().map(ToString::to_string).collect();
    println!("  {} trace: {}", path.display(), steps.join(" -> "));
}

// ─── Commands ───────────────────────────────────────────────────────────

fn run_info(input: &Path, size: &SizeArgs) -> Result<()> {
    let pb = spinner("Reading image...");
    let image = load(input, size.image_size())?;
    pb.finish_and_clear();

    let (rows, cols) = image.shape();
    let stats = image.statistics();
    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} pixels)", cols, rows, image.len());
    println!("\nIntensity:");
    if let Some(min) = stats.min {
        println!("  Min: {}", min);
    }
    if let Some(max) = stats.max {
        println!("  Max: {}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.4}", mean);
    }
    Ok(())
}

fn run_search(input: &Path, offsets: &OffsetArgs, size: &SizeArgs) -> Result<()> {
    let config = build_config(offsets, size)?;
    let image = load(input, config.image_size)?;

    let start = Instant::now();
    let search = select_offset_with(
        &Glcm::new(config.levels),
        &image,
        &config.distances,
        &config.angles,
        config.symmetric,
    )
    .context("Offset search failed")?;
    let elapsed = start.elapsed();

    print!("{:>8}", "d \\ a");
    for angle in &config.angles {
        print!(" {:>14}", angle);
    }
    println!();
    for (d, distance) in config.distances.iter().enumerate() {
        print!("{:>8}", distance);
        for a in 0..config.angles.len() {
            print!(" {:>14.4}", search.scores[[d, a]]);
        }
        println!();
    }
    println!(
        "\nOptimal offset: {} (score {:.4})",
        search.offset,
        search.best_score()
    );
    println!("  Processing time: {:.2?}", elapsed);
    Ok(())
}

fn run_features(
    inputs: &[PathBuf],
    offsets: &OffsetArgs,
    size: &SizeArgs,
    threads: Option<usize>,
    keep_going: bool,
    trace: bool,
) -> Result<()> {
    let config = build_config(offsets, size)?;
    let mode = match threads {
        Some(0) => bail!("--threads must be at least 1"),
        Some(1) => ProcessingMode::Sequential,
        Some(n) => {
            set_num_threads(n);
            ProcessingMode::ParallelWith(n)
        }
        None => ProcessingMode::Parallel,
    };

    let pb = progress(inputs.len(), "Reading images");
    let mut paths = Vec::with_capacity(inputs.len());
    let mut images = Vec::with_capacity(inputs.len());
    for path in inputs {
        match load(path, config.image_size) {
            Ok(image) => {
                paths.push(path.as_path());
                images.push(image);
            }
            Err(e) if keep_going => warn!("{:#}", e),
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "{} images, {} candidate offsets",
        images.len(),
        config.candidate_count()
    );
    let params = BatchParams { config, mode };

    let start = Instant::now();
    let rows: Vec<Row> = if keep_going {
        paths
            .iter()
            .zip(process_each(&images, &params))
            .filter_map(|(path, result)| match result {
                Ok(texture) => Some(Row::from_texture(*path, texture)),
                Err(e) => {
                    eprintln!("Skipped {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    } else {
        let output = process(&images, &params).context("Texture extraction failed")?;
        let traces = output.offset_trace.chunks(params.config.candidate_count());
        paths
            .iter()
            .zip(output.offsets.iter().zip(&output.haralick))
            .zip(traces)
            .map(|((path, (offset, features)), trace)| Row {
                path: *path,
                offset: *offset,
                features: *features,
                trace: trace.to_vec(),
            })
            .collect()
    };
    let elapsed = start.elapsed();

    print_header();
    for row in &rows {
        print_row(row.path, row.offset, &row.features);
    }
    if trace {
        println!();
        for row in &rows {
            print_trace(row.path, &row.trace);
        }
    }
    println!(
        "\n{} of {} images processed in {:.2?}",
        rows.len(),
        inputs.len(),
        elapsed
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input, size } => run_info(&input, &size),
        Commands::Search {
            input,
            offsets,
            size,
        } => run_search(&input, &offsets, &size),
        Commands::Features {
            inputs,
            offsets,
            size,
            threads,
            keep_going,
            trace,
        } => run_features(&inputs, &offsets, &size, threads, keep_going, trace),
    }
}
