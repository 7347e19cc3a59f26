use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::{debug, info};

use visdiff::batch::{self, PairKind};
use visdiff::report::DiffReport;
use visdiff::report::html;
use visdiff::{DiffConfig, Result};

#[derive(Parser)]
#[command(name = "visdiff", version)]
#[command(about = "Shift-aware visual diff for image pairs and directories")]
struct Cli {
    /// Baseline image, or directory with --recursive
    left: PathBuf,

    /// Candidate image, or directory with --recursive
    right: PathBuf,

    /// Treat the inputs as directories and pair PNG files by relative path
    #[arg(short, long)]
    recursive: bool,

    /// HTML report output path
    #[arg(short, long, default_value = "diff.html")]
    output: PathBuf,

    /// Also write a JSON summary to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Replace the built-in report stylesheet with this CSS file
    #[arg(long)]
    css: Option<PathBuf>,

    /// Write annotated copies of differing images into this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Per-channel tolerance; pixels differ when any channel delta exceeds it
    #[arg(short, long, default_value = "0")]
    threshold: u8,

    /// Number of clusters used to group differing pixels into rectangles
    #[arg(long, default_value = "4")]
    clusters: usize,

    /// Padding in pixels around clustered difference rectangles
    #[arg(long, default_value = "20")]
    padding: u32,

    /// Align shifted content structurally instead of comparing pixel by pixel
    #[arg(short = 'a', long)]
    shift_aware: bool,

    /// Suppress one-sided bands of uniform color (inserted spacing)
    #[arg(long)]
    ignore_spacing: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = DiffConfig {
        threshold: cli.threshold,
        shift_aware: cli.shift_aware,
        ignore_spacing: cli.ignore_spacing,
        clusters: cli.clusters,
        padding: cli.padding,
    };
    debug!(
        "comparing {} against {} with {config:?}",
        cli.left.display(),
        cli.right.display()
    );

    let pairs = if cli.recursive {
        batch::pair_directories(&cli.left, &cli.right)?
    } else {
        batch::pair_files(&cli.left, &cli.right)?
    };
    info!("matched {} pair(s)", pairs.len());

    let diffs = batch::compare_pairs(&pairs, &config, cli.debug_dir.as_deref())?;
    for (name, diff) in &diffs {
        info!("{name}: {}", diff.kind.label());
    }

    let css = match &cli.css {
        Some(path) => fs::read_to_string(path)?,
        None => html::DEFAULT_CSS.to_string(),
    };
    html::write(&cli.output, &diffs, &css)?;
    if let Some(path) = &cli.json {
        fs::write(path, DiffReport::from(&diffs).to_json()?)?;
    }

    let changed = diffs
        .values()
        .filter(|diff| diff.kind != PairKind::Unchanged)
        .count();
    info!(
        "{changed} of {} pair(s) changed; report written to {}",
        diffs.len(),
        cli.output.display()
    );
    Ok(())
}
