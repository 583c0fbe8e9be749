use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use quilt::atlas::AtlasBuilder;
use quilt::cli::{AllocatorKind, CliArgs, Command, CompressionLevel, PackArgs, PackingHeuristic};
use quilt::config::{CompressConfig, LoadedConfig};
use quilt::output::{atlas_png_filename, save_atlas_image, write_json};
use quilt::sprite::load_sprites;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Logger may not be initialized yet (e.g. config loading failed)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match &cli.command {
        Command::Pack(args) => pack(args),
    }
}

fn pack(args: &PackArgs) -> Result<()> {
    let merged = merge_config_with_args(args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Quilt atlas builder v{}", env!("CARGO_PKG_VERSION"));

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output).with_context(|| {
            format!("failed to create output dir: {}", merged.output.display())
        })?;
    }

    let sprites = load_sprites(&merged.input, merged.base_dir.as_deref())?;
    info!("Loaded {} sprites", sprites.len());

    let outcome = AtlasBuilder::new(merged.size)
        .allocator(merged.allocator)
        .heuristic(merged.heuristic)
        .build(sprites)?;

    if outcome.atlas.is_empty() {
        bail!(
            "none of the {} sprites fit into a {}x{} atlas",
            outcome.skipped.len(),
            merged.size,
            merged.size
        );
    }
    if !outcome.skipped.is_empty() {
        warn!(
            "{} sprite(s) did not fit and were left out",
            outcome.skipped.len()
        );
    }

    let png_path = merged.output.join(atlas_png_filename(&merged.name));
    save_atlas_image(&outcome.atlas, &png_path, merged.opaque, merged.compress)?;
    info!("Saved {}", png_path.display());

    write_json(&outcome.atlas, &merged.output, &merged.name)?;
    info!("Generated {}.json", merged.name);

    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    /// Directory that individual input files are named relative to
    base_dir: Option<PathBuf>,
    output: PathBuf,
    name: String,
    size: u32,
    allocator: AllocatorKind,
    heuristic: PackingHeuristic,
    opaque: bool,
    compress: Option<CompressionLevel>,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<MergedConfig> {
    let loaded_config = args
        .config
        .as_deref()
        .map(|path| {
            LoadedConfig::load(path)
                .with_context(|| format!("failed to load config: {}", path.display()))
        })
        .transpose()?;

    let (input, base_dir) = if !args.input.is_empty() {
        (args.input.clone(), None)
    } else if let Some(ref lc) = loaded_config {
        let inputs = lc
            .resolve_inputs()
            .context("failed to resolve input files from config")?;
        (inputs, Some(lc.config_dir.clone()))
    } else {
        // clap's required_unless_present rules this out
        (Vec::new(), None)
    };

    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_output_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    let size = args.size.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.size)
            .unwrap_or(1024)
    });

    let allocator = match (args.allocator, &loaded_config) {
        (Some(a), _) => a,
        (None, Some(lc)) => lc
            .config
            .allocator
            .parse::<AllocatorKind>()
            .map_err(|e: String| anyhow::anyhow!("{} in config file", e))?,
        (None, None) => AllocatorKind::MaxRects,
    };

    let heuristic = match (args.heuristic, &loaded_config) {
        (Some(h), _) => h,
        (None, Some(lc)) => lc
            .config
            .heuristic
            .parse::<PackingHeuristic>()
            .map_err(|e: String| anyhow::anyhow!("{} in config file", e))?,
        (None, None) => PackingHeuristic::BestShortSideFit,
    };

    let opaque = args.opaque || loaded_config.as_ref().is_some_and(|lc| lc.config.opaque);

    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config
            .compress
            .as_ref()
            .map(|c| match c {
                CompressConfig::Level(n) => n.to_string().parse::<CompressionLevel>(),
                CompressConfig::Max(s) => s.parse::<CompressionLevel>(),
            })
            .transpose()
            .map_err(|e: String| anyhow::anyhow!("{} in config file", e))?
    } else {
        None
    };

    Ok(MergedConfig {
        input,
        base_dir,
        output,
        name,
        size,
        allocator,
        heuristic,
        opaque,
        compress,
        verbose: args.verbose,
    })
}
