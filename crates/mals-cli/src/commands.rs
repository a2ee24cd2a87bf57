use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use mals_archive::{ArchiveCodec, ZstdSarcCodec};
use mals_changelog::Baseline;
use mals_locate::{DiskFileStore, FileStore, Locator};
use mals_merge::{Merger, MALS_FOLDER};
use mals_types::MergeConfig;
use tracing::{info, warn};

use crate::cli::Cli;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let inputs = cli.input_paths();
    if inputs.is_empty() {
        bail!("no input folders given");
    }

    let store: Arc<dyn FileStore> = Arc::new(DiskFileStore::new());
    let locator = Locator::new(store);
    let config = infer_version(resolve_config(&cli)?, &locator)?;
    let codec = build_codec(&config)?;
    info!(
        game_path = %config.game_path.display(),
        version = ?config.version,
        inputs = inputs.len(),
        "starting merge"
    );

    let baseline = Baseline::new(config, locator, codec);
    let merger = Merger::new(&inputs, &cli.output, cli.localization.as_deref(), baseline)
        .context("failed to read inputs")?;

    let written = if cli.changelogs {
        merger
            .generate_changelogs(cli.pretty)
            .context("failed to export changelogs")?
    } else {
        merger.merge().context("failed to build merged archives")?
    };

    for path in &written {
        println!("@{}", path.display());
    }
    eprintln!(
        "{} Wrote {} file(s) to {}",
        "✓".green().bold(),
        written.len().to_string().bold(),
        cli.output.display().to_string().yellow()
    );
    Ok(())
}

/// Defaults, overlaid by the config file, overlaid by CLI flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<MergeConfig> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MergeConfig::default(),
    };

    if let Some(game_path) = &cli.game_path {
        config.game_path = game_path.clone();
    }
    if let Some(version) = cli.game_version {
        config.version = Some(version);
    }
    if let Some(dictionary) = &cli.dictionary {
        config.zstd_dictionary = Some(dictionary.clone());
    }
    Ok(config)
}

/// Fill in the target version from the newest vanilla archive when unset.
fn infer_version(mut config: MergeConfig, locator: &Locator) -> anyhow::Result<MergeConfig> {
    if config.version.is_some() {
        return Ok(config);
    }

    let mals = config.game_path.join(MALS_FOLDER);
    config.version = locator
        .highest_version(&mals, "sarc.zs")
        .with_context(|| format!("failed to scan {}", mals.display()))?;
    match config.version {
        Some(version) => info!(version, "inferred game version"),
        None => warn!(
            folder = %mals.display(),
            "no versioned archives found, game version unknown"
        ),
    }
    Ok(config)
}

fn build_codec(config: &MergeConfig) -> anyhow::Result<Arc<dyn ArchiveCodec>> {
    let codec = ZstdSarcCodec::new(config.compression_level);
    let codec = match &config.zstd_dictionary {
        Some(path) => {
            let dictionary = std::fs::read(path)
                .with_context(|| format!("failed to read zstd dictionary {}", path.display()))?;
            codec.with_dictionary(dictionary)
        }
        None => codec,
    };
    Ok(Arc::new(codec))
}
