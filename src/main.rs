use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use tessera::mosaic::{compose_ordered, compose_spatial, load_reference_tiles, luma_key};
use tessera::{IndexKind, KdTree, MosaicConfig, RbTree};

/// RGB descriptors carry one coordinate per channel.
const COLOR_DIM: usize = 3;

#[derive(Debug, Parser)]
#[command(name = "tessera", about = "Photomosaic builder backed by nearest-color indexes")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, default_value = "tessera.toml")]
    config: PathBuf,

    /// Target image to recreate as a mosaic.
    #[arg(long)]
    target: Option<PathBuf>,

    /// Directory of reference images, searched recursively.
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Where to write the finished mosaic.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Side length in pixels of each mosaic tile.
    #[arg(long)]
    tile_size: Option<u32>,

    /// Index flavor: "spatial" (kd-tree) or "ordered" (red-black tree).
    #[arg(long)]
    index: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = MosaicConfig::load_from_file(&cli.config)
        .with_context(|| format!("loading configuration from '{}'", cli.config.display()))?;
    if let Some(target) = cli.target {
        config.target_image = target;
    }
    if let Some(reference_dir) = cli.reference_dir {
        config.reference_dir = reference_dir;
    }
    if let Some(output) = cli.output {
        config.output_image = output;
    }
    if let Some(tile_size) = cli.tile_size {
        config.tile_size = tile_size;
    }
    if let Some(index) = cli.index.as_deref() {
        config.index = match index {
            "spatial" => IndexKind::Spatial,
            "ordered" => IndexKind::Ordered,
            other => bail!("unknown index kind '{}', expected 'spatial' or 'ordered'", other),
        };
    }
    config.validate()?;

    let started = Instant::now();
    let target = image::open(&config.target_image)
        .with_context(|| format!("opening target image '{}'", config.target_image.display()))?
        .to_rgb8();
    let records = load_reference_tiles(&config.reference_dir, config.max_references)
        .with_context(|| format!("ingesting references from '{}'", config.reference_dir.display()))?;
    info!("loaded {} reference tiles from '{}'", records.len(), config.reference_dir.display());

    let mosaic = match config.index {
        IndexKind::Spatial => {
            let index = KdTree::build(records, COLOR_DIM)?;
            info!("spatial index built over {} records", index.len());
            compose_spatial(&target, &index, config.tile_size)?
        }
        IndexKind::Ordered => {
            let mut index = RbTree::new();
            for record in records {
                let mean = [record.descriptor[0], record.descriptor[1], record.descriptor[2]];
                index.insert(luma_key(&mean), record.payload);
            }
            info!("ordered index built over {} records", index.len());
            compose_ordered(&target, &index, config.tile_size)?
        }
    };

    mosaic
        .save(&config.output_image)
        .with_context(|| format!("writing mosaic to '{}'", config.output_image.display()))?;
    info!("mosaic written to '{}' in {:.2?}", config.output_image.display(), started.elapsed());
    Ok(())
}
