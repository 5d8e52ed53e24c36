//! Per-tile composition loop: query the index for each tile of the target,
//! paste a resized copy of the answer into the mosaic canvas.

use crate::core::common::TesseraError;
use crate::core::indexing::{KdTree, RbTree};
use crate::mosaic::tiles::{luma_key, mean_rgb_region};
use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;
use rayon::prelude::*;

/// Builds a mosaic of `target` using the spatial (kd-tree) index.
///
/// # Errors
///
/// Propagates index query failures and rejects a zero `tile_size`.
pub fn compose_spatial(
    target: &RgbImage,
    index: &KdTree<RgbImage>,
    tile_size: u32,
) -> Result<RgbImage, TesseraError> {
    compose_tiles(target, tile_size, |mean| index.query(&mean))
}

/// Builds a mosaic of `target` using the ordered (red-black tree) index.
///
/// Each tile's mean color is collapsed to its luma key before the lookup,
/// matching how references were keyed on insert.
///
/// # Errors
///
/// Propagates index query failures and rejects a zero `tile_size`.
pub fn compose_ordered(
    target: &RgbImage,
    index: &RbTree<RgbImage>,
    tile_size: u32,
) -> Result<RgbImage, TesseraError> {
    compose_tiles(target, tile_size, |mean| index.find_closest(luma_key(&mean)))
}

/// Shared tile loop. `lookup` answers a tile's mean color with a reference
/// image borrowed from the index.
///
/// Queries are read-only, so tiles resolve in parallel; each returned payload
/// is cloned by the resize before any pixel of it is written, so the index is
/// never aliased mutably. Pasting into the canvas happens sequentially after
/// the parallel phase.
fn compose_tiles<'a, F>(
    target: &RgbImage,
    tile_size: u32,
    lookup: F,
) -> Result<RgbImage, TesseraError>
where
    F: Fn([f64; 3]) -> Result<&'a RgbImage, TesseraError> + Sync,
{
    if tile_size == 0 {
        return Err(TesseraError::Configuration("tile_size must be greater than 0".to_string()));
    }
    let (width, height) = target.dimensions();
    let origins: Vec<(u32, u32)> = (0..height)
        .step_by(tile_size as usize)
        .flat_map(|y| (0..width).step_by(tile_size as usize).map(move |x| (x, y)))
        .collect();
    debug!("composing {} tiles of {}px over {}x{}", origins.len(), tile_size, width, height);

    let resolved: Vec<(u32, u32, RgbImage)> = origins
        .par_iter()
        .map(|&(x, y)| {
            // Edge tiles are clamped to the canvas instead of running past it.
            let tile_width = tile_size.min(width - x);
            let tile_height = tile_size.min(height - y);
            let mean = mean_rgb_region(target, x, y, tile_width, tile_height);
            let reference = lookup(mean)?;
            let resized = imageops::resize(reference, tile_width, tile_height, FilterType::Triangle);
            Ok((x, y, resized))
        })
        .collect::<Result<_, TesseraError>>()?;

    let mut mosaic = RgbImage::new(width, height);
    for (x, y, tile) in resolved {
        imageops::replace(&mut mosaic, &tile, i64::from(x), i64::from(y));
    }
    Ok(mosaic)
}
