//! Reference ingest: directory traversal, mean-color descriptors and the
//! scalar key used by the ordered index.

use crate::core::common::{Record, TesseraError};
use image::RgbImage;
use log::warn;
use std::fs;
use std::path::Path;

/// Mean RGB channels of an image, each in `[0, 255]`.
#[must_use]
pub fn mean_rgb(image: &RgbImage) -> [f64; 3] {
    let pixel_count = f64::from(image.width()) * f64::from(image.height());
    if pixel_count == 0.0 {
        return [0.0; 3];
    }
    let mut sums = [0.0f64; 3];
    for pixel in image.pixels() {
        sums[0] += f64::from(pixel[0]);
        sums[1] += f64::from(pixel[1]);
        sums[2] += f64::from(pixel[2]);
    }
    [sums[0] / pixel_count, sums[1] / pixel_count, sums[2] / pixel_count]
}

/// Mean RGB channels of the region starting at (`x`, `y`), clamped to the
/// image bounds.
#[must_use]
pub fn mean_rgb_region(image: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> [f64; 3] {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());
    if x >= x_end || y >= y_end {
        return [0.0; 3];
    }
    let mut sums = [0.0f64; 3];
    for py in y..y_end {
        for px in x..x_end {
            let pixel = image.get_pixel(px, py);
            sums[0] += f64::from(pixel[0]);
            sums[1] += f64::from(pixel[1]);
            sums[2] += f64::from(pixel[2]);
        }
    }
    let pixel_count = f64::from(x_end - x) * f64::from(y_end - y);
    [sums[0] / pixel_count, sums[1] / pixel_count, sums[2] / pixel_count]
}

/// Scalar projection of a mean color, used as the ordered-index key.
///
/// The same weights apply on the insert and query sides so both ends of a
/// lookup live on the same scale.
#[must_use]
pub fn luma_key(rgb: &[f64; 3]) -> f64 {
    0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
}

/// Loads up to `limit` reference images from `dir`, searched recursively,
/// producing one record per decodable image keyed by its mean color.
///
/// Entries are visited in path order so repeated runs over the same folder
/// ingest the same set. Files the image backend cannot decode are skipped
/// with a warning rather than failing the whole ingest.
///
/// # Errors
///
/// Returns `TesseraError::Io` if a directory cannot be read.
pub fn load_reference_tiles(dir: &Path, limit: usize) -> Result<Vec<Record<RgbImage>>, TesseraError> {
    let mut records = Vec::new();
    collect_tiles(dir, limit, &mut records)?;
    Ok(records)
}

fn collect_tiles(
    dir: &Path,
    limit: usize,
    records: &mut Vec<Record<RgbImage>>,
) -> Result<(), TesseraError> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);
    for entry in entries {
        if records.len() >= limit {
            return Ok(());
        }
        let path = entry.path();
        if path.is_dir() {
            collect_tiles(&path, limit, records)?;
            continue;
        }
        match image::open(&path) {
            Ok(decoded) => {
                let reference = decoded.to_rgb8();
                if reference.width() == 0 || reference.height() == 0 {
                    continue;
                }
                let mean = mean_rgb(&reference);
                records.push(Record::new(mean.to_vec(), reference));
            }
            Err(err) => warn!("skipping unreadable reference '{}': {}", path.display(), err),
        }
    }
    Ok(())
}
