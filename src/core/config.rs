// src/core/config.rs

use crate::core::common::TesseraError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which nearest-color index backs the mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Multi-dimensional kd-tree over RGB descriptors.
    Spatial,
    /// Red-black tree over a scalar luma projection.
    Ordered,
}

/// Configuration for a mosaic run.
///
/// Loaded from a TOML file; every field falls back to its default when
/// absent, so a partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MosaicConfig {
    /// Image the mosaic recreates.
    pub target_image: PathBuf,
    /// Directory holding the reference images, searched recursively.
    pub reference_dir: PathBuf,
    /// Where the finished mosaic is written.
    pub output_image: PathBuf,
    /// Side length in pixels of each mosaic tile.
    pub tile_size: u32,
    /// Upper bound on how many reference images are ingested.
    pub max_references: usize,
    /// Index flavor answering the per-tile lookups.
    pub index: IndexKind,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            target_image: PathBuf::from("target.jpg"),
            reference_dir: PathBuf::from("reference"),
            output_image: PathBuf::from("mosaic.png"),
            tile_size: 10,
            max_references: 10_000,
            index: IndexKind::Spatial,
        }
    }
}

impl MosaicConfig {
    /// Creates a new `MosaicConfigBuilder` for fluent configuration.
    #[must_use]
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::Configuration` for out-of-range values.
    pub fn validate(&self) -> Result<(), TesseraError> {
        if self.tile_size == 0 {
            return Err(TesseraError::Configuration(
                "tile_size must be greater than 0".to_string(),
            ));
        }
        if self.max_references == 0 {
            return Err(TesseraError::Configuration(
                "max_references must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or unparsable file
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::Configuration` if parsing or validation fails,
    /// `TesseraError::Io` for any other read failure.
    pub fn load_from_file(path: &Path) -> Result<Self, TesseraError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    TesseraError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TesseraError::Io(e)),
        }
    }
}

/// Builder for `MosaicConfig`.
#[derive(Debug, Clone, Default)]
pub struct MosaicConfigBuilder {
    target_image: Option<PathBuf>,
    reference_dir: Option<PathBuf>,
    output_image: Option<PathBuf>,
    tile_size: Option<u32>,
    max_references: Option<usize>,
    index: Option<IndexKind>,
}

impl MosaicConfigBuilder {
    /// Sets the target image path.
    pub fn target_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.target_image = Some(path.into());
        self
    }

    /// Sets the reference image directory.
    pub fn reference_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.reference_dir = Some(path.into());
        self
    }

    /// Sets the output image path.
    pub fn output_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_image = Some(path.into());
        self
    }

    /// Sets the tile side length in pixels.
    pub fn tile_size(mut self, size: u32) -> Self {
        self.tile_size = Some(size);
        self
    }

    /// Sets the reference ingest limit.
    pub fn max_references(mut self, limit: usize) -> Self {
        self.max_references = Some(limit);
        self
    }

    /// Sets the index flavor.
    pub fn index(mut self, kind: IndexKind) -> Self {
        self.index = Some(kind);
        self
    }

    /// Builds the `MosaicConfig` instance with validation.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::Configuration` for out-of-range values.
    pub fn build(self) -> Result<MosaicConfig, TesseraError> {
        let defaults = MosaicConfig::default();
        let config = MosaicConfig {
            target_image: self.target_image.unwrap_or(defaults.target_image),
            reference_dir: self.reference_dir.unwrap_or(defaults.reference_dir),
            output_image: self.output_image.unwrap_or(defaults.output_image),
            tile_size: self.tile_size.unwrap_or(defaults.tile_size),
            max_references: self.max_references.unwrap_or(defaults.max_references),
            index: self.index.unwrap_or(defaults.index),
        };
        config.validate()?;
        Ok(config)
    }
}
