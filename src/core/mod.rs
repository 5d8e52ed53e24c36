pub mod common;
pub mod config;
pub mod indexing;
pub mod vector;

pub use self::config::MosaicConfig;
