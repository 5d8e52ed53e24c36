pub mod error;
pub mod types;

pub use error::TesseraError;
pub use types::{Descriptor, Record};
