use std::fmt;

/// Crate-wide error type.
///
/// Implemented by hand (explicit `Display`, `Error` and `From` impls) rather
/// than derived, so every variant's rendering stays in one place.
#[derive(Debug)]
pub enum TesseraError {
    /// Underlying filesystem failure while reading references or writing output.
    Io(std::io::Error),
    /// Decode/encode failure from the image backend.
    Image(image::ImageError),
    /// Invalid or unparsable configuration.
    Configuration(String),
    /// A query was issued against an index containing no records.
    EmptyIndex,
    /// A descriptor's length disagreed with the index dimensionality.
    DimensionMismatch { expected: usize, actual: usize },
    /// Index-internal failure that does not fit a more specific variant.
    Index(String),
}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Image(e) => write!(f, "Image Error: {}", e),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::EmptyIndex => write!(f, "Index is empty: no candidate record exists"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "Descriptor dimension mismatch: expected {}, got {}", expected, actual)
            }
            Self::Index(s) => write!(f, "Index Error: {}", s),
        }
    }
}

impl std::error::Error for TesseraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for TesseraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for TesseraError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_dimensions() {
        let err = TesseraError::DimensionMismatch { expected: 3, actual: 4 };
        let rendered = err.to_string();
        assert!(rendered.contains("expected 3"));
        assert!(rendered.contains("got 4"));
    }

    #[test]
    fn io_error_converts_and_sources() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TesseraError = io_err.into();
        assert!(matches!(err, TesseraError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn empty_index_has_no_source() {
        assert!(std::error::Error::source(&TesseraError::EmptyIndex).is_none());
    }
}
