// src/core/vector/similarity.rs

use crate::core::common::TesseraError;

/// Calculates the Euclidean distance between two descriptors.
///
/// # Errors
///
/// Returns `TesseraError::DimensionMismatch` if the descriptors have
/// different lengths.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, TesseraError> {
    if a.len() != b.len() {
        return Err(TesseraError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }
    Ok(euclidean_distance_unchecked(a, b))
}

/// Euclidean distance without the length check, for index internals that have
/// already validated dimensions at the build/query boundary.
pub(crate) fn euclidean_distance_unchecked(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_along_one_axis() {
        let a = [0.0, 0.0, 0.0];
        let b = [0.0, 5.0, 0.0];
        assert_relative_eq!(euclidean_distance(&a, &b).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 6.0, 3.0];
        let forward = euclidean_distance(&a, &b).unwrap();
        let backward = euclidean_distance(&b, &a).unwrap();
        assert_relative_eq!(forward, backward, epsilon = 1e-12);
        assert_relative_eq!(forward, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn distance_of_identical_descriptors_is_zero() {
        let a = [10.0, 20.0, 30.0];
        assert_relative_eq!(euclidean_distance(&a, &a).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let a = [1.0, 2.0];
        let b = [1.0, 2.0, 3.0];
        match euclidean_distance(&a, &b) {
            Err(TesseraError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected DimensionMismatch, got {:?}", other),
        }
    }
}
