//! Squared-L2 distance and the distance-to-confidence transform

use crate::vector::Vector;

/// Compute squared Euclidean (L2) distance between two vectors.
///
/// Squared, not rooted: the k-NN ranking is identical and this matches the
/// distances a flat L2 index reports. Callers must have checked dimensions;
/// mismatched slices would silently truncate the zip.
pub fn squared_euclidean(v1: &Vector, v2: &Vector) -> f32 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f32>()
}

/// Map a squared-L2 distance onto a `[0, 1]` confidence score.
///
/// `confidence = max(0, 1 - distance / normalization_factor)`. With the
/// default factor of 2.0 this is calibrated for unit-normalized vectors,
/// whose maximum possible squared distance is 2.0. Unnormalized input
/// still yields a clamped score, just not a calibrated one.
pub fn confidence(distance: f32, normalization_factor: f32) -> f32 {
    (1.0 - distance / normalization_factor).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_squared_euclidean() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0]);
        let v2 = Vector::new(vec![4.0, 5.0, 6.0]);
        assert_relative_eq!(squared_euclidean(&v1, &v2), 27.0, epsilon = 1e-5);
    }

    #[test]
    fn test_squared_euclidean_same_vector() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(squared_euclidean(&v, &v), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_confidence_zero_distance() {
        assert_relative_eq!(confidence(0.0, 2.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_confidence_at_factor() {
        assert_relative_eq!(confidence(2.0, 2.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_confidence_beyond_factor() {
        assert_relative_eq!(confidence(5.0, 2.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_confidence_midpoint() {
        assert_relative_eq!(confidence(1.0, 2.0), 0.5, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn confidence_is_bounded(d in 0.0f32..1e6, factor in 0.1f32..100.0) {
            let c = confidence(d, factor);
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn confidence_is_monotonic(d in 0.0f32..100.0, delta in 0.0f32..100.0) {
            prop_assert!(confidence(d + delta, 2.0) <= confidence(d, 2.0));
        }
    }
}
