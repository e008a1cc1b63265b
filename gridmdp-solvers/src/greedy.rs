//! Greedy selection and distances between value functions.
use serde::{Deserialize, Serialize};

/// Index of the largest value, the lowest index among ties.
///
/// # Panics
///
/// Panics if `qs` is empty.
#[inline]
pub fn argmax(qs: &[f64]) -> usize {
    max_with_argmax(qs).0
}

/// The lowest index attaining the largest value, and that value.
///
/// # Panics
///
/// Panics if `qs` is empty.
pub fn max_with_argmax(qs: &[f64]) -> (usize, f64) {
    assert!(!qs.is_empty(), "argmax of an empty slice");
    let mut best = (0, qs[0]);
    for (i, &q) in qs.iter().enumerate().skip(1) {
        // strict comparison keeps the earliest maximum
        if q > best.1 {
            best = (i, q);
        }
    }
    best
}

/// Norm used to measure the change of a value function between iterations.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Norm {
    /// Sum of absolute differences.
    #[default]
    L1,

    /// Euclidean distance.
    L2,

    /// Largest absolute difference.
    Max,
}

impl Norm {
    /// Distance between two value functions of the same length.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match self {
            Norm::L1 => diffs.sum(),
            Norm::L2 => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Norm::Max => diffs.fold(0.0, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_ties_take_lowest_index() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(max_with_argmax(&[-2.0, -1.0, -1.0]), (1, -1.0));
    }

    #[test]
    fn test_norms() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 5.0, -1.0];
        assert_eq!(Norm::L1.distance(&a, &b), 7.0);
        assert_eq!(Norm::L2.distance(&a, &b), 5.0);
        assert_eq!(Norm::Max.distance(&a, &b), 4.0);
        assert_eq!(Norm::default(), Norm::L1);
    }
}
