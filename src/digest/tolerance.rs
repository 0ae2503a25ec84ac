use std::fmt;

use serde::{Deserialize, Serialize};

/// Acceptance policy for digestion candidates.
///
/// A candidate is accepted when `min_length <= length < max_length` and
/// `missed_cleavages < max_missed_cleavages`. Both upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestTolerance {
    min_length: usize,
    max_length: usize,
    max_missed_cleavages: usize,
}

impl Default for DigestTolerance {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 31,
            max_missed_cleavages: 4,
        }
    }
}

impl DigestTolerance {
    /// Create a tolerance with exclusive upper bounds.
    pub fn new(min_length: usize, max_length: usize, max_missed_cleavages: usize) -> Self {
        Self {
            min_length,
            max_length,
            max_missed_cleavages,
        }
    }

    /// Create a tolerance from inclusive upper bounds, as written in config files.
    pub fn from_inclusive(
        min_length: usize,
        max_length: usize,
        max_missed_cleavages: usize,
    ) -> Self {
        Self::new(min_length, max_length + 1, max_missed_cleavages + 1)
    }

    /// Shortest accepted length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Exclusive length bound.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Exclusive missed-cleavage bound.
    pub fn max_missed_cleavages(&self) -> usize {
        self.max_missed_cleavages
    }

    /// Shorter than the minimum length.
    #[inline]
    pub fn too_small(&self, length: usize) -> bool {
        length < self.min_length
    }

    /// No extension of this candidate can be accepted.
    #[inline]
    pub fn too_large(&self, length: usize, missed_cleavages: usize) -> bool {
        !(length < self.max_length && missed_cleavages < self.max_missed_cleavages)
    }

    /// Accepted by this tolerance.
    #[inline]
    pub fn within(&self, length: usize, missed_cleavages: usize) -> bool {
        !self.too_small(length) && !self.too_large(length, missed_cleavages)
    }
}

impl fmt::Display for DigestTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Length:[{}-{}), NMC:[0-{})",
            self.min_length, self.max_length, self.max_missed_cleavages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let tolerance = DigestTolerance::default();
        assert!(tolerance.too_small(5));
        assert!(tolerance.within(6, 0));
        assert!(tolerance.within(30, 3));
        assert!(tolerance.too_large(31, 0));
        assert!(tolerance.too_large(10, 4));
        assert_eq!(tolerance.to_string(), "Length:[6-31), NMC:[0-4)");
    }

    #[test]
    fn test_inclusive_constructor() {
        assert_eq!(DigestTolerance::from_inclusive(6, 30, 3), DigestTolerance::default());
    }

    #[test]
    fn test_too_small_is_not_too_large() {
        let tolerance = DigestTolerance::new(4, 8, 2);
        assert!(!tolerance.within(2, 0));
        assert!(!tolerance.too_large(2, 0));
    }
}
