use std::fmt;

/// Padding added to both sides of an index interval to absorb float rounding.
pub const INTERVAL_THRESHOLD: f64 = 0.001;

/// Precursor matching tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchTolerance {
    /// Absolute window of ± this many mass units.
    Mass(f64),
    /// Relative window in parts per million.
    Ppm(f64),
}

impl Default for SearchTolerance {
    fn default() -> Self {
        SearchTolerance::Ppm(250.0)
    }
}

impl fmt::Display for SearchTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTolerance::Mass(tolerance) => write!(f, "±{tolerance} m/z"),
            SearchTolerance::Ppm(ppm) => write!(f, "{ppm} ppm"),
        }
    }
}

/// Half-open Mh window `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassRange {
    lower: f64,
    upper: f64,
}

impl MassRange {
    /// Window between two masses.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Window of `mh ± tolerance`.
    pub fn from_tolerance(mh: f64, tolerance: f64) -> Self {
        Self::new(mh - tolerance, mh + tolerance)
    }

    /// Window of `mh` widened by `ppm` parts per million.
    ///
    /// Bounds are `mh / (1 + ppm·1e-6)` and `mh / (1 − ppm·1e-6)`.
    pub fn from_ppm(mh: f64, ppm: f64) -> Self {
        let relative = ppm / 1_000_000.0;
        Self::new(mh / (1.0 + relative), mh / (1.0 - relative))
    }

    /// Window around `mh` for a search tolerance.
    pub fn around(mh: f64, tolerance: SearchTolerance) -> Self {
        match tolerance {
            SearchTolerance::Mass(window) => Self::from_tolerance(mh, window),
            SearchTolerance::Ppm(ppm) => Self::from_ppm(mh, ppm),
        }
    }

    /// Lower bound (inclusive).
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound (exclusive).
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Whether `mh` lies in `[lower, upper)`.
    #[inline]
    pub fn contains(&self, mh: f64) -> bool {
        mh >= self.lower && mh < self.upper
    }

    /// Remove negative masses: a window entirely below zero becomes `[0, 0)`,
    /// one straddling zero becomes `[0, upper)`.
    pub fn clamped(self) -> Self {
        if self.upper < 0.0 {
            Self::new(0.0, 0.0)
        } else if self.lower < 0.0 {
            Self::new(0.0, self.upper)
        } else {
            self
        }
    }

    /// Padded bounds used to query the index.
    pub fn to_box(&self) -> (f64, f64) {
        (self.lower - INTERVAL_THRESHOLD, self.upper + INTERVAL_THRESHOLD)
    }
}

impl fmt::Display for MassRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.5}-{:.5})", self.lower, self.upper)
    }
}
