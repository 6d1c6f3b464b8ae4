//! Numeric lower bound on the score field.

use std::fmt;

/// Minimum score a ranking record must reach to be kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub minimum: f64,
}

impl Threshold {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }

    /// `value >= minimum`. NaN is never admitted.
    ///
    /// ```
    /// use tabjson_transform::Threshold;
    ///
    /// let threshold = Threshold::new(120.0);
    /// assert!(threshold.admits(120.0));
    /// assert!(!threshold.admits(119.5));
    /// assert!(!threshold.admits(f64::NAN));
    /// ```
    pub fn admits(&self, value: f64) -> bool {
        value >= self.minimum
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", tabjson_model::format_numeric(self.minimum))
    }
}
