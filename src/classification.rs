//! Threshold classification
//!
//! A classification table is an ordered list of bands. Lookup returns the
//! label of the first band whose upper bound is strictly greater than the
//! value; the last band is open-ended.

use crate::types::Sex;

/// One band of a classification table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive upper bound of the band
    pub upper_bound: f64,
    pub label: &'static str,
}

const fn band(upper_bound: f64, label: &'static str) -> Band {
    Band { upper_bound, label }
}

/// Ordered sequence of `(upper_bound, label)` bands for one cohort
#[derive(Debug, Clone, Copy)]
pub struct ClassificationTable {
    bands: &'static [Band],
}

impl ClassificationTable {
    pub const fn new(bands: &'static [Band]) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &'static [Band] {
        self.bands
    }

    /// Classify a value against the table
    pub fn classify(&self, value: f64) -> &'static str {
        self.bands
            .iter()
            .find(|b| value < b.upper_bound)
            .or_else(|| self.bands.last())
            .map(|b| b.label)
            .unwrap_or("unclassified")
    }
}

/// Generic adult BMI bands (not age- or sex-adjusted)
pub const BMI: ClassificationTable = ClassificationTable::new(&[
    band(18.5, "underweight"),
    band(24.0, "normal"),
    band(28.0, "overweight"),
    band(f64::INFINITY, "obese"),
]);

/// Body fat bands for men (percent)
pub const BODY_FAT_MALE: ClassificationTable = ClassificationTable::new(&[
    band(6.0, "too_low"),
    band(14.0, "athletic"),
    band(18.0, "healthy"),
    band(25.0, "acceptable"),
    band(f64::INFINITY, "obese"),
]);

/// Body fat bands for women (percent)
pub const BODY_FAT_FEMALE: ClassificationTable = ClassificationTable::new(&[
    band(16.0, "too_low"),
    band(20.0, "athletic"),
    band(25.0, "healthy"),
    band(32.0, "acceptable"),
    band(f64::INFINITY, "obese"),
]);

pub fn body_fat_table(sex: Sex) -> ClassificationTable {
    match sex {
        Sex::Male => BODY_FAT_MALE,
        Sex::Female => BODY_FAT_FEMALE,
    }
}
