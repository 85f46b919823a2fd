//! Wentworth grain-size classes.

use std::fmt;

/// Wentworth size class, ordered from finest to coarsest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SizeCategory {
    #[serde(rename = "Silt/Clay")]
    SiltClay,
    #[serde(rename = "Very Fine Sand")]
    VeryFineSand,
    #[serde(rename = "Fine Sand")]
    FineSand,
    #[serde(rename = "Medium Sand")]
    MediumSand,
    #[serde(rename = "Coarse Sand")]
    CoarseSand,
    #[serde(rename = "Very Coarse Sand")]
    VeryCoarseSand,
    #[serde(rename = "Gravel")]
    Gravel,
}

/// Exclusive lower bound (mm) of each class above Silt/Clay, coarsest first.
const LOWER_BOUNDS_MM: [(f64, SizeCategory); 6] = [
    (2.0, SizeCategory::Gravel),
    (1.0, SizeCategory::VeryCoarseSand),
    (0.5, SizeCategory::CoarseSand),
    (0.25, SizeCategory::MediumSand),
    (0.125, SizeCategory::FineSand),
    (0.0625, SizeCategory::VeryFineSand),
];

impl SizeCategory {
    /// All classes, coarsest first.
    pub const ALL: [SizeCategory; 7] = [
        SizeCategory::Gravel,
        SizeCategory::VeryCoarseSand,
        SizeCategory::CoarseSand,
        SizeCategory::MediumSand,
        SizeCategory::FineSand,
        SizeCategory::VeryFineSand,
        SizeCategory::SiltClay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::SiltClay => "Silt/Clay",
            SizeCategory::VeryFineSand => "Very Fine Sand",
            SizeCategory::FineSand => "Fine Sand",
            SizeCategory::MediumSand => "Medium Sand",
            SizeCategory::CoarseSand => "Coarse Sand",
            SizeCategory::VeryCoarseSand => "Very Coarse Sand",
            SizeCategory::Gravel => "Gravel",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify one diameter (mm).
///
/// Comparisons are strict, so a diameter equal to a class boundary falls in
/// the finer class. Total: NaN and negative values land in Silt/Clay.
pub fn classify_wentworth(diameter_mm: f64) -> SizeCategory {
    LOWER_BOUNDS_MM
        .iter()
        .find(|(bound, _)| diameter_mm > *bound)
        .map_or(SizeCategory::SiltClay, |&(_, category)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_fall_to_the_finer_class() {
        let cases = [
            (2.0, SizeCategory::VeryCoarseSand),
            (1.0, SizeCategory::CoarseSand),
            (0.5, SizeCategory::MediumSand),
            (0.25, SizeCategory::FineSand),
            (0.125, SizeCategory::VeryFineSand),
            (0.0625, SizeCategory::SiltClay),
        ];
        for (d, expected) in cases {
            assert_eq!(classify_wentworth(d), expected, "d = {d}");
        }
    }

    #[test]
    fn interior_values() {
        assert_eq!(classify_wentworth(3.5), SizeCategory::Gravel);
        assert_eq!(classify_wentworth(1.5), SizeCategory::VeryCoarseSand);
        assert_eq!(classify_wentworth(0.3), SizeCategory::MediumSand);
        assert_eq!(classify_wentworth(0.01), SizeCategory::SiltClay);
        assert_eq!(classify_wentworth(f64::NAN), SizeCategory::SiltClay);
        assert_eq!(classify_wentworth(f64::INFINITY), SizeCategory::Gravel);
    }

    #[test]
    fn ordering_and_labels() {
        assert!(SizeCategory::Gravel > SizeCategory::CoarseSand);
        assert!(SizeCategory::SiltClay < SizeCategory::VeryFineSand);
        let json = serde_json::to_string(&SizeCategory::VeryFineSand).unwrap();
        assert_eq!(json, "\"Very Fine Sand\"");
        for c in SizeCategory::ALL {
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{}\"", c.label()));
        }
    }
}
