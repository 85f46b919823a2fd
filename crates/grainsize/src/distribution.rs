//! Per-class percentages and summary statistics of grain diameters.

use std::collections::BTreeMap;

use crate::classify::{classify_wentworth, SizeCategory};

/// Percentage of grains per Wentworth class.
///
/// For a non-empty input every class is present (zero-count classes at 0.0)
/// and the values sum to 100. An empty input gives an empty map.
pub fn size_distribution(diameters_mm: &[f64]) -> BTreeMap<SizeCategory, f64> {
    if diameters_mm.is_empty() {
        return BTreeMap::new();
    }
    let mut counts: BTreeMap<SizeCategory, usize> =
        SizeCategory::ALL.iter().map(|&c| (c, 0)).collect();
    for &d in diameters_mm {
        *counts.entry(classify_wentworth(d)).or_insert(0) += 1;
    }
    let total = diameters_mm.len() as f64;
    counts
        .into_iter()
        .map(|(category, count)| (category, count as f64 / total * 100.0))
        .collect()
}

/// Mean and population standard deviation of a diameter list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiameterStats {
    pub mean_mm: f64,
    pub std_mm: f64,
}

impl DiameterStats {
    /// `None` for an empty list.
    pub fn from_diameters(diameters_mm: &[f64]) -> Option<Self> {
        if diameters_mm.is_empty() {
            return None;
        }
        let n = diameters_mm.len() as f64;
        let mean_mm = diameters_mm.iter().sum::<f64>() / n;
        let var = diameters_mm.iter().map(|d| (d - mean_mm).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean_mm,
            std_mm: var.sqrt(),
        })
    }

    /// Wentworth class of the mean diameter.
    pub fn classification(&self) -> SizeCategory {
        classify_wentworth(self.mean_mm)
    }
}
