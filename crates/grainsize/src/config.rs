//! Combined analysis parameters.

use std::path::Path;

use crate::error::CatalogError;
use crate::reference::ReferenceDetectConfig;
use crate::segment::SegmentationConfig;

/// Every tunable of the analysis, grouped by stage.
///
/// Missing fields in a JSON file take their default values.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub reference: ReferenceDetectConfig,
    pub segmentation: SegmentationConfig,
}

impl AnalysisConfig {
    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "reference": {"aspect_tolerance_frac": 0.1},
            "segmentation": {"block_sizes": [15]}
        }"#;
        let cfg = AnalysisConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.reference.aspect_tolerance_frac, 0.1);
        assert_eq!(cfg.reference.canny_high, 150.0);
        assert_eq!(cfg.segmentation.block_sizes, vec![15]);
        assert_eq!(cfg.segmentation.min_area_px, 5);

        assert_eq!(AnalysisConfig::from_json_str("{}").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn json_roundtrip() {
        let mut cfg = AnalysisConfig::default();
        cfg.segmentation.sure_fg_frac = 0.4;
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        assert_eq!(AnalysisConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = Path::new("/nonexistent/grainsize.json");
        let err = AnalysisConfig::from_json_file(path).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
