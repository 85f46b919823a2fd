//! Reference objects of known physical size.
//!
//! The catalog is immutable once built. The built-in table is created on first
//! use and shared read-only for the rest of the process; tests and callers can
//! inject their own catalog instead.
//!
//! Catalog JSON follows a small versioned schema (`grainsize.catalog.v1`).
//! Aspect ratios are always derived from the dimensions, never read from disk.

use std::path::Path;
use std::sync::LazyLock;

use crate::error::CatalogError;

/// Schema tag expected in catalog JSON files.
pub const CATALOG_SCHEMA: &str = "grainsize.catalog.v1";
const BUILTIN_NAME: &str = "inr_notes_cards_coins";

/// Outline class used to pick the matching branch of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceShape {
    /// Banknotes and ID-1 cards.
    Rectangle,
    /// Coins. Diameter is `width_mm`.
    Circle,
}

/// One known reference object.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReferenceObjectSpec {
    label: String,
    width_mm: f64,
    height_mm: f64,
    aspect_ratio: f64,
    shape: ReferenceShape,
}

impl ReferenceObjectSpec {
    /// Build an entry; the aspect ratio is `max(w, h) / min(w, h)`.
    ///
    /// Dimensions are checked when the entry is added to a [`ReferenceCatalog`].
    pub fn new(
        label: impl Into<String>,
        width_mm: f64,
        height_mm: f64,
        shape: ReferenceShape,
    ) -> Self {
        let long = width_mm.max(height_mm);
        let short = width_mm.min(height_mm);
        Self {
            label: label.into(),
            width_mm,
            height_mm,
            aspect_ratio: long / short,
            shape,
        }
    }

    pub fn rectangle(label: impl Into<String>, width_mm: f64, height_mm: f64) -> Self {
        Self::new(label, width_mm, height_mm, ReferenceShape::Rectangle)
    }

    pub fn circle(label: impl Into<String>, diameter_mm: f64) -> Self {
        Self::new(label, diameter_mm, diameter_mm, ReferenceShape::Circle)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn shape(&self) -> ReferenceShape {
        self.shape
    }

    /// Shorter physical side (mm).
    pub fn short_side_mm(&self) -> f64 {
        self.width_mm.min(self.height_mm)
    }

    /// Coin diameter (mm). Only meaningful for [`ReferenceShape::Circle`].
    pub fn diameter_mm(&self) -> f64 {
        self.width_mm
    }

    fn validate(&self, index: usize) -> Result<(), CatalogError> {
        if self.label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel { index });
        }
        for (field, value) in [("width_mm", self.width_mm), ("height_mm", self.height_mm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CatalogError::InvalidDimension {
                    label: self.label.clone(),
                    field,
                    value,
                });
            }
        }
        if self.shape == ReferenceShape::Circle && self.width_mm != self.height_mm {
            return Err(CatalogError::NonRoundCircle {
                label: self.label.clone(),
                width_mm: self.width_mm,
                height_mm: self.height_mm,
            });
        }
        Ok(())
    }
}

/// Ordered, validated list of reference objects.
///
/// Order matters: when two entries match a contour equally well the earlier
/// entry wins.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReferenceCatalog {
    name: String,
    objects: Vec<ReferenceObjectSpec>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntryV1 {
    label: String,
    width_mm: f64,
    height_mm: f64,
    shape: ReferenceShape,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogSpecV1 {
    schema: String,
    name: String,
    objects: Vec<CatalogEntryV1>,
}

static BUILTIN: LazyLock<ReferenceCatalog> = LazyLock::new(|| ReferenceCatalog {
    name: BUILTIN_NAME.to_string(),
    objects: builtin_objects(),
});

fn builtin_objects() -> Vec<ReferenceObjectSpec> {
    vec![
        // Indian banknotes, width x height in mm.
        ReferenceObjectSpec::rectangle("₹10 Note", 63.0, 123.0),
        ReferenceObjectSpec::rectangle("₹20 Note", 63.0, 147.0),
        ReferenceObjectSpec::rectangle("₹50 Note", 66.0, 135.0),
        ReferenceObjectSpec::rectangle("₹100 Note", 66.0, 142.0),
        ReferenceObjectSpec::rectangle("₹200 Note", 66.0, 146.0),
        ReferenceObjectSpec::rectangle("₹500 Note", 66.0, 150.0),
        ReferenceObjectSpec::rectangle("₹2000 Note", 66.0, 166.0),
        // ISO/IEC 7810 ID-1
        ReferenceObjectSpec::rectangle("Credit/Debit Card", 53.98, 85.60),
        ReferenceObjectSpec::circle("₹1 Coin", 25.0),
        ReferenceObjectSpec::circle("₹2 Coin", 27.0),
        ReferenceObjectSpec::circle("₹5 Coin", 23.0),
        ReferenceObjectSpec::circle("₹10 Coin", 27.0),
    ]
}

impl ReferenceCatalog {
    /// Validate and wrap a list of objects.
    pub fn new(
        name: impl Into<String>,
        objects: Vec<ReferenceObjectSpec>,
    ) -> Result<Self, CatalogError> {
        if objects.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, obj) in objects.iter().enumerate() {
            obj.validate(index)?;
        }
        Ok(Self {
            name: name.into(),
            objects,
        })
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static ReferenceCatalog {
        &BUILTIN
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[ReferenceObjectSpec] {
        &self.objects
    }

    /// Entries of one shape class, in catalog order.
    pub fn of_shape(
        &self,
        shape: ReferenceShape,
    ) -> impl Iterator<Item = &ReferenceObjectSpec> + '_ {
        self.objects.iter().filter(move |o| o.shape == shape)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: CatalogSpecV1 =
            serde_json::from_str(&data).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_spec(spec)
    }

    /// Serialize in the on-disk schema.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let spec = CatalogSpecV1 {
            schema: CATALOG_SCHEMA.to_string(),
            name: self.name.clone(),
            objects: self
                .objects
                .iter()
                .map(|o| CatalogEntryV1 {
                    label: o.label.clone(),
                    width_mm: o.width_mm,
                    height_mm: o.height_mm,
                    shape: o.shape,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&spec)
    }

    fn from_spec(spec: CatalogSpecV1) -> Result<Self, CatalogError> {
        if spec.schema != CATALOG_SCHEMA {
            return Err(CatalogError::UnsupportedSchema {
                found: spec.schema,
                expected: CATALOG_SCHEMA,
            });
        }
        let objects = spec
            .objects
            .into_iter()
            .map(|e| ReferenceObjectSpec::new(e.label, e.width_mm, e.height_mm, e.shape))
            .collect();
        Self::new(spec.name, objects)
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
