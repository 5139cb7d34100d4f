//! Style attributes (`STAT`) as declared in the project.
//!
//! Field names follow the descriptor's camel case spelling:
//!
//! ```yaml
//! STAT:
//!   axes:
//!     - tag: wght
//!       name: Weight
//!       values:
//!         - {value: 400, name: Regular, flags: 2, linkedValue: 700}
//!         - {nominalValue: 700, rangeMinValue: 600, rangeMaxValue: 900, name: Bold}
//!   locations:
//!     - {name: Display, location: {wght: 300, opsz: 48}}
//!   elidedFallbackName: Regular
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSpec {
    pub axes: Vec<StatAxis>,
    #[serde(default)]
    pub locations: Vec<StatLocation>,
    #[serde(default)]
    pub elided_fallback_name: ElidedFallbackName,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatAxis {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub ordering: Option<u16>,
    #[serde(default)]
    pub values: Vec<StatAxisValue>,
}

/// One axis value. Which fields are set selects the table format: a range
/// gives format 2, a linked value format 3, a plain value format 1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatAxisValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub flags: u16,
    #[serde(default)]
    pub linked_value: Option<f64>,
    #[serde(default)]
    pub nominal_value: Option<f64>,
    #[serde(default)]
    pub range_min_value: Option<f64>,
    #[serde(default)]
    pub range_max_value: Option<f64>,
}

/// A multi-axis (format 4) value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatLocation {
    pub name: String,
    pub location: IndexMap<String, f64>,
    #[serde(default)]
    pub flags: u16,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ElidedFallbackName {
    Id(u16),
    Name(String),
}

impl Default for ElidedFallbackName {
    fn default() -> Self {
        ElidedFallbackName::Id(2)
    }
}

impl StatSpec {
    /// Every axis tag the spec mentions, for validation.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|axis| axis.tag.as_str()).chain(
            self.locations
                .iter()
                .flat_map(|location| location.location.keys().map(String::as_str)),
        )
    }
}
