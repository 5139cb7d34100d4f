//! Raw per-font settings as they appear after merging.

use std::{collections::BTreeMap, path::PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FontSettings {
    pub source: Option<PathBuf>,
    pub glyphnames: Option<PathBuf>,
    #[serde(alias = "ttf")]
    pub donor: Option<DonorSettings>,
    pub subsets: IndexMap<String, SubsetSettings>,
    pub names: BTreeMap<u16, String>,
    pub set: SetSettings,
    #[serde(rename = "DSIG")]
    pub dsig: Option<Value>,
    pub components: ComponentSettings,
    pub meta: IndexMap<String, Vec<String>>,
    pub formats: Option<Vec<String>>,
    pub instances: Option<Value>,
    #[serde(rename = "STAT")]
    pub stat: Option<Value>,
    pub featureparams: Option<Value>,
    #[serde(rename = "vf-suffix")]
    pub vf_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DonorSettings {
    pub source: Option<DonorSource>,
    pub tables: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DonorSource {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubsetSettings {
    pub glyphlist: Option<PathBuf>,
    pub names: BTreeMap<u16, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SetSettings {
    pub fstype: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ComponentSettings {
    pub decompose: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct InstanceSettings {
    pub coordinates: Option<IndexMap<String, f64>>,
    pub names: BTreeMap<u16, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CharacterVariantSettings {
    pub label: Option<String>,
    pub tooltip: Option<String>,
    pub sampletext: Option<String>,
    pub paramlabels: Vec<String>,
    pub characters: Option<Characters>,
}

/// A string of characters, or a list of code points and single characters.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Characters {
    Text(String),
    List(Vec<CharCode>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CharCode {
    Code(u32),
    Char(String),
}
