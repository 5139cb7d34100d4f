//! Per-font configuration: merging, validation and resolution.

mod glyph_list;
mod merge;
mod rename;
mod settings;
mod stat;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use indexmap::IndexMap;
use log::debug;
use norad::designspace::DesignSpaceDocument;
use read_fonts::types::Tag;
use regex::Regex;
use serde::de::Error as _;
use serde_yaml::{Mapping, Value};

pub use glyph_list::{ALL_SCRIPTS, SubsetSpec};
pub use merge::{FONTS_KEY, merge_settings};
pub use rename::parse_renames;
pub use stat::{ElidedFallbackName, StatAxis, StatAxisValue, StatLocation, StatSpec};

use self::settings::{
    CharCode, CharacterVariantSettings, Characters, DonorSource, FontSettings, InstanceSettings,
};
use crate::{
    error::{ConfigError, Error, Result, io_error},
    format::Format,
};

const DESIGNSPACE_EXTENSION: &str = "designspace";
const DSIG_PLACEHOLDER: &str = "dummy";
const DECOMPOSE_OVERLAPPING: &str = "overlapping";
const ALL_INSTANCES: &str = "all";

static FEATURE_PARAMS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ss|cv)(\d\d)$").expect("FEATURE_PARAMS_TAG regex pattern is valid")
});

/// Tables that make the donor's layout complete, so compiling features is skipped.
const LAYOUT_TABLES: [Tag; 3] = [Tag::new(b"GDEF"), Tag::new(b"GSUB"), Tag::new(b"GPOS")];

/// Tables copied verbatim from prebuilt donor binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorSpec {
    /// One donor per interpolation master, or a single donor for static fonts.
    /// Empty when only `tables` is set.
    pub sources: Vec<PathBuf>,
    pub tables: Vec<Tag>,
}

impl DonorSpec {
    /// The donor supplies GDEF, GSUB and GPOS and nothing else.
    pub fn replaces_layout(&self) -> bool {
        self.tables.len() == LAYOUT_TABLES.len()
            && LAYOUT_TABLES.iter().all(|tag| self.tables.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetDef {
    pub spec: SubsetSpec,
    pub names: BTreeMap<u16, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instances {
    /// Every named instance of the variable font.
    All,
    /// Output name → definition, matched against named instances unless
    /// coordinates are given.
    Named(IndexMap<String, InstanceDef>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceDef {
    pub coordinates: Option<Vec<(Tag, f64)>>,
    pub names: BTreeMap<u16, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureParam {
    StylisticSet(String),
    CharacterVariant {
        label: Option<String>,
        tooltip: Option<String>,
        sample_text: Option<String>,
        param_labels: Vec<String>,
        characters: Vec<u32>,
    },
}

/// A font's resolved configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub name: String,
    pub source: PathBuf,
    pub variable: bool,
    /// Interpolation masters of a variable source, resolved to existing paths
    /// where possible.
    pub masters: Vec<PathBuf>,
    pub glyph_renames: BTreeMap<String, String>,
    pub donor: Option<DonorSpec>,
    pub subsets: IndexMap<String, SubsetDef>,
    pub names: BTreeMap<u16, String>,
    pub fs_type: Option<u16>,
    pub dsig: bool,
    pub decompose_overlapping: bool,
    pub meta: Vec<(Tag, Vec<String>)>,
    pub formats: Vec<Format>,
    pub instances: Option<Instances>,
    pub stat: Option<StatSpec>,
    pub feature_params: Vec<(Tag, FeatureParam)>,
    pub vf_suffix: Option<String>,
    pub output: PathBuf,
}

impl FontConfig {
    /// Resolve a font's merged settings. Relative paths are taken from the
    /// directory of `project_path`.
    pub fn resolve(name: &str, settings: &Mapping, project_path: &Path) -> Result<Self> {
        let font = name.to_string();
        let base = project_path.parent().unwrap_or(Path::new("."));
        let stem = project_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let raw: FontSettings = serde_yaml::from_value(Value::Mapping(settings.clone()))
            .map_err(|source| ConfigError::Invalid {
                font: font.clone(),
                setting: "font settings",
                source,
            })?;

        let source = raw
            .source
            .map(|source| base.join(source))
            .ok_or_else(|| ConfigError::MissingSource { font: font.clone() })?;
        if !source.exists() {
            return Err(ConfigError::SourceNotFound {
                font,
                path: source,
            }
            .into());
        }
        let variable = source
            .extension()
            .is_some_and(|ext| ext == DESIGNSPACE_EXTENSION);
        let masters = if variable {
            designspace_masters(&font, &source)?
        } else {
            Vec::new()
        };

        let glyph_renames = match raw.glyphnames {
            Some(path) => load_renames(&font, &base.join(path))?,
            None => BTreeMap::new(),
        };

        let donor = raw
            .donor
            .map(|donor| -> Result<DonorSpec> {
                let sources = match (donor.source, variable) {
                    (None, _) => Vec::new(),
                    (Some(DonorSource::One(_)), true) => {
                        return Err(ConfigError::DonorSourceNotList { font: font.clone() }.into());
                    }
                    (Some(DonorSource::Many(paths)), true) => {
                        if paths.len() != masters.len() {
                            return Err(ConfigError::DonorCountMismatch {
                                font: font.clone(),
                                donors: paths.len(),
                                masters: masters.len(),
                            }
                            .into());
                        }
                        paths.into_iter().map(|p| base.join(p)).collect()
                    }
                    (Some(DonorSource::One(path)), false) => vec![base.join(path)],
                    (Some(DonorSource::Many(paths)), false) => {
                        if paths.len() != 1 {
                            return Err(ConfigError::DonorCountMismatch {
                                font: font.clone(),
                                donors: paths.len(),
                                masters: 1,
                            }
                            .into());
                        }
                        paths.into_iter().map(|p| base.join(p)).collect()
                    }
                };
                let tables = donor
                    .tables
                    .iter()
                    .map(|tag| parse_tag(&font, "donor.tables", tag))
                    .collect::<Result<_>>()?;
                Ok(DonorSpec { sources, tables })
            })
            .transpose()?;

        let mut subsets = IndexMap::new();
        for (subset, def) in raw.subsets {
            let Some(glyphlist) = def.glyphlist else {
                return Err(ConfigError::SubsetWithoutGlyphList { font, subset }.into());
            };
            let spec = SubsetSpec::load(&base.join(glyphlist))?;
            subsets.insert(
                subset,
                SubsetDef {
                    spec,
                    names: def.names,
                },
            );
        }

        let dsig = match raw.dsig {
            None => false,
            Some(Value::String(value)) if value == DSIG_PLACEHOLDER => true,
            Some(value) => {
                return Err(ConfigError::UnsupportedDsig {
                    font,
                    value: describe(&value),
                }
                .into());
            }
        };

        let decompose_overlapping = match raw.components.decompose.as_deref() {
            None => false,
            Some(DECOMPOSE_OVERLAPPING) => true,
            Some(value) => {
                return Err(ConfigError::UnsupportedDecomposition {
                    font,
                    value: value.to_string(),
                }
                .into());
            }
        };

        let meta = raw
            .meta
            .into_iter()
            .map(|(tag, values)| -> Result<_> { Ok((parse_tag(&font, "meta", &tag)?, values)) })
            .collect::<Result<Vec<_>>>()?;

        let formats = resolve_formats(&font, raw.formats)?;
        let instances = raw
            .instances
            .map(|value| resolve_instances(&font, value))
            .transpose()?
            .flatten();
        let stat = raw
            .stat
            .map(|value| resolve_stat(&font, value))
            .transpose()?
            .flatten();
        let feature_params = match raw.featureparams {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => resolve_feature_params(&font, value)?,
        };

        let output = base.join("output").join(stem);
        debug!(
            "Resolved {font}: {} source, formats {formats:?}, output {}",
            if variable { "variable" } else { "static" },
            output.display()
        );

        Ok(Self {
            name: font,
            source,
            variable,
            masters,
            glyph_renames,
            donor,
            subsets,
            names: raw.names,
            fs_type: raw.set.fstype,
            dsig,
            decompose_overlapping,
            meta,
            formats,
            instances,
            stat,
            feature_params,
            vf_suffix: raw.vf_suffix,
            output,
        })
    }

    pub fn outline_formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.formats.iter().copied().filter(|f| f.is_outline())
    }

    pub fn web_formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.formats.iter().copied().filter(|f| f.is_web())
    }
}

/// Parse a table or axis tag of one to four printable ASCII characters,
/// padding short tags with spaces.
pub fn table_tag(tag: &str) -> Option<Tag> {
    let bytes = tag.as_bytes();
    if bytes.is_empty() || bytes.len() > 4 || !bytes.iter().all(|b| (0x20..=0x7e).contains(b)) {
        return None;
    }
    let mut padded = *b"    ";
    padded[..bytes.len()].copy_from_slice(bytes);
    Some(Tag::new(&padded))
}

fn parse_tag(font: &str, setting: &'static str, tag: &str) -> Result<Tag> {
    table_tag(tag).ok_or_else(|| {
        ConfigError::InvalidTag {
            font: font.to_string(),
            setting,
            tag: tag.to_string(),
        }
        .into()
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn invalid(font: &str, setting: &'static str, source: serde_yaml::Error) -> Error {
    ConfigError::Invalid {
        font: font.to_string(),
        setting,
        source,
    }
    .into()
}

/// Master paths of a designspace. A master missing at its declared path is
/// looked up next to the designspace by file name.
fn designspace_masters(font: &str, designspace: &Path) -> Result<Vec<PathBuf>> {
    let document =
        DesignSpaceDocument::load(designspace).map_err(|e| ConfigError::Designspace {
            font: font.to_string(),
            path: designspace.to_path_buf(),
            source: e.into(),
        })?;
    let dir = designspace.parent().unwrap_or(Path::new("."));
    Ok(document
        .sources
        .iter()
        .map(|source| {
            let declared = dir.join(&source.filename);
            match Path::new(&source.filename).file_name() {
                Some(file_name) if !declared.exists() => dir.join(file_name),
                _ => declared,
            }
        })
        .collect())
}

fn load_renames(font: &str, path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    parse_renames(&text).map_err(|line| {
        ConfigError::MalformedRename {
            font: font.to_string(),
            path: path.to_path_buf(),
            line,
        }
        .into()
    })
}

fn resolve_formats(font: &str, formats: Option<Vec<String>>) -> Result<Vec<Format>> {
    let Some(formats) = formats else {
        return Ok(Format::ALL.to_vec());
    };
    let mut resolved = Vec::new();
    for value in formats {
        let format = value.parse::<Format>().map_err(|value| ConfigError::UnknownFormat {
            font: font.to_string(),
            value,
        })?;
        if !resolved.contains(&format) {
            resolved.push(format);
        }
    }
    if !resolved.iter().any(|f| f.is_outline()) {
        return Err(ConfigError::NoOutlineFormat {
            font: font.to_string(),
        }
        .into());
    }
    Ok(resolved)
}

fn resolve_instances(font: &str, value: Value) -> Result<Option<Instances>> {
    let entries = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s == ALL_INSTANCES => return Ok(Some(Instances::All)),
        Value::Mapping(entries) => entries,
        other => {
            return Err(ConfigError::UnsupportedInstances {
                font: font.to_string(),
                value: describe(&other),
            }
            .into());
        }
    };
    if entries.is_empty() {
        return Ok(Some(Instances::All));
    }

    let mut named = IndexMap::new();
    for (key, conf) in entries {
        let Value::String(key) = key else {
            return Err(ConfigError::UnsupportedInstances {
                font: font.to_string(),
                value: describe(&key),
            }
            .into());
        };
        let settings: InstanceSettings = match conf {
            Value::Null => InstanceSettings::default(),
            conf => serde_yaml::from_value(conf).map_err(|e| invalid(font, "instances", e))?,
        };
        let coordinates = settings
            .coordinates
            .map(|coordinates| {
                coordinates
                    .iter()
                    .map(|(tag, value)| -> Result<_> {
                        Ok((parse_tag(font, "instances", tag)?, *value))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;
        named.insert(
            key,
            InstanceDef {
                coordinates,
                names: settings.names,
            },
        );
    }
    Ok(Some(Instances::Named(named)))
}

fn resolve_stat(font: &str, value: Value) -> Result<Option<StatSpec>> {
    match &value {
        Value::Null => return Ok(None),
        Value::Mapping(map) if map.is_empty() => return Ok(None),
        Value::Mapping(map) if !map.contains_key("axes") => {
            return Err(ConfigError::StatWithoutAxes {
                font: font.to_string(),
            }
            .into());
        }
        _ => {}
    }
    let spec: StatSpec = serde_yaml::from_value(value).map_err(|e| invalid(font, "STAT", e))?;
    for tag in spec.tags() {
        parse_tag(font, "STAT", tag)?;
    }
    Ok(Some(spec))
}

fn resolve_feature_params(font: &str, value: Value) -> Result<Vec<(Tag, FeatureParam)>> {
    let Value::Mapping(entries) = value else {
        return Err(ConfigError::FeatureParamsNotMapping {
            font: font.to_string(),
        }
        .into());
    };

    let mut params = Vec::new();
    for (key, conf) in entries {
        let tag = describe(&key);
        let Some((kind, number)) = FEATURE_PARAMS_TAG
            .captures(&tag)
            .map(|c| (c[1].to_string(), c[2].parse::<u8>().unwrap_or(0)))
        else {
            return Err(unsupported_feature_params(font, &tag));
        };
        let param = match kind.as_str() {
            "ss" if (1..=20).contains(&number) => match conf {
                Value::String(label) => FeatureParam::StylisticSet(label),
                _ => {
                    return Err(ConfigError::StylisticSetNotString {
                        font: font.to_string(),
                        tag,
                    }
                    .into());
                }
            },
            "cv" if (1..=99).contains(&number) => {
                if !conf.is_mapping() {
                    return Err(ConfigError::CharacterVariantNotRecord {
                        font: font.to_string(),
                        tag,
                    }
                    .into());
                }
                let settings: CharacterVariantSettings =
                    serde_yaml::from_value(conf).map_err(|e| invalid(font, "featureparams", e))?;
                character_variant(font, settings)?
            }
            _ => return Err(unsupported_feature_params(font, &tag)),
        };
        params.push((parse_tag(font, "featureparams", &tag)?, param));
    }
    Ok(params)
}

fn unsupported_feature_params(font: &str, tag: &str) -> Error {
    ConfigError::UnsupportedFeatureParams {
        font: font.to_string(),
        tag: tag.to_string(),
    }
    .into()
}

fn character_variant(font: &str, settings: CharacterVariantSettings) -> Result<FeatureParam> {
    let characters = match settings.characters {
        None => Vec::new(),
        Some(Characters::Text(text)) => text.chars().map(u32::from).collect(),
        Some(Characters::List(codes)) => codes
            .into_iter()
            .map(|code| match code {
                CharCode::Code(code) => Ok(code),
                CharCode::Char(text) => {
                    let mut chars = text.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(u32::from(c)),
                        _ => Err(invalid(
                            font,
                            "featureparams",
                            serde_yaml::Error::custom(format!(
                                "“{text}” is not a single character"
                            )),
                        )),
                    }
                }
            })
            .collect::<Result<_>>()?,
    };
    Ok(FeatureParam::CharacterVariant {
        label: settings.label,
        tooltip: settings.tooltip,
        sample_text: settings.sampletext,
        param_labels: settings.paramlabels,
        characters,
    })
}
