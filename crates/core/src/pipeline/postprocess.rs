//! Table edits applied to every finished binary: names, `DSIG`, `meta`,
//! `STAT` and feature parameters.

use std::{sync::LazyLock, time::Instant};

use fontmill_font_ops::{
    FeatureParamsBlock, NameTable,
    cff::{CFF, CffNames, mirror_names},
    dsig_placeholder, feature_tags, has_table, meta_table,
    name::WINDOWS_PLATFORM,
    put_tables, set_feature_params, set_font_revision,
    tables::{DSIG, META},
    vendor_id,
};
use log::{debug, info};
use read_fonts::FontRef;
use regex::Regex;

use super::FontBuild;
use crate::{
    config::FeatureParam,
    error::{Error, Result, ResultExt},
};

const COPYRIGHT: u16 = 0;
const FAMILY: u16 = 1;
const UNIQUE_ID: u16 = 3;
const FULL_NAME: u16 = 4;
const VERSION: u16 = 5;
const POSTSCRIPT_NAME: u16 = 6;
const TRADEMARK: u16 = 7;

/// Name IDs whose overrides are mirrored into a CFF top dict.
const CFF_NAME_IDS: [u16; 6] = [COPYRIGHT, FAMILY, FULL_NAME, VERSION, POSTSCRIPT_NAME, TRADEMARK];

static VERSION_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Version (\d\.\d\d)").expect("VERSION_STRING regex pattern is valid")
});

type PostprocessStep = (&'static str, fn(&FontBuild<'_>, &[u8]) -> Result<Vec<u8>>);

const POSTPROCESS_STEPS: &[PostprocessStep] = &[
    ("names", set_names),
    ("DSIG", add_dsig),
    ("meta", add_meta),
    ("STAT", add_stat),
    ("featureparams", add_feature_params),
];

impl FontBuild<'_> {
    pub(super) fn postprocess(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut data = data.to_vec();
        for (name, step) in POSTPROCESS_STEPS {
            let start = Instant::now();
            data = step(self, &data)?;
            debug!(
                "{name} on {} ({:.2}s)",
                self.filename(),
                start.elapsed().as_secs_f64()
            );
        }
        Ok(data)
    }
}

/// Parse the revision out of a `Version D.DD` string.
pub fn parse_version(value: &str) -> Option<f64> {
    VERSION_STRING
        .captures(value)
        .and_then(|c| c[1].parse().ok())
}

/// Render a revision as the CFF version string, e.g. `1.0` or `1.23`.
fn format_revision(revision: f64) -> String {
    if revision.fract() == 0.0 {
        format!("{revision:.1}")
    } else {
        format!("{revision}")
    }
}

/// Keep Windows name records only and apply the identity's name overrides.
///
/// Overriding the version also sets `head.fontRevision`; overriding the
/// version or PostScript name synthesizes the unique ID unless it is given.
/// CFF fonts get the overrides mirrored into the top dict.
pub(super) fn set_names(build: &FontBuild<'_>, data: &[u8]) -> Result<Vec<u8>> {
    let font_name = build.identity.name.as_str();
    let font = FontRef::new(data).font_op(font_name)?;
    let mut table = NameTable::read(&font).font_op(font_name)?;
    table.retain_platform(WINDOWS_PLATFORM);

    let mut names = build.identity.names.clone();
    if names.is_empty() {
        return table.apply(data).font_op(font_name);
    }
    info!("Setting {} names", build.filename());

    if (names.contains_key(&VERSION) || names.contains_key(&POSTSCRIPT_NAME))
        && !names.contains_key(&UNIQUE_ID)
    {
        let vendor = vendor_id(&font).font_op(font_name)?;
        let version = names
            .get(&VERSION)
            .map(String::as_str)
            .or(table.get(VERSION))
            .unwrap_or_default();
        let postscript_name = names
            .get(&POSTSCRIPT_NAME)
            .map(String::as_str)
            .or(table.get(POSTSCRIPT_NAME))
            .unwrap_or_default();
        let unique_id = format!(
            "{}:{vendor}:{postscript_name}",
            version.replace("Version ", "")
        );
        names.insert(UNIQUE_ID, unique_id);
    }

    let revision = names
        .get(&VERSION)
        .map(|value| {
            parse_version(value).ok_or_else(|| Error::Parse {
                font: font_name.to_string(),
                value: value.clone(),
            })
        })
        .transpose()?;

    for (name_id, string) in &names {
        table.set(*name_id, string.as_str());
    }
    let mut data = table.apply(data).font_op(font_name)?;
    if let Some(revision) = revision {
        data = set_font_revision(&data, revision).font_op(font_name)?;
    }

    if has_table(&data, CFF).font_op(font_name)?
        && CFF_NAME_IDS.iter().any(|id| names.contains_key(id))
    {
        let cff_names = CffNames {
            font_name: names.get(&POSTSCRIPT_NAME).cloned(),
            copyright: names.get(&COPYRIGHT).cloned(),
            family_name: names.get(&FAMILY).cloned(),
            full_name: names.get(&FULL_NAME).cloned(),
            notice: names.get(&TRADEMARK).cloned(),
            version: revision.map(format_revision),
        };
        data = mirror_names(&data, &cff_names).font_op(font_name)?;
    }
    Ok(data)
}

fn add_dsig(build: &FontBuild<'_>, data: &[u8]) -> Result<Vec<u8>> {
    if !build.config.dsig {
        return Ok(data.to_vec());
    }
    info!("Adding “DSIG” table to {}", build.filename());
    put_tables(data, &[(DSIG, dsig_placeholder())]).font_op(&build.identity.name)
}

fn add_meta(build: &FontBuild<'_>, data: &[u8]) -> Result<Vec<u8>> {
    let meta = &build.config.meta;
    if meta.is_empty() {
        return Ok(data.to_vec());
    }
    info!("Adding “meta” table to {}", build.filename());
    let entries = meta
        .iter()
        .map(|(tag, values)| (*tag, values.join(",").into_bytes()))
        .collect::<Vec<_>>();
    put_tables(data, &[(META, meta_table(&entries))]).font_op(&build.identity.name)
}

fn add_stat(build: &FontBuild<'_>, data: &[u8]) -> Result<Vec<u8>> {
    let identity = &build.identity;
    if let Some(spec) = &identity.stat {
        info!("Adding “STAT” table to {}", build.filename());
        build
            .toolkit
            .build_stat(data, spec)
            .toolkit("STAT building", &identity.name)
    } else if identity.variable {
        info!("Adding default “STAT” table to {}", build.filename());
        build
            .toolkit
            .build_default_stat(data)
            .toolkit("STAT building", &identity.name)
    } else {
        Ok(data.to_vec())
    }
}

/// Attach `ss`/`cv` parameters to matching GSUB and GPOS features, adding
/// their labels to the name table.
fn add_feature_params(build: &FontBuild<'_>, data: &[u8]) -> Result<Vec<u8>> {
    let config = build.config;
    let font_name = build.identity.name.as_str();
    if config.feature_params.is_empty() {
        return Ok(data.to_vec());
    }
    let present = feature_tags(data).font_op(font_name)?;
    let wanted = config
        .feature_params
        .iter()
        .filter(|(tag, _)| present.contains(tag))
        .collect::<Vec<_>>();
    if wanted.is_empty() {
        return Ok(data.to_vec());
    }
    info!("Adding “featureParams” to {}", build.filename());

    let mut names = NameTable::from_data(data).font_op(font_name)?;
    let blocks = wanted
        .into_iter()
        .map(|(tag, param)| (*tag, feature_params_block(&mut names, param)))
        .collect::<Vec<_>>();
    let data = names.apply(data).font_op(font_name)?;
    set_feature_params(&data, &blocks).font_op(font_name)
}

fn feature_params_block(names: &mut NameTable, param: &FeatureParam) -> FeatureParamsBlock {
    let mut label = |string: Option<&String>| match string {
        Some(string) if !string.is_empty() => names.add_name(string),
        _ => 0,
    };
    match param {
        FeatureParam::StylisticSet(ui_name) => FeatureParamsBlock::StylisticSet {
            ui_name_id: label(Some(ui_name)),
        },
        FeatureParam::CharacterVariant {
            label: feature_label,
            tooltip,
            sample_text,
            param_labels,
            characters,
        } => {
            let label_name_id = label(feature_label.as_ref());
            let tooltip_name_id = label(tooltip.as_ref());
            let sample_text_name_id = label(sample_text.as_ref());
            FeatureParamsBlock::CharacterVariant {
                label_name_id,
                tooltip_name_id,
                sample_text_name_id,
                num_named_parameters: param_labels.len() as u16,
                first_param_label_name_id: names.add_names(param_labels).unwrap_or(0),
                characters: characters.clone(),
            }
        }
    }
}
