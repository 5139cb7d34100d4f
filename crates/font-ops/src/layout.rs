//! GSUB/GPOS inspection and feature parameter blocks.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::debug;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::{
    NullableOffsetMarker, OffsetMarker,
    from_obj::ToOwnedTable,
    tables::{
        gpos::{ExtensionSubtable as GposExtension, Gpos, PositionLookup},
        gsub::{
            ExtensionSubtable as GsubExtension, Gsub, LigatureSubstFormat1,
            ReverseChainSingleSubstFormat1, SubstitutionLookup,
        },
        layout::{
            ChainedSequenceContext, CharacterVariantParams, FeatureList, FeatureParams, Lookup,
            SequenceContext, StylisticSetParams,
        },
        os2::Os2,
    },
    types::Uint24,
};

use crate::rewrite_font;

pub const GSUB: Tag = Tag::new(b"GSUB");
pub const GPOS: Tag = Tag::new(b"GPOS");
const OS2: Tag = Tag::new(b"OS/2");

/// A `FeatureParams` block for a stylistic set or character variant feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureParamsBlock {
    StylisticSet {
        ui_name_id: u16,
    },
    CharacterVariant {
        label_name_id: u16,
        tooltip_name_id: u16,
        sample_text_name_id: u16,
        num_named_parameters: u16,
        first_param_label_name_id: u16,
        characters: Vec<u32>,
    },
}

impl FeatureParamsBlock {
    fn to_feature_params(&self) -> Result<FeatureParams> {
        Ok(match self {
            Self::StylisticSet { ui_name_id } => {
                FeatureParams::StylisticSet(StylisticSetParams::new((*ui_name_id).into()))
            }
            Self::CharacterVariant {
                label_name_id,
                tooltip_name_id,
                sample_text_name_id,
                num_named_parameters,
                first_param_label_name_id,
                characters,
            } => {
                let mut params = CharacterVariantParams::default();
                params.feat_ui_label_name_id = (*label_name_id).into();
                params.feat_ui_tooltip_text_name_id = (*tooltip_name_id).into();
                params.sample_text_name_id = (*sample_text_name_id).into();
                params.num_named_parameters = *num_named_parameters;
                params.first_param_ui_label_name_id = (*first_param_label_name_id).into();
                params.character = characters
                    .iter()
                    .map(|c| {
                        Uint24::checked_new(*c)
                            .with_context(|| format!("Character U+{c:04X} does not fit in 24 bits"))
                    })
                    .collect::<Result<_>>()?;
                FeatureParams::CharacterVariant(params)
            }
        })
    }
}

/// Feature tags registered in one layout table, in FeatureList order.
fn registered_features(font: &FontRef, table: Tag) -> Result<Vec<Tag>> {
    if font.table_data(table).is_none() {
        return Ok(Vec::new());
    }
    let list = if table == GSUB {
        font.gsub()?.feature_list()?
    } else {
        font.gpos()?.feature_list()?
    };
    Ok(list.feature_records().iter().map(|r| r.feature_tag()).collect())
}

/// Tags of all features registered in GSUB and GPOS.
pub fn feature_tags(data: &[u8]) -> Result<BTreeSet<Tag>> {
    let font = FontRef::new(data)?;
    let mut tags = BTreeSet::new();
    for table in [GSUB, GPOS] {
        tags.extend(
            registered_features(&font, table)
                .with_context(|| format!("Failed to read {table} features"))?,
        );
    }
    Ok(tags)
}

/// The longest glyph sequence any GSUB or GPOS lookup examines.
///
/// Counts follow fontTools' `maxContextCalc`: ligatures count their
/// components, contextual rules their input plus lookahead.
pub fn max_context(data: &[u8]) -> Result<u16> {
    let font = FontRef::new(data)?;
    let mut max_ctx = 0;
    if font.table_data(GSUB).is_some() {
        let gsub: Gsub = font.gsub()?.to_owned_table();
        for lookup in &gsub.lookup_list.lookups {
            max_ctx = max_ctx.max(substitution_context(lookup));
        }
    }
    if font.table_data(GPOS).is_some() {
        let gpos: Gpos = font.gpos()?.to_owned_table();
        for lookup in &gpos.lookup_list.lookups {
            max_ctx = max_ctx.max(positioning_context(lookup));
        }
    }
    Ok(max_ctx)
}

fn substitution_context(lookup: &SubstitutionLookup) -> u16 {
    match lookup {
        SubstitutionLookup::Single(_)
        | SubstitutionLookup::Multiple(_)
        | SubstitutionLookup::Alternate(_) => 1,
        SubstitutionLookup::Ligature(lookup) => widest(lookup, ligature_context),
        SubstitutionLookup::Contextual(lookup) => {
            widest(lookup, |sub| sequence_context(sub.as_inner()))
        }
        SubstitutionLookup::ChainContextual(lookup) => {
            widest(lookup, |sub| chained_context(sub.as_inner()))
        }
        SubstitutionLookup::Reverse(lookup) => widest(lookup, reverse_chain_context),
        SubstitutionLookup::Extension(lookup) => widest(lookup, |ext| match ext {
            GsubExtension::Single(_) | GsubExtension::Multiple(_) | GsubExtension::Alternate(_) => 1,
            GsubExtension::Ligature(ext) => ligature_context(&ext.extension),
            GsubExtension::Contextual(ext) => sequence_context(ext.extension.as_inner()),
            GsubExtension::ChainContextual(ext) => chained_context(ext.extension.as_inner()),
            GsubExtension::Reverse(ext) => reverse_chain_context(&ext.extension),
        }),
    }
}

fn positioning_context(lookup: &PositionLookup) -> u16 {
    match lookup {
        PositionLookup::Single(_) => 1,
        PositionLookup::Pair(_) => 2,
        PositionLookup::Cursive(_)
        | PositionLookup::MarkToBase(_)
        | PositionLookup::MarkToLig(_)
        | PositionLookup::MarkToMark(_) => 0,
        PositionLookup::Contextual(lookup) => widest(lookup, |sub| sequence_context(sub.as_inner())),
        PositionLookup::ChainContextual(lookup) => {
            widest(lookup, |sub| chained_context(sub.as_inner()))
        }
        PositionLookup::Extension(lookup) => widest(lookup, |ext| match ext {
            GposExtension::Single(_) => 1,
            GposExtension::Pair(_) => 2,
            GposExtension::Cursive(_)
            | GposExtension::MarkToBase(_)
            | GposExtension::MarkToLig(_)
            | GposExtension::MarkToMark(_) => 0,
            GposExtension::Contextual(ext) => sequence_context(ext.extension.as_inner()),
            GposExtension::ChainContextual(ext) => chained_context(ext.extension.as_inner()),
        }),
    }
}

fn widest<T>(lookup: &Lookup<T>, context: impl Fn(&T) -> u16) -> u16 {
    lookup
        .subtables
        .iter()
        .map(|subtable| context(&**subtable))
        .max()
        .unwrap_or_default()
}

fn ligature_context(subtable: &LigatureSubstFormat1) -> u16 {
    subtable
        .ligature_sets
        .iter()
        .flat_map(|set| set.ligatures.iter())
        .map(|ligature| ligature.component_glyph_ids.len() as u16 + 1)
        .max()
        .unwrap_or_default()
}

fn reverse_chain_context(subtable: &ReverseChainSingleSubstFormat1) -> u16 {
    1 + subtable.lookahead_coverages.len() as u16
}

fn sequence_context(subtable: &SequenceContext) -> u16 {
    match subtable {
        SequenceContext::Format1(table) => rules_context(
            &table.seq_rule_sets,
            |set| set.seq_rules.as_slice(),
            |rule| rule.input_sequence.len() + 1,
        ),
        SequenceContext::Format2(table) => rules_context(
            &table.class_seq_rule_sets,
            |set| set.class_seq_rules.as_slice(),
            |rule| rule.input_sequence.len() + 1,
        ),
        SequenceContext::Format3(table) => table.coverages.len() as u16,
    }
}

fn chained_context(subtable: &ChainedSequenceContext) -> u16 {
    match subtable {
        ChainedSequenceContext::Format1(table) => rules_context(
            &table.chained_seq_rule_sets,
            |set| set.chained_seq_rules.as_slice(),
            |rule| rule.input_sequence.len() + 1 + rule.lookahead_sequence.len(),
        ),
        ChainedSequenceContext::Format2(table) => rules_context(
            &table.chained_class_seq_rule_sets,
            |set| set.chained_class_seq_rules.as_slice(),
            |rule| rule.input_sequence.len() + 1 + rule.lookahead_sequence.len(),
        ),
        ChainedSequenceContext::Format3(table) => {
            (table.input_coverages.len() + table.lookahead_coverages.len()) as u16
        }
    }
}

/// Longest rule across the (possibly absent) rule sets of a format 1 or 2
/// contextual subtable. Rules store their input without the first glyph.
fn rules_context<S, R>(
    sets: &[NullableOffsetMarker<S>],
    rules: impl Fn(&S) -> &[OffsetMarker<R>],
    length: impl Fn(&R) -> usize,
) -> u16 {
    sets.iter()
        .filter_map(|set| set.as_ref())
        .flat_map(|set| rules(set).iter())
        .map(|rule| length(&**rule) as u16)
        .max()
        .unwrap_or_default()
}

/// Store [`max_context`] in `OS/2.usMaxContext`.
///
/// `OS/2` tables older than version 2 have no such field and are left alone.
pub fn update_max_context(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    if font.table_data(OS2).is_none() || font.os2()?.us_max_context().is_none() {
        return Ok(data.to_vec());
    }
    let max_ctx = max_context(data)?;
    debug!("usMaxContext = {max_ctx}");
    rewrite_font(data, |font, builder| {
        let mut os2: Os2 = font.os2()?.to_owned_table();
        os2.us_max_context = Some(max_ctx);
        builder.add_table(&os2)?;
        Ok(())
    })
}

fn attach_params(list: &mut FeatureList, params: &[(Tag, FeatureParams)]) {
    for record in list.feature_records.iter_mut() {
        if let Some((_, block)) = params.iter().find(|(tag, _)| *tag == record.feature_tag) {
            record.feature.feature_params = block.clone().into();
        }
    }
}

/// Attach params blocks to every feature record whose tag matches, in both
/// GSUB and GPOS.
///
/// Params already present on other features are kept.
pub fn set_feature_params(data: &[u8], params: &[(Tag, FeatureParamsBlock)]) -> Result<Vec<u8>> {
    if params.is_empty() {
        return Ok(data.to_vec());
    }
    let params = params
        .iter()
        .map(|(tag, block)| {
            let built = block
                .to_feature_params()
                .with_context(|| format!("Invalid feature params for '{tag}'"))?;
            Ok((*tag, built))
        })
        .collect::<Result<Vec<_>>>()?;

    let font = FontRef::new(data)?;
    let mut targets = Vec::new();
    for table in [GSUB, GPOS] {
        let registered = registered_features(&font, table)
            .with_context(|| format!("Failed to read {table} features"))?;
        if registered.iter().any(|tag| params.iter().any(|(p, _)| p == tag)) {
            targets.push(table);
        }
    }
    if targets.is_empty() {
        return Ok(data.to_vec());
    }

    rewrite_font(data, |font, builder| {
        if targets.contains(&GSUB) {
            let mut gsub: Gsub = font.gsub()?.to_owned_table();
            attach_params(&mut gsub.feature_list, &params);
            builder.add_table(&gsub)?;
        }
        if targets.contains(&GPOS) {
            let mut gpos: Gpos = font.gpos()?.to_owned_table();
            attach_params(&mut gpos.feature_list, &params);
            builder.add_table(&gpos)?;
        }
        Ok(())
    })
}
