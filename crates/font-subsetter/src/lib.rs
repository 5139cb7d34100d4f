//! Glyph-name driven font subsetting around hb-subset.
//!
//! The subset keeps everything the font carries apart from the dropped
//! glyphs: all name records and languages, every layout feature, glyph
//! names, hinting, legacy kerning and the `DSIG`/`meta` tables. Layout
//! closure and unicode-range pruning are disabled, so only the listed
//! glyphs survive, together with the recommended glyphs at glyph IDs 0 to 3
//! (`.notdef`, `.null`, `CR` and `space` by convention).
//!
//! # Example
//!
//! ```no_run
//! use fontmill_font_subsetter::Subsetter;
//!
//! let font_data: &[u8] = &[];
//! let subset = Subsetter::new()
//!     .with_glyph_names(["A", "B", "uni0410"])
//!     .with_scripts(["latn", "cyrl"])
//!     .subset(font_data);
//! ```

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use fontmill_font_ops::{NameTable, feature_tags, glyph_names, put_tables, update_avg_char_width};
use hb_subset::{Blob, FontFace, SubsetInput, Tag};
use log::debug;
use read_fonts::{FontRef, TableProvider, types::Tag as FontTag};

/// Script tag that selects every script in the font.
pub const ALL_SCRIPTS: &str = "*";

/// Tables hb-subset drops by default that a subset must keep.
pub const FORCE_RETAINED_TABLES: &[&[u8; 4]] = &[b"DSIG", b"meta", b"kern"];

/// Glyph IDs 0 up to this bound are kept in every subset.
const RECOMMENDED_GLYPHS: u32 = 4;

/// Subsetter keyed by production glyph names.
#[derive(Debug, Clone, Default)]
pub struct Subsetter {
    glyph_names: BTreeSet<String>,
    scripts: Option<BTreeSet<String>>,
}

impl Subsetter {
    /// A subsetter that keeps no glyphs and every script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add glyphs to keep, by production name. Unknown names are ignored.
    pub fn with_glyph_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.glyph_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Restrict layout scripts. The wildcard [`ALL_SCRIPTS`] keeps every script.
    pub fn with_scripts<S: Into<String>>(mut self, scripts: impl IntoIterator<Item = S>) -> Self {
        let scripts = scripts.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        self.scripts = if scripts.contains(ALL_SCRIPTS) { None } else { Some(scripts) };
        self
    }

    /// Subset the font data.
    ///
    /// Returns the subset binary with `OS/2.xAvgCharWidth` recomputed.
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        let glyph_ids = self.glyph_ids(data)?;
        let names = NameTable::from_data(data)?;
        let features = feature_tags(data)?;

        let mut input = SubsetInput::new()?;
        input
            .flags()
            .retain_glyph_names()
            .notdef_outline()
            .name_legacy()
            .no_prune_unicode_ranges()
            .no_layout_closure();

        {
            let mut glyph_set = input.glyph_set();
            for gid in &glyph_ids {
                glyph_set.insert(*gid);
            }
        }
        {
            let mut name_ids = input.name_id_set();
            for entry in names.entries() {
                name_ids.insert(entry.name_id as u32);
            }
        }
        {
            let mut languages = input.name_language_id_set();
            for entry in names.entries() {
                languages.insert(entry.language_id as u32);
            }
        }
        {
            let mut feature_set = input.layout_feature_tag_set();
            for tag in &features {
                feature_set.insert(Tag::new(&tag.to_be_bytes()));
            }
        }
        if let Some(scripts) = &self.scripts {
            let mut script_set = input.layout_script_tag_set();
            script_set.clear();
            for script in scripts {
                script_set.insert(Tag::new(&script_tag(script)));
            }
        }
        {
            let mut drop_tables = input.drop_table_tag_set();
            for table in FORCE_RETAINED_TABLES {
                drop_tables.remove(Tag::new(table));
            }
        }

        debug!(
            "Subsetting to {} glyphs, scripts {:?}",
            glyph_ids.len(),
            self.scripts.as_ref().map(|s| s.iter().collect::<Vec<_>>())
        );
        let font = FontFace::new(Blob::from_bytes(data)?)?;
        let subset_font = input.subset_font(&font)?;
        let subset = subset_font.underlying_blob().to_vec();

        let subset = restore_dropped_tables(data, &subset)?;
        update_avg_char_width(&subset)
    }

    fn glyph_ids(&self, data: &[u8]) -> Result<BTreeSet<u32>> {
        let names = glyph_names(data).context("Failed to read glyph names")?;
        let num_glyphs = FontRef::new(data)?.maxp()?.num_glyphs() as u32;
        let mut ids = (0..RECOMMENDED_GLYPHS.min(num_glyphs)).collect::<BTreeSet<_>>();
        for (gid, name) in names.iter().enumerate() {
            if self.glyph_names.contains(name) {
                ids.insert(gid as u32);
            }
        }
        let missing = self
            .glyph_names
            .iter()
            .filter(|name| !names.contains(*name))
            .count();
        if missing > 0 {
            debug!("{missing} requested glyphs are not in the font");
        }
        Ok(ids)
    }
}

/// Pad a script tag to four bytes, as in `"dev2"` or `"lao "`.
fn script_tag(script: &str) -> [u8; 4] {
    let mut bytes = *b"    ";
    for (slot, byte) in bytes.iter_mut().zip(script.trim().bytes()) {
        *slot = byte;
    }
    bytes
}

/// Copy forced tables from `original` when the subsetter dropped them anyway.
fn restore_dropped_tables(original: &[u8], subset: &[u8]) -> Result<Vec<u8>> {
    let source = FontRef::new(original)?;
    let target = FontRef::new(subset)?;
    let mut restored = Vec::new();
    for table in FORCE_RETAINED_TABLES {
        let tag = FontTag::new(table);
        if target.table_data(tag).is_some() {
            continue;
        }
        if let Some(data) = source.table_data(tag) {
            restored.push((tag, data.as_bytes().to_vec()));
        }
    }
    if restored.is_empty() {
        return Ok(subset.to_vec());
    }
    put_tables(subset, &restored)
}
