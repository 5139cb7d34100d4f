//! Binary-level font table manipulation.
//!
//! Everything here operates on serialized font data (`&[u8]` in, `Vec<u8>`
//! out). Tables the pipeline does not touch are carried over verbatim.

mod bytes;
pub mod cff;
pub mod glyphs;
pub mod layout;
pub mod name;
pub mod style;
pub mod tables;
pub mod variations;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use anyhow::{Context, Result};
use log::warn;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::FontBuilder;

pub use glyphs::{glyph_names, rename_glyphs};
pub use layout::{FeatureParamsBlock, feature_tags, max_context, set_feature_params, update_max_context};
pub use name::{NameEntry, NameTable};
pub use style::{
    set_font_revision, set_fs_type, set_head_flags, set_ribbi_bits, update_avg_char_width, vendor_id,
};
pub use tables::{dsig_placeholder, meta_table};
pub use variations::{AxisInfo, NamedInstance, axes, instance_at, named_instances};

/// A builder holding the tables of `font` that `keep` accepts, borrowed
/// without re-encoding.
fn seeded_builder<'a>(font: &FontRef<'a>, keep: impl Fn(Tag) -> bool) -> FontBuilder<'a> {
    let mut builder = FontBuilder::new();
    let tags = font.table_directory.table_records().iter().map(|record| record.tag());
    for tag in tags.filter(|tag| keep(*tag)) {
        if let Some(table) = font.table_data(tag) {
            builder.add_raw(tag, table);
        }
    }
    builder
}

/// Re-serialize `data` after `edit` has added or replaced tables.
///
/// Tables `edit` leaves alone keep their original bytes. Typed edits go
/// through `to_owned_table()` and `FontBuilder::add_table`.
pub fn rewrite_font(
    data: &[u8],
    edit: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = seeded_builder(&font, |_| true);
    edit(&font, &mut builder)?;
    Ok(builder.build())
}

/// Add or replace raw tables.
pub fn put_tables(data: &[u8], tables: &[(Tag, Vec<u8>)]) -> Result<Vec<u8>> {
    rewrite_font(data, |_, builder| {
        for (tag, table) in tables {
            builder.add_raw(*tag, table.clone());
        }
        Ok(())
    })
}

/// Remove tables if present.
pub fn drop_tables(data: &[u8], tags: &[Tag]) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    Ok(seeded_builder(&font, |tag| !tags.contains(&tag)).build())
}

/// Returns `true` if the font has a table with the given tag.
pub fn has_table(data: &[u8], tag: Tag) -> Result<bool> {
    let font = FontRef::new(data)?;
    Ok(font.table_data(tag).is_some())
}

/// Copy tables verbatim from a donor font.
///
/// Tables are copied by glyph index, so the donor must share the target's
/// glyph order; a glyph count mismatch is logged but not fatal. Missing donor
/// tables are an error.
pub fn copy_tables(donor_data: &[u8], target_data: &[u8], tags: &[Tag]) -> Result<Vec<u8>> {
    let donor = FontRef::new(donor_data).context("Failed to parse donor font")?;
    let target = FontRef::new(target_data).context("Failed to parse target font")?;

    if let (Ok(donor_maxp), Ok(target_maxp)) = (donor.maxp(), target.maxp())
        && donor_maxp.num_glyphs() != target_maxp.num_glyphs()
    {
        warn!(
            "Donor font has {} glyphs, target has {}",
            donor_maxp.num_glyphs(),
            target_maxp.num_glyphs()
        );
    }

    let mut copied = Vec::with_capacity(tags.len());
    for tag in tags {
        let table = donor
            .table_data(*tag)
            .with_context(|| format!("Donor font has no {tag} table"))?;
        copied.push((*tag, table.as_bytes().to_vec()));
    }

    put_tables(target_data, &copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFont;

    #[test]
    fn test_copy_tables_replaces_target_table() {
        let donor = TestFont::new("Donor-Regular").with_table(Tag::new(b"GSUB"), vec![1, 2, 3]).build();
        let target = TestFont::new("Target-Regular").build();

        let result = copy_tables(&donor, &target, &[Tag::new(b"GSUB")]).unwrap();
        let font = FontRef::new(&result).unwrap();
        assert_eq!(font.table_data(Tag::new(b"GSUB")).unwrap().as_bytes(), &[1, 2, 3]);
        assert!(font.table_data(Tag::new(b"name")).is_some());
    }

    #[test]
    fn test_copy_tables_missing_donor_table() {
        let donor = TestFont::new("Donor-Regular").build();
        let target = TestFont::new("Target-Regular").build();
        assert!(copy_tables(&donor, &target, &[Tag::new(b"GPOS")]).is_err());
    }

    #[test]
    fn test_drop_tables() {
        let data = TestFont::new("Foo-Regular").with_table(Tag::new(b"DSIG"), dsig_placeholder()).build();
        assert!(has_table(&data, Tag::new(b"DSIG")).unwrap());
        let dropped = drop_tables(&data, &[Tag::new(b"DSIG")]).unwrap();
        assert!(!has_table(&dropped, Tag::new(b"DSIG")).unwrap());
    }

    #[test]
    fn test_rewrite_font_keeps_untouched_tables() {
        let data = TestFont::new("Foo-Regular").with_table(Tag::new(b"DSIG"), dsig_placeholder()).build();
        let rewritten = rewrite_font(&data, |_, builder| {
            builder.add_raw(Tag::new(b"meta"), meta_table(&[]));
            Ok(())
        })
        .unwrap();
        let before = FontRef::new(&data).unwrap();
        let after = FontRef::new(&rewritten).unwrap();
        for record in before.table_directory.table_records() {
            let tag = record.tag();
            // checksumAdjustment covers the whole font
            if tag == Tag::new(b"head") {
                continue;
            }
            assert_eq!(
                after.table_data(tag).unwrap().as_bytes(),
                before.table_data(tag).unwrap().as_bytes(),
                "{tag} changed"
            );
        }
        assert!(after.table_data(Tag::new(b"meta")).is_some());
    }

    #[test]
    fn test_rewrite_font_propagates_edit_errors() {
        let data = TestFont::new("Foo-Regular").build();
        let result = rewrite_font(&data, |_, _| anyhow::bail!("no edit"));
        assert_eq!(result.unwrap_err().to_string(), "no edit");
    }
}
