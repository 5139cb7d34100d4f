//! Glyph name lookup and renaming.
//!
//! Names live in `post` (version 2) for TrueType outlines and in the CFF
//! charset for PostScript outlines.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use read_fonts::{FontRef, TableProvider, types::GlyphId16};
use write_fonts::{from_obj::ToOwnedTable, tables::post::Post};

use crate::{
    cff::{CFF, CffEditor},
    put_tables, rewrite_font,
};

/// Production glyph names in glyph order.
///
/// Fonts without names (`post` version 3 and no CFF) give an empty list.
pub fn glyph_names(data: &[u8]) -> Result<Vec<String>> {
    let font = FontRef::new(data)?;
    let num_glyphs = font.maxp()?.num_glyphs();

    if let Ok(cff) = font.cff() {
        let charset = cff
            .charset(0)
            .map_err(|e| anyhow::anyhow!("Failed to read CFF charset: {e}"))?
            .context("CFF table has no charset")?;
        let mut names = Vec::with_capacity(num_glyphs as usize);
        for (_, sid) in charset.iter() {
            let name = cff
                .string(sid)
                .with_context(|| format!("CFF string {} is missing", sid.to_u16()))?;
            names.push(name.chars().collect::<String>());
        }
        return Ok(names);
    }

    let post = font.post()?;
    let names = (0..num_glyphs)
        .map_while(|gid| post.glyph_name(GlyphId16::new(gid)).map(str::to_string))
        .collect::<Vec<_>>();
    if names.len() != num_glyphs as usize {
        return Ok(Vec::new());
    }
    Ok(names)
}

/// Rename glyphs, mapping old production names to new ones.
///
/// Names missing from `renames` are kept. A font that carries no glyph
/// names is returned unchanged with a warning.
pub fn rename_glyphs(data: &[u8], renames: &BTreeMap<String, String>) -> Result<Vec<u8>> {
    if renames.is_empty() {
        return Ok(data.to_vec());
    }
    let current = glyph_names(data)?;
    if current.is_empty() {
        warn!("Font has no glyph names to rename");
        return Ok(data.to_vec());
    }

    let mut renamed = 0usize;
    let names = current
        .iter()
        .map(|name| match renames.get(name) {
            Some(new_name) => {
                renamed += 1;
                new_name.clone()
            }
            None => name.clone(),
        })
        .collect::<Vec<_>>();
    debug!("Renaming {renamed} of {} glyphs", names.len());

    let font = FontRef::new(data)?;
    if let Some(table) = font.table_data(CFF) {
        let mut editor = CffEditor::parse(table.as_bytes())?;
        if editor.is_cid() {
            bail!("Cannot rename glyphs in a CID-keyed CFF font");
        }
        editor.set_glyph_names(&names)?;
        let cff = editor.build()?;
        return put_tables(data, &[(CFF, cff)]);
    }

    rewrite_font(data, |font, builder| {
        let mut post: Post = font.post()?.to_owned_table();
        let named = Post::new_v2(names.iter().map(String::as_str));
        post.version = named.version;
        post.glyph_name_index = named.glyph_name_index;
        post.string_data = named.string_data;
        builder.add_table(&post)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFont;
    use pretty_assertions::assert_eq;

    fn renames(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn test_glyph_names_from_post() {
        let data = TestFont::new("Foo-Regular").build();
        assert_eq!(glyph_names(&data).unwrap(), vec![".notdef", "A", "B"]);
    }

    #[test]
    fn test_glyph_names_from_cff() {
        let data = TestFont::new("Foo-Regular")
            .with_glyphs(&[".notdef", "uni0041", "f_f"])
            .with_cff()
            .build();
        assert_eq!(glyph_names(&data).unwrap(), vec![".notdef", "uni0041", "f_f"]);
    }

    #[test]
    fn test_rename_glyphs_truetype() {
        let data = TestFont::new("Foo-Regular")
            .with_glyphs(&[".notdef", "uni0041", "uni0042"])
            .build();
        let updated = rename_glyphs(&data, &renames(&[("uni0041", "A"), ("missing", "x")])).unwrap();
        assert_eq!(glyph_names(&updated).unwrap(), vec![".notdef", "A", "uni0042"]);
    }

    #[test]
    fn test_rename_glyphs_cff() {
        let data = TestFont::new("Foo-Regular")
            .with_glyphs(&[".notdef", "uni0041", "uni0042"])
            .with_cff()
            .build();
        let updated = rename_glyphs(&data, &renames(&[("uni0042", "B")])).unwrap();
        assert_eq!(glyph_names(&updated).unwrap(), vec![".notdef", "uni0041", "B"]);
    }

    #[test]
    fn test_rename_glyphs_empty_map_is_identity() {
        let data = TestFont::new("Foo-Regular").build();
        assert_eq!(rename_glyphs(&data, &BTreeMap::new()).unwrap(), data);
    }

    #[test]
    fn test_rename_glyphs_mixes_standard_and_custom_names() {
        let data = TestFont::new("Foo-Regular")
            .with_glyphs(&[".notdef", "uni0020", "uni0041", "B"])
            .build();
        let updated = rename_glyphs(
            &data,
            &renames(&[("uni0020", "space"), ("uni0041", "A.alt"), ("B", "b.sc")]),
        )
        .unwrap();
        assert_eq!(
            glyph_names(&updated).unwrap(),
            vec![".notdef", "space", "A.alt", "b.sc"]
        );

        let font = FontRef::new(&updated).unwrap();
        let post = font.post().unwrap();
        assert_eq!(post.version(), read_fonts::types::Version16Dot16::VERSION_2_0);
        assert_eq!(post.num_glyphs(), Some(4));
    }
}
