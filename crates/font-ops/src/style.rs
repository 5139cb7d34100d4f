//! `head` and `OS/2` field updates.

use anyhow::{Result, ensure};
use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        head::{Flags, Head, MacStyle},
        os2::{Os2, SelectionFlags},
    },
    types::Fixed,
};

use crate::{name::NameTable, rewrite_font};

/// Set `head.fontRevision`.
pub fn set_font_revision(data: &[u8], revision: f64) -> Result<Vec<u8>> {
    rewrite_font(data, |font, builder| {
        let mut head: Head = font.head()?.to_owned_table();
        head.font_revision = Fixed::from_f64(revision);
        builder.add_table(&head)?;
        Ok(())
    })
}

/// Add `flags` to `head.flags`.
pub fn set_head_flags(data: &[u8], flags: Flags) -> Result<Vec<u8>> {
    rewrite_font(data, |font, builder| {
        let mut head: Head = font.head()?.to_owned_table();
        head.flags |= flags;
        builder.add_table(&head)?;
        Ok(())
    })
}

/// Set `OS/2.fsType` (embedding permissions).
pub fn set_fs_type(data: &[u8], fs_type: u16) -> Result<Vec<u8>> {
    rewrite_font(data, |font, builder| {
        let mut os2: Os2 = font.os2()?.to_owned_table();
        os2.fs_type = fs_type;
        builder.add_table(&os2)?;
        Ok(())
    })
}

/// The `OS/2.achVendID` code, without NUL padding.
pub fn vendor_id(font: &FontRef) -> Result<String> {
    let tag = font.os2()?.ach_vend_id();
    Ok(String::from_utf8_lossy(&tag.to_be_bytes())
        .trim_end_matches('\0')
        .to_string())
}

/// Recompute the regular, bold and italic bits of `head.macStyle` and
/// `OS/2.fsSelection` from the English subfamily name.
///
/// Fonts whose subfamily is not one of Regular, Bold, Italic or Bold Italic
/// are left unchanged.
pub fn set_ribbi_bits(data: &[u8]) -> Result<Vec<u8>> {
    let names = NameTable::from_data(data)?;
    let Some(subfamily) = names.get(2).map(str::to_lowercase) else {
        return Ok(data.to_vec());
    };
    let (bold, italic) = match subfamily.as_str() {
        "regular" => (false, false),
        "bold" => (true, false),
        "italic" => (false, true),
        "bold italic" => (true, true),
        _ => return Ok(data.to_vec()),
    };

    rewrite_font(data, |font, builder| {
        let mut head: Head = font.head()?.to_owned_table();
        head.mac_style.remove(MacStyle::BOLD | MacStyle::ITALIC);
        if bold {
            head.mac_style.insert(MacStyle::BOLD);
        }
        if italic {
            head.mac_style.insert(MacStyle::ITALIC);
        }

        let mut os2: Os2 = font.os2()?.to_owned_table();
        os2.fs_selection
            .remove(SelectionFlags::ITALIC | SelectionFlags::BOLD | SelectionFlags::REGULAR);
        os2.fs_selection.insert(match (bold, italic) {
            (false, false) => SelectionFlags::REGULAR,
            (true, false) => SelectionFlags::BOLD,
            (false, true) => SelectionFlags::ITALIC,
            (true, true) => SelectionFlags::BOLD | SelectionFlags::ITALIC,
        });

        builder.add_table(&head)?;
        builder.add_table(&os2)?;
        Ok(())
    })
}

/// Recompute `OS/2.xAvgCharWidth` as the average of all non-zero advances.
pub fn update_avg_char_width(data: &[u8]) -> Result<Vec<u8>> {
    rewrite_font(data, |font, builder| {
        let advances = font
            .hmtx()?
            .h_metrics()
            .iter()
            .map(|m| m.advance() as u32)
            .filter(|advance| *advance > 0)
            .collect::<Vec<_>>();
        ensure!(!advances.is_empty(), "Font has no advance widths");
        let average = advances.iter().sum::<u32>() as f64 / advances.len() as f64;

        let mut os2: Os2 = font.os2()?.to_owned_table();
        os2.x_avg_char_width = average.round() as i16;
        builder.add_table(&os2)?;
        Ok(())
    })
}
