use anyhow::{Context, Result, ensure};
use read_fonts::{FontRef, types::Tag};

pub(crate) struct SfntTable<'a> {
    pub tag: Tag,
    pub checksum: u32,
    pub data: &'a [u8],
}

/// The sfnt version and tables of a font, sorted by tag.
pub(crate) struct Sfnt<'a> {
    pub flavor: u32,
    pub tables: Vec<SfntTable<'a>>,
}

impl<'a> Sfnt<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let font = FontRef::new(data).context("Failed to parse sfnt")?;
        let mut tables = Vec::new();
        for record in font.table_directory.table_records() {
            let tag = record.tag();
            let table = font
                .table_data(tag)
                .with_context(|| format!("Table {tag} lies outside the font data"))?;
            tables.push(SfntTable {
                tag,
                checksum: record.checksum(),
                data: table.as_bytes(),
            });
        }
        ensure!(!tables.is_empty(), "Font has no tables");
        tables.sort_by_key(|t| t.tag);
        Ok(Self {
            flavor: font.table_directory.sfnt_version(),
            tables,
        })
    }

    /// Size of the font once decoded back to a plain sfnt.
    pub fn total_sfnt_size(&self) -> usize {
        12 + 16 * self.tables.len()
            + self
                .tables
                .iter()
                .map(|t| crate::pad4(t.data.len()))
                .sum::<usize>()
    }
}
