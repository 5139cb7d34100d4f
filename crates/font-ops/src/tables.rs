//! Small tables assembled directly from bytes.

use read_fonts::types::Tag;

pub const DSIG: Tag = Tag::new(b"DSIG");
pub const META: Tag = Tag::new(b"meta");

/// A `DSIG` table with version 1, no flags and zero signatures.
pub fn dsig_placeholder() -> Vec<u8> {
    let mut table = Vec::with_capacity(8);
    table.extend_from_slice(&1u32.to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes());
    table
}

/// A `meta` table (version 1) holding one data map per entry.
pub fn meta_table(entries: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    const HEADER_LEN: usize = 16;
    const RECORD_LEN: usize = 12;

    let mut table = Vec::new();
    table.extend_from_slice(&1u32.to_be_bytes());
    table.extend_from_slice(&0u32.to_be_bytes());
    table.extend_from_slice(&0u32.to_be_bytes());
    table.extend_from_slice(&(entries.len() as u32).to_be_bytes());

    let mut data_offset = HEADER_LEN + RECORD_LEN * entries.len();
    for (tag, data) in entries {
        table.extend_from_slice(&tag.to_be_bytes());
        table.extend_from_slice(&(data_offset as u32).to_be_bytes());
        table.extend_from_slice(&(data.len() as u32).to_be_bytes());
        data_offset += data.len();
    }
    for (_, data) in entries {
        table.extend_from_slice(data);
    }
    table
}
