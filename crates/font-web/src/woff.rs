//! WOFF 1.0: per-table zlib compression.

use std::io::Write;

use anyhow::Result;
use flate2::{Compression, write::ZlibEncoder};

use crate::{pad4, sfnt::Sfnt};

const SIGNATURE: &[u8; 4] = b"wOFF";
const HEADER_LEN: usize = 44;
const DIRECTORY_ENTRY_LEN: usize = 20;

/// Encode an sfnt binary as WOFF 1.0.
///
/// Tables are stored compressed unless compression does not make them smaller.
pub fn encode_woff(data: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(data)?;

    let mut stored = Vec::with_capacity(sfnt.tables.len());
    for table in &sfnt.tables {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(table.data)?;
        let compressed = encoder.finish()?;
        if compressed.len() < table.data.len() {
            stored.push(compressed);
        } else {
            stored.push(table.data.to_vec());
        }
    }

    let mut offset = HEADER_LEN + DIRECTORY_ENTRY_LEN * sfnt.tables.len();
    let mut directory = Vec::with_capacity(DIRECTORY_ENTRY_LEN * sfnt.tables.len());
    for (table, body) in sfnt.tables.iter().zip(&stored) {
        directory.extend_from_slice(&table.tag.to_be_bytes());
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(body.len() as u32).to_be_bytes());
        directory.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        directory.extend_from_slice(&table.checksum.to_be_bytes());
        offset += pad4(body.len());
    }
    let total_len = offset;

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&sfnt.flavor.to_be_bytes());
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&(sfnt.tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(sfnt.total_sfnt_size() as u32).to_be_bytes());
    // Font version 1.0; no metadata or private blocks.
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&directory);
    for body in &stored {
        out.extend_from_slice(body);
        out.resize(pad4(out.len()), 0);
    }
    Ok(out)
}
