//! Bounds-checked big-endian reads over raw CFF bytes.

use anyhow::{Result, bail};

pub(crate) fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    match data.get(offset) {
        Some(value) => Ok(*value),
        None => bail!("Read past end of table at offset {offset}"),
    }
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    match data.get(offset..offset + 2) {
        Some(bytes) => Ok(u16::from_be_bytes([bytes[0], bytes[1]])),
        None => bail!("Read past end of table at offset {offset}"),
    }
}
