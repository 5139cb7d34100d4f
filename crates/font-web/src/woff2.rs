//! WOFF2 through `ttf2woff2`.

use anyhow::{Result, anyhow};
use ttf2woff2::BrotliQuality;

use crate::sfnt::Sfnt;

/// Encode an sfnt binary as WOFF2 at the highest brotli quality.
///
/// The input is checked as an sfnt first so a malformed font reports the
/// same error as the WOFF encoder.
pub fn encode_woff2(data: &[u8]) -> Result<Vec<u8>> {
    Sfnt::parse(data)?;
    ttf2woff2::encode(data, BrotliQuality::default())
        .map_err(|e| anyhow!("Failed to encode WOFF2: {e}"))
}
