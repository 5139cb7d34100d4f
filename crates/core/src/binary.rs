use anyhow::Result;
use fontmill_font_web::{encode_woff, encode_woff2};

use crate::format::Format;

/// A serialized font, optionally flavored for the web.
///
/// The data is always the plain sfnt; the flavor is applied when the binary
/// is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontBinary {
    data: Vec<u8>,
    flavor: Option<Format>,
}

impl FontBinary {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, flavor: None }
    }

    /// A copy of this binary tagged with a web flavor.
    pub fn with_flavor(&self, flavor: Format) -> Self {
        Self {
            data: self.data.clone(),
            flavor: flavor.is_web().then_some(flavor),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn flavor(&self) -> Option<Format> {
        self.flavor
    }

    /// Bytes to write to disk, encoded for the flavor if there is one.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self.flavor {
            Some(Format::Woff) => encode_woff(&self.data),
            Some(Format::Woff2) => encode_woff2(&self.data),
            _ => Ok(self.data.clone()),
        }
    }
}
