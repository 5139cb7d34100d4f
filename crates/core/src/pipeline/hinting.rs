use std::io::Write;

use fontmill_font_ops::set_head_flags;
use log::{LevelFilter, info};
use read_fonts::tables::head::Flags;

use super::FontBuild;
use crate::{
    error::{Error, Result, ResultExt},
    format::Format,
    io::FontFile,
    quiet::QuietLog,
};

impl FontBuild<'_> {
    /// Instruct static TrueType outlines, hint CFF charstrings.
    pub(super) fn autohint(&self, data: &[u8]) -> Result<Vec<u8>> {
        let name = self.identity.name.as_str();
        match self.identity.format {
            Format::Ttf if !self.identity.variable => {
                info!("Autohinting {}", self.filename());
                let hinted = self
                    .hinter
                    .hint_truetype(data)
                    .toolkit("TrueType autohinting", name)?;
                set_head_flags(&hinted, Flags::FORCE_INTEGER_PPEM).font_op(name)
            }
            Format::Otf => {
                info!("Autohinting {}", self.filename());
                let mut file = tempfile::Builder::new()
                    .suffix(".otf")
                    .tempfile()
                    .map_err(|source| Error::Io {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                file.write_all(data).map_err(|source| Error::Io {
                    path: file.path().to_path_buf(),
                    source,
                })?;
                {
                    let _quiet = QuietLog::new(LevelFilter::Error);
                    self.hinter
                        .hint_cff_file(file.path())
                        .toolkit("CFF autohinting", name)?;
                }
                FontFile::new(file.path()).read()
            }
            _ => Ok(data.to_vec()),
        }
    }
}
