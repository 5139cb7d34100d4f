//! Build stages for one font.
//!
//! A [`FontBuild`] runs the static or variable pipeline for each requested
//! outline format. Subsets and static instances re-enter later stages under an
//! [`IdentityScope`], so every artifact is named and placed after the identity
//! active when it is saved.

mod hinting;
mod instance;
mod postprocess;
mod sources;
mod subset;
mod suffix;

use std::{path::PathBuf, time::Instant};

use fontmill_font_ops::{cff::CFF, has_table};
use log::{debug, info};

use crate::{
    binary::FontBinary,
    config::FontConfig,
    error::{Result, ResultExt},
    format::Format,
    identity::{Identity, IdentityScope},
    io::FontFile,
    toolkit::{Autohinter, FontToolkit},
};

pub use postprocess::parse_version;

pub struct FontBuild<'a> {
    pub config: &'a FontConfig,
    pub identity: Identity,
    toolkit: &'a dyn FontToolkit,
    hinter: &'a dyn Autohinter,
    artifacts: Vec<PathBuf>,
}

impl<'a> FontBuild<'a> {
    pub fn new(
        config: &'a FontConfig,
        toolkit: &'a dyn FontToolkit,
        hinter: &'a dyn Autohinter,
    ) -> Self {
        let identity = Identity {
            name: config.name.clone(),
            format: config.outline_formats().next().unwrap_or(Format::Ttf),
            variable: config.variable,
            names: config.names.clone(),
            stat: config.stat.clone(),
        };
        Self {
            config,
            identity,
            toolkit,
            hinter,
            artifacts: Vec::new(),
        }
    }

    /// Enter a scope whose identity changes are undone when it ends.
    pub fn scope(&mut self) -> IdentityScope<'_, 'a> {
        IdentityScope::new(self)
    }

    /// Paths written so far, in order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// Build every requested format and return the written paths.
    pub fn build(&mut self) -> Result<Vec<PathBuf>> {
        info!("Building {}", self.identity.name);
        let start = Instant::now();
        {
            let mut scope = self.scope();
            if scope.identity.variable {
                scope.build_variable()?;
            } else {
                scope.build_static()?;
            }
        }
        debug!(
            "Built {} in {:.2}s",
            self.identity.name,
            start.elapsed().as_secs_f64()
        );
        Ok(self.artifacts.clone())
    }

    pub fn filename(&self) -> String {
        self.identity.filename()
    }

    /// Where the current identity's artifact goes:
    /// `<output>/<family prefix>/<FORMAT[VF][WEB]>/<name>.<ext>`.
    pub fn output_path(&self, flavor: Option<Format>) -> PathBuf {
        let identity = &self.identity;
        let mut dir = identity.format.dir_name().to_string();
        if identity.variable {
            dir.push_str("VF");
        }
        let extension = match flavor {
            Some(web) => {
                dir.push_str(web.dir_name());
                web.extension()
            }
            None => identity.format.extension(),
        };
        self.config
            .output
            .join(identity.family_prefix())
            .join(dir)
            .join(format!("{}.{extension}", identity.name))
    }

    /// Fonts with a `CFF ` table get specialized and subroutinized; `glyf`
    /// and `CFF2` outlines pass through.
    fn optimize(&self, data: &[u8]) -> Result<Vec<u8>> {
        if !has_table(data, CFF).font_op(&self.identity.name)? {
            return Ok(data.to_vec());
        }
        info!("Optimizing {}", self.filename());
        self.toolkit
            .optimize_cff(data)
            .toolkit("CFF optimization", &self.identity.name)
    }

    /// Save a copy of `data` in every requested web format.
    fn build_web(&mut self, data: &[u8]) -> Result<()> {
        let config = self.config;
        let binary = FontBinary::new(data.to_vec());
        for format in config.web_formats() {
            self.save(&binary.with_flavor(format))?;
        }
        Ok(())
    }

    fn save(&mut self, binary: &FontBinary) -> Result<()> {
        let file = FontFile::new(self.output_path(binary.flavor()));
        info!("Saving {}", file.path().display());
        let bytes = binary
            .to_bytes()
            .toolkit("web font encoding", &self.identity.name)?;
        file.write(bytes)?;
        self.artifacts.push(file.path().to_path_buf());
        Ok(())
    }
}
