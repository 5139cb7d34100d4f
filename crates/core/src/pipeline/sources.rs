//! Compiling sources and preparing the compiled binaries.

use std::path::Path;

use fontmill_font_ops::{copy_tables, rename_glyphs, set_fs_type, update_max_context};
use log::info;

use super::FontBuild;
use crate::{
    binary::FontBinary,
    error::{ConfigError, Result, ResultExt},
    format::Format,
    io::FontFile,
    toolkit::CompileRequest,
};

impl FontBuild<'_> {
    pub(super) fn build_static(&mut self) -> Result<()> {
        let config = self.config;
        for format in config.outline_formats() {
            self.identity.format = format;
            info!("Compiling {}", self.filename());
            let request = CompileRequest {
                source: &config.source,
                format,
                remove_overlaps: true,
                feature_writers: !config.donor.as_ref().is_some_and(|d| d.replaces_layout()),
            };
            let data = self
                .toolkit
                .compile(&request)
                .toolkit("compilation", &self.identity.name)?;
            let mut data = self.prepare(&data)?;

            if format == Format::Ttf && config.decompose_overlapping {
                info!("Decomposing {} overlapping components", self.identity.name);
                data = self
                    .toolkit
                    .decompose_overlapping_components(&data)
                    .toolkit("overlap removal", &self.identity.name)?;
            }
            if let Some(donor) = config.donor.as_ref().and_then(|d| d.sources.first()) {
                data = self.copy_donor_tables(&data, donor)?;
            }

            self.finish(data)?;
        }
        Ok(())
    }

    pub(super) fn build_variable(&mut self) -> Result<()> {
        let config = self.config;
        for format in config.outline_formats() {
            self.identity.format = format;
            info!("Compiling {} masters", self.filename());
            let mut masters = self
                .toolkit
                .compile_interpolatable(&config.masters, format)
                .toolkit("interpolatable compilation", &self.identity.name)?;
            for master in &mut masters {
                master.data = self.prepare(&master.data)?;
            }

            if let Some(donor) = config.donor.as_ref().filter(|d| !d.sources.is_empty()) {
                if donor.sources.len() != masters.len() {
                    return Err(ConfigError::DonorCountMismatch {
                        font: self.identity.name.clone(),
                        donors: donor.sources.len(),
                        masters: masters.len(),
                    }
                    .into());
                }
                for (master, source) in masters.iter_mut().zip(&donor.sources) {
                    let mut scope = self.scope();
                    scope.identity.name = master.name.clone();
                    master.data = scope.copy_donor_tables(&master.data, source)?;
                }
            }

            info!("Merging {}", self.filename());
            let data = self
                .toolkit
                .merge_masters(&config.source, format, &masters)
                .toolkit("master merging", &self.identity.name)?;

            self.finish(data)?;
        }
        Ok(())
    }

    /// Stages shared by static and variable builds, after compilation.
    fn finish(&mut self, data: Vec<u8>) -> Result<()> {
        let data = self.postprocess(&data)?;
        let data = self.autohint(&data)?;
        self.subset(&data)?;
        self.instantiate(&data)?;
        let data = self.add_vf_suffix(&data)?;
        let data = self.optimize(&data)?;
        self.build_web(&data)?;
        self.save(&FontBinary::new(data))
    }

    /// Apply final glyph names and embedding permissions to a fresh binary.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let config = self.config;
        let mut data = data.to_vec();
        if !config.glyph_renames.is_empty() {
            info!("Setting {} final glyph names", self.identity.name);
            data = rename_glyphs(&data, &config.glyph_renames).font_op(&self.identity.name)?;
        }
        if let Some(fs_type) = config.fs_type {
            data = set_fs_type(&data, fs_type).font_op(&self.identity.name)?;
        }
        Ok(data)
    }

    fn copy_donor_tables(&self, data: &[u8], donor: &Path) -> Result<Vec<u8>> {
        let Some(spec) = &self.config.donor else {
            return Ok(data.to_vec());
        };
        let donor_data = FontFile::new(donor).read()?;
        let tables = spec
            .tables
            .iter()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "Copying {tables} from {} to {}",
            donor.display(),
            self.identity.name
        );
        let data = copy_tables(&donor_data, data, &spec.tables).font_op(&self.identity.name)?;
        update_max_context(&data).font_op(&self.identity.name)
    }
}
