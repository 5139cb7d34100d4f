//! Project loading and the per-font build loop.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info};
use serde_yaml::{Mapping, Value};

use crate::{
    config::{FONTS_KEY, FontConfig, merge_settings},
    error::{ConfigError, Error, Result, io_error},
    pipeline::FontBuild,
    toolkit::{Autohinter, FontToolkit},
};

/// Outcome of a run that continued past failures.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub artifacts: Vec<PathBuf>,
    pub failures: Vec<(String, Error)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Every font of a project, resolved up front.
#[derive(Debug)]
pub struct Builder {
    fonts: Vec<FontConfig>,
    keep_going: bool,
}

impl Builder {
    /// Load a project descriptor and resolve all of its fonts.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        let project: Mapping = serde_yaml::from_str(&text).map_err(|source| Error::Project {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_project(&project, path)
    }

    /// Resolve the fonts of an already parsed project located at `path`.
    pub fn from_project(project: &Mapping, path: &Path) -> Result<Self> {
        let fonts = match project.get(FONTS_KEY) {
            Some(Value::Mapping(fonts)) => fonts,
            _ => return Err(ConfigError::MissingFonts.into()),
        };
        if fonts.is_empty() {
            return Err(ConfigError::NoFonts.into());
        }

        let fonts = fonts
            .iter()
            .map(|(name, settings)| {
                let name = match name {
                    Value::String(name) => name.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_default(),
                };
                let settings = match settings {
                    Value::Mapping(settings) => settings.clone(),
                    Value::Null => Mapping::new(),
                    _ => return Err(ConfigError::FontSettingsNotMapping { font: name }.into()),
                };
                let merged = merge_settings(project, &settings);
                FontConfig::resolve(&name, &merged, path)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fonts,
            keep_going: false,
        })
    }

    /// Log a font's failure and continue with the next font instead of stopping.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn fonts(&self) -> &[FontConfig] {
        &self.fonts
    }

    /// Build every font in declaration order.
    ///
    /// Stops at the first failure unless [`keep_going`](Self::keep_going) is
    /// set, in which case failures are collected in the report.
    pub fn build(
        &self,
        toolkit: &dyn FontToolkit,
        hinter: &dyn Autohinter,
    ) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        for config in &self.fonts {
            let mut build = FontBuild::new(config, toolkit, hinter);
            match build.build() {
                Ok(artifacts) => report.artifacts.extend(artifacts),
                Err(e) if self.keep_going => {
                    error!("Failed to build {}: {e}", config.name);
                    report.artifacts.extend(build.artifacts().iter().cloned());
                    report.failures.push((config.name.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }
        info!("Wrote {} files", report.artifacts.len());
        Ok(report)
    }
}
