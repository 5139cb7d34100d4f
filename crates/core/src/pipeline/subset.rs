use log::{LevelFilter, info};

use super::{FontBuild, postprocess::set_names};
use crate::{
    binary::FontBinary,
    error::{Result, ResultExt},
    quiet::QuietLog,
    toolkit::SubsetRequest,
};

impl FontBuild<'_> {
    /// Build every configured subset of `data`.
    ///
    /// Each subset runs under its own name and name overrides and goes
    /// through optimization, naming, instancing, web derivation and saving.
    pub(super) fn subset(&mut self, data: &[u8]) -> Result<()> {
        let config = self.config;
        for (name, subset) in &config.subsets {
            let mut scope = self.scope();
            scope.identity.name = name.clone();
            info!("Subsetting {}", scope.filename());

            let request = SubsetRequest {
                glyphs: &subset.spec.glyphs,
                scripts: &subset.spec.scripts,
            };
            let subsetted = {
                let _quiet = QuietLog::new(LevelFilter::Error);
                scope.toolkit.subset(data, &request)
            }
            .toolkit("subsetting", name)?;

            scope.identity.names = subset.names.clone();
            let subsetted = scope.optimize(&subsetted)?;
            let subsetted = set_names(&scope, &subsetted)?;
            scope.instantiate(&subsetted)?;
            scope.build_web(&subsetted)?;
            scope.save(&FontBinary::new(subsetted))?;
        }
        Ok(())
    }
}
