use std::collections::BTreeMap;

use fontmill_font_ops::NameTable;
use log::info;

use super::{FontBuild, postprocess::set_names};
use crate::error::{Result, ResultExt};

const FAMILY: u16 = 1;
const FULL_NAME: u16 = 4;
const POSTSCRIPT_NAME: u16 = 6;
const TYPOGRAPHIC_FAMILY: u16 = 16;
const COMPATIBLE_FULL_NAME: u16 = 18;
const WWS_FAMILY: u16 = 21;

impl FontBuild<'_> {
    /// Append the variable-font suffix to family, full and PostScript names.
    pub(super) fn add_vf_suffix(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let config = self.config;
        let Some(suffix) = config.vf_suffix.as_deref() else {
            return Ok(data.to_vec());
        };
        if !self.identity.variable {
            return Ok(data.to_vec());
        }
        info!("Adding “{suffix}” suffix to {} names", self.filename());

        let table = NameTable::from_data(data).font_op(&self.identity.name)?;
        let names = suffixed_names(&table, suffix);

        let mut scope = self.scope();
        scope.identity.names = names;
        set_names(&scope, data)
    }
}

fn suffixed_names(table: &NameTable, suffix: &str) -> BTreeMap<u16, String> {
    let mut names = BTreeMap::new();
    for id in [FAMILY, TYPOGRAPHIC_FAMILY, WWS_FAMILY] {
        if let Some(name) = table.get(id) {
            names.insert(id, format!("{name} {suffix}"));
        }
    }

    let Some(family) = table.get(TYPOGRAPHIC_FAMILY).or(table.get(FAMILY)) else {
        return names;
    };
    if let Some(postscript_name) = table.get(POSTSCRIPT_NAME) {
        let postscript_family = family.replace(' ', "");
        names.insert(
            POSTSCRIPT_NAME,
            postscript_name.replace(&postscript_family, &format!("{postscript_family}{suffix}")),
        );
    }
    for id in [FULL_NAME, COMPATIBLE_FULL_NAME] {
        if let Some(full_name) = table.get(id) {
            names.insert(id, full_name.replace(family, &format!("{family} {suffix}")));
        }
    }
    names
}
