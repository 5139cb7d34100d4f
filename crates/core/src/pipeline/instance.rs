//! Static instances of a variable font.

use std::collections::BTreeMap;

use fontmill_font_ops::{NameTable, NamedInstance, named_instances, set_ribbi_bits};
use log::{debug, info};

use super::FontBuild;
use crate::{
    binary::FontBinary,
    config::{InstanceDef, Instances},
    error::{ConfigError, Result, ResultExt},
    toolkit::Location,
};

/// The name record that only variable fonts carry.
const VARIATIONS_POSTSCRIPT_NAME_PREFIX: u16 = 25;

/// One static instance to extract.
#[derive(Debug, Clone, PartialEq)]
struct InstanceJob {
    name: String,
    location: Location,
    names: BTreeMap<u16, String>,
}

impl FontBuild<'_> {
    /// Extract the configured static instances of a variable binary.
    pub(super) fn instantiate(&mut self, data: &[u8]) -> Result<()> {
        let config = self.config;
        let Some(instances) = &config.instances else {
            return Ok(());
        };
        if !self.identity.variable {
            return Ok(());
        }
        info!("Instancing {} statics", self.filename());

        let declared = named_instances(data).font_op(&self.identity.name)?;
        for job in self.instance_jobs(instances, &declared)? {
            let copy = match self.toolkit.update_instance_names(data, &job.location) {
                Ok(renamed) => renamed,
                Err(e) => {
                    debug!("Keeping {} names for {}: {e:#}", self.identity.name, job.name);
                    data.to_vec()
                }
            };

            let mut scope = self.scope();
            scope.identity.name = job.name;
            scope.identity.variable = false;
            scope.identity.stat = None;
            info!("Creating {}", scope.filename());

            let name = scope.identity.name.clone();
            let instance = scope
                .toolkit
                .instantiate(&copy, &job.location)
                .toolkit("instancing", &name)?;
            let mut table = NameTable::from_data(&instance).font_op(&name)?;
            table.remove(VARIATIONS_POSTSCRIPT_NAME_PREFIX);
            let instance = table.apply(&instance).font_op(&name)?;
            let instance = set_ribbi_bits(&instance).font_op(&name)?;

            scope.identity.names = job.names;
            let instance = scope.postprocess(&instance)?;
            scope.save(&FontBinary::new(instance.clone()))?;
            scope.build_web(&instance)?;
        }
        Ok(())
    }

    /// Resolve the instance configuration against the font's named instances.
    fn instance_jobs(
        &self,
        instances: &Instances,
        declared: &[NamedInstance],
    ) -> Result<Vec<InstanceJob>> {
        match instances {
            Instances::All => Ok(declared
                .iter()
                .map(|instance| InstanceJob {
                    name: self.default_instance_name(instance),
                    location: instance.coordinates.clone(),
                    names: BTreeMap::new(),
                })
                .collect()),
            Instances::Named(named) => named
                .iter()
                .map(|(key, def)| self.named_instance_job(key, def, declared))
                .collect(),
        }
    }

    fn default_instance_name(&self, instance: &NamedInstance) -> String {
        let name = match (&instance.postscript_name, &instance.subfamily) {
            (Some(postscript_name), _) => postscript_name.clone(),
            (None, Some(subfamily)) => {
                format!("{}-{subfamily}", self.identity.family_prefix())
            }
            (None, None) => format!(
                "{}-{}",
                self.identity.family_prefix(),
                instance.subfamily_name_id
            ),
        };
        name.replace(' ', "")
    }

    fn named_instance_job(
        &self,
        key: &str,
        def: &InstanceDef,
        declared: &[NamedInstance],
    ) -> Result<InstanceJob> {
        let location = match &def.coordinates {
            Some(coordinates) => coordinates.clone(),
            None => declared
                .iter()
                .find(|instance| instance_matches(instance, key))
                .map(|instance| instance.coordinates.clone())
                .ok_or_else(|| ConfigError::UnmatchedInstance {
                    font: self.identity.name.clone(),
                    key: key.to_string(),
                })?,
        };
        Ok(InstanceJob {
            name: key.to_string(),
            location,
            names: def.names.clone(),
        })
    }
}

/// A key names an instance by PostScript name, by subfamily, or as
/// `<family>-<subfamily>` with the subfamily's spaces optionally removed.
fn instance_matches(instance: &NamedInstance, key: &str) -> bool {
    if instance.postscript_name.as_deref() == Some(key) {
        return true;
    }
    let Some(subfamily) = instance.subfamily.as_deref() else {
        return false;
    };
    if subfamily == key {
        return true;
    }
    key.split_once('-').is_some_and(|(_, style)| {
        style == subfamily || style == subfamily.replace(' ', "")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::types::Tag;

    fn instance(subfamily: &str, postscript_name: Option<&str>, weight: f64) -> NamedInstance {
        NamedInstance {
            subfamily_name_id: 256,
            subfamily: Some(subfamily.to_string()),
            postscript_name: postscript_name.map(str::to_string),
            coordinates: vec![(Tag::new(b"wght"), weight)],
        }
    }

    #[test]
    fn test_instance_matches() {
        let semi_bold = instance("Semi Bold", None, 600.0);
        assert!(instance_matches(&semi_bold, "Semi Bold"));
        assert!(instance_matches(&semi_bold, "Foo-SemiBold"));
        assert!(instance_matches(&semi_bold, "Foo-Semi Bold"));
        assert!(!instance_matches(&semi_bold, "Foo-Bold"));

        let bold = instance("Bold", Some("FooPro-Bd"), 700.0);
        assert!(instance_matches(&bold, "FooPro-Bd"));
        assert!(instance_matches(&bold, "Foo-Bold"));
    }
}
