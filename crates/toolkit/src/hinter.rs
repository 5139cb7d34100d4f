//! Autohinting through `ttfautohint` and `otfautohint`.

use std::{path::Path, process::Command};

use anyhow::{Result, bail};
use fontmill_core::Autohinter;

use crate::programs::{Programs, run};

#[derive(Debug, Clone, Default)]
pub struct ExternalHinter {
    programs: Programs,
}

impl ExternalHinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_programs(programs: Programs) -> Self {
        Self { programs }
    }

    /// Name ID 5 keeps the configured version string.
    fn ttfautohint_command(&self) -> Command {
        let mut command = Command::new(&self.programs.ttfautohint);
        command.arg("--no-info");
        command
    }
}

impl Autohinter for ExternalHinter {
    /// `ttfautohint` reading the font from stdin and writing it to stdout.
    fn hint_truetype(&self, data: &[u8]) -> Result<Vec<u8>> {
        let hinted = run(&mut self.ttfautohint_command(), Some(data))?;
        if hinted.is_empty() {
            bail!("{} produced no output", self.programs.ttfautohint);
        }
        Ok(hinted)
    }

    fn hint_cff_file(&self, path: &Path) -> Result<()> {
        run(Command::new(&self.programs.otfautohint).arg(path), None)?;
        Ok(())
    }
}
