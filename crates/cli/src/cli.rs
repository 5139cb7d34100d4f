//! CLI definitions and the build entry point.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use env_logger::Env;

use fontmill_core::Builder;
use fontmill_toolkit::{ExternalHinter, NativeToolkit};

#[derive(Debug, Parser)]
#[command(name = "fontmill")]
#[command(about = "Build the fonts declared in a YAML project descriptor")]
pub struct Cli {
    /// Project descriptor (YAML)
    pub project: PathBuf,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Keep building the remaining fonts after one fails
    #[arg(long)]
    pub keep_going: bool,
}

impl Cli {
    /// Default log level for this invocation; `RUST_LOG` takes precedence.
    pub fn log_level(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }

    pub fn init_logging(&self) {
        env_logger::Builder::from_env(Env::default().default_filter_or(self.log_level()))
            .format_timestamp(None)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        let builder = Builder::load(&self.project)?.keep_going(self.keep_going);
        let fonts = builder.fonts().len();
        let report = builder.build(&NativeToolkit::new(), &ExternalHinter::new())?;

        if !report.is_success() {
            let failed = report
                .failures
                .iter()
                .map(|(font, _)| font.as_str())
                .collect::<Vec<_>>();
            bail!("{} of {fonts} fonts failed: {}", failed.len(), failed.join(", "));
        }
        Ok(())
    }
}
