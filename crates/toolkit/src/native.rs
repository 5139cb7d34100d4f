//! The default [`FontToolkit`].

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result, bail};
use fontmill_core::{CompileRequest, Format, FontToolkit, Master, StatSpec, SubsetRequest};
use fontmill_font_subsetter::Subsetter;
use log::debug;
use read_fonts::types::Tag;
use tempfile::TempDir;

use crate::{
    naming,
    programs::{Programs, run},
    stat,
};

/// Compiles and instances through `fontmake`, `fonttools` and `cffsubr`;
/// subsets, builds `STAT` and renames instances in-process.
#[derive(Debug, Clone, Default)]
pub struct NativeToolkit {
    programs: Programs,
}

impl NativeToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_programs(programs: Programs) -> Self {
        Self { programs }
    }

    pub fn programs(&self) -> &Programs {
        &self.programs
    }

    fn compile_command(&self, request: &CompileRequest<'_>, output: &Path) -> Command {
        let mut command = Command::new(&self.programs.fontmake);
        command
            .arg("-u")
            .arg(request.source)
            .args(["-o", request.format.extension()])
            .arg("--output-path")
            .arg(output);
        if request.remove_overlaps {
            command.args(["--overlaps-backend", "pathops"]);
        } else {
            command.arg("--keep-overlaps");
        }
        if request.format == Format::Otf {
            command.args(["--optimize-cff", "0"]);
        }
        if !request.feature_writers {
            command.args(["--feature-writer", "None"]);
        }
        command
    }

    fn interpolatable_command(&self, masters: &[PathBuf], format: Format, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.programs.fontmake);
        command
            .arg("-u")
            .args(masters)
            .arg("-o")
            .arg(format!("{}-interpolatable", format.extension()))
            .arg("--output-dir")
            .arg(output_dir);
        if format == Format::Otf {
            command.args(["--optimize-cff", "0"]);
        }
        command
    }

    fn merge_command(&self, designspace: &Path, format: Format, master_dir: &Path, output: &Path) -> Command {
        let finder = master_dir.join(format!("{{stem}}.{}", format.extension()));
        let mut command = Command::new(&self.programs.fonttools);
        command
            .arg("varLib")
            .arg(designspace)
            .arg("-o")
            .arg(output)
            .arg("--master-finder")
            .arg(finder);
        command
    }

    /// Axes missing from `location` are pinned at their defaults.
    fn instancer_command(&self, input: &Path, location: &[(Tag, f64)], output: &Path) -> Command {
        let mut command = Command::new(&self.programs.fonttools);
        command.arg("varLib.instancer").arg(input);
        for (tag, value) in location {
            command.arg(format!("{}={value}", tag.to_string().trim_end()));
        }
        command.arg("--static").arg("-o").arg(output);
        command
    }
}

/// Scratch directory holding one input font and the tool's output.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("fontmill-")
            .tempdir()
            .context("Failed to create a scratch directory")?;
        Ok(Self { dir })
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    fn write(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.path(file_name);
        fs::write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.path(file_name);
        fs::read(&path).with_context(|| format!("Tool did not produce {}", path.display()))
    }
}

/// Extension of an sfnt binary, used for scratch file names.
fn sfnt_extension(data: &[u8]) -> &'static str {
    if data.starts_with(b"OTTO") { "otf" } else { "ttf" }
}

impl FontToolkit for NativeToolkit {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<Vec<u8>> {
        if !request.format.is_outline() {
            bail!("Cannot compile directly to {}", request.format);
        }
        let workspace = Workspace::new()?;
        let file_name = format!("font.{}", request.format.extension());
        run(&mut self.compile_command(request, &workspace.path(&file_name)), None)?;
        workspace.read(&file_name)
    }

    fn compile_interpolatable(&self, masters: &[PathBuf], format: Format) -> Result<Vec<Master>> {
        let workspace = Workspace::new()?;
        run(
            &mut self.interpolatable_command(masters, format, workspace.dir.path()),
            None,
        )?;
        masters
            .iter()
            .map(|master| -> Result<Master> {
                let name = master
                    .file_stem()
                    .with_context(|| format!("Master {} has no file name", master.display()))?
                    .to_string_lossy()
                    .into_owned();
                let data = workspace.read(&format!("{name}.{}", format.extension()))?;
                Ok(Master { name, data })
            })
            .collect()
    }

    fn merge_masters(&self, designspace: &Path, format: Format, masters: &[Master]) -> Result<Vec<u8>> {
        let workspace = Workspace::new()?;
        let master_dir = workspace.path("masters");
        fs::create_dir(&master_dir)
            .with_context(|| format!("Failed to create {}", master_dir.display()))?;
        for master in masters {
            let path = master_dir.join(format!("{}.{}", master.name, format.extension()));
            fs::write(&path, &master.data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        let file_name = format!("variable.{}", format.extension());
        run(
            &mut self.merge_command(designspace, format, &master_dir, &workspace.path(&file_name)),
            None,
        )?;
        workspace.read(&file_name)
    }

    fn decompose_overlapping_components(&self, data: &[u8]) -> Result<Vec<u8>> {
        let workspace = Workspace::new()?;
        let input = workspace.write("input.ttf", data)?;
        let output = workspace.path("output.ttf");
        run(
            Command::new(&self.programs.fonttools)
                .arg("ttLib.removeOverlaps")
                .arg(&input)
                .arg(&output),
            None,
        )?;
        workspace.read("output.ttf")
    }

    fn subset(&self, data: &[u8], request: &SubsetRequest<'_>) -> Result<Vec<u8>> {
        Subsetter::new()
            .with_glyph_names(request.glyphs.iter().cloned())
            .with_scripts(request.scripts.iter().cloned())
            .subset(data)
    }

    fn build_stat(&self, data: &[u8], spec: &StatSpec) -> Result<Vec<u8>> {
        stat::build_stat(data, spec)
    }

    fn build_default_stat(&self, data: &[u8]) -> Result<Vec<u8>> {
        stat::build_default_stat(data)
    }

    fn instantiate(&self, data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>> {
        let workspace = Workspace::new()?;
        let extension = sfnt_extension(data);
        let input = workspace.write(&format!("variable.{extension}"), data)?;
        let file_name = format!("instance.{extension}");
        debug!("Instancing {} axes", location.len());
        run(
            &mut self.instancer_command(&input, location, &workspace.path(&file_name)),
            None,
        )?;
        workspace.read(&file_name)
    }

    fn update_instance_names(&self, data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>> {
        naming::update_instance_names(data, location)
    }

    fn optimize_cff(&self, data: &[u8]) -> Result<Vec<u8>> {
        let workspace = Workspace::new()?;
        let input = workspace.write("input.otf", data)?;
        let output = workspace.path("output.otf");
        run(
            Command::new(&self.programs.cffsubr)
                .arg("-o")
                .arg(&output)
                .arg(&input),
            None,
        )?;
        workspace.read("output.otf")
    }
}
