#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use fontmill_core::{Autohinter, CompileRequest, FontToolkit, Format, Master, StatSpec, SubsetRequest};
use fontmill_font_ops::{drop_tables, put_tables, testing::TestFont};
use read_fonts::types::Tag;
use tempfile::TempDir;

pub const STAT: Tag = Tag::new(b"STAT");
pub const FVAR: Tag = Tag::new(b"fvar");

/// Toolkit that returns canned binaries and records every call.
pub struct FakeToolkit {
    pub calls: RefCell<Vec<String>>,
    pub compiled: Vec<u8>,
    pub variable: Vec<u8>,
    pub fail_subset: bool,
    pub fail_instantiate: bool,
    pub masters: Option<usize>,
    pub merged: RefCell<Vec<Master>>,
}

impl FakeToolkit {
    pub fn new(compiled: Vec<u8>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            compiled,
            variable: Vec::new(),
            fail_subset: false,
            fail_instantiate: false,
            masters: None,
            merged: RefCell::new(Vec::new()),
        }
    }

    pub fn with_variable(mut self, variable: Vec<u8>) -> Self {
        self.variable = variable;
        self
    }

    pub fn failing_subset(mut self) -> Self {
        self.fail_subset = true;
        self
    }

    pub fn failing_instantiate(mut self) -> Self {
        self.fail_instantiate = true;
        self
    }

    /// Compile only the first `count` masters.
    pub fn returning_masters(mut self, count: usize) -> Self {
        self.masters = Some(count);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl FontToolkit for FakeToolkit {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<Vec<u8>> {
        self.record(format!(
            "compile {} features={}",
            request.format, request.feature_writers
        ));
        Ok(self.compiled.clone())
    }

    fn compile_interpolatable(&self, masters: &[PathBuf], format: Format) -> Result<Vec<Master>> {
        self.record(format!("compile_interpolatable {format} {}", masters.len()));
        Ok(masters
            .iter()
            .take(self.masters.unwrap_or(masters.len()))
            .map(|path| Master {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                data: self.compiled.clone(),
            })
            .collect())
    }

    fn merge_masters(&self, _: &Path, format: Format, masters: &[Master]) -> Result<Vec<u8>> {
        let names = masters.iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
        self.record(format!("merge {format} {}", names.join(",")));
        self.merged.borrow_mut().extend(masters.iter().cloned());
        Ok(self.variable.clone())
    }

    fn decompose_overlapping_components(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.record("decompose".to_string());
        Ok(data.to_vec())
    }

    fn subset(&self, data: &[u8], request: &SubsetRequest<'_>) -> Result<Vec<u8>> {
        let scripts = request.scripts.iter().cloned().collect::<Vec<_>>();
        self.record(format!(
            "subset {} glyphs, scripts {}",
            request.glyphs.len(),
            scripts.join(",")
        ));
        if self.fail_subset {
            bail!("subsetter crashed");
        }
        Ok(data.to_vec())
    }

    fn build_stat(&self, data: &[u8], spec: &StatSpec) -> Result<Vec<u8>> {
        self.record(format!("stat {} axes", spec.axes.len()));
        put_tables(data, &[(STAT, vec![0, 1, 0, 2])])
    }

    fn build_default_stat(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.record("default stat".to_string());
        put_tables(data, &[(STAT, vec![0, 1, 0, 2])])
    }

    fn instantiate(&self, data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>> {
        let location = location
            .iter()
            .map(|(tag, value)| format!("{tag}={value}"))
            .collect::<Vec<_>>();
        self.record(format!("instantiate {}", location.join(",")));
        if self.fail_instantiate {
            bail!("instancer crashed");
        }
        drop_tables(data, &[FVAR, STAT])
    }

    fn update_instance_names(&self, _: &[u8], _: &[(Tag, f64)]) -> Result<Vec<u8>> {
        self.record("update instance names".to_string());
        bail!("no named instance at location")
    }

    fn optimize_cff(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.record("optimize".to_string());
        Ok(data.to_vec())
    }
}

/// Hinter that leaves outlines alone.
#[derive(Default)]
pub struct FakeHinter {
    pub calls: RefCell<Vec<String>>,
}

impl Autohinter for FakeHinter {
    fn hint_truetype(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push("ttfautohint".to_string());
        Ok(data.to_vec())
    }

    fn hint_cff_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            bail!("{} does not exist", path.display());
        }
        self.calls.borrow_mut().push("otfautohint".to_string());
        Ok(())
    }
}

/// A scratch project directory holding a UFO, a designspace and glyph lists.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for ufo in ["Foo.ufo", "Foo-Light.ufo", "Foo-Bold.ufo"] {
            fs::create_dir(dir.path().join(ufo)).unwrap();
        }
        fs::write(dir.path().join("Foo.designspace"), DESIGNSPACE).unwrap();
        Self { dir }
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn output(&self, relative: &str) -> PathBuf {
        self.dir.path().join("output/project").join(relative)
    }

    /// Write `project.yaml` and return its path.
    pub fn descriptor(&self, yaml: &str) -> PathBuf {
        self.file("project.yaml", yaml)
    }
}

pub const DESIGNSPACE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<designspace format="4.1">
  <axes>
    <axis tag="wght" name="Weight" minimum="300" maximum="700" default="300"/>
  </axes>
  <sources>
    <source filename="masters/Foo-Light.ufo" name="Foo Light">
      <location>
        <dimension name="Weight" xvalue="300"/>
      </location>
    </source>
    <source filename="Foo-Bold.ufo" name="Foo Bold">
      <location>
        <dimension name="Weight" xvalue="700"/>
      </location>
    </source>
  </sources>
</designspace>
"#;

pub fn static_font(postscript_name: &str) -> Vec<u8> {
    TestFont::new(postscript_name).build()
}

pub fn variable_font() -> Vec<u8> {
    TestFont::new("Foo-Light")
        .with_name(16, "Foo")
        .with_axis(b"wght", 300.0, 300.0, 700.0, "Weight")
        .with_instance("Light", &[300.0], Some("Foo-Light"))
        .with_instance("Semi Bold", &[600.0], None)
        .with_instance("Bold", &[700.0], None)
        .build()
}
