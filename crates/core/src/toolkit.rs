//! Capabilities the pipeline delegates to font tooling.
//!
//! The core never touches outlines, variation data or hinting itself. A
//! [`FontToolkit`] compiles, subsets, instances and optimizes; an
//! [`Autohinter`] hints. Both work on serialized sfnt data and report
//! failures with `anyhow`, which the pipeline wraps with the font and
//! operation names.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Result;
use read_fonts::types::Tag;

use crate::{config::StatSpec, format::Format};

/// Axis coordinates in user space.
pub type Location = Vec<(Tag, f64)>;

#[derive(Debug, Clone, PartialEq)]
pub struct CompileRequest<'a> {
    /// A UFO source.
    pub source: &'a Path,
    /// An outline format.
    pub format: Format,
    /// Remove overlaps with the geometric (pathops) backend.
    pub remove_overlaps: bool,
    /// Compile layout features from the source. Disabled when a donor
    /// supplies complete layout tables.
    pub feature_writers: bool,
}

/// One compiled interpolation master.
#[derive(Debug, Clone, PartialEq)]
pub struct Master {
    /// File stem of the master source.
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRequest<'a> {
    pub glyphs: &'a BTreeSet<String>,
    /// Layout scripts to keep; `*` keeps them all.
    pub scripts: &'a BTreeSet<String>,
}

pub trait FontToolkit {
    /// Compile a single master.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<Vec<u8>>;

    /// Compile interpolation masters in designspace order.
    fn compile_interpolatable(&self, masters: &[PathBuf], format: Format) -> Result<Vec<Master>>;

    /// Merge compiled masters into a variable font.
    fn merge_masters(&self, designspace: &Path, format: Format, masters: &[Master]) -> Result<Vec<u8>>;

    /// Decompose composite glyphs whose components overlap and remove the overlaps.
    fn decompose_overlapping_components(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Keep only the requested glyphs. Everything else the font carries (names,
    /// features, hinting, kerning, `DSIG` and `meta`) is retained.
    fn subset(&self, data: &[u8], request: &SubsetRequest<'_>) -> Result<Vec<u8>>;

    fn build_stat(&self, data: &[u8], spec: &StatSpec) -> Result<Vec<u8>>;

    /// Build a `STAT` table from the font's own axes.
    fn build_default_stat(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Extract a static instance, pruning name records left unused.
    fn instantiate(&self, data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>>;

    /// Rename the font after the named instance at `location`. Fails when no
    /// named instance sits exactly there.
    fn update_instance_names(&self, data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>>;

    /// Specialize charstrings and subroutinize a CFF font.
    fn optimize_cff(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub trait Autohinter {
    /// Instruct TrueType outlines, taking and returning font data.
    fn hint_truetype(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Hint CFF charstrings of the font at `path` in place.
    fn hint_cff_file(&self, path: &Path) -> Result<()>;
}
