//! Build orchestration for fontmill.
//!
//! A project descriptor declares fonts; each font is resolved into a
//! [`FontConfig`] and built by a [`FontBuild`], which sequences the pipeline
//! stages over an opaque [`FontBinary`]. Subsets and static instances re-enter
//! the same stages under an [`IdentityScope`]. Compilation, subsetting,
//! instancing and hinting are delegated to a [`FontToolkit`] and an
//! [`Autohinter`].

pub mod binary;
pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod identity;
pub mod io;
pub mod pipeline;
pub mod quiet;
pub mod toolkit;

pub use binary::FontBinary;
pub use builder::{BuildReport, Builder};
pub use config::{
    FeatureParam, FontConfig, InstanceDef, Instances, StatSpec, SubsetDef, SubsetSpec,
    merge_settings,
};
pub use error::{ConfigError, Error, Result};
pub use format::Format;
pub use identity::{Identity, IdentityScope};
pub use pipeline::{FontBuild, parse_version};
pub use quiet::QuietLog;
pub use toolkit::{Autohinter, CompileRequest, FontToolkit, Location, Master, SubsetRequest};
