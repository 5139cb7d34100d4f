//! Default implementations of the fontmill toolkit capabilities.
//!
//! [`NativeToolkit`] drives `fontmake`, `fonttools` and `cffsubr` for outline
//! compilation, merging, instancing and CFF optimization, and does the rest
//! in-process: subsetting through `hb-subset`, `STAT` construction through
//! `write-fonts` and instance renaming from `fvar`. [`ExternalHinter`] wraps
//! `ttfautohint` and `otfautohint`.

mod hinter;
mod native;
mod naming;
mod programs;
mod stat;

pub use hinter::ExternalHinter;
pub use native::NativeToolkit;
pub use naming::update_instance_names;
pub use programs::Programs;
pub use stat::{build_default_stat, build_stat};
