//! Identity fields of a font build and the guard that scopes changes to them.

use std::{
    collections::BTreeMap,
    mem,
    ops::{Deref, DerefMut},
};

use crate::{config::StatSpec, format::Format, pipeline::FontBuild};

/// The fields a nested build may override: everything that decides what an
/// artifact is called and where it is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub name: String,
    pub format: Format,
    pub variable: bool,
    /// Name ID → string overrides for the name-table stage.
    pub names: BTreeMap<u16, String>,
    pub stat: Option<StatSpec>,
}

impl Identity {
    /// Text before the first hyphen of the name, used as the output directory.
    pub fn family_prefix(&self) -> &str {
        self.name.split('-').next().unwrap_or(&self.name)
    }

    pub fn filename(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }
}

/// Restores a build's identity when dropped.
///
/// Entering a scope snapshots the identity; the caller mutates it through the
/// guard, which dereferences to the build. However the guarded block exits,
/// the snapshot is written back. Scopes nest and unwind in reverse order.
pub struct IdentityScope<'s, 'a> {
    build: &'s mut FontBuild<'a>,
    saved: Identity,
}

impl<'s, 'a> IdentityScope<'s, 'a> {
    pub(crate) fn new(build: &'s mut FontBuild<'a>) -> Self {
        let saved = build.identity.clone();
        Self { build, saved }
    }
}

impl<'a> Deref for IdentityScope<'_, 'a> {
    type Target = FontBuild<'a>;

    fn deref(&self) -> &Self::Target {
        self.build
    }
}

impl DerefMut for IdentityScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.build
    }
}

impl Drop for IdentityScope<'_, '_> {
    fn drop(&mut self) {
        mem::swap(&mut self.build.identity, &mut self.saved);
    }
}
