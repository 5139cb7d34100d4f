//! Owned, editable view of the `name` table.

use std::collections::BTreeSet;

use anyhow::Result;
use read_fonts::{FontRef, TableProvider, types::NameId};
use write_fonts::tables::name::{Name, NameRecord};

use crate::rewrite_font;

pub const WINDOWS_PLATFORM: u16 = 3;
pub const UNICODE_BMP_ENCODING: u16 = 1;
pub const ENGLISH_US: u16 = 0x409;

/// First name ID available for font-specific strings.
pub const FIRST_FONT_SPECIFIC_ID: u16 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub string: String,
}

impl NameEntry {
    fn is_windows_english(&self) -> bool {
        self.platform_id == WINDOWS_PLATFORM
            && self.encoding_id == UNICODE_BMP_ENCODING
            && self.language_id == ENGLISH_US
    }
}

/// Name records of a font, decoded to strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
}

impl NameTable {
    pub fn read(font: &FontRef) -> Result<Self> {
        let name = font.name()?;
        let mut entries = Vec::new();
        for record in name.name_record() {
            let string = match record.string(name.string_data()) {
                Ok(s) => s.chars().collect::<String>(),
                Err(_) => continue,
            };
            entries.push(NameEntry {
                platform_id: record.platform_id(),
                encoding_id: record.encoding_id(),
                language_id: record.language_id(),
                name_id: record.name_id().to_u16(),
                string,
            });
        }
        Ok(Self { entries })
    }

    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::read(&FontRef::new(data)?)
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    /// Look up a name, preferring the Windows English record.
    pub fn get(&self, name_id: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name_id == name_id && e.is_windows_english())
            .or_else(|| self.entries.iter().find(|e| e.name_id == name_id))
            .map(|e| e.string.as_str())
    }

    /// Set the Windows English record for `name_id`, replacing an existing one.
    pub fn set(&mut self, name_id: u16, string: impl Into<String>) {
        let string = string.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.name_id == name_id && e.is_windows_english())
        {
            entry.string = string;
            return;
        }
        self.entries.push(NameEntry {
            platform_id: WINDOWS_PLATFORM,
            encoding_id: UNICODE_BMP_ENCODING,
            language_id: ENGLISH_US,
            name_id,
            string,
        });
    }

    pub fn remove(&mut self, name_id: u16) {
        self.entries.retain(|e| e.name_id != name_id);
    }

    pub fn retain_platform(&mut self, platform_id: u16) {
        self.entries.retain(|e| e.platform_id == platform_id);
    }

    pub fn retain_ids(&mut self, mut keep: impl FnMut(u16) -> bool) {
        self.entries.retain(|e| keep(e.name_id));
    }

    pub fn ids(&self) -> BTreeSet<u16> {
        self.entries.iter().map(|e| e.name_id).collect()
    }

    /// Add a font-specific string, reusing an identical existing one.
    pub fn add_name(&mut self, string: &str) -> u16 {
        if let Some(entry) = self.entries.iter().find(|e| {
            e.name_id >= FIRST_FONT_SPECIFIC_ID && e.is_windows_english() && e.string == string
        }) {
            return entry.name_id;
        }
        let name_id = self.next_free_id();
        self.set(name_id, string);
        name_id
    }

    /// Add strings under consecutive fresh IDs, returning the first one.
    ///
    /// A single string goes through [`add_name`](Self::add_name).
    pub fn add_names(&mut self, strings: &[String]) -> Option<u16> {
        match strings {
            [] => None,
            [single] => Some(self.add_name(single)),
            _ => {
                let first = self.next_free_id();
                for (i, string) in strings.iter().enumerate() {
                    self.set(first + i as u16, string.as_str());
                }
                Some(first)
            }
        }
    }

    fn next_free_id(&self) -> u16 {
        self.entries
            .iter()
            .map(|e| e.name_id)
            .max()
            .unwrap_or(0)
            .max(FIRST_FONT_SPECIFIC_ID - 1)
            + 1
    }

    pub fn to_table(&self) -> Name {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| (e.platform_id, e.encoding_id, e.language_id, e.name_id));
        let records = entries
            .into_iter()
            .map(|e| {
                NameRecord::new(
                    e.platform_id,
                    e.encoding_id,
                    e.language_id,
                    NameId::new(e.name_id),
                    e.string.into(),
                )
            })
            .collect::<Vec<_>>();
        Name::new(records)
    }

    /// Write this table into `data`, replacing its `name` table.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        let table = self.to_table();
        rewrite_font(data, |_, builder| {
            builder.add_table(&table)?;
            Ok(())
        })
    }
}
