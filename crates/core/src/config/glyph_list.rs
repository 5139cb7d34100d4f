use std::{collections::BTreeSet, fs, path::Path};

use crate::error::{Result, io_error};

/// Script tag standing for every layout script.
pub const ALL_SCRIPTS: &str = "*";

/// Glyphs and layout scripts a subset keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSpec {
    pub glyphs: BTreeSet<String>,
    pub scripts: BTreeSet<String>,
}

impl SubsetSpec {
    /// Parse a glyph list.
    ///
    /// One production glyph name per line. Lines starting with `#` are
    /// comments; a comment on the first line lists the scripts to keep,
    /// separated by commas. Without it every script is kept.
    pub fn parse(text: &str) -> Self {
        let mut glyphs = BTreeSet::new();
        let mut scripts = BTreeSet::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if let Some(comment) = line.strip_prefix('#') {
                if i == 0 {
                    scripts.extend(
                        comment
                            .split(',')
                            .map(str::trim)
                            .filter(|tag| !tag.is_empty())
                            .map(str::to_string),
                    );
                }
                continue;
            }
            if !line.is_empty() {
                glyphs.insert(line.to_string());
            }
        }
        if scripts.is_empty() {
            scripts.insert(ALL_SCRIPTS.to_string());
        }
        Self { glyphs, scripts }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        Ok(Self::parse(&text))
    }

    pub fn keeps_all_scripts(&self) -> bool {
        self.scripts.contains(ALL_SCRIPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leading_comment_declares_scripts() {
        let spec = SubsetSpec::parse("# cyrl, latn\nA\nB\n");
        assert_eq!(spec.glyphs, set(&["A", "B"]));
        assert_eq!(spec.scripts, set(&["cyrl", "latn"]));
        assert!(!spec.keeps_all_scripts());
    }

    #[test]
    fn test_no_comment_keeps_all_scripts() {
        let spec = SubsetSpec::parse("A\nB\n");
        assert_eq!(spec.scripts, set(&["*"]));
        assert!(spec.keeps_all_scripts());
    }

    #[test]
    fn test_later_comments_and_blank_lines_are_ignored() {
        let spec = SubsetSpec::parse("A\n# deva\n\n  uni0915  \r\n");
        assert_eq!(spec.glyphs, set(&["A", "uni0915"]));
        assert_eq!(spec.scripts, set(&["*"]));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SubsetSpec::load(&dir.path().join("missing.txt")).is_err());
    }
}
