use std::collections::BTreeMap;

/// Parse a glyph rename file: whitespace separated `old new` pairs.
///
/// Blank lines and lines starting with `%` are skipped. Returns the 1-based
/// number of the first line that doesn't have two columns.
pub fn parse_renames(text: &str) -> Result<BTreeMap<String, String>, usize> {
    let mut renames = BTreeMap::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let mut columns = line.split_whitespace();
        match (columns.next(), columns.next()) {
            (Some(old), Some(new)) => {
                renames.insert(old.to_string(), new.to_string());
            }
            _ => return Err(i + 1),
        }
    }
    Ok(renames)
}
