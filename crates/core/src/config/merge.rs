use serde_yaml::{Mapping, Value};

/// Key of the project mapping that lists the fonts; never merged.
pub const FONTS_KEY: &str = "fonts";

/// Merge project-wide defaults into a font's own settings.
///
/// Keys missing from `font` are copied from `project`. When both sides hold a
/// mapping under the same key, the two are merged one level deep with the
/// font's entries winning. Any other value set on the font wins outright.
pub fn merge_settings(project: &Mapping, font: &Mapping) -> Mapping {
    let mut merged = font.clone();
    for (key, project_value) in project {
        if key.as_str() == Some(FONTS_KEY) {
            continue;
        }
        match (merged.get_mut(key), project_value) {
            (None, _) => {
                merged.insert(key.clone(), project_value.clone());
            }
            (Some(Value::Mapping(font_map)), Value::Mapping(project_map)) => {
                let mut combined = project_map.clone();
                for (k, v) in font_map.iter() {
                    combined.insert(k.clone(), v.clone());
                }
                *font_map = combined;
            }
            (Some(_), _) => {}
        }
    }
    merged
}
