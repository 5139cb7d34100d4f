//! Renaming a variable font after one of its named instances.

use anyhow::{Context, Result};
use fontmill_font_ops::{NameTable, axes, instance_at, named_instances};
use read_fonts::types::Tag;

const FAMILY: u16 = 1;
const SUBFAMILY: u16 = 2;
const UNIQUE_ID: u16 = 3;
const FULL_NAME: u16 = 4;
const POSTSCRIPT_NAME: u16 = 6;
const TYPOGRAPHIC_FAMILY: u16 = 16;
const TYPOGRAPHIC_SUBFAMILY: u16 = 17;

/// Rewrite the family names for the named instance at `location`.
///
/// The legacy subfamily (name ID 2) is one of Regular, Italic, Bold or Bold
/// Italic. Any other weight moves into the legacy family, and the
/// typographic names (16, 17) then carry the full family and style.
///
/// Fails when no named instance sits exactly at `location`.
pub fn update_instance_names(data: &[u8], location: &[(Tag, f64)]) -> Result<Vec<u8>> {
    let axes = axes(data)?;
    let instances = named_instances(data)?;
    let instance = instance_at(&axes, &instances, location)
        .with_context(|| format!("No named instance at {}", describe_location(location)))?;
    let subfamily = instance
        .subfamily
        .as_deref()
        .with_context(|| format!("Instance subfamily name {} is missing", instance.subfamily_name_id))?;

    let mut names = NameTable::from_data(data)?;
    let family = names
        .get(TYPOGRAPHIC_FAMILY)
        .or_else(|| names.get(FAMILY))
        .context("Font has no family name")?
        .to_string();
    let old_postscript = names.get(POSTSCRIPT_NAME).map(str::to_string);

    let mut words = subfamily.split_whitespace().collect::<Vec<_>>();
    let italic = words.last() == Some(&"Italic");
    if italic {
        words.pop();
    }
    let weight = words.into_iter().filter(|word| *word != "Regular").collect::<Vec<_>>().join(" ");
    let legacy_subfamily = match (weight.as_str(), italic) {
        ("Bold", true) => "Bold Italic",
        ("Bold", false) => "Bold",
        (_, true) => "Italic",
        (_, false) => "Regular",
    };
    if weight.is_empty() || weight == "Bold" {
        names.set(FAMILY, family.as_str());
        names.remove(TYPOGRAPHIC_FAMILY);
        names.remove(TYPOGRAPHIC_SUBFAMILY);
    } else {
        names.set(FAMILY, format!("{family} {weight}"));
        names.set(TYPOGRAPHIC_FAMILY, family.as_str());
        names.set(TYPOGRAPHIC_SUBFAMILY, subfamily);
    }
    names.set(SUBFAMILY, legacy_subfamily);
    names.set(FULL_NAME, format!("{family} {subfamily}"));

    let postscript = instance.postscript_name.clone().unwrap_or_else(|| {
        format!("{}-{}", family.replace(' ', ""), subfamily.replace(' ', ""))
    });
    if let Some(old) = old_postscript
        && let Some(unique) = names.get(UNIQUE_ID)
        && unique.contains(&old)
    {
        let unique = unique.replace(&old, &postscript);
        names.set(UNIQUE_ID, unique);
    }
    names.set(POSTSCRIPT_NAME, postscript);

    names.apply(data)
}

fn describe_location(location: &[(Tag, f64)]) -> String {
    location
        .iter()
        .map(|(tag, value)| format!("{tag}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}
