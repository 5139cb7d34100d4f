//! Axis and named-instance queries on `fvar`.

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider, types::Tag};

use crate::name::NameTable;

/// A variation axis with its user-space range.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisInfo {
    pub tag: Tag,
    pub name_id: u16,
    pub min: f64,
    pub default: f64,
    pub max: f64,
}

/// An `fvar` named instance with its names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedInstance {
    pub subfamily_name_id: u16,
    pub subfamily: Option<String>,
    pub postscript_name: Option<String>,
    pub coordinates: Vec<(Tag, f64)>,
}

/// Axes of a variable font; static fonts have none.
pub fn axes(data: &[u8]) -> Result<Vec<AxisInfo>> {
    let font = FontRef::new(data)?;
    let Ok(fvar) = font.fvar() else {
        return Ok(Vec::new());
    };
    let axes = fvar.axes().context("Failed to read fvar axes")?;
    Ok(axes
        .iter()
        .map(|axis| AxisInfo {
            tag: axis.axis_tag(),
            name_id: axis.axis_name_id().to_u16(),
            min: axis.min_value().to_f64(),
            default: axis.default_value().to_f64(),
            max: axis.max_value().to_f64(),
        })
        .collect())
}

/// Named instances in `fvar` order.
pub fn named_instances(data: &[u8]) -> Result<Vec<NamedInstance>> {
    let font = FontRef::new(data)?;
    let Ok(fvar) = font.fvar() else {
        return Ok(Vec::new());
    };
    let names = NameTable::read(&font)?;
    let axes = fvar.axes().context("Failed to read fvar axes")?;
    let instances = fvar.instances().context("Failed to read fvar instances")?;

    let mut named = Vec::new();
    for instance in instances.iter() {
        let instance = instance.context("Malformed fvar instance record")?;
        let coordinates = axes
            .iter()
            .zip(instance.coordinates)
            .map(|(axis, value)| (axis.axis_tag(), value.get().to_f64()))
            .collect();
        let subfamily_name_id = instance.subfamily_name_id.to_u16();
        named.push(NamedInstance {
            subfamily_name_id,
            subfamily: names.get(subfamily_name_id).map(str::to_string),
            postscript_name: instance
                .post_script_name_id
                .and_then(|id| names.get(id.to_u16()))
                .map(str::to_string),
            coordinates,
        });
    }
    Ok(named)
}

/// The named instance whose coordinates equal `location` on every axis.
///
/// Axes missing from `location` are taken at their default.
pub fn instance_at<'a>(
    axes: &[AxisInfo],
    instances: &'a [NamedInstance],
    location: &[(Tag, f64)],
) -> Option<&'a NamedInstance> {
    let value_of = |tag: Tag| {
        location
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| *v)
            .or_else(|| axes.iter().find(|a| a.tag == tag).map(|a| a.default))
    };
    instances.iter().find(|instance| {
        instance
            .coordinates
            .iter()
            .all(|(tag, value)| value_of(*tag).is_some_and(|v| (v - value).abs() < 1e-3))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFont;

    fn variable_font() -> Vec<u8> {
        TestFont::new("Foo-Regular")
            .with_axis(b"wght", 100.0, 400.0, 900.0, "Weight")
            .with_axis(b"wdth", 75.0, 100.0, 100.0, "Width")
            .with_instance("Regular", &[400.0, 100.0], Some("Foo-Regular"))
            .with_instance("Bold Condensed", &[700.0, 75.0], None)
            .build()
    }

    #[test]
    fn test_axes() {
        let axes = axes(&variable_font()).unwrap();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[0].tag, Tag::new(b"wght"));
        assert_eq!((axes[0].min, axes[0].default, axes[0].max), (100.0, 400.0, 900.0));
    }

    #[test]
    fn test_axes_of_static_font() {
        let data = TestFont::new("Foo-Regular").build();
        assert!(axes(&data).unwrap().is_empty());
        assert!(named_instances(&data).unwrap().is_empty());
    }

    #[test]
    fn test_named_instances() {
        let instances = named_instances(&variable_font()).unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].postscript_name.as_deref(), Some("Foo-Regular"));
        assert_eq!(instances[1].subfamily.as_deref(), Some("Bold Condensed"));
        assert_eq!(instances[1].postscript_name, None);
        assert_eq!(
            instances[1].coordinates,
            vec![(Tag::new(b"wght"), 700.0), (Tag::new(b"wdth"), 75.0)]
        );
    }

    #[test]
    fn test_instance_at_uses_defaults() {
        let data = variable_font();
        let axes = axes(&data).unwrap();
        let instances = named_instances(&data).unwrap();
        let found = instance_at(&axes, &instances, &[(Tag::new(b"wght"), 400.0)]).unwrap();
        assert_eq!(found.subfamily.as_deref(), Some("Regular"));
        assert!(instance_at(&axes, &instances, &[(Tag::new(b"wght"), 500.0)]).is_none());
    }
}
