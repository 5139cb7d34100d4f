//! Style attributes table (`STAT`) construction.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use fontmill_core::config::{ElidedFallbackName, StatAxisValue, StatSpec, table_tag};
use fontmill_font_ops::NameTable;
use read_fonts::types::Tag;
use skrifa::MetadataProvider;
use write_fonts::{
    tables::stat::{AxisRecord, AxisValue, AxisValueRecord, AxisValueTableFlags, Stat},
    types::{Fixed, NameId},
};

/// Name ID of the subfamily, the usual elided fallback.
const SUBFAMILY_NAME_ID: u16 = 2;

/// Build `STAT` from an explicit description, adding any new name strings.
///
/// Axis ordering defaults to declaration order. Value formats follow the
/// fields present: a range gives format 2, a linked value format 3, a plain
/// value format 1. Each location becomes a format 4 value.
pub fn build_stat(data: &[u8], spec: &StatSpec) -> Result<Vec<u8>> {
    let mut names = NameTable::from_data(data)?;

    let mut tags = Vec::with_capacity(spec.axes.len());
    let mut design_axes = Vec::with_capacity(spec.axes.len());
    let mut axis_values = Vec::new();
    for (index, axis) in spec.axes.iter().enumerate() {
        let tag = stat_tag(&axis.tag)?;
        let name_id = names.add_name(&axis.name);
        let ordering = axis.ordering.unwrap_or(index as u16);
        design_axes.push(AxisRecord::new(tag, NameId::new(name_id), ordering));
        tags.push(tag);

        for value in &axis.values {
            let value_name_id = NameId::new(names.add_name(&value.name));
            axis_values.push(
                axis_value(index as u16, value_name_id, value)
                    .with_context(|| format!("STAT value \"{}\" on axis {tag}", value.name))?,
            );
        }
    }

    for location in &spec.locations {
        let records = location
            .location
            .iter()
            .map(|(tag, value)| -> Result<AxisValueRecord> {
                let tag = stat_tag(tag)?;
                let index = tags.iter().position(|t| *t == tag).with_context(|| {
                    format!("STAT location \"{}\" uses undeclared axis {tag}", location.name)
                })?;
                Ok(AxisValueRecord::new(index as u16, Fixed::from_f64(*value)))
            })
            .collect::<Result<Vec<_>>>()?;
        let name_id = NameId::new(names.add_name(&location.name));
        axis_values.push(AxisValue::format_4(
            AxisValueTableFlags::from_bits_truncate(location.flags),
            name_id,
            records,
        ));
    }

    let elided_fallback = match &spec.elided_fallback_name {
        ElidedFallbackName::Id(id) => *id,
        ElidedFallbackName::Name(name) => names.add_name(name),
    };

    write_stat(
        data,
        &names,
        Stat::new(design_axes, axis_values, NameId::new(elided_fallback)),
    )
}

fn axis_value(axis_index: u16, name_id: NameId, value: &StatAxisValue) -> Result<AxisValue> {
    let flags = AxisValueTableFlags::from_bits_truncate(value.flags);
    if let (Some(min), Some(max)) = (value.range_min_value, value.range_max_value) {
        let nominal = value
            .nominal_value
            .or(value.value)
            .context("a range needs a nominal value")?;
        return Ok(AxisValue::format_2(
            axis_index,
            flags,
            name_id,
            Fixed::from_f64(nominal),
            Fixed::from_f64(min),
            Fixed::from_f64(max),
        ));
    }
    let Some(nominal) = value.value.or(value.nominal_value) else {
        bail!("missing value");
    };
    Ok(match value.linked_value {
        Some(linked) => AxisValue::format_3(
            axis_index,
            flags,
            name_id,
            Fixed::from_f64(nominal),
            Fixed::from_f64(linked),
        ),
        None => AxisValue::format_1(axis_index, flags, name_id, Fixed::from_f64(nominal)),
    })
}

fn stat_tag(tag: &str) -> Result<Tag> {
    table_tag(tag).with_context(|| format!("Invalid STAT axis tag \"{tag}\""))
}

/// A well-known value on a registered axis.
struct RegisteredValue {
    value: f64,
    name: &'static str,
    linked: Option<f64>,
    elidable: bool,
}

const fn registered(value: f64, name: &'static str) -> RegisteredValue {
    RegisteredValue { value, name, linked: None, elidable: false }
}

const WEIGHTS: &[RegisteredValue] = &[
    registered(100.0, "Thin"),
    registered(200.0, "ExtraLight"),
    registered(300.0, "Light"),
    RegisteredValue { value: 400.0, name: "Regular", linked: Some(700.0), elidable: true },
    registered(500.0, "Medium"),
    registered(600.0, "SemiBold"),
    registered(700.0, "Bold"),
    registered(800.0, "ExtraBold"),
    registered(900.0, "Black"),
];

const WIDTHS: &[RegisteredValue] = &[
    registered(50.0, "UltraCondensed"),
    registered(62.5, "ExtraCondensed"),
    registered(75.0, "Condensed"),
    registered(87.5, "SemiCondensed"),
    RegisteredValue { value: 100.0, name: "Normal", linked: None, elidable: true },
    registered(112.5, "SemiExpanded"),
    registered(125.0, "Expanded"),
    registered(150.0, "ExtraExpanded"),
    registered(200.0, "UltraExpanded"),
];

const ITALICS: &[RegisteredValue] = &[
    RegisteredValue { value: 0.0, name: "Roman", linked: Some(1.0), elidable: true },
    registered(1.0, "Italic"),
];

const SLANTS: &[RegisteredValue] = &[RegisteredValue {
    value: 0.0,
    name: "Upright",
    linked: None,
    elidable: true,
}];

fn registry(tag: Tag) -> &'static [RegisteredValue] {
    match &tag.to_be_bytes() {
        b"wght" => WEIGHTS,
        b"wdth" => WIDTHS,
        b"ital" => ITALICS,
        b"slnt" => SLANTS,
        _ => &[],
    }
}

/// Build `STAT` from the font's own axes and named instances.
///
/// Every axis gets a format 1 value for its default and for each distinct
/// coordinate a named instance uses. Values are named from the registry of
/// well-known axis values; single-axis fonts use the instance's subfamily
/// name instead, and unregistered values fall back to the number itself.
/// Registered "Regular"-like values are elidable and link to their bold or
/// italic counterpart when the axis reaches it.
pub fn build_default_stat(data: &[u8]) -> Result<Vec<u8>> {
    let font = skrifa::FontRef::new(data)?;
    let mut names = NameTable::from_data(data)?;
    let axes = font.axes();
    if axes.is_empty() {
        bail!("Cannot build a default STAT table for a font without axes");
    }
    let instances = font
        .named_instances()
        .iter()
        .map(|instance| {
            (
                instance.subfamily_name_id().to_u16(),
                instance.user_coords().map(f64::from).collect::<Vec<_>>(),
            )
        })
        .collect::<Vec<_>>();
    let single_axis = axes.len() == 1;

    let mut design_axes = Vec::with_capacity(axes.len());
    let mut axis_values = Vec::new();
    for (index, axis) in axes.iter().enumerate() {
        let tag = axis.tag();
        design_axes.push(AxisRecord::new(tag, NameId::new(axis.name_id().to_u16()), index as u16));

        let default = f64::from(axis.default_value());
        let max = f64::from(axis.max_value());
        let mut values = BTreeSet::new();
        values.insert(FixedKey::new(default));
        for (_, coords) in &instances {
            if let Some(value) = coords.get(index) {
                values.insert(FixedKey::new(*value));
            }
        }

        for value in values.into_iter().map(FixedKey::get) {
            let known = registry(tag).iter().find(|known| known.value == value);
            let instance_name = single_axis
                .then(|| {
                    instances
                        .iter()
                        .find(|(_, coords)| coords.first() == Some(&value))
                        .map(|(name_id, _)| *name_id)
                })
                .flatten();
            let name_id = match (instance_name, known) {
                (Some(name_id), _) => name_id,
                (None, Some(known)) => names.add_name(known.name),
                (None, None) => names.add_name(&format_value(value)),
            };

            let mut flags = AxisValueTableFlags::empty();
            if known.is_some_and(|known| known.elidable)
                || (registry(tag).is_empty() && value == default)
            {
                flags |= AxisValueTableFlags::ELIDABLE_AXIS_VALUE_NAME;
            }
            let name_id = NameId::new(name_id);
            let fixed = Fixed::from_f64(value);
            axis_values.push(match known.and_then(|known| known.linked) {
                Some(linked) if linked <= max => AxisValue::format_3(
                    index as u16,
                    flags,
                    name_id,
                    fixed,
                    Fixed::from_f64(linked),
                ),
                _ => AxisValue::format_1(index as u16, flags, name_id, fixed),
            });
        }
    }

    write_stat(
        data,
        &names,
        Stat::new(design_axes, axis_values, NameId::new(SUBFAMILY_NAME_ID)),
    )
}

/// A coordinate ordered and deduplicated at `Fixed` precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FixedKey(i32);

impl FixedKey {
    fn new(value: f64) -> Self {
        Self(Fixed::from_f64(value).to_bits())
    }

    fn get(self) -> f64 {
        Fixed::from_bits(self.0).to_f64()
    }
}

/// `650` for whole numbers, `62.5` otherwise.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn write_stat(data: &[u8], names: &NameTable, stat: Stat) -> Result<Vec<u8>> {
    let name = names.to_table();
    fontmill_font_ops::rewrite_font(data, |_, builder| {
        builder.add_table(&stat)?;
        builder.add_table(&name)?;
        Ok(())
    })
}
