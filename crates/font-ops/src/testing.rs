//! Minimal synthetic fonts for tests.
//!
//! Fonts built here are structurally valid enough for the table edits in
//! this workspace: `head`, `hhea`, `hmtx`, `maxp`, `OS/2`, `post` and `name`,
//! plus optional `fvar`, layout and `CFF ` tables.

use read_fonts::types::Tag;
use write_fonts::{FontBuilder, tables::post::Post};

use crate::{cff, name::NameTable};

pub struct FvarAxis {
    pub tag: [u8; 4],
    pub min: f64,
    pub default: f64,
    pub max: f64,
    pub name: String,
}

pub struct FvarInstance {
    pub subfamily: String,
    pub coordinates: Vec<f64>,
    pub postscript_name: Option<String>,
}

/// Builder for a synthetic font named after a PostScript name.
pub struct TestFont {
    postscript_name: String,
    family: String,
    subfamily: String,
    glyphs: Vec<String>,
    vendor: [u8; 4],
    extra_names: Vec<(u16, String)>,
    tables: Vec<(Tag, Vec<u8>)>,
    axes: Vec<FvarAxis>,
    instances: Vec<FvarInstance>,
    cff: bool,
}

impl TestFont {
    /// `"Foo-Bold"` gives family `Foo`, subfamily `Bold`; no hyphen gives `Regular`.
    pub fn new(postscript_name: &str) -> Self {
        let (family, subfamily) = match postscript_name.split_once('-') {
            Some((family, style)) => (family.to_string(), style.to_string()),
            None => (postscript_name.to_string(), "Regular".to_string()),
        };
        Self {
            postscript_name: postscript_name.to_string(),
            family,
            subfamily,
            glyphs: vec![".notdef".into(), "A".into(), "B".into()],
            vendor: *b"NONE",
            extra_names: Vec::new(),
            tables: Vec::new(),
            axes: Vec::new(),
            instances: Vec::new(),
            cff: false,
        }
    }

    pub fn with_glyphs(mut self, glyphs: &[&str]) -> Self {
        self.glyphs = glyphs.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_vendor(mut self, vendor: &[u8; 4]) -> Self {
        self.vendor = *vendor;
        self
    }

    pub fn with_name(mut self, name_id: u16, string: &str) -> Self {
        self.extra_names.push((name_id, string.to_string()));
        self
    }

    pub fn with_table(mut self, tag: Tag, data: Vec<u8>) -> Self {
        self.tables.push((tag, data));
        self
    }

    pub fn with_axis(mut self, tag: &[u8; 4], min: f64, default: f64, max: f64, name: &str) -> Self {
        self.axes.push(FvarAxis { tag: *tag, min, default, max, name: name.to_string() });
        self
    }

    pub fn with_instance(mut self, subfamily: &str, coordinates: &[f64], postscript_name: Option<&str>) -> Self {
        self.instances.push(FvarInstance {
            subfamily: subfamily.to_string(),
            coordinates: coordinates.to_vec(),
            postscript_name: postscript_name.map(str::to_string),
        });
        self
    }

    /// Use CFF outlines: glyph names live in the CFF charset and `post` is version 3.
    pub fn with_cff(mut self) -> Self {
        self.cff = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut names = NameTable::default();
        names.set(1, self.family.as_str());
        names.set(2, self.subfamily.as_str());
        names.set(3, format!("1.000;NONE;{}", self.postscript_name));
        names.set(4, format!("{} {}", self.family, self.subfamily));
        names.set(5, "Version 1.000");
        names.set(6, self.postscript_name.as_str());
        for (name_id, string) in &self.extra_names {
            names.set(*name_id, string.as_str());
        }

        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"head"), head_table());
        builder.add_raw(Tag::new(b"hhea"), hhea_table(self.glyphs.len() as u16));
        builder.add_raw(Tag::new(b"hmtx"), hmtx_table(self.glyphs.len()));
        builder.add_raw(Tag::new(b"maxp"), maxp_table(self.glyphs.len() as u16));
        builder.add_raw(Tag::new(b"OS/2"), os2_table(&self.vendor));

        if self.cff {
            builder.add_raw(Tag::new(b"post"), post_v3_table());
            let glyphs = self.glyphs.iter().map(String::as_str).collect::<Vec<_>>();
            builder.add_raw(
                Tag::new(b"CFF "),
                cff_table(&self.postscript_name, &self.family, &glyphs),
            );
        } else {
            let post = Post::new_v2(self.glyphs.iter().map(String::as_str));
            builder
                .add_table(&post)
                .unwrap_or_else(|e| panic!("failed to build post: {e}"));
        }

        if !self.axes.is_empty() {
            let fvar = fvar_table(&self.axes, &self.instances, &mut names);
            builder.add_raw(Tag::new(b"fvar"), fvar);
        }

        for (tag, data) in &self.tables {
            builder.add_raw(*tag, data.clone());
        }

        builder
            .add_table(&names.to_table())
            .unwrap_or_else(|e| panic!("failed to build name: {e}"));
        builder.build()
    }
}

fn fixed(value: f64) -> [u8; 4] {
    ((value * 65536.0).round() as i32).to_be_bytes()
}

pub fn head_table() -> Vec<u8> {
    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[4..8].copy_from_slice(&fixed(1.0));
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());
    head[42..44].copy_from_slice(&700i16.to_be_bytes());
    head[40..42].copy_from_slice(&500i16.to_be_bytes());
    head[48..50].copy_from_slice(&2i16.to_be_bytes());
    head
}

fn hhea_table(num_h_metrics: u16) -> Vec<u8> {
    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[4..6].copy_from_slice(&700i16.to_be_bytes());
    hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
    hhea[10..12].copy_from_slice(&600u16.to_be_bytes());
    hhea[18..20].copy_from_slice(&1i16.to_be_bytes());
    hhea[34..36].copy_from_slice(&num_h_metrics.to_be_bytes());
    hhea
}

/// Advances are 500 for `.notdef` and 600 for every other glyph.
fn hmtx_table(num_glyphs: usize) -> Vec<u8> {
    let mut hmtx = Vec::with_capacity(num_glyphs * 4);
    for gid in 0..num_glyphs {
        let advance: u16 = if gid == 0 { 500 } else { 600 };
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&0i16.to_be_bytes());
    }
    hmtx
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut maxp = Vec::with_capacity(6);
    maxp.extend_from_slice(&0x0000_5000u32.to_be_bytes());
    maxp.extend_from_slice(&num_glyphs.to_be_bytes());
    maxp
}

/// OS/2 version 4 with regular weight and fsSelection REGULAR.
pub fn os2_table(vendor: &[u8; 4]) -> Vec<u8> {
    let mut os2 = vec![0u8; 96];
    os2[0..2].copy_from_slice(&4u16.to_be_bytes());
    os2[2..4].copy_from_slice(&550i16.to_be_bytes());
    os2[4..6].copy_from_slice(&400u16.to_be_bytes());
    os2[6..8].copy_from_slice(&5u16.to_be_bytes());
    os2[58..62].copy_from_slice(vendor);
    os2[62..64].copy_from_slice(&0x0040u16.to_be_bytes());
    os2
}

fn post_v3_table() -> Vec<u8> {
    let mut post = vec![0u8; 32];
    post[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());
    post
}

fn fvar_table(axes: &[FvarAxis], instances: &[FvarInstance], names: &mut NameTable) -> Vec<u8> {
    let has_ps_names = instances.iter().any(|i| i.postscript_name.is_some());
    let instance_size = 4 + 4 * axes.len() + if has_ps_names { 2 } else { 0 };

    let mut fvar = Vec::new();
    fvar.extend_from_slice(&1u16.to_be_bytes());
    fvar.extend_from_slice(&0u16.to_be_bytes());
    fvar.extend_from_slice(&16u16.to_be_bytes());
    fvar.extend_from_slice(&2u16.to_be_bytes());
    fvar.extend_from_slice(&(axes.len() as u16).to_be_bytes());
    fvar.extend_from_slice(&20u16.to_be_bytes());
    fvar.extend_from_slice(&(instances.len() as u16).to_be_bytes());
    fvar.extend_from_slice(&(instance_size as u16).to_be_bytes());

    for axis in axes {
        let name_id = names.add_name(&axis.name);
        fvar.extend_from_slice(&axis.tag);
        fvar.extend_from_slice(&fixed(axis.min));
        fvar.extend_from_slice(&fixed(axis.default));
        fvar.extend_from_slice(&fixed(axis.max));
        fvar.extend_from_slice(&0u16.to_be_bytes());
        fvar.extend_from_slice(&name_id.to_be_bytes());
    }

    for instance in instances {
        let subfamily_id = names.add_name(&instance.subfamily);
        fvar.extend_from_slice(&subfamily_id.to_be_bytes());
        fvar.extend_from_slice(&0u16.to_be_bytes());
        for coordinate in &instance.coordinates {
            fvar.extend_from_slice(&fixed(*coordinate));
        }
        if has_ps_names {
            let ps_id = match &instance.postscript_name {
                Some(ps) => names.add_name(ps),
                None => 0xFFFF,
            };
            fvar.extend_from_slice(&ps_id.to_be_bytes());
        }
    }
    fvar
}

/// A GSUB or GPOS table: one feature per tag, each referencing every lookup.
///
/// Lookups are `(lookup type, subtable bytes)` with one subtable each.
pub fn layout_table(features: &[&str], lookups: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let lookup_indices = (0..lookups.len() as u16).collect::<Vec<_>>();

    let mut feature_list = Vec::new();
    feature_list.extend_from_slice(&(features.len() as u16).to_be_bytes());
    let mut feature_offset = 2 + 6 * features.len();
    let feature_size = 4 + 2 * lookup_indices.len();
    for tag in features {
        feature_list.extend_from_slice(&tag_bytes(tag));
        feature_list.extend_from_slice(&(feature_offset as u16).to_be_bytes());
        feature_offset += feature_size;
    }
    for _ in features {
        feature_list.extend_from_slice(&0u16.to_be_bytes());
        feature_list.extend_from_slice(&(lookup_indices.len() as u16).to_be_bytes());
        for index in &lookup_indices {
            feature_list.extend_from_slice(&index.to_be_bytes());
        }
    }

    let mut lookup_list = Vec::new();
    lookup_list.extend_from_slice(&(lookups.len() as u16).to_be_bytes());
    let mut lookup_offset = 2 + 2 * lookups.len();
    for (_, subtable) in lookups {
        lookup_list.extend_from_slice(&(lookup_offset as u16).to_be_bytes());
        lookup_offset += 8 + subtable.len();
    }
    for (lookup_type, subtable) in lookups {
        lookup_list.extend_from_slice(&lookup_type.to_be_bytes());
        lookup_list.extend_from_slice(&0u16.to_be_bytes());
        lookup_list.extend_from_slice(&1u16.to_be_bytes());
        lookup_list.extend_from_slice(&8u16.to_be_bytes());
        lookup_list.extend_from_slice(subtable);
    }

    let script_list = vec![0u8, 0];
    let header_len = 10;
    let mut table = Vec::new();
    table.extend_from_slice(&1u16.to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes());
    table.extend_from_slice(&(header_len as u16).to_be_bytes());
    table.extend_from_slice(&((header_len + script_list.len()) as u16).to_be_bytes());
    table.extend_from_slice(
        &((header_len + script_list.len() + feature_list.len()) as u16).to_be_bytes(),
    );
    table.extend_from_slice(&script_list);
    table.extend_from_slice(&feature_list);
    table.extend_from_slice(&lookup_list);
    table
}

/// GSUB lookup type 4 subtable with one ligature of `components` glyphs.
pub fn ligature_subtable(components: u16) -> Vec<u8> {
    let mut subtable = Vec::new();
    subtable.extend_from_slice(&1u16.to_be_bytes());
    subtable.extend_from_slice(&8u16.to_be_bytes());
    subtable.extend_from_slice(&1u16.to_be_bytes());
    subtable.extend_from_slice(&14u16.to_be_bytes());
    subtable.extend_from_slice(&[0, 1, 0, 1, 0, 1]);
    subtable.extend_from_slice(&1u16.to_be_bytes());
    subtable.extend_from_slice(&4u16.to_be_bytes());
    subtable.extend_from_slice(&2u16.to_be_bytes());
    subtable.extend_from_slice(&components.to_be_bytes());
    for _ in 1..components {
        subtable.extend_from_slice(&1u16.to_be_bytes());
    }
    subtable
}

/// Chained context format 3 subtable with the given sequence lengths.
pub fn chain_context_subtable(backtrack: u16, input: u16, lookahead: u16) -> Vec<u8> {
    let total = (backtrack + input + lookahead) as usize;
    let coverage_offset = (2 + 2 + 2 + 2 + 2 + 2 * total) as u16;
    let mut subtable = Vec::new();
    subtable.extend_from_slice(&3u16.to_be_bytes());
    for count in [backtrack, input, lookahead] {
        subtable.extend_from_slice(&count.to_be_bytes());
        for _ in 0..count {
            subtable.extend_from_slice(&coverage_offset.to_be_bytes());
        }
    }
    subtable.extend_from_slice(&0u16.to_be_bytes());
    subtable.extend_from_slice(&[0, 1, 0, 1, 0, 1]);
    subtable
}

/// Extension subtable (GSUB type 7, GPOS type 9) wrapping `inner`.
pub fn extension_subtable(inner_type: u16, inner: &[u8]) -> Vec<u8> {
    let mut subtable = Vec::new();
    subtable.extend_from_slice(&1u16.to_be_bytes());
    subtable.extend_from_slice(&inner_type.to_be_bytes());
    subtable.extend_from_slice(&8u32.to_be_bytes());
    subtable.extend_from_slice(inner);
    subtable
}

fn tag_bytes(tag: &str) -> [u8; 4] {
    let mut bytes = *b"    ";
    for (slot, byte) in bytes.iter_mut().zip(tag.bytes()) {
        *slot = byte;
    }
    bytes
}

/// A name-keyed CFF table with one font, an empty Private DICT and
/// `endchar`-only charstrings.
pub fn cff_table(postscript_name: &str, family: &str, glyphs: &[&str]) -> Vec<u8> {
    let mut strings: Vec<Vec<u8>> = vec![b"1.0".to_vec(), family.as_bytes().to_vec()];
    let mut charset = vec![0u8];
    for glyph in glyphs.iter().skip(1) {
        let sid = cff::FIRST_CUSTOM_SID + strings.len() as u16;
        strings.push(glyph.as_bytes().to_vec());
        charset.extend_from_slice(&sid.to_be_bytes());
    }
    let charstrings = glyphs.iter().map(|_| vec![14u8]).collect::<Vec<_>>();

    let header = [1u8, 0, 4, 4];
    let name_index = cff::encode_index(&[postscript_name.as_bytes().to_vec()]);
    let string_index = cff::encode_index(&strings);
    let global_subrs = cff::encode_index(&[]);

    // Top DICT with five-byte offsets so its length is known up front.
    let top_dict = |charset_offset: i32, charstrings_offset: i32, private_offset: i32| {
        let mut dict = Vec::new();
        cff::encode_int(&mut dict, cff::FIRST_CUSTOM_SID as i32);
        dict.push(0);
        cff::encode_int(&mut dict, cff::FIRST_CUSTOM_SID as i32 + 1);
        dict.push(3);
        cff::encode_offset(&mut dict, charset_offset);
        dict.push(15);
        cff::encode_offset(&mut dict, charstrings_offset);
        dict.push(17);
        cff::encode_int(&mut dict, 0);
        cff::encode_offset(&mut dict, private_offset);
        dict.push(18);
        dict
    };
    let top_len = cff::encode_index(&[top_dict(0, 0, 0)]).len();
    let prefix_len = header.len() + name_index.len() + top_len + string_index.len() + global_subrs.len();
    let charset_offset = prefix_len;
    let charstrings_offset = charset_offset + charset.len();
    let charstrings_index = cff::encode_index(&charstrings);
    let private_offset = charstrings_offset + charstrings_index.len();
    let top_index = cff::encode_index(&[top_dict(
        charset_offset as i32,
        charstrings_offset as i32,
        private_offset as i32,
    )]);

    let mut table = Vec::new();
    table.extend_from_slice(&header);
    table.extend_from_slice(&name_index);
    table.extend_from_slice(&top_index);
    table.extend_from_slice(&string_index);
    table.extend_from_slice(&global_subrs);
    table.extend_from_slice(&charset);
    table.extend_from_slice(&charstrings_index);
    table
}
