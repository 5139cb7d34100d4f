//! Editing of name-keyed `CFF ` tables.
//!
//! The table is split at the Global Subr INDEX: everything before it
//! (header, Name INDEX, Top DICT INDEX, String INDEX) is rebuilt, everything
//! from it onward is copied and the absolute offsets in the Top DICT are
//! shifted by the size difference. Offsets are always written in the
//! five-byte integer form so the Top DICT length does not depend on them.
//! CID-keyed fonts are not supported.

use anyhow::{Context, Result, bail, ensure};
use log::warn;
use read_fonts::{FontRef, types::Tag};

use crate::{
    bytes::{read_u8, read_u16},
    put_tables,
};

pub const CFF: Tag = Tag::new(b"CFF ");

/// SIDs below this refer to the standard strings.
pub const FIRST_CUSTOM_SID: u16 = 391;

const ESCAPE: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Operator(u16);

impl Operator {
    const VERSION: Self = Self(0);
    const NOTICE: Self = Self(1);
    const FULL_NAME: Self = Self(2);
    const FAMILY_NAME: Self = Self(3);
    const CHARSET: Self = Self(15);
    const ENCODING: Self = Self(16);
    const CHARSTRINGS: Self = Self(17);
    const PRIVATE: Self = Self(18);
    const COPYRIGHT: Self = Self(0x0c00);
    const ROS: Self = Self(0x0c00 | 30);
    const FD_ARRAY: Self = Self(0x0c00 | 36);
    const FD_SELECT: Self = Self(0x0c00 | 37);

    fn encode(self, out: &mut Vec<u8>) {
        if self.0 & 0x0c00 == 0x0c00 {
            out.push(ESCAPE);
            out.push((self.0 & 0xff) as u8);
        } else {
            out.push(self.0 as u8);
        }
    }
}

/// String-valued Top DICT entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopDictString {
    Version,
    Notice,
    FullName,
    FamilyName,
    Copyright,
}

impl TopDictString {
    fn operator(self) -> Operator {
        match self {
            Self::Version => Operator::VERSION,
            Self::Notice => Operator::NOTICE,
            Self::FullName => Operator::FULL_NAME,
            Self::FamilyName => Operator::FAMILY_NAME,
            Self::Copyright => Operator::COPYRIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Int(i32),
    /// Encoded real number, including the leading `30`.
    Real(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
struct DictEntry {
    operator: Operator,
    operands: Vec<Operand>,
}

impl DictEntry {
    /// Indexes of operands holding absolute offsets into the table.
    fn offset_operands(&self) -> &'static [usize] {
        match self.operator {
            Operator::CHARSTRINGS | Operator::FD_ARRAY | Operator::FD_SELECT => &[0],
            Operator::PRIVATE => &[1],
            Operator::CHARSET if self.int(0).is_some_and(|v| v > 2) => &[0],
            Operator::ENCODING if self.int(0).is_some_and(|v| v > 1) => &[0],
            _ => &[],
        }
    }

    fn int(&self, index: usize) -> Option<i32> {
        match self.operands.get(index) {
            Some(Operand::Int(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Compact integer operand encoding.
pub fn encode_int(out: &mut Vec<u8>, value: i32) {
    match value {
        -107..=107 => out.push((value + 139) as u8),
        108..=1131 => {
            let v = value - 108;
            out.push(((v >> 8) + 247) as u8);
            out.push((v & 0xff) as u8);
        }
        -1131..=-108 => {
            let v = -value - 108;
            out.push(((v >> 8) + 251) as u8);
            out.push((v & 0xff) as u8);
        }
        -32768..=32767 => {
            out.push(28);
            out.extend_from_slice(&(value as i16).to_be_bytes());
        }
        _ => encode_offset(out, value),
    }
}

/// Five-byte integer operand encoding.
pub fn encode_offset(out: &mut Vec<u8>, value: i32) {
    out.push(29);
    out.extend_from_slice(&value.to_be_bytes());
}

/// Serialize a CFF INDEX.
pub fn encode_index(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(items.len() as u16).to_be_bytes());
    if items.is_empty() {
        return out;
    }
    let last_offset = 1 + items.iter().map(Vec::len).sum::<usize>();
    let off_size: usize = match last_offset {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        0x1_0000..=0xff_ffff => 3,
        _ => 4,
    };
    out.push(off_size as u8);
    let mut offset = 1usize;
    let mut write_offset = |out: &mut Vec<u8>, offset: usize| {
        out.extend_from_slice(&(offset as u32).to_be_bytes()[4 - off_size..]);
    };
    write_offset(&mut out, offset);
    for item in items {
        offset += item.len();
        write_offset(&mut out, offset);
    }
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// Parse a CFF INDEX at `offset`, returning its items and the end offset.
fn parse_index(data: &[u8], offset: usize) -> Result<(Vec<&[u8]>, usize)> {
    let count = read_u16(data, offset)? as usize;
    if count == 0 {
        return Ok((Vec::new(), offset + 2));
    }
    let off_size = read_u8(data, offset + 2)? as usize;
    ensure!((1..=4).contains(&off_size), "Invalid INDEX offset size {off_size}");

    let offsets_start = offset + 3;
    let read_offset = |i: usize| -> Result<usize> {
        let start = offsets_start + i * off_size;
        let bytes = data
            .get(start..start + off_size)
            .context("INDEX offsets past end of table")?;
        Ok(bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
    };

    let data_start = offsets_start + (count + 1) * off_size - 1;
    let mut items = Vec::with_capacity(count);
    for i in 0..count {
        let start = data_start + read_offset(i)?;
        let end = data_start + read_offset(i + 1)?;
        let item = data.get(start..end).context("INDEX data past end of table")?;
        items.push(item);
    }
    let end = data_start + read_offset(count)?;
    Ok((items, end))
}

fn parse_dict(data: &[u8]) -> Result<Vec<DictEntry>> {
    let mut entries = Vec::new();
    let mut operands = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let b0 = data[i];
        match b0 {
            0..=21 => {
                let operator = if b0 == ESCAPE {
                    i += 1;
                    Operator(0x0c00 | read_u8(data, i)? as u16)
                } else {
                    Operator(b0 as u16)
                };
                entries.push(DictEntry { operator, operands: std::mem::take(&mut operands) });
                i += 1;
            }
            28 => {
                let v = read_u16(data, i + 1)? as i16;
                operands.push(Operand::Int(v as i32));
                i += 3;
            }
            29 => {
                let bytes = data.get(i + 1..i + 5).context("Truncated DICT operand")?;
                operands.push(Operand::Int(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])));
                i += 5;
            }
            30 => {
                let start = i;
                i += 1;
                loop {
                    let byte = read_u8(data, i)?;
                    i += 1;
                    if byte & 0x0f == 0x0f || byte >> 4 == 0x0f {
                        break;
                    }
                }
                operands.push(Operand::Real(data[start..i].to_vec()));
            }
            32..=246 => {
                operands.push(Operand::Int(b0 as i32 - 139));
                i += 1;
            }
            247..=250 => {
                let b1 = read_u8(data, i + 1)? as i32;
                operands.push(Operand::Int((b0 as i32 - 247) * 256 + b1 + 108));
                i += 2;
            }
            251..=254 => {
                let b1 = read_u8(data, i + 1)? as i32;
                operands.push(Operand::Int(-(b0 as i32 - 251) * 256 - b1 - 108));
                i += 2;
            }
            _ => bail!("Invalid DICT byte {b0} at {i}"),
        }
    }
    Ok(entries)
}

fn encode_dict(entries: &[DictEntry], shift: impl Fn(&DictEntry, usize, i32) -> Option<i32>) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in entries {
        let offsets = entry.offset_operands();
        for (index, operand) in entry.operands.iter().enumerate() {
            match operand {
                Operand::Int(value) if offsets.contains(&index) => {
                    let value = shift(entry, index, *value).unwrap_or(*value);
                    encode_offset(&mut out, value);
                }
                Operand::Int(value) => encode_int(&mut out, *value),
                Operand::Real(bytes) => out.extend_from_slice(bytes),
            }
        }
        entry.operator.encode(&mut out);
    }
    out
}

/// Editable view of a single-font CFF table.
pub struct CffEditor<'a> {
    data: &'a [u8],
    header_size: usize,
    font_name: Vec<u8>,
    top_dict: Vec<DictEntry>,
    strings: Vec<Vec<u8>>,
    rest_start: usize,
    charset: Option<Vec<u8>>,
}

impl<'a> CffEditor<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        ensure!(read_u8(data, 0)? == 1, "Only CFF version 1 tables can be edited");
        let header_size = read_u8(data, 2)? as usize;

        let (names, names_end) = parse_index(data, header_size)?;
        let (top_dicts, top_end) = parse_index(data, names_end)?;
        let (strings, strings_end) = parse_index(data, top_end)?;
        ensure!(
            names.len() == 1 && top_dicts.len() == 1,
            "CFF font sets with {} fonts are not supported",
            names.len()
        );

        Ok(Self {
            data,
            header_size,
            font_name: names[0].to_vec(),
            top_dict: parse_dict(top_dicts[0])?,
            strings: strings.into_iter().map(<[u8]>::to_vec).collect(),
            rest_start: strings_end,
            charset: None,
        })
    }

    pub fn is_cid(&self) -> bool {
        self.top_dict.iter().any(|e| e.operator == Operator::ROS)
    }

    pub fn font_name(&self) -> String {
        String::from_utf8_lossy(&self.font_name).into_owned()
    }

    pub fn set_font_name(&mut self, name: &str) {
        self.font_name = name.as_bytes().to_vec();
    }

    /// Resolve a string-valued Top DICT entry. Only custom strings are resolved.
    pub fn string(&self, key: TopDictString) -> Option<String> {
        let entry = self.top_dict.iter().find(|e| e.operator == key.operator())?;
        let sid = entry.int(0)?;
        let index = usize::try_from(sid - FIRST_CUSTOM_SID as i32).ok()?;
        self.strings
            .get(index)
            .map(|s| String::from_utf8_lossy(s).into_owned())
    }

    pub fn set_string(&mut self, key: TopDictString, value: &str) {
        let sid = self.add_string(value);
        let operands = vec![Operand::Int(sid as i32)];
        match self.top_dict.iter_mut().find(|e| e.operator == key.operator()) {
            Some(entry) => entry.operands = operands,
            None => {
                // String entries precede offsets; ordering is otherwise free.
                self.top_dict.insert(0, DictEntry { operator: key.operator(), operands });
            }
        }
    }

    fn add_string(&mut self, value: &str) -> u16 {
        let bytes = value.as_bytes();
        let index = match self.strings.iter().position(|s| s == bytes) {
            Some(index) => index,
            None => {
                self.strings.push(bytes.to_vec());
                self.strings.len() - 1
            }
        };
        FIRST_CUSTOM_SID + index as u16
    }

    pub fn num_glyphs(&self) -> Result<usize> {
        let offset = self
            .top_dict
            .iter()
            .find(|e| e.operator == Operator::CHARSTRINGS)
            .and_then(|e| e.int(0))
            .context("CFF Top DICT has no CharStrings")?;
        Ok(read_u16(self.data, offset as usize)? as usize)
    }

    /// Replace the charset with one naming glyphs in order.
    ///
    /// `names[0]` is `.notdef` and is not stored.
    pub fn set_glyph_names(&mut self, names: &[String]) -> Result<()> {
        ensure!(
            names.len() == self.num_glyphs()?,
            "Expected {} glyph names, got {}",
            self.num_glyphs()?,
            names.len()
        );
        let mut charset = vec![0u8];
        for name in names.iter().skip(1) {
            let sid = self.add_string(name);
            charset.extend_from_slice(&sid.to_be_bytes());
        }
        self.charset = Some(charset);
        Ok(())
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        ensure!(!self.is_cid(), "CID-keyed CFF fonts are not supported");

        let has_new_charset = self.charset.is_some();
        let mut top_dict = self.top_dict.clone();
        if has_new_charset {
            // Any value above the predefined charset IDs marks an offset.
            let operands = vec![Operand::Int(i32::MAX)];
            match top_dict.iter_mut().find(|e| e.operator == Operator::CHARSET) {
                Some(entry) => entry.operands = operands,
                None => top_dict.push(DictEntry { operator: Operator::CHARSET, operands }),
            }
        }

        let name_index = encode_index(std::slice::from_ref(&self.font_name));
        let string_index = encode_index(&self.strings);
        let placeholder = encode_dict(&top_dict, |_, _, _| None);
        let top_index_len = encode_index(&[placeholder]).len();

        let new_rest_start = self.header_size + name_index.len() + top_index_len + string_index.len();
        let delta = new_rest_start as i64 - self.rest_start as i64;
        let rest = &self.data[self.rest_start..];
        let charset_offset = (new_rest_start + rest.len()) as i32;

        let dict = encode_dict(&top_dict, |entry, _, value| {
            if entry.operator == Operator::CHARSET && has_new_charset {
                Some(charset_offset)
            } else {
                Some((value as i64 + delta) as i32)
            }
        });
        let top_index = encode_index(&[dict]);
        ensure!(
            top_index.len() == top_index_len,
            "Top DICT size changed while shifting offsets"
        );

        let mut out = Vec::with_capacity(self.data.len() + 64);
        out.extend_from_slice(&self.data[..self.header_size]);
        out.extend_from_slice(&name_index);
        out.extend_from_slice(&top_index);
        out.extend_from_slice(&string_index);
        out.extend_from_slice(rest);
        if let Some(charset) = &self.charset {
            out.extend_from_slice(charset);
        }
        Ok(out)
    }
}

/// Name-table values to mirror into the CFF table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CffNames {
    pub font_name: Option<String>,
    pub copyright: Option<String>,
    pub family_name: Option<String>,
    pub full_name: Option<String>,
    pub notice: Option<String>,
    pub version: Option<String>,
}

impl CffNames {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Mirror name values into the font's `CFF ` table.
///
/// Fonts without a `CFF ` table are returned unchanged; CID-keyed fonts are
/// skipped with a warning.
pub fn mirror_names(data: &[u8], names: &CffNames) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let Some(table) = font.table_data(CFF) else {
        return Ok(data.to_vec());
    };
    let mut editor = CffEditor::parse(table.as_bytes())?;
    if editor.is_cid() {
        warn!("Not mirroring names into CID-keyed CFF table");
        return Ok(data.to_vec());
    }

    if let Some(font_name) = &names.font_name {
        editor.set_font_name(font_name);
    }
    let strings = [
        (TopDictString::Copyright, &names.copyright),
        (TopDictString::FamilyName, &names.family_name),
        (TopDictString::FullName, &names.full_name),
        (TopDictString::Notice, &names.notice),
        (TopDictString::Version, &names.version),
    ];
    for (key, value) in strings {
        if let Some(value) = value {
            editor.set_string(key, value);
        }
    }

    let cff = editor.build()?;
    put_tables(data, &[(CFF, cff)])
}
