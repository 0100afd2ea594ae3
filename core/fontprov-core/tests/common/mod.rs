//! Synthetic font builders shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const TRUETYPE: u32 = 0x0001_0000;
pub const OPENTYPE: u32 = 0x4F54_544F;

/// Assembles an sfnt table directory around raw table bytes.
#[derive(Default)]
pub struct SfntBuilder {
    version: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.push((*tag, data));
        self
    }

    /// Font bytes with the table directory placed at `base` in the final file.
    fn build_at(&self, base: usize) -> Vec<u8> {
        let mut tables = self.tables.clone();
        tables.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tables = tables.len() as u16;
        let mut out = Vec::new();
        out.extend(self.version.to_be_bytes());
        out.extend(num_tables.to_be_bytes());
        out.extend([0u8; 6]); // searchRange, entrySelector, rangeShift

        let mut offset = base + 12 + 16 * tables.len();
        let mut body = Vec::new();
        for (tag, data) in &tables {
            out.extend(tag);
            out.extend(0u32.to_be_bytes());
            out.extend((offset as u32).to_be_bytes());
            out.extend((data.len() as u32).to_be_bytes());
            body.extend(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = base + 12 + 16 * tables.len() + body.len();
        }
        out.extend(body);
        out
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }
}

/// A `ttcf` file holding the given fonts.
pub fn collection(fonts: &[SfntBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut out = Vec::new();
    out.extend(b"ttcf");
    out.extend(0x0001_0000u32.to_be_bytes());
    out.extend((fonts.len() as u32).to_be_bytes());

    let mut bodies = Vec::new();
    let mut offset = header_len;
    for font in fonts {
        out.extend((offset as u32).to_be_bytes());
        let body = font.build_at(offset);
        offset += body.len();
        bodies.push(body);
    }
    for body in bodies {
        out.extend(body);
    }
    out
}

/// `name` table with Windows/Unicode records for family, subfamily and PostScript name.
pub fn name_table(postscript_name: Option<&str>) -> Vec<u8> {
    let mut records = vec![
        NameRecord::windows(1, "Test Family"),
        NameRecord::windows(2, "Regular"),
    ];
    if let Some(name) = postscript_name {
        records.push(NameRecord::windows(6, name));
    }
    name_table_from(&records)
}

/// One naming record: platform, encoding, language, name ID and text.
pub struct NameRecord<'a> {
    pub platform: u16,
    pub encoding: u16,
    pub language: u16,
    pub name_id: u16,
    pub value: &'a str,
}

impl<'a> NameRecord<'a> {
    pub fn windows(name_id: u16, value: &'a str) -> Self {
        Self {
            platform: 3,
            encoding: 1,
            language: 0x0409,
            name_id,
            value,
        }
    }

    /// Macintosh Roman, English.
    pub fn mac(name_id: u16, value: &'a str) -> Self {
        Self {
            platform: 1,
            encoding: 0,
            language: 0,
            name_id,
            value,
        }
    }
}

/// Format 0 `name` table; Mac records are stored as single bytes, others as UTF-16BE.
pub fn name_table_from(records: &[NameRecord]) -> Vec<u8> {
    let count = records.len() as u16;
    let string_offset = 6 + 12 * count;
    let mut out = Vec::new();
    out.extend(0u16.to_be_bytes());
    out.extend(count.to_be_bytes());
    out.extend(string_offset.to_be_bytes());

    let mut strings = Vec::new();
    for record in records {
        let encoded: Vec<u8> = if record.platform == 1 {
            record.value.bytes().collect()
        } else {
            record
                .value
                .encode_utf16()
                .flat_map(u16::to_be_bytes)
                .collect()
        };
        out.extend(record.platform.to_be_bytes());
        out.extend(record.encoding.to_be_bytes());
        out.extend(record.language.to_be_bytes());
        out.extend(record.name_id.to_be_bytes());
        out.extend((encoded.len() as u16).to_be_bytes());
        out.extend((strings.len() as u16).to_be_bytes());
        strings.extend(encoded);
    }
    out.extend(strings);
    out
}

pub fn head_table(mac_style: u16) -> Vec<u8> {
    let mut out = vec![0u8; 54];
    out[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    out[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    out[18..20].copy_from_slice(&1000u16.to_be_bytes());
    out[44..46].copy_from_slice(&mac_style.to_be_bytes());
    out
}

/// Version 1 OS/2 table.
pub fn os2_table(
    weight: u16,
    family_class: i16,
    cp1: u32,
    cp2: u32,
    panose: [u8; 10],
) -> Vec<u8> {
    let mut out = vec![0u8; 86];
    out[0..2].copy_from_slice(&1u16.to_be_bytes());
    out[4..6].copy_from_slice(&weight.to_be_bytes());
    out[6..8].copy_from_slice(&5u16.to_be_bytes());
    out[30..32].copy_from_slice(&family_class.to_be_bytes());
    out[32..42].copy_from_slice(&panose);
    out[78..82].copy_from_slice(&cp1.to_be_bytes());
    out[82..86].copy_from_slice(&cp2.to_be_bytes());
    out
}

pub fn gcid_table(registry: &str, ordering: &str, b140: u8, b141: u8) -> Vec<u8> {
    let mut out = vec![0u8; 142];
    out[10..10 + registry.len()].copy_from_slice(registry.as_bytes());
    out[76..76 + ordering.len()].copy_from_slice(ordering.as_bytes());
    out[140] = b140;
    out[141] = b141;
    out
}

/// Smallest CFF table `read-fonts` accepts, optionally CID-keyed via `ROS`.
///
/// Every INDEX must be followed by at least three bytes, so a one-glyph
/// CharStrings INDEX (`endchar`) trails the empty Global Subrs INDEX.
pub fn cff_table(name: &str, ros: Option<(&str, &str, u8)>) -> Vec<u8> {
    let mut top_dict = Vec::new();
    let mut strings: Vec<&str> = Vec::new();
    if let Some((registry, ordering, supplement)) = ros {
        strings.push(registry);
        strings.push(ordering);
        top_dict.extend(sid_operand(391));
        top_dict.extend(sid_operand(392));
        top_dict.push(supplement + 139);
        top_dict.extend([12, 30]);
    }

    let mut out = vec![1, 0, 4, 1];
    out.extend(index(&[name.as_bytes()]));
    out.extend(index(&[top_dict.as_slice()]));
    let strings: Vec<&[u8]> = strings.iter().map(|s| s.as_bytes()).collect();
    out.extend(index(&strings));
    out.extend(index(&[]));
    let endchar: &[u8] = &[14];
    out.extend(index(&[endchar]));
    out
}

fn sid_operand(value: u16) -> [u8; 2] {
    let v = value - 108;
    [(v / 256 + 247) as u8, (v % 256) as u8]
}

fn index(items: &[&[u8]]) -> Vec<u8> {
    let mut out = (items.len() as u16).to_be_bytes().to_vec();
    if items.is_empty() {
        return out;
    }
    out.push(1);
    let mut offset = 1usize;
    out.push(offset as u8);
    for item in items {
        offset += item.len();
        out.push(offset as u8);
    }
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// A complete TrueType font with naming, head and OS/2 tables.
pub fn truetype(postscript_name: &str) -> SfntBuilder {
    SfntBuilder::new(TRUETYPE)
        .table(b"head", head_table(0))
        .table(b"name", name_table(Some(postscript_name)))
        .table(
            b"OS/2",
            os2_table(400, 0x0805, 1, 0, [2, 11, 5, 2, 4, 5, 4, 2, 2, 4]),
        )
}

/// An `OTTO` font with a CFF table.
pub fn opentype(postscript_name: &str, ros: Option<(&str, &str, u8)>) -> SfntBuilder {
    SfntBuilder::new(OPENTYPE)
        .table(b"CFF ", cff_table(postscript_name, ros))
        .table(b"head", head_table(0))
        .table(b"name", name_table(Some(postscript_name)))
}

/// PFB bytes for a Type1 font.
pub fn pfb(font_name: &str, family: &str, weight: &str) -> Vec<u8> {
    let header = format!(
        "%!PS-AdobeFont-1.0: {font_name} 001.000\n\
         /FontInfo 3 dict dup begin\n\
         /FamilyName ({family}) readonly def\n\
         /Weight ({weight}) readonly def\n\
         end readonly def\n\
         /FontName /{font_name} def\n\
         currentfile eexec\n"
    );
    let encrypted = [0x12u8, 0x34, 0x56, 0x78, 0x9a];
    let mut out = Vec::new();
    for (kind, body) in [(1u8, header.as_bytes()), (2u8, &encrypted[..])] {
        out.push(0x80);
        out.push(kind);
        out.extend((body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
    }
    out.extend([0x80, 3]);
    out
}

pub fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("write font fixture");
    path
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
