//! Capability view over parsed sfnt fonts (made by FontLab https://www.fontlab.com/)

use anyhow::{anyhow, Result};
use read_fonts::tables::name::NameId;
use read_fonts::ps::cff::dict;
use read_fonts::types::Tag;
use read_fonts::{FontRef, TableProvider};

use crate::record::{CidSystemInfo, Panose};

/// `OTTO`: sfnt version of fonts with CFF outlines.
const CFF_SFNT_VERSION: u32 = 0x4F54_544F;

const UNICODE_PLATFORM: u16 = 0;
const MAC_PLATFORM: u16 = 1;
const WINDOWS_PLATFORM: u16 = 3;
const MAC_ROMAN: u16 = 0;
const MAC_ENGLISH: u16 = 0;
const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// Fields of the OS/2 table used for substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Summary {
    pub weight_class: u16,
    pub family_class: i16,
    pub code_page_range_1: Option<u32>,
    pub code_page_range_2: Option<u32>,
    pub panose: Option<Panose>,
}

/// What the CFF table says about a font.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CffOutlines {
    pub cid: Option<CidSystemInfo>,
}

impl CffOutlines {
    pub fn is_cid_keyed(&self) -> bool {
        self.cid.is_some()
    }
}

/// Read access to one parsed TrueType/OpenType font.
///
/// Every table is optional; callers probe for what they need.
pub trait FontContainer {
    fn has_naming_table(&self) -> bool;

    /// Name ID 6.
    fn postscript_name(&self) -> Option<String>;

    fn family_name(&self) -> Option<String>;

    fn subfamily_name(&self) -> Option<String>;

    fn os2(&self) -> Option<Os2Summary>;

    /// `head.macStyle`; `None` when the font has no `head` table.
    fn mac_style(&self) -> Option<u16>;

    fn table_bytes(&self, tag: Tag) -> Option<&[u8]>;

    /// True for the `OTTO` sfnt flavour. A `CFF ` table under any other sfnt
    /// version (even in a `.otf` file) does not make the font OpenType.
    fn is_opentype(&self) -> bool;

    /// `Ok(None)` when the font has no `CFF ` table, `Err` when it is malformed.
    fn cff(&self) -> Result<Option<CffOutlines>>;
}

impl FontContainer for FontRef<'_> {
    fn has_naming_table(&self) -> bool {
        self.name().is_ok()
    }

    fn postscript_name(&self) -> Option<String> {
        name_string(self, NameId::POSTSCRIPT_NAME)
    }

    fn family_name(&self) -> Option<String> {
        name_string(self, NameId::FAMILY_NAME)
    }

    fn subfamily_name(&self) -> Option<String> {
        name_string(self, NameId::SUBFAMILY_NAME)
    }

    fn os2(&self) -> Option<Os2Summary> {
        let table = TableProvider::os2(self).ok()?;
        Some(Os2Summary {
            weight_class: table.us_weight_class(),
            family_class: table.s_family_class(),
            code_page_range_1: table.ul_code_page_range_1(),
            code_page_range_2: table.ul_code_page_range_2(),
            panose: Panose::from_slice(table.panose_10()),
        })
    }

    fn mac_style(&self) -> Option<u16> {
        self.head().ok().map(|head| head.mac_style().bits())
    }

    fn table_bytes(&self, tag: Tag) -> Option<&[u8]> {
        self.table_data(tag).map(|data| data.as_bytes())
    }

    fn is_opentype(&self) -> bool {
        self.table_directory.sfnt_version() == CFF_SFNT_VERSION
    }

    fn cff(&self) -> Result<Option<CffOutlines>> {
        if self.table_data(Tag::new(b"CFF ")).is_none() {
            return Ok(None);
        }
        let cff = TableProvider::cff(self)?;
        let top_dict = cff
            .top_dicts()
            .get(0)
            .map_err(|e| anyhow!("reading CFF top DICT: {e}"))?;

        for entry in dict::entries(top_dict, None) {
            let entry = entry.map_err(|e| anyhow!("parsing CFF top DICT: {e}"))?;
            if let dict::Entry::Ros {
                registry,
                ordering,
                supplement,
            } = entry
            {
                let registry = cff
                    .string(registry)
                    .ok_or_else(|| anyhow!("CFF ROS registry string missing"))?;
                let ordering = cff
                    .string(ordering)
                    .ok_or_else(|| anyhow!("CFF ROS ordering string missing"))?;
                return Ok(Some(CffOutlines {
                    cid: Some(CidSystemInfo::new(
                        String::from_utf8_lossy(registry),
                        String::from_utf8_lossy(ordering),
                        supplement.to_f64() as i32,
                    )),
                }));
            }
        }

        Ok(Some(CffOutlines::default()))
    }
}

/// Find a name record, preferring Mac Roman English, then Windows US English,
/// then any other record whose encoding can be decoded.
pub(crate) fn name_string(font: &FontRef, id: NameId) -> Option<String> {
    let name_table = font.name().ok()?;
    let data = name_table.string_data();
    let mut best: Option<(u8, String)> = None;

    for record in name_table.name_record() {
        if record.name_id() != id {
            continue;
        }
        let Some(rank) = name_rank(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
        ) else {
            continue;
        };
        if best.as_ref().is_some_and(|(held, _)| *held <= rank) {
            continue;
        }
        let rendered = match record.string(data) {
            Ok(entry) => entry.to_string(),
            Err(_) => continue,
        };
        let rendered = rendered.trim();
        if !rendered.is_empty() {
            best = Some((rank, rendered.to_string()));
        }
    }

    best.map(|(_, name)| name)
}

/// Lower is better; `None` for encodings `read-fonts` cannot decode.
fn name_rank(platform: u16, encoding: u16, language: u16) -> Option<u8> {
    match (platform, encoding) {
        (MAC_PLATFORM, MAC_ROMAN) if language == MAC_ENGLISH => Some(0),
        (WINDOWS_PLATFORM, 1) if language == WINDOWS_ENGLISH_US => Some(1),
        (MAC_PLATFORM, MAC_ROMAN) | (UNICODE_PLATFORM, _) | (WINDOWS_PLATFORM, 0 | 1 | 10) => {
            Some(2)
        }
        _ => None,
    }
}
