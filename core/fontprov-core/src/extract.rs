//! Per-file metadata extraction (made by FontLab https://www.fontlab.com/)
//!
//! Fonts are parsed only far enough to fill a [`FontRecord`]. Any failure is
//! contained to the file (or the collection member) it came from.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use read_fonts::types::Tag;
use read_fonts::{CollectionRef, FontRef};

use crate::container::FontContainer;
use crate::format::{classify, ContainerKind, FontFormat};
use crate::record::{CidSystemInfo, FontRecord};
use crate::type1::Type1Font;

const GCID_TAG: Tag = Tag::new(b"gcid");
const GCID_REGISTRY: std::ops::Range<usize> = 10..74;
const GCID_ORDERING: std::ops::Range<usize> = 76..140;
const GCID_SUPPLEMENT: usize = 140;

/// Extract every record a file holds. Never fails: problems are logged and
/// the file simply contributes fewer records.
pub fn extract_file(path: &Path) -> Vec<FontRecord> {
    let result = match classify(path) {
        ContainerKind::Simple => extract_simple(path),
        ContainerKind::Collection => extract_collection(path),
        ContainerKind::Type1 => extract_type1(path).map(|record| vec![record]),
        ContainerKind::Unrecognized => return Vec::new(),
    };

    match result {
        Ok(records) => records,
        Err(err) => {
            log::error!("Could not load font file: {}: {err:#}", path.display());
            Vec::new()
        }
    }
}

fn extract_simple(path: &Path) -> Result<Vec<FontRecord>> {
    let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let font = FontRef::new(&data).with_context(|| format!("parsing font {}", path.display()))?;
    Ok(extract_face(&font, path)?.into_iter().collect())
}

fn extract_collection(path: &Path) -> Result<Vec<FontRecord>> {
    let data = fs::read(path).with_context(|| format!("reading collection {}", path.display()))?;
    let collection = CollectionRef::new(&data)
        .with_context(|| format!("parsing collection header {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, font) in collection.iter().enumerate() {
        let face = font
            .with_context(|| format!("parsing font #{idx}"))
            .and_then(|font| extract_face(&font, path));
        match face {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => {
                log::error!(
                    "Could not load font #{idx} of {}: {err:#}",
                    path.display()
                );
            }
        }
    }
    Ok(records)
}

fn extract_type1(path: &Path) -> Result<FontRecord> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let type1 = Type1Font::from_pfb(BufReader::new(file))
        .with_context(|| format!("parsing PFB {}", path.display()))?;

    log::trace!(
        "PFB: '{}' / '{}' / '{}'",
        type1.name(),
        type1.family_name().unwrap_or_default(),
        type1.weight().unwrap_or_default()
    );

    Ok(FontRecord::type1(path.to_path_buf(), type1.name().to_string()))
}

/// Build the record for one sfnt font.
///
/// `Ok(None)` means the font is deliberately left out of the index: no
/// naming data, or no `head` table (bitmap-only fonts).
pub fn extract_face(font: &impl FontContainer, path: &Path) -> Result<Option<FontRecord>> {
    if !font.has_naming_table() {
        log::warn!("Missing 'name' table in font {}", path.display());
        return Ok(None);
    }

    let Some(postscript_name) = font.postscript_name() else {
        log::warn!(
            "Missing 'name' entry for PostScript name in font {}",
            path.display()
        );
        return Ok(None);
    };

    // AAT fonts may have no OS/2 table
    let (weight_class, family_class, code_page_range_1, code_page_range_2, panose) =
        match font.os2() {
            Some(os2) => (
                i32::from(os2.weight_class),
                i32::from(os2.family_class),
                os2.code_page_range_1.unwrap_or(0),
                os2.code_page_range_2.unwrap_or(0),
                os2.panose,
            ),
            None => (-1, -1, 0, 0, None),
        };

    let Some(mac_style) = font.mac_style() else {
        log::debug!(
            "Skipping {postscript_name} in {}: no 'head' table",
            path.display()
        );
        return Ok(None);
    };

    let cff = if font.is_opentype() { font.cff()? } else { None };
    let (format, cid_system_info) = match cff {
        Some(outlines) => (FontFormat::OpenType, outlines.cid),
        None => {
            let cid = match font.table_bytes(GCID_TAG) {
                Some(bytes) => Some(read_gcid(bytes)?),
                None => None,
            };
            (FontFormat::TrueType, cid)
        }
    };

    log::trace!(
        "{format}: '{postscript_name}' / '{}' / '{}'",
        font.family_name().unwrap_or_default(),
        font.subfamily_name().unwrap_or_default()
    );

    Ok(Some(FontRecord {
        file: path.to_path_buf(),
        format,
        postscript_name,
        cid_system_info,
        weight_class,
        family_class,
        code_page_range_1,
        code_page_range_2,
        mac_style: i32::from(mac_style),
        panose,
    }))
}

/// Read the CID triple stored in an Apple `gcid` table.
///
/// The supplement is `(b[140] << 8) & b[141]` over sign-extended bytes. The
/// AND (rather than OR) is what existing indexes contain, so it is kept.
pub fn read_gcid(bytes: &[u8]) -> Result<CidSystemInfo> {
    if bytes.len() < GCID_SUPPLEMENT + 2 {
        bail!("'gcid' table too short: {} bytes", bytes.len());
    }

    let registry = ascii_field(&bytes[GCID_REGISTRY]);
    let ordering = ascii_field(&bytes[GCID_ORDERING]);
    let hi = i32::from(bytes[GCID_SUPPLEMENT] as i8);
    let lo = i32::from(bytes[GCID_SUPPLEMENT + 1] as i8);
    let supplement = (hi << 8) & lo;

    Ok(CidSystemInfo::new(registry, ordering, supplement))
}

fn ascii_field(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
        .collect::<String>()
        .trim_matches(|c: char| c <= ' ')
        .to_string()
}
