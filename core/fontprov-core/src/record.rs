//! Immutable per-font metadata records (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::FontFormat;

/// Registry/ordering/supplement triple of a CID-keyed font.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CidSystemInfo {
    pub registry: String,
    pub ordering: String,
    pub supplement: i32,
}

impl CidSystemInfo {
    pub fn new(registry: impl Into<String>, ordering: impl Into<String>, supplement: i32) -> Self {
        Self {
            registry: registry.into(),
            ordering: ordering.into(),
            supplement,
        }
    }
}

impl fmt::Display for CidSystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.registry, self.ordering, self.supplement)
    }
}

/// The ten PANOSE digits from an OS/2 table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Panose([u8; 10]);

impl Panose {
    pub const LEN: usize = 10;

    /// Copy the classification out of raw table bytes; `None` unless exactly ten bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn bytes(&self) -> &[u8; 10] {
        &self.0
    }

    pub fn family_kind(&self) -> u8 {
        self.0[0]
    }

    pub fn serif_style(&self) -> u8 {
        self.0[1]
    }

    pub fn weight(&self) -> u8 {
        self.0[2]
    }

    pub fn proportion(&self) -> u8 {
        self.0[3]
    }

    pub fn contrast(&self) -> u8 {
        self.0[4]
    }

    pub fn stroke_variation(&self) -> u8 {
        self.0[5]
    }

    pub fn arm_style(&self) -> u8 {
        self.0[6]
    }

    pub fn letterform(&self) -> u8 {
        self.0[7]
    }

    pub fn midline(&self) -> u8 {
        self.0[8]
    }

    pub fn x_height(&self) -> u8 {
        self.0[9]
    }
}

/// One logical font found on disk.
///
/// Records are produced once during the scan and never change afterwards;
/// `file` is not re-checked until the font is actually loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRecord {
    pub file: PathBuf,
    pub format: FontFormat,
    pub postscript_name: String,
    #[serde(default)]
    pub cid_system_info: Option<CidSystemInfo>,
    /// `usWeightClass`, or -1 without an OS/2 table.
    pub weight_class: i32,
    /// `sFamilyClass`, or -1 without an OS/2 table.
    pub family_class: i32,
    pub code_page_range_1: u32,
    pub code_page_range_2: u32,
    /// `head.macStyle`; -1 for Type1 fonts.
    pub mac_style: i32,
    #[serde(default)]
    pub panose: Option<Panose>,
}

impl FontRecord {
    /// Record for a Type1 font, where only the name is known.
    pub fn type1(file: PathBuf, postscript_name: String) -> Self {
        Self {
            file,
            format: FontFormat::Type1,
            postscript_name,
            cid_system_info: None,
            weight_class: -1,
            family_class: -1,
            code_page_range_1: 0,
            code_page_range_2: 0,
            mac_style: -1,
            panose: None,
        }
    }

    /// Identity under which the decoded program is cached.
    pub fn key(&self) -> FontKey {
        FontKey {
            format: self.format,
            postscript_name: self.postscript_name.clone(),
            file: self.file.clone(),
        }
    }

    pub fn is_cid_keyed(&self) -> bool {
        self.cid_system_info.is_some()
    }
}

impl fmt::Display for FontRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.format,
            self.postscript_name,
            self.file.display()
        )
    }
}

/// Cache key for a [`FontRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub format: FontFormat,
    pub postscript_name: String,
    pub file: PathBuf,
}
