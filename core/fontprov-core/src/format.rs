//! Container classification by file extension (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Container layout implied by a file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// A single TrueType or OpenType font (`.ttf`, `.otf`).
    Simple,
    /// A collection of sfnt fonts (`.ttc`, `.otc`).
    Collection,
    /// A Type1 font in PFB segments (`.pfb`).
    Type1,
    Unrecognized,
}

/// Format of a logical font as recorded in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFormat {
    #[serde(rename = "PFB")]
    Type1,
    #[serde(rename = "TTF")]
    TrueType,
    #[serde(rename = "OTF")]
    OpenType,
}

impl FontFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FontFormat::Type1 => "PFB",
            FontFormat::TrueType => "TTF",
            FontFormat::OpenType => "OTF",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a path by its extension, ignoring case.
///
/// Content is never inspected: a `.ttf` that actually holds a collection is
/// reported as [`ContainerKind::Simple`] and fails later in the parser.
pub fn classify(path: &Path) -> ContainerKind {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return ContainerKind::Unrecognized,
    };

    match ext.as_str() {
        "ttf" | "otf" => ContainerKind::Simple,
        "ttc" | "otc" => ContainerKind::Collection,
        "pfb" => ContainerKind::Type1,
        _ => ContainerKind::Unrecognized,
    }
}

/// True when [`classify`] recognises the path.
pub fn is_font(path: &Path) -> bool {
    classify(path) != ContainerKind::Unrecognized
}
