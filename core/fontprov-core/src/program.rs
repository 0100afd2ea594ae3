//! Decoded font programs handed out by the materializer (made by FontLab https://www.fontlab.com/)

use std::sync::Arc;

use anyhow::{Context, Result};
use read_fonts::types::GlyphId;
use read_fonts::FontRef;
use skrifa::instance::{LocationRef, Size};
use skrifa::MetadataProvider;

use crate::format::FontFormat;
use crate::type1::Type1Font;

/// A fully loaded font, shared between the cache and its callers.
#[derive(Debug, Clone)]
pub enum FontProgram {
    Type1(Type1Font),
    TrueType(SfntProgram),
    OpenType(SfntProgram),
}

impl FontProgram {
    pub fn format(&self) -> FontFormat {
        match self {
            FontProgram::Type1(_) => FontFormat::Type1,
            FontProgram::TrueType(_) => FontFormat::TrueType,
            FontProgram::OpenType(_) => FontFormat::OpenType,
        }
    }

    pub fn postscript_name(&self) -> &str {
        match self {
            FontProgram::Type1(font) => font.name(),
            FontProgram::TrueType(font) | FontProgram::OpenType(font) => font.postscript_name(),
        }
    }

    pub fn as_sfnt(&self) -> Option<&SfntProgram> {
        match self {
            FontProgram::Type1(_) => None,
            FontProgram::TrueType(font) | FontProgram::OpenType(font) => Some(font),
        }
    }

    pub fn as_type1(&self) -> Option<&Type1Font> {
        match self {
            FontProgram::Type1(font) => Some(font),
            _ => None,
        }
    }
}

/// A TrueType or OpenType font backed by the bytes of its file.
#[derive(Debug, Clone)]
pub struct SfntProgram {
    data: Arc<[u8]>,
    ttc_index: Option<u32>,
    postscript_name: String,
}

impl SfntProgram {
    /// Validate `data` as a font (at `ttc_index` for collections) and take ownership of it.
    pub fn new(data: Arc<[u8]>, ttc_index: Option<u32>, postscript_name: String) -> Result<Self> {
        let program = Self {
            data,
            ttc_index,
            postscript_name,
        };
        program.font_ref()?;
        Ok(program)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Position inside a TTC/OTC file, `None` for single-font files.
    pub fn ttc_index(&self) -> Option<u32> {
        self.ttc_index
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Borrow the font's tables.
    pub fn font_ref(&self) -> Result<FontRef<'_>> {
        let font = match self.ttc_index {
            Some(idx) => FontRef::from_index(&self.data, idx),
            None => FontRef::new(&self.data),
        };
        font.with_context(|| format!("re-reading font {}", self.postscript_name))
    }

    pub fn units_per_em(&self) -> Result<u16> {
        let font = self.font_ref()?;
        Ok(font
            .metrics(Size::unscaled(), LocationRef::default())
            .units_per_em)
    }

    /// Nominal glyph for a character, if the font maps it.
    pub fn glyph_for(&self, ch: char) -> Option<GlyphId> {
        self.font_ref().ok()?.charmap().map(ch)
    }
}
