//! Lazy loading of font programs behind the cache (made by FontLab https://www.fontlab.com/)

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use read_fonts::{FileRef, FontRef};

use crate::cache::FontCache;
use crate::container::FontContainer;
use crate::format::FontFormat;
use crate::program::{FontProgram, SfntProgram};
use crate::record::FontRecord;
use crate::type1::Type1Font;

/// Turns index records into decoded programs, consulting the cache first.
///
/// Holds no state of its own besides the cache handle.
#[derive(Clone)]
pub struct FontMaterializer {
    cache: Arc<dyn FontCache>,
}

impl FontMaterializer {
    pub fn new(cache: Arc<dyn FontCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<dyn FontCache> {
        &self.cache
    }

    /// Program for `record`, decoded at most once per record key.
    ///
    /// Failures are logged and reported as `None`; callers fall back to a
    /// substitute font of their own.
    pub fn get_font(&self, record: &FontRecord) -> Option<Arc<FontProgram>> {
        let key = record.key();
        self.cache.get_or_load(&key, &mut || match self.load(record) {
            Ok(program) => {
                log::debug!(
                    "Loaded {} from {}",
                    record.postscript_name,
                    record.file.display()
                );
                Some(Arc::new(program))
            }
            Err(err) => {
                log::error!(
                    "Could not load font file: {}: {err:#}",
                    record.file.display()
                );
                None
            }
        })
    }

    /// Decode `record` from disk, bypassing the cache.
    pub fn load(&self, record: &FontRecord) -> Result<FontProgram> {
        match record.format {
            FontFormat::Type1 => load_type1(&record.file).map(FontProgram::Type1),
            FontFormat::TrueType => {
                load_truetype(&record.file, &record.postscript_name).map(FontProgram::TrueType)
            }
            FontFormat::OpenType => {
                load_opentype(&record.file, &record.postscript_name).map(FontProgram::OpenType)
            }
        }
    }
}

fn load_type1(path: &Path) -> Result<Type1Font> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Type1Font::from_pfb(BufReader::new(file))
        .with_context(|| format!("parsing PFB {}", path.display()))
}

fn load_truetype(path: &Path, postscript_name: &str) -> Result<SfntProgram> {
    let data = read_shared(path)?;
    let file = FileRef::new(&data).with_context(|| format!("parsing font {}", path.display()))?;

    let ttc_index = match file {
        FileRef::Font(_) => None,
        FileRef::Collection(collection) => {
            let mut found = None;
            for font in collection.iter() {
                let font: FontRef = match font {
                    Ok(font) => font,
                    Err(err) => {
                        log::warn!("Skipping unreadable font in {}: {err}", path.display());
                        continue;
                    }
                };
                if font.postscript_name().as_deref() == Some(postscript_name) {
                    found = font.ttc_index();
                    break;
                }
            }
            Some(found.ok_or_else(|| {
                anyhow!("font {postscript_name} not found in {}", path.display())
            })?)
        }
    };

    SfntProgram::new(data, ttc_index, postscript_name.to_string())
}

fn load_opentype(path: &Path, postscript_name: &str) -> Result<SfntProgram> {
    let data = read_shared(path)?;
    if let FileRef::Collection(_) =
        FileRef::new(&data).with_context(|| format!("parsing font {}", path.display()))?
    {
        bail!(
            "loading CFF font {postscript_name} from collection {} is not supported",
            path.display()
        );
    }
    SfntProgram::new(data, None, postscript_name.to_string())
}

fn read_shared(path: &Path) -> Result<Arc<[u8]>> {
    let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    Ok(Arc::from(data))
}
