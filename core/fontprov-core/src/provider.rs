//! Long-lived font provider service (made by FontLab https://www.fontlab.com/)

use std::sync::Arc;

use crate::cache::FontCache;
use crate::discovery::ScanOptions;
use crate::index::FontIndex;
use crate::materialize::FontMaterializer;
use crate::program::FontProgram;
use crate::record::FontRecord;

/// Fonts found on the local filesystem, loaded on first use.
///
/// Built once (the scan is eager); hand out `&FontRecord`s to matching code
/// and call [`get_font`](Self::get_font) for the ones it picks.
#[derive(Clone)]
pub struct FileSystemFontProvider {
    index: FontIndex,
    materializer: FontMaterializer,
}

impl FileSystemFontProvider {
    /// Scan the directories named by `options`.
    ///
    /// Never fails: missing directories are skipped and an empty scan gives
    /// an empty provider.
    pub fn new(options: &ScanOptions, cache: Arc<dyn FontCache>) -> Self {
        let index = FontIndex::build(&options.discovery());
        Self::with_index(index, cache)
    }

    pub fn with_index(index: FontIndex, cache: Arc<dyn FontCache>) -> Self {
        Self {
            index,
            materializer: FontMaterializer::new(cache),
        }
    }

    pub fn index(&self) -> &FontIndex {
        &self.index
    }

    pub fn font_info(&self) -> &[FontRecord] {
        self.index.list_all()
    }

    pub fn get_font(&self, record: &FontRecord) -> Option<Arc<FontProgram>> {
        self.materializer.get_font(record)
    }

    pub fn to_debug_string(&self) -> String {
        self.index.debug_dump()
    }
}
