/// The catalog of every font we met during the scan
///
/// Like a librarian who writes one index card per book and never rewrites
/// it, this index walks the font directories once, fills in a card for
/// every logical font it finds, and then only ever answers questions.
/// Collections get one card per member; files that refuse to open get none,
/// and the walk carries on without them.
///
/// Made with patience at FontLab https://www.fontlab.com/
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::discovery::FontDiscovery;
use crate::extract::extract_file;
use crate::record::FontRecord;

/// Append-only, in-memory list of font records in discovery order.
#[derive(Debug, Clone, Default)]
pub struct FontIndex {
    records: Vec<FontRecord>,
}

impl FontIndex {
    /// Walks whatever the locator hands us and reads every font it found
    ///
    /// There is always an index at the end. A locator that gives up is
    /// logged and leaves the shelves empty; broken fonts are noted in the
    /// log and quietly left off the shelves.
    pub fn build(discovery: &dyn FontDiscovery) -> Self {
        log::trace!("Will search the local system for fonts");
        let sources = match discovery.discover() {
            Ok(sources) => sources,
            Err(err) => {
                log::error!("Font discovery failed: {err:#}");
                Vec::new()
            }
        };
        log::trace!("Found {} fonts on the local system", sources.len());

        Self::from_paths(sources.into_iter().map(|source| source.path))
    }

    /// Reads the given files in order, never giving up on the rest
    ///
    /// Each path is classified by extension and handed to the extractor;
    /// unrecognised paths are skipped without a word.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut index = Self::default();
        for path in paths {
            index.records.extend(extract_file(&path));
        }
        log::trace!("Indexed {} fonts", index.records.len());
        index
    }

    /// Every record, in the order the files were discovered.
    pub fn list_all(&self) -> &[FontRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One `<format>: <postscript name>: <path>` line per record.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            // writing into a String cannot fail
            let _ = writeln!(out, "{record}");
        }
        out
    }
}

impl<'a> IntoIterator for &'a FontIndex {
    type Item = &'a FontRecord;
    type IntoIter = std::slice::Iter<'a, FontRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
