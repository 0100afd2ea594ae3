/// fontprov-core: the patient doorkeeper of installed fonts
///
/// It walks the font directories once, writes down just enough about each
/// font for substitution code to make up its mind, and only opens a font
/// properly when someone actually asks for it. After that, the decoded font
/// stays on the counter for the next caller.
///
/// ## Two Acts
///
/// **Indexing**: one quick look at every file
/// - Recognises TrueType/OpenType (`.ttf`, `.otf`), collections (`.ttc`,
///   `.otc`) and Type1 (`.pfb`) by extension
/// - Reads PostScript names, OS/2 classification, `macStyle`, PANOSE and
///   CID registry/ordering/supplement
/// - Shrugs off broken files instead of giving up on the whole directory
///
/// **Loading**: the real thing, at most once
/// - Re-opens the backing file, finds the right member of a collection
/// - Keeps decoded fonts in a [`FontCache`](cache::FontCache) keyed by
///   record identity
///
/// ## A Sample Conversation
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fontprov_core::cache::MemoryFontCache;
/// use fontprov_core::discovery::ScanOptions;
/// use fontprov_core::provider::FileSystemFontProvider;
///
/// let options = ScanOptions::system().with_roots(["/opt/fonts"]);
/// let provider = FileSystemFontProvider::new(&options, Arc::new(MemoryFontCache::new()));
///
/// print!("{}", provider.to_debug_string());
///
/// if let Some(record) = provider
///     .font_info()
///     .iter()
///     .find(|r| r.postscript_name == "Helvetica")
/// {
///     match provider.get_font(record) {
///         Some(font) => println!("loaded {}", font.postscript_name()),
///         None => println!("falling back to a substitute"),
///     }
/// }
/// ```
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod cache;
pub mod container;
pub mod discovery;
pub mod extract;
pub mod format;
pub mod index;
pub mod materialize;
pub mod output;
pub mod program;
pub mod provider;
pub mod record;
pub mod type1;
