//! Font file discovery for fontprov-core (made by FontLab https://www.fontlab.com/)

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use walkdir::WalkDir;

use crate::format::is_font;

/// Environment variable that replaces the platform font directories.
pub const SYSTEM_FONT_DIRS_ENV: &str = "FONTPROV_SYSTEM_FONT_DIRS";

/// Path to a candidate font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSourceRef {
    pub path: PathBuf,
}

/// Trait for enumerating candidate font files.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<FontSourceRef>>;
}

/// Recursive filesystem walker that collects every recognised font container.
///
/// Roots that do not exist are logged and skipped; the other roots are still walked.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl FontDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<FontSourceRef>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                log::warn!("Skipping missing font directory {}", root.display());
                continue;
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        log::warn!("Skipping unreadable entry under {}: {err}", root.display());
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_font(entry.path()) {
                    found.push(FontSourceRef {
                        path: entry.path().to_path_buf(),
                    });
                }
            }
        }

        Ok(found)
    }
}

/// Where to look for fonts.
#[derive(Debug, Default, Clone)]
pub struct ScanOptions {
    pub roots: Vec<PathBuf>,
    pub include_system_fonts: bool,
    pub follow_symlinks: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the platform font directories only.
    pub fn system() -> Self {
        Self::new().include_system_fonts(true)
    }

    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    pub fn include_system_fonts(mut self, yes: bool) -> Self {
        self.include_system_fonts = yes;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Resolve roots (adding system directories if requested) into a walker.
    pub fn discovery(&self) -> PathDiscovery {
        let mut roots = self.roots.clone();
        if self.include_system_fonts {
            roots.extend(system_font_roots());
        }
        if roots.is_empty() {
            log::warn!("No font directories to scan");
        }
        PathDiscovery::new(roots).follow_symlinks(self.follow_symlinks)
    }
}

/// Existing platform font directories, or the `FONTPROV_SYSTEM_FONT_DIRS` override.
///
/// Empty (with a warning) when none of them exist.
pub fn system_font_roots() -> Vec<PathBuf> {
    if let Ok(raw) = env::var(SYSTEM_FONT_DIRS_ENV) {
        let overrides = existing_dirs(
            raw.split([':', ';'])
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        );
        if overrides.is_empty() {
            log::warn!("{SYSTEM_FONT_DIRS_ENV} is set but none of its paths exist");
        }
        return overrides;
    }

    #[allow(unused_mut)]
    let mut candidates: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/System/Library/Fonts"));
        candidates.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.push(PathBuf::from("/usr/share/fonts"));
        candidates.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(&home).join(".local/share/fonts"));
            candidates.push(PathBuf::from(home).join(".fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(system_root) = env::var_os("SYSTEMROOT") {
            candidates.push(PathBuf::from(system_root).join("Fonts"));
        }
        if let Some(local_appdata) = env::var_os("LOCALAPPDATA") {
            candidates.push(PathBuf::from(local_appdata).join("Microsoft/Windows/Fonts"));
        }
    }

    let candidates = existing_dirs(candidates);
    if candidates.is_empty() {
        log::warn!("No system font directories found for this platform");
    }
    candidates
}

fn existing_dirs(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = paths.into_iter().filter(|p| p.is_dir()).collect();
    dirs.sort();
    dirs.dedup();
    dirs
}
