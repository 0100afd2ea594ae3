//! Index export (made by FontLab https://www.fontlab.com/)
//!
//! Records can leave the process as one JSON document, as one JSON object
//! per line, or as the same `<format>: <postscript name>: <path>` lines that
//! [`FontIndex::debug_dump`](crate::index::FontIndex::debug_dump) produces.

use std::io::Write;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::record::FontRecord;

/// Shape of an exported index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// Indented JSON array.
    Json,
    /// One compact JSON object per line.
    Ndjson,
    /// Human-readable listing, one record per line.
    #[default]
    Listing,
}

impl FromStr for RecordLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "listing" | "text" => Ok(Self::Listing),
            other => bail!("unknown record layout: {other}"),
        }
    }
}

/// Write `records` in the given layout, newline-terminated.
pub fn write_records(
    records: &[FontRecord],
    layout: RecordLayout,
    mut w: impl Write,
) -> Result<()> {
    match layout {
        RecordLayout::Json => {
            serde_json::to_writer_pretty(&mut w, records)?;
            w.write_all(b"\n")?;
        }
        RecordLayout::Ndjson => {
            for record in records {
                serde_json::to_writer(&mut w, record)?;
                w.write_all(b"\n")?;
            }
        }
        RecordLayout::Listing => {
            for record in records {
                writeln!(w, "{record}")?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Load records back from JSON or NDJSON produced by [`write_records`].
pub fn read_records(text: &str) -> Result<Vec<FontRecord>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(anyhow::Error::from))
        .collect()
}
