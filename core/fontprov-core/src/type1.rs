//! Minimal Type1 (PFB) reader (made by FontLab https://www.fontlab.com/)
//!
//! Only the segment wrapper and the cleartext font dictionary are
//! interpreted. The eexec-protected portion is kept verbatim and can be
//! decrypted on demand.

use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};

const SEGMENT_MARKER: u8 = 0x80;
const SEGMENT_ASCII: u8 = 1;
const SEGMENT_BINARY: u8 = 2;
const SEGMENT_EOF: u8 = 3;

const EEXEC_KEY: u16 = 55665;
const EEXEC_C1: u16 = 52845;
const EEXEC_C2: u16 = 22719;
const EEXEC_SKIP: usize = 4;

/// A Type1 font program read from a PFB stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type1Font {
    name: String,
    family_name: Option<String>,
    full_name: Option<String>,
    weight: Option<String>,
    cleartext: Vec<u8>,
    encrypted: Vec<u8>,
}

impl Type1Font {
    /// Read a whole PFB stream and parse its cleartext dictionary.
    pub fn from_pfb(mut reader: impl Read) -> Result<Self> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .context("reading PFB stream")?;
        Self::from_pfb_bytes(&data)
    }

    pub fn from_pfb_bytes(data: &[u8]) -> Result<Self> {
        let (cleartext, encrypted) = split_segments(data)?;

        let header = String::from_utf8_lossy(&cleartext);
        if !(header.starts_with("%!PS-AdobeFont") || header.starts_with("%!FontType1")) {
            bail!("invalid Type1 header");
        }

        let name = literal_name(&header, "/FontName")
            .ok_or_else(|| anyhow!("Type1 font has no /FontName"))?;

        Ok(Self {
            name,
            family_name: string_value(&header, "/FamilyName"),
            full_name: string_value(&header, "/FullName"),
            weight: string_value(&header, "/Weight"),
            cleartext,
            encrypted,
        })
    }

    /// The PostScript name from `/FontName`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    pub fn cleartext(&self) -> &[u8] {
        &self.cleartext
    }

    /// The eexec-encrypted portion exactly as stored in the file.
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Decrypt the eexec portion, dropping the four random lead bytes.
    pub fn private_portion(&self) -> Vec<u8> {
        eexec_decrypt(&self.encrypted)
    }
}

fn split_segments(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut cleartext = Vec::new();
    let mut encrypted = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        if data[pos] != SEGMENT_MARKER {
            bail!("not a PFB file: bad segment marker at offset {pos}");
        }
        let kind = *data
            .get(pos + 1)
            .ok_or_else(|| anyhow!("truncated PFB segment header at offset {pos}"))?;
        if kind == SEGMENT_EOF {
            break;
        }
        let len_bytes: [u8; 4] = data
            .get(pos + 2..pos + 6)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| anyhow!("truncated PFB segment header at offset {pos}"))?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        let start = pos + 6;
        let body = start
            .checked_add(len)
            .and_then(|end| data.get(start..end))
            .ok_or_else(|| anyhow!("PFB segment at offset {pos} overruns the file"))?;

        match kind {
            SEGMENT_ASCII if encrypted.is_empty() => cleartext.extend_from_slice(body),
            // trailing cleartext (the zeros and cleartomark) is not needed
            SEGMENT_ASCII => {}
            SEGMENT_BINARY => encrypted.extend_from_slice(body),
            other => bail!("unknown PFB segment type {other}"),
        }
        pos = start + len;
    }

    if cleartext.is_empty() {
        bail!("PFB file has no cleartext segment");
    }
    Ok((cleartext, encrypted))
}

fn eexec_decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut r = EEXEC_KEY;
    let mut plain = Vec::with_capacity(cipher.len());
    for &c in cipher {
        plain.push(c ^ (r >> 8) as u8);
        r = (c as u16)
            .wrapping_add(r)
            .wrapping_mul(EEXEC_C1)
            .wrapping_add(EEXEC_C2);
    }
    plain.into_iter().skip(EEXEC_SKIP).collect()
}

/// Value of `key /Literal` in a PostScript dictionary.
fn literal_name(text: &str, key: &str) -> Option<String> {
    let rest = after_key(text, key)?;
    let rest = rest.strip_prefix('/')?;
    let name: String = rest
        .chars()
        .take_while(|c| !c.is_whitespace() && !"/()[]{}<>%".contains(*c))
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Value of `key (string)` in a PostScript dictionary, with nested parens balanced.
fn string_value(text: &str, key: &str) -> Option<String> {
    let rest = after_key(text, key)?;
    let rest = rest.strip_prefix('(')?;
    let mut depth = 1usize;
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(out.trim().to_string());
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    None
}

fn after_key<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let mut search = text;
    loop {
        let idx = search.find(key)?;
        let rest = &search[idx + key.len()..];
        // `/FontName` must not match `/FontNameX`
        if rest.starts_with(|c: char| c.is_whitespace()) {
            return Some(rest.trim_start());
        }
        search = rest;
    }
}
