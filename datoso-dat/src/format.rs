//! DAT dialect detection.
//!
//! Detection is a plain magic-prefix check: the first bytes of the file are
//! filtered down to ASCII and the first five characters are compared against
//! the three known prefixes. Nothing is skipped before the prefix, so a file
//! with leading whitespace is not recognized.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::DatError;

/// Number of bytes read from the start of a file for detection.
pub const SNIFF_LEN: usize = 10;

/// Length of the magic prefix compared after ASCII filtering.
const MAGIC_LEN: usize = 5;

/// The three textual dialects a DAT file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatFormat {
    /// Logiqx-style XML (`<?xml` ...)
    Xml,
    /// ClrMamePro parenthesized blocks (`clrmamepro (` ...)
    ClrMamePro,
    /// DOSCenter variant of the block syntax (`DOSCenter (` ...)
    DosCenter,
}

impl DatFormat {
    pub const ALL: [DatFormat; 3] = [DatFormat::Xml, DatFormat::ClrMamePro, DatFormat::DosCenter];

    /// The exact ASCII prefix identifying this dialect.
    pub const fn magic(self) -> &'static str {
        match self {
            DatFormat::Xml => "<?xml",
            DatFormat::ClrMamePro => "clrma",
            DatFormat::DosCenter => "DOSCe",
        }
    }

    /// Header block keyword used when writing the text dialects.
    pub const fn header_keyword(self) -> &'static str {
        match self {
            DatFormat::Xml => "header",
            DatFormat::ClrMamePro => "clrmamepro",
            DatFormat::DosCenter => "DOSCenter",
        }
    }

    pub fn from_magic(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.magic() == prefix)
    }
}

impl fmt::Display for DatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatFormat::Xml => "XML",
            DatFormat::ClrMamePro => "ClrMamePro",
            DatFormat::DosCenter => "DOSCenter",
        };
        f.write_str(name)
    }
}

/// Classify the leading bytes of a file.
///
/// Only the first [`SNIFF_LEN`] bytes are considered. Non-ASCII bytes (such
/// as a UTF-8 byte order mark) are dropped before taking the prefix.
pub fn detect_bytes(bytes: &[u8]) -> Option<DatFormat> {
    let prefix: String = bytes
        .iter()
        .take(SNIFF_LEN)
        .filter(|b| b.is_ascii())
        .take(MAGIC_LEN)
        .map(|&b| b as char)
        .collect();
    DatFormat::from_magic(&prefix)
}

/// Detect the dialect of a file on disk.
pub fn detect_format(path: &Path) -> Result<DatFormat, DatError> {
    let file = std::fs::File::open(path)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut head)?;

    match detect_bytes(&head) {
        Some(format) => {
            log::debug!("Detected {format} DAT: {}", path.display());
            Ok(format)
        }
        None => Err(DatError::unrecognized(path)),
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
