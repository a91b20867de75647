//! DAT file format engine: dialect detection, parsing of XML, ClrMamePro and
//! DOSCenter DATs into one model, and hash-based rom deduplication.

mod clrmamepro;
pub mod dat;
pub mod dedupe;
pub mod error;
pub mod format;
pub mod hash_index;
pub mod mia;
pub mod xml;

pub use dat::{
    Classification, DatFile, DatLayout, DatSummary, Game, GameChild, HashKind, Rom, RootChild,
};
pub use dedupe::{DatLookup, DatRef, Dedupe, DedupeOutcome, NoLookup, Partition};
pub use error::DatError;
pub use format::{DatFormat, detect_bytes, detect_format};
pub use hash_index::HashIndex;
pub use mia::{MiaEntry, MiaSet};
