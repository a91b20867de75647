//! Hash index for rom equivalence lookups.
//!
//! Each supported hash kind maps a digest to the first rom that registered
//! it. A rom is present when any one of its digests is indexed *and* the
//! indexed rom has the same size.

use std::collections::HashMap;

use crate::dat::{DatFile, HashKind, Rom};

/// An in-memory index of roms keyed by every hash kind they carry.
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    by_kind: HashMap<HashKind, HashMap<String, usize>>,
    roms: Vec<Rom>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every rom of a DAT file.
    pub fn from_dat(dat: &DatFile) -> Self {
        let mut index = Self::new();
        for rom in dat.roms() {
            index.add_rom(rom);
        }
        log::debug!(
            "Indexed {} roms from '{}' ({} sha1, {} crc)",
            index.len(),
            dat.name(),
            index.digest_count(HashKind::Sha1),
            index.digest_count(HashKind::Crc32)
        );
        index
    }

    /// Register a rom under each of its digests.
    ///
    /// Digests already present keep pointing at the rom that registered them
    /// first. Roms without any hash are not stored.
    pub fn add_rom(&mut self, rom: &Rom) {
        if !rom.has_hashes() {
            return;
        }
        let slot = self.roms.len();
        self.roms.push(rom.clone());
        for (kind, digest) in &rom.hashes {
            self.by_kind
                .entry(*kind)
                .or_default()
                .entry(digest.clone())
                .or_insert(slot);
        }
    }

    fn lookup(&self, kind: HashKind, digest: &str) -> Option<&Rom> {
        let slot = *self.by_kind.get(&kind)?.get(digest)?;
        self.roms.get(slot)
    }

    /// Check a single hash kind: digest indexed and sizes equal.
    pub fn contains_kind(&self, rom: &Rom, kind: HashKind) -> bool {
        rom.hash(kind)
            .and_then(|digest| self.lookup(kind, digest))
            .is_some_and(|indexed| indexed.size == rom.size)
    }

    /// Find an equivalent indexed rom, returning the kind that matched.
    pub fn find(&self, rom: &Rom) -> Option<(HashKind, &Rom)> {
        HashKind::ALL.into_iter().find_map(|kind| {
            let indexed = self.lookup(kind, rom.hash(kind)?)?;
            (indexed.size == rom.size).then_some((kind, indexed))
        })
    }

    pub fn contains(&self, rom: &Rom) -> bool {
        self.find(rom).is_some()
    }

    /// All digests indexed for one kind.
    pub fn digests(&self, kind: HashKind) -> impl Iterator<Item = &str> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flat_map(|m| m.keys().map(String::as_str))
    }

    pub fn digest_count(&self, kind: HashKind) -> usize {
        self.by_kind.get(&kind).map_or(0, HashMap::len)
    }

    /// Number of roms registered.
    pub fn len(&self) -> usize {
        self.roms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roms.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/hash_index_tests.rs"]
mod tests;
