//! Missing-in-action rom marking.
//!
//! The MIA list is keyed by the best hash available for each entry (sha1,
//! then md5, then crc32), or by `"<system> - <game>"` when an entry has no
//! hash at all.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::dat::{DatFile, HashKind, Rom};
use crate::error::DatError;

/// One row of the MIA list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiaEntry {
    pub system: Option<String>,
    pub game: Option<String>,
    pub size: Option<String>,
    pub crc32: Option<String>,
    pub md5: Option<String>,
    pub sha1: Option<String>,
}

impl MiaEntry {
    pub fn key(&self) -> String {
        match self.sha1.as_ref().or(self.md5.as_ref()).or(self.crc32.as_ref()) {
            Some(hash) => hash.to_lowercase(),
            None => format!(
                "{} - {}",
                self.system.as_deref().unwrap_or_default(),
                self.game.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// A set of MIA keys.
#[derive(Debug, Clone, Default)]
pub struct MiaSet {
    keys: HashSet<String>,
}

impl MiaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(normalize_key(key.into()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Parse a MIA list: either an object of `key -> entry` or an array of entries.
    pub fn from_json(text: &str) -> Result<Self, DatError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MiaList {
            Keyed(HashMap<String, serde_json::Value>),
            Rows(Vec<MiaEntry>),
        }

        let mut set = Self::new();
        match serde_json::from_str::<MiaList>(text)? {
            MiaList::Keyed(map) => map.into_keys().for_each(|k| set.insert(k)),
            MiaList::Rows(rows) => rows.iter().for_each(|row| set.insert(row.key())),
        }
        Ok(set)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DatError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl<S: Into<String>> FromIterator<S> for MiaSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        iter.into_iter().for_each(|k| set.insert(k));
        set
    }
}

/// Hex digests are compared case-insensitively; names are kept as-is.
fn normalize_key(key: String) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit()) {
        key.to_lowercase()
    } else {
        key
    }
}

/// The key a rom is looked up under.
pub fn rom_key(rom: &Rom, system: Option<&str>) -> String {
    [HashKind::Sha1, HashKind::Md5, HashKind::Crc32]
        .into_iter()
        .find_map(|kind| rom.hash(kind))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} - {}", system.unwrap_or_default(), rom.name))
}

/// Flag roms listed in `mias`. With `mark_all_roms_in_set`, one MIA rom
/// flags every rom of its game. Returns how many roms were newly flagged.
pub fn mark_mias(dat: &mut DatFile, mias: &MiaSet, mark_all_roms_in_set: bool) -> usize {
    let system = dat.classification.system.clone();
    let mut flagged = 0;

    for game in &mut dat.games {
        let hits: Vec<bool> = game
            .roms
            .iter()
            .map(|rom| mias.contains(&rom_key(rom, system.as_deref())))
            .collect();
        let whole_set = mark_all_roms_in_set && hits.iter().any(|&hit| hit);

        for (rom, hit) in game.roms.iter_mut().zip(hits) {
            if (hit || whole_set) && !rom.mia {
                rom.mia = true;
                flagged += 1;
            }
        }
    }

    log::info!("Marked {flagged} roms as MIA in '{}'", dat.name());
    flagged
}

#[cfg(test)]
#[path = "tests/mia_tests.rs"]
mod tests;
