//! Rom deduplication within a DAT, or against a parent DAT.
//!
//! Both modes walk the child's games in order and drop every rom the
//! governing [`HashIndex`] already holds. In merge mode the index is the
//! whole parent, built up front. In self mode the index starts empty and
//! each kept rom is registered, so the first occurrence wins.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::dat::{DatFile, Game, Rom};
use crate::error::DatError;
use crate::hash_index::HashIndex;

/// Games split into what survives and the roms that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub kept: Vec<Game>,
    pub removed: Vec<Rom>,
}

impl Partition {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Roms removed from a DAT by one dedupe or merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeOutcome {
    pub removed: Vec<Rom>,
    pub count: usize,
}

impl From<Vec<Rom>> for DedupeOutcome {
    fn from(removed: Vec<Rom>) -> Self {
        let count = removed.len();
        Self { removed, count }
    }
}

/// Which index decides whether a rom is a duplicate.
enum Governing<'a> {
    /// Built incrementally from the games being scanned.
    Own(HashIndex),
    /// A fixed index of a parent DAT.
    Parent(&'a HashIndex),
}

impl Governing<'_> {
    fn contains(&self, rom: &Rom) -> bool {
        match self {
            Governing::Own(index) => index.contains(rom),
            Governing::Parent(index) => index.contains(rom),
        }
    }

    fn register(&mut self, rom: &Rom) {
        if let Governing::Own(index) = self {
            index.add_rom(rom);
        }
    }
}

fn partition(games: Vec<Game>, mut governing: Governing<'_>) -> Partition {
    let mut result = Partition::default();
    for mut game in games {
        if game.roms.is_empty() {
            result.kept.push(game);
            continue;
        }
        let roms = std::mem::take(&mut game.roms);
        for rom in roms {
            if governing.contains(&rom) {
                log::debug!("Duplicate rom '{}' in game {:?}", rom.name, game.name());
                result.removed.push(rom);
            } else {
                governing.register(&rom);
                game.roms.push(rom);
            }
        }
        // A game that lost every rom still keeps its metadata.
        result.kept.push(game);
    }
    result
}

/// Partition games against themselves; first occurrence of a rom wins.
pub fn partition_self(games: Vec<Game>) -> Partition {
    partition(games, Governing::Own(HashIndex::new()))
}

/// Partition games against a prebuilt parent index.
pub fn partition_against(games: Vec<Game>, parent: &HashIndex) -> Partition {
    partition(games, Governing::Parent(parent))
}

/// Remove roms duplicated within `child` itself.
pub fn dedupe(child: &mut DatFile) -> DedupeOutcome {
    let games = std::mem::take(&mut child.games);
    let Partition { kept, removed } = partition_self(games);
    child.games = kept;
    DedupeOutcome::from(removed)
}

/// Remove roms from `child` that already exist in `parent`.
pub fn merge_with(child: &mut DatFile, parent: &DatFile) -> DedupeOutcome {
    let index = HashIndex::from_dat(parent);
    let games = std::mem::take(&mut child.games);
    let Partition { kept, removed } = partition_against(games, &index);
    child.games = kept;
    DedupeOutcome::from(removed)
}

impl DatFile {
    /// See [`dedupe`].
    pub fn dedupe(&mut self) -> DedupeOutcome {
        dedupe(self)
    }

    /// See [`merge_with`].
    pub fn merge_with(&mut self, parent: &DatFile) -> DedupeOutcome {
        merge_with(self, parent)
    }
}

/// A reference to a DAT that a dedupe session should load.
#[derive(Debug, Clone)]
pub enum DatRef {
    /// An already parsed DAT.
    Loaded(DatFile),
    /// A catalog entry written as `seed:name`.
    Named { seed: String, name: String },
    /// A `.dat` or `.xml` file on disk.
    Path(PathBuf),
}

impl FromStr for DatRef {
    type Err = DatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((seed, name)) = s.split_once(':') {
            let name = name.split(':').next().unwrap_or_default();
            return Ok(DatRef::Named {
                seed: seed.to_string(),
                name: name.to_string(),
            });
        }
        if s.ends_with(".dat") || s.ends_with(".xml") {
            return Ok(DatRef::Path(PathBuf::from(s)));
        }
        Err(DatError::invalid_reference(s))
    }
}

impl From<DatFile> for DatRef {
    fn from(dat: DatFile) -> Self {
        DatRef::Loaded(dat)
    }
}

/// Resolves `seed:name` references to files. Implemented by the catalog.
pub trait DatLookup {
    fn resolve(&self, seed: &str, name: &str) -> Result<PathBuf, DatError>;
}

/// A lookup that knows no catalog; every named reference fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl DatLookup for NoLookup {
    fn resolve(&self, seed: &str, name: &str) -> Result<PathBuf, DatError> {
        Err(DatError::lookup(format!("{seed}:{name}")))
    }
}

impl DatRef {
    /// Load the referenced DAT, games included.
    pub fn load(self, lookup: &dyn DatLookup) -> Result<DatFile, DatError> {
        let path = match self {
            DatRef::Loaded(dat) => return Ok(dat),
            DatRef::Named { seed, name } => lookup.resolve(&seed, &name)?,
            DatRef::Path(path) => path,
        };
        DatFile::from_file(&path).inspect_err(|e| {
            log::warn!("Invalid dat file {}: {e}", path.display());
        })
    }
}

/// One dedupe run: a child DAT, optionally a parent, and the removed roms.
#[derive(Debug, Clone)]
pub struct Dedupe {
    child: DatFile,
    parent: Option<DatFile>,
    merged_roms: Vec<Rom>,
}

impl Dedupe {
    pub fn new(child: DatRef, parent: Option<DatRef>, lookup: &dyn DatLookup) -> Result<Self, DatError> {
        let child = child.load(lookup)?;
        let parent = parent.map(|p| p.load(lookup)).transpose()?;
        Ok(Self::from_dats(child, parent))
    }

    pub fn from_dats(child: DatFile, parent: Option<DatFile>) -> Self {
        Self {
            child,
            parent,
            merged_roms: Vec::new(),
        }
    }

    /// Merge against the parent if there is one, else dedupe the child
    /// against itself. Returns the total number of roms removed so far.
    pub fn run(&mut self) -> usize {
        let outcome = match self.parent {
            Some(ref parent) => merge_with(&mut self.child, parent),
            None => dedupe(&mut self.child),
        };
        self.merged_roms.extend(outcome.removed);
        log::info!("Deduped {} roms", self.merged_roms.len());
        self.merged_roms.len()
    }

    pub fn merged_roms(&self) -> &[Rom] {
        &self.merged_roms
    }

    pub fn child(&self) -> &DatFile {
        &self.child
    }

    pub fn parent(&self) -> Option<&DatFile> {
        self.parent.as_ref()
    }

    pub fn into_child(self) -> DatFile {
        self.child
    }

    /// Save the child. `file` only takes effect when something was removed;
    /// otherwise the child is written back to where it came from.
    pub fn save(&mut self, file: Option<&Path>) -> Result<(), DatError> {
        if let Some(file) = file {
            if !self.merged_roms.is_empty() {
                self.child.file = Some(file.to_path_buf());
            }
        }
        self.child.save()
    }
}

#[cfg(test)]
#[path = "tests/dedupe_tests.rs"]
mod tests;
