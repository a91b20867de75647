use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DatError;
use crate::format::{self, DatFormat};
use crate::xml::Element;
use crate::{clrmamepro, xml};

/// Substring used by template DATs to mark unfilled header fields.
const PLACEHOLDER_MARKER: &str = "insert";

/// A parsed DAT file in any of the supported dialects.
#[derive(Debug, Clone)]
pub struct DatFile {
    pub format: DatFormat,
    /// Where the file was loaded from; the default target of [`DatFile::save`].
    pub file: Option<PathBuf>,
    /// Header fields in source order. Keys are lowercased for the text dialects.
    pub header: IndexMap<String, String>,
    pub games: Vec<Game>,
    /// Document layout needed to write the file back in its own dialect.
    pub layout: DatLayout,
    /// Derived path/classification attributes, filled in by seed plugins.
    pub classification: Classification,
}

/// One releasable unit (a title or revision) within a DAT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    /// Attributes carried on the XML game element (`name`, `cloneof`, ...).
    pub attributes: Vec<(String, String)>,
    /// Simple `key value` fields: XML text children, or the key/value lines
    /// of a block-syntax game.
    pub fields: Vec<(String, String)>,
    /// Other XML children (`release`, `disk`, `sample`, ...) kept verbatim.
    pub extra: Vec<Element>,
    pub roms: Vec<Rom>,
    /// Source order of the XML children, one slot per element. Empty for
    /// games that did not come from an XML document.
    pub order: Vec<GameChild>,
}

/// Which collection of a [`Game`] an XML child element was stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameChild {
    Field,
    Rom,
    Extra,
}

/// Which part of a DAT an XML root child belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootChild {
    Header,
    Game,
    Extra,
}

/// A single file entry within a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rom {
    pub name: String,
    pub size: Option<u64>,
    /// Digests by kind (lowercase hex).
    pub hashes: BTreeMap<HashKind, String>,
    /// Missing-in-action flag, set by [`crate::mia::mark_mias`].
    pub mia: bool,
    /// Any other attribute (`status`, `serial`, `date`, `merge`, ...).
    pub attributes: Vec<(String, String)>,
}

/// Hash kinds a rom may carry, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    Sha256,
    Sha1,
    Md5,
    #[serde(rename = "crc")]
    Crc32,
}

impl HashKind {
    pub const ALL: [HashKind; 4] = [HashKind::Sha256, HashKind::Sha1, HashKind::Md5, HashKind::Crc32];

    /// Attribute name used for this hash in DAT files.
    pub const fn attribute(self) -> &'static str {
        match self {
            HashKind::Sha256 => "sha256",
            HashKind::Sha1 => "sha1",
            HashKind::Md5 => "md5",
            HashKind::Crc32 => "crc",
        }
    }

    pub fn from_attribute(key: &str) -> Option<Self> {
        match key {
            "sha256" => Some(HashKind::Sha256),
            "sha1" => Some(HashKind::Sha1),
            "md5" => Some(HashKind::Md5),
            "crc" | "crc32" => Some(HashKind::Crc32),
            _ => None,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Layout details of the source document that the model itself doesn't carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatLayout {
    /// Root element (XML) or header block keyword (text dialects).
    pub root: String,
    pub root_attributes: Vec<(String, String)>,
    /// Tag or block keyword used for each game (`game`, `machine`, ...).
    pub game_tag: String,
    /// Whether the XML document had a `<header>` element.
    pub has_header: bool,
    pub doctype: Option<String>,
    /// Non-text `<header>` children such as `<clrmamepro forcenodump=.../>`.
    pub header_extra: Vec<Element>,
    /// Root children that are neither the header nor games.
    pub root_extra: Vec<Element>,
    /// Source order of the root children. Empty when not parsed from XML.
    pub root_order: Vec<RootChild>,
}

impl DatLayout {
    pub fn for_format(format: DatFormat) -> Self {
        let root = match format {
            DatFormat::Xml => "datafile",
            other => other.header_keyword(),
        };
        Self {
            root: root.to_string(),
            root_attributes: Vec::new(),
            game_tag: "game".to_string(),
            has_header: true,
            doctype: None,
            header_extra: Vec::new(),
            root_extra: Vec::new(),
            root_order: Vec::new(),
        }
    }
}

/// Attributes derived from seed/system metadata rather than the file itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    pub seed: Option<String>,
    pub version: Option<String>,
    pub modifier: Option<String>,
    pub company: Option<String>,
    pub system: Option<String>,
    pub system_type: Option<String>,
    pub prefix: Option<String>,
    pub suffixes: Vec<String>,
}

impl Classification {
    /// Apply system overrides. Only non-empty override values replace ours.
    pub fn apply(&mut self, overrides: &Classification) {
        fn take(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                *target = Some(v.to_string());
            }
        }
        take(&mut self.seed, &overrides.seed);
        take(&mut self.version, &overrides.version);
        take(&mut self.modifier, &overrides.modifier);
        take(&mut self.company, &overrides.company);
        take(&mut self.system, &overrides.system);
        take(&mut self.system_type, &overrides.system_type);
        take(&mut self.prefix, &overrides.prefix);
        if !overrides.suffixes.is_empty() {
            self.suffixes = overrides.suffixes.clone();
        }
    }

    /// Join `prefix/company/system/suffixes...`, skipping empty segments.
    pub fn path(&self) -> PathBuf {
        [&self.prefix, &self.company, &self.system]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .chain(self.suffixes.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Flat record of a DAT file as consumed by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatSummary {
    pub name: String,
    pub file: Option<String>,
    pub full_name: Option<String>,
    pub seed: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
    pub modifier: Option<String>,
    pub company: Option<String>,
    pub system: Option<String>,
    pub system_type: Option<String>,
    pub path: String,
}

impl DatFile {
    /// Create an empty DAT with the given name.
    pub fn new(format: DatFormat, name: impl Into<String>) -> Self {
        let mut header = IndexMap::new();
        header.insert("name".to_string(), name.into());
        Self {
            format,
            file: None,
            header,
            games: Vec::new(),
            layout: DatLayout::for_format(format),
            classification: Classification::default(),
        }
    }

    /// Detect the dialect of `path` and parse it.
    pub fn from_file(path: &Path) -> Result<Self, DatError> {
        let format = format::detect_format(path).inspect_err(|e| {
            log::warn!("Error detecting DAT type: {e}");
        })?;
        Self::load(path, format)
    }

    /// Parse `path` as the given dialect.
    pub fn load(path: &Path, format: DatFormat) -> Result<Self, DatError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let mut dat = Self::parse_str(format, &text, Some(path))?;
        dat.file = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} DAT '{}' ({} games) from {}",
            format,
            dat.name(),
            dat.games.len(),
            path.display()
        );
        Ok(dat)
    }

    /// Parse in-memory text. `origin` is only used for error messages.
    pub fn parse_str(format: DatFormat, text: &str, origin: Option<&Path>) -> Result<Self, DatError> {
        let text = text.trim_start_matches('\u{feff}');
        match format {
            DatFormat::Xml => xml::parse(text, origin),
            DatFormat::ClrMamePro | DatFormat::DosCenter => clrmamepro::parse(text, format, origin),
        }
    }

    /// Serialize the DAT in its own dialect.
    pub fn render(&self) -> Result<String, DatError> {
        match self.format {
            DatFormat::Xml => xml::render(self),
            DatFormat::ClrMamePro | DatFormat::DosCenter => Ok(clrmamepro::render(self)),
        }
    }

    /// Write the DAT back to the file it was loaded from.
    pub fn save(&self) -> Result<(), DatError> {
        let path = self.file.as_deref().ok_or(DatError::NoPath)?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DatError> {
        let rendered = self.render()?;
        std::fs::write(path, rendered)?;
        log::debug!("Saved {} DAT to {}", self.format, path.display());
        Ok(())
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.header.get(key).map(String::as_str)
    }

    pub fn name(&self) -> &str {
        self.header_value("name").unwrap_or_default()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.header_value("description")
    }

    pub fn date(&self) -> Option<&str> {
        self.header_value("date")
    }

    pub fn version(&self) -> Option<&str> {
        self.classification
            .version
            .as_deref()
            .or_else(|| self.header_value("version"))
    }

    pub fn homepage(&self) -> Option<&str> {
        self.filled_header_value("homepage")
    }

    pub fn url(&self) -> Option<&str> {
        self.filled_header_value("url")
    }

    pub fn author(&self) -> Option<&str> {
        self.filled_header_value("author")
    }

    pub fn email(&self) -> Option<&str> {
        self.filled_header_value("email")
    }

    /// A header value, unless it's empty or still a template placeholder.
    fn filled_header_value(&self, key: &str) -> Option<&str> {
        self.header_value(key)
            .filter(|v| !v.is_empty() && !v.contains(PLACEHOLDER_MARKER))
    }

    pub fn path(&self) -> PathBuf {
        self.classification.path()
    }

    pub fn summary(&self) -> DatSummary {
        let c = &self.classification;
        DatSummary {
            name: self.name().to_string(),
            file: self.file.as_ref().map(|p| p.display().to_string()),
            full_name: self.full_name().map(str::to_string),
            seed: c.seed.clone(),
            version: self.version().map(str::to_string),
            date: self.date().map(str::to_string),
            modifier: c.modifier.clone(),
            company: c.company.clone(),
            system: c.system.clone(),
            system_type: c.system_type.clone(),
            path: self.path().display().to_string(),
        }
    }

    pub fn roms(&self) -> impl Iterator<Item = &Rom> {
        self.games.iter().flat_map(|g| g.roms.iter())
    }

    pub fn rom_count(&self) -> usize {
        self.games.iter().map(|g| g.roms.len()).sum()
    }
}

impl Game {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: vec![("name".to_string(), name.into())],
            ..Self::default()
        }
    }

    pub fn with_rom(mut self, rom: Rom) -> Self {
        self.roms.push(rom);
        self
    }

    /// Look up a game attribute or field by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .chain(self.fields.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }
}

impl Rom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_hash(mut self, kind: HashKind, digest: impl AsRef<str>) -> Self {
        self.hashes.insert(kind, digest.as_ref().to_lowercase());
        self
    }

    pub fn hash(&self, kind: HashKind) -> Option<&str> {
        self.hashes.get(&kind).map(String::as_str)
    }

    pub fn has_hashes(&self) -> bool {
        !self.hashes.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Route a raw `key value` attribute into the rom.
    pub(crate) fn set_attribute(&mut self, key: &str, value: String) -> Result<(), DatError> {
        match key {
            "name" => self.name = value,
            "size" => {
                let size = value
                    .trim()
                    .parse()
                    .map_err(|_| DatError::invalid_dat(format!("Invalid ROM size: {value}")))?;
                self.size = Some(size);
            }
            "mia" => self.mia = value.eq_ignore_ascii_case("yes"),
            _ => match HashKind::from_attribute(key) {
                Some(kind) => {
                    if !value.is_empty() {
                        self.hashes.insert(kind, value.to_lowercase());
                    }
                }
                None => self.attributes.push((key.to_string(), value)),
            },
        }
        Ok(())
    }

    /// Attributes in write order: name, size, hashes, the rest, then `mia`.
    pub fn attribute_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("name".to_string(), self.name.clone())];
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for kind in [HashKind::Crc32, HashKind::Md5, HashKind::Sha1, HashKind::Sha256] {
            if let Some(digest) = self.hash(kind) {
                pairs.push((kind.attribute().to_string(), digest.to_string()));
            }
        }
        pairs.extend(self.attributes.iter().cloned());
        if self.mia {
            pairs.push(("mia".to_string(), "yes".to_string()));
        }
        pairs
    }

    /// The rom as a generic attribute map with `@`-prefixed keys, the shape
    /// XML-to-dict conversion produces. Used for reporting removed roms.
    pub fn attribute_map(&self) -> IndexMap<String, String> {
        self.attribute_pairs()
            .into_iter()
            .map(|(k, v)| (format!("@{k}"), v))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
