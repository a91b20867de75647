//! Application settings (`~/.config/datoso/settings.toml`).
//!
//! Every value here can be overridden from the command line. A missing or
//! malformed file means defaults.

use std::path::{Path, PathBuf};

use datoso_dat::{DatError, DatLookup};

/// Canonical path to the settings file: `~/.config/datoso/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("datoso").join("settings.toml")
}

/// Values read from `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Settings {
    /// `process.mark_all_roms_in_set`
    pub mark_all_roms_in_set: bool,
    /// `catalog.dat_root`
    pub dat_root: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn load() -> Self {
        Self::from_path(&settings_path())
    }

    pub(crate) fn from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(_) => Self::default(),
        }
    }

    pub(crate) fn from_toml(contents: &str) -> Self {
        let Ok(doc) = contents.parse::<toml::Value>() else {
            log::warn!("Ignoring malformed {}", settings_path().display());
            return Self::default();
        };

        let mark_all_roms_in_set = doc
            .get("process")
            .and_then(|p| p.get("mark_all_roms_in_set"))
            .and_then(toml::Value::as_bool)
            .unwrap_or(false);
        let dat_root = doc
            .get("catalog")
            .and_then(|c| c.get("dat_root"))
            .and_then(toml::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            mark_all_roms_in_set,
            dat_root,
        }
    }

    /// Resolve MIA set marking: CLI override first, then the settings file.
    pub(crate) fn mark_all_roms_in_set(&self, cli_override: Option<bool>) -> bool {
        cli_override.unwrap_or(self.mark_all_roms_in_set)
    }

    /// Resolve the DAT root: CLI override first, then the settings file.
    pub(crate) fn catalog(&self, cli_override: Option<PathBuf>) -> CatalogLookup {
        CatalogLookup {
            root: cli_override.or_else(|| self.dat_root.clone()),
        }
    }
}

/// Resolves `seed:name` to `<root>/<seed>/<name>.dat` or `.xml`.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogLookup {
    root: Option<PathBuf>,
}

impl DatLookup for CatalogLookup {
    fn resolve(&self, seed: &str, name: &str) -> Result<PathBuf, DatError> {
        let Some(ref root) = self.root else {
            return Err(DatError::lookup(format!(
                "{seed}:{name} (no dat root configured)"
            )));
        };
        let dir = root.join(seed);
        ["dat", "xml"]
            .into_iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
            .ok_or_else(|| DatError::lookup(format!("{seed}:{name} not found in {}", dir.display())))
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
