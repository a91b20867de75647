use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use datoso_dat::{DatLookup, DatRef, Dedupe};

use crate::error::CliError;

/// Dedupe a child DAT, against a parent when one is given.
pub(crate) fn run_dedupe(
    child: &str,
    parent: Option<&str>,
    output: Option<PathBuf>,
    dry_run: bool,
    lookup: &dyn DatLookup,
) -> Result<(), CliError> {
    let child: DatRef = child.parse()?;
    let parent = parent.map(str::parse::<DatRef>).transpose()?;

    let mut session = Dedupe::new(child, parent, lookup)?;
    if let Some(parent) = session.parent() {
        log::info!(
            "Merging '{}' with parent '{}'",
            session.child().name(),
            parent.name(),
        );
    } else {
        log::info!("Deduping '{}'", session.child().name());
    }

    let removed = session.run();
    for rom in session.merged_roms() {
        log::debug!("  - {:?}", rom.attribute_map());
    }

    if dry_run {
        log::info!(
            "{} {} roms would be removed",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            removed,
        );
        return Ok(());
    }

    session.save(output.as_deref())?;
    let written = session
        .child()
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    log::info!(
        "{} Removed {} roms, saved {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        removed,
        written.if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
