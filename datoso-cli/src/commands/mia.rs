use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use datoso_dat::{DatFile, MiaSet, mia};

use crate::error::CliError;

/// Flag the roms of `file` listed in the MIA list and save the result.
pub(crate) fn run_mia(
    file: &Path,
    mias: &Path,
    mark_all_roms_in_set: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let set = MiaSet::from_json_file(mias)?;
    log::debug!("Loaded {} MIA keys from {}", set.len(), mias.display());

    let mut dat = DatFile::from_file(file)?;
    let flagged = mia::mark_mias(&mut dat, &set, mark_all_roms_in_set);

    match output {
        Some(path) => dat.save_to(path)?,
        None => dat.save()?,
    }
    log::info!(
        "{} Flagged {} roms in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        flagged,
        output.unwrap_or(file).display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
