pub(crate) mod dedupe;
pub(crate) mod detect;
pub(crate) mod info;
pub(crate) mod mia;

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

/// Report one failed file of a batch.
pub(crate) fn report_failure(path: &Path, err: &dyn std::fmt::Display) {
    log::warn!(
        "{} {}: {}",
        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        path.display(),
        err,
    );
}

/// Turn a batch tally into the command result.
pub(crate) fn batch_result(failed: usize, total: usize) -> Result<(), CliError> {
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::Batch { failed, total })
    }
}
