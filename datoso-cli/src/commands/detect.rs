use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

use super::{batch_result, report_failure};

/// Print the dialect of each file.
pub(crate) fn run_detect(files: &[PathBuf]) -> Result<(), CliError> {
    let mut failed = 0;
    for path in files {
        match datoso_dat::detect_format(path) {
            Ok(format) => {
                log::info!(
                    "{} {}",
                    format.if_supports_color(Stdout, |t| t.cyan()),
                    path.display(),
                );
            }
            Err(e) => {
                report_failure(path, &e);
                failed += 1;
            }
        }
    }
    batch_result(failed, files.len())
}
