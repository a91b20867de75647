use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use datoso_dat::{Classification, DatFile, DatSummary};

use crate::error::CliError;

use super::{batch_result, report_failure};

fn print_summary(dat: &DatFile, summary: &DatSummary) {
    log::info!(
        "{} [{}]",
        summary.name.if_supports_color(Stdout, |t| t.bold()),
        dat.format.if_supports_color(Stdout, |t| t.cyan()),
    );

    let optional = [
        ("Description", summary.full_name.as_deref()),
        ("Version", summary.version.as_deref()),
        ("Date", summary.date.as_deref()),
        ("Author", dat.author()),
        ("Homepage", dat.homepage()),
        ("URL", dat.url()),
        ("Seed", summary.seed.as_deref()),
        ("Company", summary.company.as_deref()),
        ("System", summary.system.as_deref()),
        ("System type", summary.system_type.as_deref()),
        ("Modifier", summary.modifier.as_deref()),
    ];
    for (label, value) in optional.into_iter().filter_map(|(l, v)| Some((l, v?))) {
        log::info!("  {}: {}", label, value);
    }
    if !summary.path.is_empty() {
        log::info!("  Path: {}", summary.path);
    }
    log::info!(
        "  Games: {}, Roms: {}",
        dat.games.len(),
        dat.rom_count(),
    );
}

/// Show header and classification details of each file.
pub(crate) fn run_info(
    files: &[PathBuf],
    json: bool,
    overrides: &Classification,
) -> Result<(), CliError> {
    let mut failed = 0;
    let mut summaries = Vec::new();

    for path in files {
        let mut dat = match DatFile::from_file(path) {
            Ok(dat) => dat,
            Err(e) => {
                report_failure(path, &e);
                failed += 1;
                continue;
            }
        };
        dat.classification.apply(overrides);
        let summary = dat.summary();

        if json {
            summaries.push(summary);
        } else {
            print_summary(&dat, &summary);
            log::info!("");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    batch_result(failed, files.len())
}
