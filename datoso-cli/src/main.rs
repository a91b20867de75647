//! datoso CLI
//!
//! Command-line interface for inspecting, deduping and merging ROM DAT files.

mod cli_types;
mod commands;
mod error;
mod logging;
mod settings;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands};
use settings::Settings;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let settings = Settings::load();

    let result = match cli.command {
        Commands::Detect { files } => commands::detect::run_detect(&files),
        Commands::Info {
            files,
            json,
            classification,
        } => commands::info::run_info(&files, json, &classification.to_classification()),
        Commands::Dedupe {
            child,
            parent,
            output,
            dry_run,
        } => {
            let lookup = settings.catalog(cli.dat_root);
            commands::dedupe::run_dedupe(&child, parent.as_deref(), output, dry_run, &lookup)
        }
        Commands::Mia {
            file,
            mias,
            mark_all,
            no_mark_all,
            output,
        } => {
            let cli_override = match (mark_all, no_mark_all) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::mia::run_mia(
                &file,
                &mias,
                settings.mark_all_roms_in_set(cli_override),
                output.as_deref(),
            )
        }
    };

    if let Err(e) = result {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
        std::process::exit(1);
    }
}
