//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use datoso_dat::Classification;

#[derive(Parser)]
#[command(name = "datoso")]
#[command(about = "Inspect, dedupe and merge ROM DAT files", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding seed DATs, used to resolve seed:name references
    #[arg(long, global = true)]
    pub dat_root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the catalog classification of a DAT.
#[derive(Args, Clone, Default)]
pub(crate) struct ClassificationArgs {
    /// Seed the DAT comes from (e.g., nointro, redump)
    #[arg(long)]
    pub seed: Option<String>,

    /// Company that made the system
    #[arg(long)]
    pub company: Option<String>,

    /// System name
    #[arg(long)]
    pub system: Option<String>,

    /// System type (e.g., Consoles, Computers)
    #[arg(long)]
    pub system_type: Option<String>,

    /// Modifier (e.g., Private, Non-Game)
    #[arg(long)]
    pub modifier: Option<String>,
}

impl ClassificationArgs {
    pub(crate) fn to_classification(&self) -> Classification {
        Classification {
            seed: self.seed.clone(),
            company: self.company.clone(),
            system: self.system.clone(),
            system_type: self.system_type.clone(),
            modifier: self.modifier.clone(),
            ..Classification::default()
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Detect the dialect of DAT files
    Detect {
        /// DAT files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show header and catalog details of DAT files
    Info {
        /// DAT files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        classification: ClassificationArgs,
    },

    /// Remove duplicate roms from a DAT, or roms already present in a parent
    Dedupe {
        /// Child DAT: a .dat/.xml path or seed:name
        child: String,

        /// Parent DAT: a .dat/.xml path or seed:name
        #[arg(short, long)]
        parent: Option<String>,

        /// Write the result here instead of over the child
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report what would be removed without saving
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Flag roms listed in a MIA list
    Mia {
        /// DAT file to mark
        file: PathBuf,

        /// MIA list (JSON object keyed by hash, or an array of rows)
        #[arg(short, long)]
        mias: PathBuf,

        /// Flag every rom of a set when one of its roms is MIA
        #[arg(long, overrides_with = "no_mark_all")]
        mark_all: bool,

        /// Only flag the listed roms (overrides settings.toml)
        #[arg(long, overrides_with = "mark_all")]
        no_mark_all: bool,

        /// Write the result here instead of over the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
