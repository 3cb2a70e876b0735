pub mod combine;
pub mod convert;
pub mod formats;
pub mod init;
pub mod preview;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::formats::{get_by_key, StatementFormat};
use crate::settings::{load_settings_from, settings_path, Settings};

#[derive(Parser)]
#[command(
    name = "ledgerlift",
    about = "Rebuild bank statement transactions from positioned PDF words."
)]
pub struct Cli {
    /// Settings file (default: ~/.config/ledgerlift/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log per-page detail
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a word dump (or a directory of them) to a transactions CSV.
    Convert {
        /// Word dump file, or a directory with --batch
        path: PathBuf,
        /// Convert every *.words.csv / *.words.json under the directory
        #[arg(long)]
        batch: bool,
        /// Statement format key (see `ledgerlift formats`)
        #[arg(long)]
        format: Option<String>,
        /// Statement closing date, YYYY-MM-DD (default: MMDDYY in the file name)
        #[arg(long = "statement-date", conflicts_with = "batch")]
        statement_date: Option<NaiveDate>,
        /// Output CSV path
        #[arg(long, conflicts_with = "batch")]
        output: Option<PathBuf>,
    },
    /// Print the transactions found in one word dump.
    Preview {
        /// Word dump file
        path: PathBuf,
        #[arg(long)]
        format: Option<String>,
        #[arg(long = "statement-date")]
        statement_date: Option<NaiveDate>,
    },
    /// Concatenate converted CSVs in statement-date order.
    Combine {
        /// Directory holding *_transactions.csv files
        dir: PathBuf,
        /// Output path (default: <dir>/combined.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List available statement formats.
    Formats,
    /// Write a settings file to customise formats.
    Init {
        /// Copy the built-in formats into the file as editable templates
        #[arg(long = "with-templates")]
        with_templates: bool,
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Every file under `dir`, recursively, in path order.
pub fn files_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Settings plus the path they were read from.
pub struct Context {
    pub settings: Settings,
    pub settings_path: PathBuf,
}

impl Context {
    pub fn load(config: Option<PathBuf>) -> Self {
        let settings_path = config.unwrap_or_else(settings_path);
        Self {
            settings: load_settings_from(&settings_path),
            settings_path,
        }
    }

    pub fn format(&self, key: Option<&str>) -> Result<StatementFormat> {
        get_by_key(&self.settings, key.unwrap_or(&self.settings.default_format))
    }
}
