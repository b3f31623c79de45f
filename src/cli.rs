use std::path::{Path, PathBuf};

use clap::Parser;

/// Extension an output path must carry.
pub const JSON_EXTENSION: &str = "json";

/// Convert a QIF (Quicken Interchange Format) file to JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the QIF file to process
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Path to the output file (optional, JSON format; default: stdout)
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Show more log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter for the requested verbosity.  `RUST_LOG` takes precedence.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

pub fn is_json_path(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == JSON_EXTENSION)
}
