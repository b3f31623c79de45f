use std::process::ExitCode;

use clap::Parser;

use qif2json::cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    qif2json::init_logging(&args);

    match qif2json::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
