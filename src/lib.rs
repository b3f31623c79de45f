//! Command line front end converting QIF files to JSON.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use qif_core::Document;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

use cli::Args;

pub mod cli;

pub const UNSUPPORTED_FORMAT: &str = "Unsupported output format. Use .json.";

/// Installs the stderr log subscriber.  Stdout is reserved for the JSON document.
pub fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn run(args: &Args) -> Result<()> {
    match &args.output {
        Some(output) => {
            if !cli::is_json_path(output) {
                bail!(UNSUPPORTED_FORMAT);
            }
            let doc = load(&args.file)?;
            write_file(output, &doc)?;
            tracing::info!("Wrote {}", output.display());
        }
        None => {
            let doc = load(&args.file)?;
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            qif_render::render(&mut writer, &doc).context("Failed to write JSON output")?;
            writer.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Parses the QIF file at `input` and writes it to `out` as indented JSON.  Nothing is written
/// unless the whole file parses.
pub fn convert<W: Write>(input: &Path, out: &mut W) -> Result<()> {
    let doc = load(input)?;
    qif_render::render(out, &doc).context("Failed to write JSON output")?;
    Ok(())
}

fn load(input: &Path) -> Result<Document> {
    let doc = qif_parser::parse_file(input)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    tracing::info!(
        "Parsed {} accounts and {} categories from {}",
        doc.accounts.len(),
        doc.categories.len(),
        input.display()
    );
    Ok(doc)
}

/// Renders into a temporary file next to `output` and moves it into place once complete, so an
/// existing `output` is only ever replaced by a whole document.
fn write_file(output: &Path, doc: &Document) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        qif_render::render(&mut writer, doc)
            .and_then(|()| writer.flush().map_err(Into::into))
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }
    tmp.persist(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
