//! Region table ingest.
//!
//! Reads a delimited table of region rings, validates every record against the
//! region index and writes a compressed catalog for the query server.

mod table;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use regionfind::catalog::{self, IngestMode};

use crate::table::read_records;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build a region catalog from a delimited polygon table")]
struct Args {
    /// Delimited input table
    #[arg(short, long)]
    input: PathBuf,

    /// Catalog file to write (.json.gz)
    #[arg(short, long)]
    output: PathBuf,

    /// Field delimiter (single ASCII character, `\t` for tabs)
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        s => bail!("delimiter must be a single ASCII character, got {:?}", s),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Regionfind Ingest");
    info!("Input: {}", args.input.display());

    let delimiter = parse_delimiter(&args.delimiter)?;
    let mode = if args.strict {
        IngestMode::Strict
    } else {
        IngestMode::Lenient
    };

    let file = File::open(&args.input).context("Failed to open input table")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec})")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let data = read_records(BufReader::new(file), delimiter, mode, &pb)?;
    pb.finish_and_clear();

    if data.skipped > 0 {
        warn!("Skipped {} unreadable rows", data.skipped);
    }

    // Same acceptance rules the query server applies when loading
    let (index, stats) = catalog::build_index(&data.records, mode)?;
    index
        .export()
        .context("Catalog ids do not fit the snapshot id width")?;

    info!(
        "Validated {} regions covering {} distinct ids",
        stats.added, stats.distinct_ids
    );

    catalog::save(&args.output, &data.records)
        .with_context(|| format!("Failed to write catalog {}", args.output.display()))?;

    info!("Catalog written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert!(parse_delimiter("::").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
