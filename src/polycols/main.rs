//! Column reformatter for polygon tables.
//!
//! Selects columns from a delimited file and renders coordinate column ranges
//! as `[[x,y],...]` rings, producing the tab separated table `ingest` reads.

mod columns;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crate::columns::{header_names, parse_fields, render_row};

#[derive(Parser, Debug)]
#[command(name = "polycols")]
#[command(about = "Select columns and render coordinate ranges as polygon rings")]
struct Args {
    /// Delimited input file
    file: PathBuf,

    /// Field list, e.g. `1:id,2:name,5-40:polygon`; a dashed range (inclusive of
    /// both ends) becomes a ring
    #[arg(short, long)]
    fields: String,

    /// First row is a header; numeric output names are resolved against it
    #[arg(long)]
    header: bool,

    /// Input field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let fields = parse_fields(&args.fields)?;
    debug!("Field list: {:?}", fields);

    let delimiter = u8::try_from(args.delimiter).context("delimiter must be ASCII")?;
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(io::stdout().lock());

    let mut records = reader.records();

    if args.header {
        if let Some(header) = records.next() {
            let header: StringRecord = header?;
            let row: Vec<&str> = header.iter().collect();
            writer.write_record(header_names(&fields, &row)?)?;
        }
    }

    for (i, record) in records.enumerate() {
        let record = record?;
        let row: Vec<&str> = record.iter().collect();
        let out = render_row(&fields, &row).with_context(|| format!("row {}", i + 1))?;
        writer.write_record(&out)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_fields_help_states_inclusive_ranges() {
        let command = Args::command();
        let fields = command
            .get_arguments()
            .find(|a| a.get_id() == "fields")
            .unwrap();
        let help = fields.get_help().unwrap().to_string();
        assert!(help.contains("inclusive"));
    }
}
