//! Gzip-compressed catalog files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::error::Result;
use crate::models::CatalogRecord;

/// Read every record from a catalog file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let records: Vec<CatalogRecord> = serde_json::from_reader(BufReader::new(decoder))?;

    info!("Loaded {} catalog records from {}", records.len(), path.display());
    Ok(records)
}

/// Write `records` to a catalog file, replacing any existing file.
pub fn save<P: AsRef<Path>>(path: P, records: &[CatalogRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, records)?;

    let mut writer = encoder.finish()?;
    writer.flush()?;

    info!("Saved {} catalog records to {}", records.len(), path.display());
    Ok(())
}
