//! Delimited region table parsing.
//!
//! Expected columns (by header name): `id`, `name`, optional `full_name`,
//! optional `group`, and `polygon` holding a JSON `[[x, y], ...]` ring.

use std::io::Read;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use indicatif::ProgressBar;
use serde::Deserialize;
use tracing::warn;

use regionfind::catalog::IngestMode;
use regionfind::CatalogRecord;

#[derive(Debug, Deserialize)]
struct TableRow {
    id: i64,
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    group: Option<String>,
    polygon: String,
}

impl TableRow {
    fn into_record(self) -> Result<CatalogRecord> {
        let ring: Vec<[f64; 2]> = serde_json::from_str(self.polygon.trim())
            .with_context(|| format!("invalid polygon for id {}", self.id))?;

        if ring.is_empty() {
            bail!("empty polygon for id {}", self.id);
        }

        let mut record = CatalogRecord::new(self.id, self.name, ring);
        record.full_name = self.full_name.filter(|s| !s.is_empty());
        record.group = self.group.filter(|s| !s.is_empty());
        Ok(record)
    }
}

/// Rows read from a table, plus how many were skipped in lenient mode.
#[derive(Debug)]
pub struct TableData {
    pub records: Vec<CatalogRecord>,
    pub skipped: usize,
}

pub fn read_records<R: Read>(
    input: R,
    delimiter: u8,
    mode: IngestMode,
    progress: &ProgressBar,
) -> Result<TableData> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let mut records = Vec::new();
    let mut skipped = 0;

    for (i, row) in reader.deserialize::<TableRow>().enumerate() {
        // Header is line 1
        let line = i + 2;
        progress.inc(1);

        let result = row
            .with_context(|| format!("line {}: unreadable row", line))
            .and_then(|row| row.into_record().with_context(|| format!("line {}", line)));

        match result {
            Ok(record) => records.push(record),
            Err(e) if mode == IngestMode::Lenient => {
                warn!("Skipping {:#}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(TableData { records, skipped })
}
