//! Catalog records → region index.

use hashbrown::HashSet;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::CatalogRecord;
use crate::pip::{RegionIndex, Snapshot};

/// What to do with a record the index rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// Abort the build on the first bad record.
    Strict,
    /// Skip bad records with a warning.
    #[default]
    Lenient,
}

/// Statistics collected while building an index from a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records added to the index.
    pub added: usize,

    /// Records skipped in lenient mode.
    pub skipped: usize,

    /// Distinct external ids among added records.
    pub distinct_ids: usize,

    /// Records whose stored bbox does not match their ring.
    pub stale_bboxes: usize,
}

/// Add every record to a fresh index, in catalog order.
pub fn build_index(records: &[CatalogRecord], mode: IngestMode) -> Result<(RegionIndex, BuildStats)> {
    info!("Building region index for {} records...", records.len());

    let mut index = RegionIndex::new();
    let mut stats = BuildStats::default();
    let mut ids = HashSet::new();

    for record in records {
        // The index always works from the ring; a stored bbox is informational
        if record.bbox.is_some() && record.bbox != record.compute_bbox() {
            warn!(
                "Record {} ({}) has a stale bbox {:?}, using {:?}",
                record.id,
                record.name,
                record.bbox,
                record.compute_bbox()
            );
            stats.stale_bboxes += 1;
        }

        match index.add(record.id, record.region()) {
            Ok(_) => {
                stats.added += 1;
                ids.insert(record.id);
            }
            Err(e) if mode == IngestMode::Lenient => {
                warn!("Skipping record {} ({}): {}", record.id, record.name, e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    stats.distinct_ids = ids.len();
    info!(
        "Region index built: {} regions, {} distinct ids, {} skipped",
        stats.added, stats.distinct_ids, stats.skipped
    );

    Ok((index, stats))
}

/// Build, optionally sort for fallback lookups, and export in one step.
pub fn build_snapshot(
    records: &[CatalogRecord],
    mode: IngestMode,
    fallback: bool,
) -> Result<(Snapshot, BuildStats)> {
    let (mut index, stats) = build_index(records, mode)?;
    if fallback {
        index.build_fallback_index();
    }
    Ok((index.export()?, stats))
}
