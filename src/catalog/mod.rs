//! Region catalog persistence and index construction.

mod build;
mod store;

pub use build::{build_index, build_snapshot, BuildStats, IngestMode};
pub use store::{load, save};
