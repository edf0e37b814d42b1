//! Regionfind - point-to-region lookup over large polygon catalogs
//!
//! This library provides the region index and catalog modules shared by the
//! ingest, query and polycols binaries.

pub mod catalog;
pub mod error;
pub mod models;
pub mod pip;

pub use error::{IndexError, Result};
pub use models::CatalogRecord;
pub use pip::{Locate, Lookup, PipService, Region, RegionIndex, Snapshot};
