//! Core data models for the region catalog.

pub mod record;

pub use record::CatalogRecord;
