//! Error types for index construction, export and catalog persistence.

use thiserror::Error;

/// Region index errors.
///
/// Lookups never produce one of these: a point that matches nothing resolves to
/// [`Lookup::NotFound`](crate::pip::Lookup::NotFound).
#[derive(Error, Debug)]
pub enum IndexError {
    /// A catalog record carried no ring points, so it has no bounding box.
    #[error("region for id {id} has an empty ring")]
    EmptyRing { id: i64 },

    /// The builder ran out of internal region indices.
    #[error("region count {0} exceeds the internal index range")]
    TooManyRegions(usize),

    /// An external id cannot be represented by the snapshot id type.
    #[error("external id {id} of region {index} does not fit the snapshot id width")]
    IdOutOfRange { id: i64, index: u32 },

    /// Two snapshots differ in id mapping or element count.
    #[error("snapshot mismatch: {0}")]
    Mismatch(String),

    /// IO error during catalog read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog encoding error.
    #[error("catalog codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
