//! Error types for the vector index

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, VecsimError>;

/// Error types that can occur in index operations
#[derive(Error, Debug)]
pub enum VecsimError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A snapshot pair on disk could not be read back. Recovered by
    /// falling back to an empty store; never fatal to startup.
    #[error("Snapshot load failure: {0}")]
    LoadFailure(String),

    /// A snapshot write failed. The in-memory mutation that triggered
    /// the save is not rolled back; disk may lag memory until the next
    /// successful save.
    #[error("Snapshot persist failure: {0}")]
    PersistFailure(String),

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
