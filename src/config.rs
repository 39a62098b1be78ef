//! Process configuration for the index and server.

use std::path::PathBuf;

/// Default vector width; must match the embedding model producing inputs.
pub const DEFAULT_DIMENSION: usize = 128;

/// Default distance-to-confidence normalization factor. 2.0 is the
/// maximum possible squared L2 distance between unit-normalized vectors.
pub const DEFAULT_NORMALIZATION_FACTOR: f32 = 2.0;

/// Configuration for a [`VectorIndex`](crate::index::VectorIndex) and the
/// server around it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed vector dimension for the life of the store.
    pub dimension: usize,
    /// Directory holding the snapshot pair.
    pub data_dir: PathBuf,
    /// Base filename of the serialized vector store.
    pub index_file: String,
    /// Base filename of the identifier list.
    pub ids_file: String,
    /// Divisor mapping squared L2 distance onto confidence.
    pub normalization_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            data_dir: PathBuf::from("data"),
            index_file: "vectors.bin".to_string(),
            ids_file: "ids.json".to_string(),
            normalization_factor: DEFAULT_NORMALIZATION_FACTOR,
        }
    }
}

impl Config {
    /// Convenience constructor used by tests and the CLI.
    pub fn new(data_dir: impl Into<PathBuf>, dimension: usize) -> Self {
        Self {
            dimension,
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}
