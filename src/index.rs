//! The in-process vector index: store, identifier table, exact k-NN
//! search, and the durability contract around mutation.

use crate::config::Config;
use crate::distance::{confidence, squared_euclidean};
use crate::error::{Result, VecsimError};
use crate::snapshot::{SnapshotPair, StoredVectors};
use crate::vector::Vector;
use std::cmp::Ordering;
use tracing::{info, warn};

/// A search result: the stored identifier and its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub confidence: f32,
}

/// An exact (brute-force) vector index over fixed-dimension f32 vectors.
///
/// Vectors and identifiers live in two parallel append-only sequences;
/// `ids.len() == vectors.len()` holds at every observable point. Positions
/// are never reused and individual entries cannot be removed, only the
/// whole store cleared. Identifier uniqueness is not enforced; duplicates
/// each keep their own stored vector.
///
/// The index itself is not synchronized. The composition root wraps it in
/// a lock and hands shared handles to request handlers.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    normalization_factor: f32,
    vectors: Vec<Vector>,
    ids: Vec<String>,
    snapshot: SnapshotPair,
}

impl VectorIndex {
    /// Open the index at the configured data directory.
    ///
    /// Loads the snapshot pair when present. A snapshot whose vector width
    /// differs from the configured dimension fails the open with
    /// `DimensionMismatch` so a stale snapshot is caught at startup; any
    /// other load problem is logged and recovered by starting empty, which
    /// discards unreadable history rather than refusing to serve.
    pub fn open(config: &Config) -> Result<Self> {
        let snapshot = SnapshotPair::new(&config.data_dir, &config.index_file, &config.ids_file)?;

        let (vectors, ids) = match snapshot.load(config.dimension) {
            Ok(Some(data)) => {
                info!(
                    count = data.ids.len(),
                    dimension = config.dimension,
                    "loaded snapshot pair"
                );
                (data.vectors.into_iter().map(Vector::new).collect(), data.ids)
            }
            Ok(None) => {
                info!(dimension = config.dimension, "no snapshot found, starting empty");
                (Vec::new(), Vec::new())
            }
            Err(e @ VecsimError::DimensionMismatch { .. }) => return Err(e),
            Err(e) => {
                warn!(error = %e, "snapshot unreadable, falling back to empty store");
                (Vec::new(), Vec::new())
            }
        };

        Ok(Self {
            dimension: config.dimension,
            normalization_factor: config.normalization_factor,
            vectors,
            ids,
            snapshot,
        })
    }

    /// Append a vector under the given identifier, returning the new
    /// total entry count.
    ///
    /// Does not persist; call [`save`](Self::save) when the batch is done.
    pub fn add(&mut self, id: impl Into<String>, vector: Vector) -> Result<usize> {
        self.check_dimension(&vector)?;
        self.vectors.push(vector);
        self.ids.push(id.into());
        Ok(self.vectors.len())
    }

    /// Find the `k` nearest stored vectors by squared L2 distance.
    ///
    /// Full O(N·D) scan. Ties in distance resolve to the earlier-inserted
    /// entry. Returns `min(k, len)` hits ordered by ascending distance;
    /// an empty store yields an empty result, not an error.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<SearchHit>> {
        self.check_dimension(query)?;
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(pos, v)| (pos, squared_euclidean(query, v)))
            .collect();
        // Stable sort: equal distances keep ascending insertion position.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(pos, dist)| SearchHit {
                id: self.ids[pos].clone(),
                confidence: confidence(dist, self.normalization_factor),
            })
            .collect())
    }

    /// Reset the store to empty. The dimension is unchanged and the
    /// operation is idempotent. Caller persists afterwards.
    pub fn clear(&mut self) {
        self.vectors.clear();
        self.ids.clear();
        info!("index cleared");
    }

    /// Write the snapshot pair for the current state.
    pub fn save(&self) -> Result<()> {
        let stored = StoredVectors {
            dimension: self.dimension,
            vectors: self.vectors.iter().map(|v| v.as_slice().to_vec()).collect(),
        };
        self.snapshot.save(&stored, &self.ids)?;
        Ok(())
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.vectors.len(), self.ids.len());
        self.vectors.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The fixed vector dimension of this store.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, vector: &Vector) -> Result<()> {
        if vector.dimension() != self.dimension {
            return Err(VecsimError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            });
        }
        Ok(())
    }
}
