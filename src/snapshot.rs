//! Snapshot pair: durable on-disk representation of the index.
//!
//! Two artifacts under the data directory: a bincode vector-store file
//! (dimension + raw vector data) and a JSON array of identifiers whose
//! length must match the store's entry count. Saves go through a temp
//! file and an atomic rename so a crash mid-save never leaves a torn
//! artifact in place.

use crate::error::{Result, VecsimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Serialized form of the vector store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredVectors {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

/// Contents of a successfully loaded snapshot pair.
#[derive(Debug)]
pub struct SnapshotData {
    pub vectors: Vec<Vec<f32>>,
    pub ids: Vec<String>,
}

/// Manages the on-disk snapshot pair for one index.
#[derive(Debug)]
pub struct SnapshotPair {
    vectors_path: PathBuf,
    ids_path: PathBuf,
}

impl SnapshotPair {
    /// Create a snapshot manager rooted at `dir`, creating the directory
    /// if needed.
    pub fn new(dir: impl AsRef<Path>, index_file: &str, ids_file: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            vectors_path: dir.join(index_file),
            ids_path: dir.join(ids_file),
        })
    }

    /// Whether a complete snapshot pair exists on disk.
    pub fn exists(&self) -> bool {
        self.vectors_path.exists() && self.ids_path.exists()
    }

    /// Save both artifacts, each via write-to-temp then atomic rename.
    ///
    /// The identifier file is renamed second; a crash between the two
    /// renames leaves the previous ids file paired with the new vector
    /// file, which the load-time length check rejects as a unit.
    pub fn save(&self, vectors: &StoredVectors, ids: &[String]) -> Result<()> {
        let vector_bytes = bincode::serialize(vectors)
            .map_err(|e| VecsimError::PersistFailure(e.to_string()))?;
        let id_bytes = serde_json::to_vec(ids)
            .map_err(|e| VecsimError::PersistFailure(e.to_string()))?;

        write_atomic(&self.vectors_path, &vector_bytes)?;
        write_atomic(&self.ids_path, &id_bytes)?;
        Ok(())
    }

    /// Load the snapshot pair, or `None` when neither artifact exists.
    ///
    /// `DimensionMismatch` is surfaced distinctly so operators can detect
    /// a stale or incompatible snapshot; every other problem (one file
    /// missing, corrupt content, vectors/ids length mismatch) is a
    /// `LoadFailure` the caller recovers from by starting empty.
    pub fn load(&self, expected_dimension: usize) -> Result<Option<SnapshotData>> {
        if !self.vectors_path.exists() && !self.ids_path.exists() {
            return Ok(None);
        }
        if !self.exists() {
            return Err(VecsimError::LoadFailure(format!(
                "incomplete snapshot pair in {:?}",
                self.vectors_path.parent().unwrap_or(Path::new("."))
            )));
        }

        let vector_bytes = fs::read(&self.vectors_path)
            .map_err(|e| VecsimError::LoadFailure(e.to_string()))?;
        let stored: StoredVectors = bincode::deserialize(&vector_bytes)
            .map_err(|e| VecsimError::LoadFailure(e.to_string()))?;

        let id_bytes = fs::read(&self.ids_path)
            .map_err(|e| VecsimError::LoadFailure(e.to_string()))?;
        let ids: Vec<String> = serde_json::from_slice(&id_bytes)
            .map_err(|e| VecsimError::LoadFailure(e.to_string()))?;

        if stored.dimension != expected_dimension {
            return Err(VecsimError::DimensionMismatch {
                expected: expected_dimension,
                actual: stored.dimension,
            });
        }
        if let Some(v) = stored.vectors.iter().find(|v| v.len() != stored.dimension) {
            return Err(VecsimError::LoadFailure(format!(
                "stored vector has width {}, snapshot header says {}",
                v.len(),
                stored.dimension
            )));
        }
        if stored.vectors.len() != ids.len() {
            return Err(VecsimError::LoadFailure(format!(
                "snapshot pair out of sync: {} vectors but {} identifiers",
                stored.vectors.len(),
                ids.len()
            )));
        }

        Ok(Some(SnapshotData {
            vectors: stored.vectors,
            ids,
        }))
    }
}

/// Write `bytes` to `path` through a temp sibling and an atomic rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| VecsimError::PersistFailure(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| VecsimError::PersistFailure(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair(dir: &TempDir) -> SnapshotPair {
        SnapshotPair::new(dir.path().join("db"), "vectors.bin", "ids.json").unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);

        let stored = StoredVectors {
            dimension: 3,
            vectors: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        };
        let ids = vec!["a".to_string(), "b".to_string()];

        mgr.save(&stored, &ids).unwrap();
        assert!(mgr.exists());

        let loaded = mgr.load(3).unwrap().unwrap();
        assert_eq!(loaded.vectors.len(), 2);
        assert_eq!(loaded.ids, ids);
        assert_eq!(loaded.vectors[1], vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        assert!(!mgr.exists());
        assert!(mgr.load(3).unwrap().is_none());
    }

    #[test]
    fn test_load_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        let stored = StoredVectors {
            dimension: 3,
            vectors: vec![vec![1.0, 2.0, 3.0]],
        };
        mgr.save(&stored, &["a".to_string()]).unwrap();

        assert!(matches!(
            mgr.load(128),
            Err(VecsimError::DimensionMismatch {
                expected: 128,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_load_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        let stored = StoredVectors {
            dimension: 2,
            vectors: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        };
        // Identifier list shorter than the vector store, as after a torn save.
        mgr.save(&stored, &["a".to_string()]).unwrap();

        assert!(matches!(mgr.load(2), Err(VecsimError::LoadFailure(_))));
    }

    #[test]
    fn test_load_corrupt_ids_file() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        let stored = StoredVectors {
            dimension: 2,
            vectors: vec![vec![1.0, 0.0]],
        };
        mgr.save(&stored, &["a".to_string()]).unwrap();
        fs::write(dir.path().join("db").join("ids.json"), b"[\"a\"").unwrap();

        assert!(matches!(mgr.load(2), Err(VecsimError::LoadFailure(_))));
    }

    #[test]
    fn test_load_missing_ids_file() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        let stored = StoredVectors {
            dimension: 2,
            vectors: vec![vec![1.0, 0.0]],
        };
        mgr.save(&stored, &["a".to_string()]).unwrap();
        fs::remove_file(dir.path().join("db").join("ids.json")).unwrap();

        assert!(matches!(mgr.load(2), Err(VecsimError::LoadFailure(_))));
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let mgr = pair(&dir);
        let stored = StoredVectors {
            dimension: 2,
            vectors: vec![vec![0.5, 0.5]],
        };
        mgr.save(&stored, &["a".to_string()]).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("db"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
