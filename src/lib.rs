//! # vecsim
//!
//! An exact vector similarity search service.
//!
//! This library provides:
//! - A fixed-dimension vector index with exact squared-L2 k-NN search
//! - A distance-to-confidence transform for calibrated scores
//! - Snapshot persistence (atomic-rename pair under a data directory)
//! - An HTTP API layer over the index
//!
//! ## Example
//!
//! ```no_run
//! use vecsim::config::Config;
//! use vecsim::index::VectorIndex;
//! use vecsim::vector::Vector;
//!
//! let config = Config::new("data", 3);
//! let mut index = VectorIndex::open(&config).unwrap();
//!
//! index.add("v1", Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
//! let hits = index.search(&Vector::new(vec![1.0, 0.0, 0.0]), 5).unwrap();
//! index.save().unwrap();
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod index;
pub mod metrics;
pub mod server;
pub mod snapshot;
pub mod vector;

pub use config::Config;
pub use error::{Result, VecsimError};
pub use index::{SearchHit, VectorIndex};
pub use vector::Vector;
