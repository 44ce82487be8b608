//! Flat exact nearest-neighbor index with positional chunk metadata.
//!
//! Position `i` in the index corresponds to record `i` in the chunk
//! store; `store::load_pair` enforces that alignment at startup.

pub mod store;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use askdocs_core::error::{Error, Result};

pub const EPSILON: f32 = 1e-6;

/// Exact k-nearest-neighbor index over L2-normalized vectors.
///
/// Every vector is normalized on insertion and every query is normalized
/// on entry, so squared L2 distance is a monotonic proxy for cosine
/// distance on both sides of the metric. A normalized query can never
/// meet unnormalized rows or vice versa. Search takes `&self` and keeps
/// no scratch state, so concurrent reads are safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    // Row-major: vector `i` occupies `data[i * dim .. (i + 1) * dim]`.
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index over `vectors` in input order; position is the key.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(Error::EmptyIndex);
        };
        let dim = first.len();
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "vectors must have nonzero dimension".to_string(),
            ));
        }
        let mut data = Vec::with_capacity(vectors.len() * dim);
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(Error::InvalidConfig(format!(
                    "vector {i} has dimension {} (expected {dim})",
                    v.len()
                )));
            }
            let mut row = v.clone();
            normalize_vector(&mut row);
            data.extend_from_slice(&row);
        }
        Ok(Self { dim, data })
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `min(k, len)` nearest positions, closest first, ties broken
    /// by ascending position. `k` must be positive.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if k == 0 {
            return Err(Error::Retrieval("k must be positive".to_string()));
        }
        if query.len() != self.dim {
            return Err(Error::Retrieval(format!(
                "query has dimension {} (expected {})",
                query.len(),
                self.dim
            )));
        }
        let mut q = query.to_vec();
        normalize_vector(&mut q);

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| squared_l2(&q, row))
            .enumerate()
            .collect();
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(k.min(self.len()));
        Ok(hits)
    }

    /// Serialize to `path` via temp file + rename, so readers never
    /// observe a half-written artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes =
            bincode::serialize(self).map_err(|e| Error::Io(std::io::Error::other(e)))?;
        write_atomic(path, &bytes)?;
        tracing::debug!(path = %path.display(), vectors = self.len(), "index saved");
        Ok(())
    }

    /// Read an index back from `path`.
    ///
    /// A missing file is `IndexNotFound`; unparseable bytes, an
    /// inconsistent layout, or a dimension that disagrees with
    /// `expected_dim` (the runtime embedder's) are `CorruptIndex`.
    pub fn load(path: &Path, expected_dim: Option<usize>) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::IndexNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(Error::Io(e)),
        };
        let index: FlatIndex = bincode::deserialize(&bytes).map_err(|e| {
            Error::CorruptIndex(format!("unreadable index at {}: {e}", path.display()))
        })?;
        if index.dim == 0 || index.data.is_empty() || index.data.len() % index.dim != 0 {
            return Err(Error::CorruptIndex(format!(
                "inconsistent vector layout in {}",
                path.display()
            )));
        }
        if let Some(dim) = expected_dim {
            if dim != index.dim {
                return Err(Error::CorruptIndex(format!(
                    "index dimension {} does not match embedder dimension {dim}",
                    index.dim
                )));
            }
        }
        Ok(index)
    }
}

/// Scale `vector` to unit length; near-zero vectors are left untouched.
pub fn normalize_vector(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if magnitude > EPSILON {
        for x in vector.iter_mut() {
            *x /= magnitude;
        }
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
