use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for the whole pipeline.
///
/// Setup-time failures (`InvalidConfig`, `IndexNotFound`, `CorruptIndex`)
/// are fatal and halt the process; query-time failures (`Embedding`,
/// `Retrieval`) are caught at the serving boundary and rendered as an
/// empty result set. `Completion` is degraded to a user-visible message
/// inside the synthesizer and never propagates past it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("no vectors to index")]
    EmptyIndex,

    #[error("index artifact not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("completion failed: {0}")]
    Completion(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
