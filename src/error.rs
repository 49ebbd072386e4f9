use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweError>;

#[derive(Debug, Error)]
pub enum SweError {
    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),

    /// More tiles along an axis than there are cells to give them.
    #[error("cannot partition {axis} axis of length {length} into {tiles} tiles")]
    InvalidPartition {
        axis: &'static str,
        length: usize,
        tiles: usize,
    },

    #[error("worker {rank} lost contact with {peer}: {detail}")]
    Communication {
        rank: usize,
        peer: String,
        detail: String,
    },

    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("couldn't write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweError {
    /// Communication failures are usually the echo of a failure elsewhere.
    pub fn is_communication(&self) -> bool {
        matches!(self, SweError::Communication { .. })
    }
}
