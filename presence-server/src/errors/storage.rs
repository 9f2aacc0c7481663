use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O failure on {}: {1}", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("presence store {} is not a valid presence map: {1}", .0.display())]
    Corrupt(PathBuf, #[source] serde_json::Error),

    #[error("failed to encode presence map: {0}")]
    Encode(#[source] serde_json::Error),
}
