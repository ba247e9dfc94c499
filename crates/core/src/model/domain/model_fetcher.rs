use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelFetchError {
    #[error("failed to read model from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of {url} interrupted: {source}")]
    Interrupted {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("truncated model from {location}: got {received} of {expected} bytes")]
    Truncated {
        location: String,
        received: u64,
        expected: u64,
    },
    #[error("malformed model at {location}: {reason}")]
    Malformed { location: String, reason: String },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Progress callback: `(bytes_received, total_bytes)`.
/// `total_bytes` is 0 when the size is not known up front.
pub type ByteProgress<'a> = &'a dyn Fn(u64, u64);

/// Retrieves raw model bytes from a location string.
pub trait ModelFetcher: Send {
    fn fetch(&self, location: &str, progress: ByteProgress<'_>)
        -> Result<Vec<u8>, ModelFetchError>;
}
