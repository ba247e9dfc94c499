use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::model::domain::model_fetcher::{ByteProgress, ModelFetchError, ModelFetcher};
use crate::shared::constants::MODEL_FILE_NAME;

/// First field tag of a serialized ONNX `ModelProto` (`ir_version`, varint).
const ONNX_HEADER_TAG: u8 = 0x08;

const READ_CHUNK: usize = 1024 * 1024;

/// Upper bound on the buffer reserved from an advertised `Content-Length`.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Fetches models from local directories/files or `http(s)://` locations.
///
/// A location naming a directory (or a URL not ending in `.onnx`) is taken
/// as a bundle root and [`MODEL_FILE_NAME`] is appended.
pub struct ResolvingFetcher;

impl ModelFetcher for ResolvingFetcher {
    fn fetch(
        &self,
        location: &str,
        progress: ByteProgress<'_>,
    ) -> Result<Vec<u8>, ModelFetchError> {
        let bytes = if is_remote(location) {
            fetch_remote(&model_url(location), progress)?
        } else {
            let path = model_path(Path::new(location));
            let bytes = fs::read(&path).map_err(|e| ModelFetchError::Read {
                path: path.clone(),
                source: e,
            })?;
            let len = bytes.len() as u64;
            progress(len, len);
            bytes
        };
        validate_model(location, &bytes)?;
        Ok(bytes)
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn model_url(location: &str) -> String {
    if location.ends_with(".onnx") {
        location.to_string()
    } else if location.ends_with('/') {
        format!("{location}{MODEL_FILE_NAME}")
    } else {
        format!("{location}/{MODEL_FILE_NAME}")
    }
}

pub fn model_path(location: &Path) -> PathBuf {
    if location.extension().is_some_and(|ext| ext == "onnx") {
        location.to_path_buf()
    } else {
        location.join(MODEL_FILE_NAME)
    }
}

/// Downloads the model bundle from `url` into the `dest_dir` bundle root.
///
/// Writes to a `.part` file first and renames on success; no partial file
/// is left behind on failure.
pub fn download_to(
    url: &str,
    dest_dir: &Path,
    progress: ByteProgress<'_>,
) -> Result<PathBuf, ModelFetchError> {
    let source_url = model_url(url);
    let bytes = fetch_remote(&source_url, progress)?;
    validate_model(&source_url, &bytes)?;

    fs::create_dir_all(dest_dir).map_err(|e| ModelFetchError::Write {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;
    let dest = model_path(dest_dir);
    let temp_path = dest.with_extension("part");

    let result = write_atomic(&bytes, &dest, &temp_path);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result.map(|_| dest)
}

fn write_atomic(bytes: &[u8], dest: &Path, temp_path: &Path) -> Result<(), ModelFetchError> {
    let mut file = fs::File::create(temp_path).map_err(write_error(temp_path))?;
    file.write_all(bytes).map_err(write_error(temp_path))?;
    file.flush().map_err(write_error(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_error(dest))
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ModelFetchError {
    let path = path.to_path_buf();
    move |e| ModelFetchError::Write { path, source: e }
}

fn fetch_remote(url: &str, progress: ByteProgress<'_>) -> Result<Vec<u8>, ModelFetchError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelFetchError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut bytes = Vec::with_capacity(total.min(MAX_PREALLOC) as usize);
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = response
            .read(&mut buf)
            .map_err(|e| ModelFetchError::Interrupted {
                url: url.to_string(),
                source: e,
            })?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);
        progress(bytes.len() as u64, total);
    }

    let received = bytes.len() as u64;
    if total > 0 && received < total {
        return Err(ModelFetchError::Truncated {
            location: url.to_string(),
            received,
            expected: total,
        });
    }
    Ok(bytes)
}

fn validate_model(location: &str, bytes: &[u8]) -> Result<(), ModelFetchError> {
    match bytes.first() {
        None => Err(ModelFetchError::Malformed {
            location: location.to_string(),
            reason: "empty model file".to_string(),
        }),
        Some(&ONNX_HEADER_TAG) => Ok(()),
        Some(_) => Err(ModelFetchError::Malformed {
            location: location.to_string(),
            reason: "not an ONNX model".to_string(),
        }),
    }
}
