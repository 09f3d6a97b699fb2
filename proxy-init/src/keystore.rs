use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum KeystoreError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("expected exactly 1 file in keystore, got {0}")]
    Count(usize),

    #[error("failed to decode keystore file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct KeyFile {
    address: String,
}

/// A scratch keystore under `dir`, removed when dropped.
pub(crate) fn create_in(dir: &Path) -> io::Result<TempDir> {
    tempfile::Builder::new().prefix("keystore").tempdir_in(dir)
}

/// Address of the only account in `keystore`.
pub(crate) fn account_address(keystore: &Path) -> Result<String, KeystoreError> {
    let io_error = |source| KeystoreError::Io {
        path: keystore.to_path_buf(),
        source,
    };
    let files = fs::read_dir(keystore)
        .map_err(io_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(io_error)?;

    let [file] = files.as_slice() else {
        return Err(KeystoreError::Count(files.len()));
    };

    let content = fs::read(file).map_err(|source| KeystoreError::Io {
        path: file.clone(),
        source,
    })?;
    let key = serde_json::from_slice::<KeyFile>(&content).map_err(|source| {
        KeystoreError::Json {
            path: file.clone(),
            source,
        }
    })?;
    Ok(key.address)
}
