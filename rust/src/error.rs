//! Errors surfaced by the store. File-level variants carry the path they
//! concern; no variant ever formats a passphrase.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CipherError;
use crate::value::ValueKind;

/// Why a sealed file could not be written.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key file password was not set at build time; rebuild with {} set", crate::secret::BUILD_SECRET_ENV)]
    MissingBuildSecret,

    #[error("unable to access key file {}: {source}", .path.display())]
    KeyFileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to persist key file {}: {source}", .path.display())]
    KeyFilePersist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("failed to decrypt key file {} (corrupted, or sealed with a different build secret): {source}", .path.display())]
    KeyFileDecrypt {
        path: PathBuf,
        #[source]
        source: CipherError,
    },

    #[error("failed to read configuration passphrase: {0}")]
    Prompt(#[source] io::Error),

    #[error("unable to access config file {}: {source}", .path.display())]
    ConfigAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decrypt config file {}: {source}", .path.display())]
    ConfigDecrypt {
        path: PathBuf,
        #[source]
        source: CipherError,
    },

    #[error("invalid JSON in config file {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("failed to persist config file {}: {source}", .path.display())]
    ConfigPersist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("config key '{0}' not found")]
    KeyNotFound(String),

    #[error("config key '{key}' is not {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("config not initialized, call init first")]
    NotInitialized,
}
