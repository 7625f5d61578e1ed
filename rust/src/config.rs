//! Where the store keeps its two files and how hard it stretches passphrases.
//! Embedding applications can deserialize this from their own bootstrap
//! settings; only `config_path` is required.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::keyfile::DEFAULT_KEY_FILE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Encrypted JSON settings document.
    pub config_path: PathBuf,
    /// Encrypted key file holding the configuration passphrase.
    #[serde(default = "default_key_file_path")]
    pub key_file_path: PathBuf,
    /// Argon2id parameters used when sealing either file.
    #[serde(default)]
    pub kdf: KdfParams,
}

fn default_key_file_path() -> PathBuf {
    PathBuf::from(DEFAULT_KEY_FILE)
}

impl StoreOptions {
    /// An empty `key_file_path` selects [`DEFAULT_KEY_FILE`] in the working directory.
    pub fn new(config_path: impl AsRef<Path>, key_file_path: impl AsRef<Path>) -> Self {
        let key_file_path = key_file_path.as_ref();
        let key_file_path = if key_file_path.as_os_str().is_empty() {
            default_key_file_path()
        } else {
            key_file_path.to_path_buf()
        };
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            key_file_path,
            kdf: KdfParams::default(),
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}
