//! The key file: the configuration passphrase, sealed under the build-time
//! secret. Once it exists it is the only source of that passphrase; the
//! operator is prompted only while it is absent.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{Cipher, CipherError};
use crate::error::{PersistError, StoreError};
use crate::fsio;
use crate::prompt::PassphrasePrompt;

/// Key file name used when the caller passes an empty path.
pub const DEFAULT_KEY_FILE: &str = "myconfigkey.json";

/// Outcome of probing the key file. An unreadable key file is an error
/// rather than a state, since there is nothing safe to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFileState {
    Missing,
    Present,
}

pub struct KeyFile<'a> {
    path: &'a Path,
    build_secret: &'a str,
    cipher: &'a dyn Cipher,
}

impl<'a> KeyFile<'a> {
    pub fn new(path: &'a Path, build_secret: &'a str, cipher: &'a dyn Cipher) -> Self {
        Self {
            path,
            build_secret,
            cipher,
        }
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn probe(&self) -> Result<KeyFileState, StoreError> {
        match fsio::exists(self.path) {
            Ok(true) => Ok(KeyFileState::Present),
            Ok(false) => Ok(KeyFileState::Missing),
            Err(source) => Err(StoreError::KeyFileAccess {
                path: self.path.to_path_buf(),
                source,
            }),
        }
    }

    /// Decrypts the key file and returns the trimmed configuration passphrase.
    pub fn read_passphrase(&self) -> Result<Zeroizing<String>, StoreError> {
        let sealed = fs::read(self.path).map_err(|source| StoreError::KeyFileAccess {
            path: self.path.to_path_buf(),
            source,
        })?;
        let decrypt_err = |source| StoreError::KeyFileDecrypt {
            path: self.path.to_path_buf(),
            source,
        };
        let plaintext = self
            .cipher
            .decrypt(&mut sealed.as_slice(), self.build_secret)
            .map_err(decrypt_err)?;
        let text = std::str::from_utf8(&plaintext).map_err(|e| {
            decrypt_err(CipherError::Malformed(format!("passphrase is not UTF-8: {e}")))
        })?;
        Ok(Zeroizing::new(text.trim().to_owned()))
    }

    /// Seals `passphrase` and replaces the key file with it.
    pub fn write_passphrase(&self, passphrase: &str) -> Result<(), StoreError> {
        let persist = || -> Result<(), PersistError> {
            let mut sealed = Vec::new();
            self.cipher
                .encrypt(&mut sealed, self.build_secret, passphrase.as_bytes())?;
            fsio::replace(self.path, &sealed)?;
            Ok(())
        };
        persist().map_err(|source| StoreError::KeyFilePersist {
            path: self.path.to_path_buf(),
            source,
        })
    }
}

/// Recovers the configuration passphrase from the key file, or on first run
/// asks for one and creates the key file. Also returns the state the key file
/// was found in, so the caller knows whether it was created just now.
///
/// A key file that exists but cannot be decrypted is fatal: prompting again
/// would orphan the config file sealed with the old passphrase.
pub fn bootstrap(
    key_file: &KeyFile<'_>,
    config_path: &Path,
    prompt: &mut dyn PassphrasePrompt,
) -> Result<(Zeroizing<String>, KeyFileState), StoreError> {
    let found = key_file.probe()?;
    let passphrase = match found {
        KeyFileState::Present => {
            let passphrase = key_file.read_passphrase()?;
            debug!(path = %key_file.path().display(), "recovered configuration passphrase from key file");
            passphrase
        }
        KeyFileState::Missing => {
            info!(path = %key_file.path().display(), "key file not found, asking for a configuration passphrase");
            let passphrase = prompt
                .read_passphrase(config_path)
                .map_err(StoreError::Prompt)?;
            key_file.write_passphrase(&passphrase)?;
            info!(path = %key_file.path().display(), "key file created");
            passphrase
        }
    };
    Ok((passphrase, found))
}
