//! Passphrase sealing for the key file and the configuration document.
//! The store only talks to the `Cipher` trait so the on-disk scheme can be
//! swapped without touching the bootstrap or load/save logic.

pub mod cipher;
pub mod kdf;

use std::io::{Read, Write};

use thiserror::Error;
use zeroize::Zeroizing;

pub use cipher::PassphraseCipher;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("sealed payload is truncated")]
    Truncated,
    #[error("sealed payload has an unrecognised header")]
    BadMagic,
    #[error("unsupported sealed format version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid key derivation parameters: {0}")]
    InvalidParams(String),
    #[error("argon2 derivation failed: {0}")]
    KeyDerivation(String),
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("decryption failed: wrong passphrase or tampered payload")]
    Authentication,
    #[error("decrypted payload is malformed: {0}")]
    Malformed(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte-stream encryption keyed by a passphrase.
pub trait Cipher: Send + Sync {
    /// Seals `plaintext` under `passphrase` and writes the whole sealed
    /// payload to `writer`.
    fn encrypt(
        &self,
        writer: &mut dyn Write,
        passphrase: &str,
        plaintext: &[u8],
    ) -> Result<(), CipherError>;

    /// Reads a sealed payload to the end of `reader` and returns the plaintext.
    fn decrypt(
        &self,
        reader: &mut dyn Read,
        passphrase: &str,
    ) -> Result<Zeroizing<Vec<u8>>, CipherError>;
}
