//! Header-tagged ChaCha20-Poly1305 sealing keyed by an Argon2id-stretched
//! passphrase. A sealed payload is laid out as:
//!
//! ```text
//! magic "SEALCFG\0" | version u8 | m_cost u32le | t_cost u32le | p_cost u32le
//!   | salt [16] | nonce [12] | ciphertext || tag [16]
//! ```
//!
//! The whole header is authenticated as associated data, so flipping any byte
//! of a sealed file makes it fail to open.

use std::io::{Read, Write};

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf::{derive_key, KdfParams};
use super::{Cipher, CipherError};

pub const MAGIC: &[u8; 8] = b"SEALCFG\0";
pub const FORMAT_VERSION: u8 = 1;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_SIZE: usize = 16;
pub const HEADER_LEN: usize = 8 + 1 + 12 + SALT_LEN + NONCE_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    params: KdfParams,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
}

impl Header {
    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[..8].copy_from_slice(MAGIC);
        buf[8] = FORMAT_VERSION;
        buf[9..13].copy_from_slice(&self.params.memory_cost_kib.to_le_bytes());
        buf[13..17].copy_from_slice(&self.params.time_cost.to_le_bytes());
        buf[17..21].copy_from_slice(&self.params.parallelism.to_le_bytes());
        buf[21..37].copy_from_slice(&self.salt);
        buf[37..49].copy_from_slice(&self.nonce);
        buf
    }

    fn from_bytes(buf: &[u8]) -> Result<Self, CipherError> {
        if buf.len() < HEADER_LEN {
            return Err(CipherError::Truncated);
        }
        if &buf[..8] != MAGIC {
            return Err(CipherError::BadMagic);
        }
        if buf[8] != FORMAT_VERSION {
            return Err(CipherError::UnsupportedVersion(buf[8]));
        }
        let params = KdfParams::new(read_u32(buf, 9), read_u32(buf, 13), read_u32(buf, 17));
        params.validate()?;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&buf[21..37]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&buf[37..49]);
        Ok(Self {
            params,
            salt,
            nonce,
        })
    }
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Seals payloads with a fresh salt and nonce on every call. The KDF
/// parameters only matter when sealing; opening uses whatever the header says.
#[derive(Debug, Clone, Default)]
pub struct PassphraseCipher {
    params: KdfParams,
}

impl PassphraseCipher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// Encrypts `plaintext` into a self-describing sealed payload.
    pub fn seal(&self, passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&ChaCha20Poly1305::generate_nonce(&mut OsRng));

        let header = Header {
            params: self.params,
            salt,
            nonce,
        };
        let header_bytes = header.to_bytes();

        let key = derive_key(passphrase, &header.salt, &header.params)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&header.nonce),
                Payload {
                    msg: plaintext,
                    aad: &header_bytes,
                },
            )
            .map_err(|e| CipherError::Encryption(format!("{e}")))?;

        let mut sealed = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        sealed.extend_from_slice(&header_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypts a payload produced by [`PassphraseCipher::seal`].
    pub fn open(&self, sealed: &[u8], passphrase: &str) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        if sealed.len() < MAGIC.len() {
            return Err(CipherError::Truncated);
        }
        if &sealed[..MAGIC.len()] != MAGIC {
            return Err(CipherError::BadMagic);
        }
        if sealed.len() < HEADER_LEN + TAG_SIZE {
            return Err(CipherError::Truncated);
        }
        let (header_bytes, ciphertext) = sealed.split_at(HEADER_LEN);
        let header = Header::from_bytes(header_bytes)?;

        let key = derive_key(passphrase, &header.salt, &header.params)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
        let plaintext = cipher
            .decrypt(
                Nonce::from_slice(&header.nonce),
                Payload {
                    msg: ciphertext,
                    aad: header_bytes,
                },
            )
            .map_err(|_| CipherError::Authentication)?;
        Ok(Zeroizing::new(plaintext))
    }
}

impl Cipher for PassphraseCipher {
    fn encrypt(
        &self,
        writer: &mut dyn Write,
        passphrase: &str,
        plaintext: &[u8],
    ) -> Result<(), CipherError> {
        let sealed = self.seal(passphrase, plaintext)?;
        writer.write_all(&sealed)?;
        writer.flush()?;
        Ok(())
    }

    fn decrypt(
        &self,
        reader: &mut dyn Read,
        passphrase: &str,
    ) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        let mut sealed = Vec::new();
        reader.read_to_end(&mut sealed)?;
        self.open(&sealed, passphrase)
    }
}
