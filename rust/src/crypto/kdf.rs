//! Argon2id key stretching for sealed files.
//! Each sealed file records the parameters it was written with, so the
//! defaults below can be retuned without locking out existing deployments.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::CipherError;

/// Tuned Argon2id parameters for an interactive CLI / service start-up:
/// - memory_cost: 19 MiB keeps GPU cracking expensive while remaining server friendly
/// - time_cost: 3 iterations for start-up latency without sacrificing safety
/// - parallelism: 1 thread to keep resource usage predictable on shared hosts
pub const DEFAULT_MEMORY_COST_KIB: u32 = 19 * 1024;
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Ceilings applied to parameters read back from a file header, so a
/// tampered header cannot make the process allocate gigabytes.
pub const MAX_MEMORY_COST_KIB: u32 = 256 * 1024;
pub const MAX_TIME_COST: u32 = 64;
pub const MAX_PARALLELISM: u32 = 16;

pub const DERIVED_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost_kib: DEFAULT_MEMORY_COST_KIB,
            time_cost: DEFAULT_TIME_COST,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl KdfParams {
    pub fn new(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost_kib,
            time_cost,
            parallelism,
        }
    }

    /// Checks the parameters against both the Argon2 minimums and our ceilings.
    pub fn validate(&self) -> Result<(), CipherError> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>, CipherError> {
        if self.memory_cost_kib > MAX_MEMORY_COST_KIB
            || self.time_cost > MAX_TIME_COST
            || self.parallelism > MAX_PARALLELISM
        {
            return Err(CipherError::InvalidParams(format!(
                "m={} t={} p={} exceeds m={MAX_MEMORY_COST_KIB} t={MAX_TIME_COST} p={MAX_PARALLELISM}",
                self.memory_cost_kib, self.time_cost, self.parallelism
            )));
        }
        let params = Params::new(
            self.memory_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(DERIVED_KEY_LEN),
        )
        .map_err(|e| CipherError::InvalidParams(format!("{e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Derives a 32 byte key from `passphrase` and `salt`. The buffer is wiped on drop.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; DERIVED_KEY_LEN]>, CipherError> {
    let argon2 = params.argon2()?;
    let mut key = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|e| CipherError::KeyDerivation(format!("{e}")))?;
    Ok(key)
}
