//! The build-time secret that seals the key file.
//!
//! It is compiled into the binary from the `SEALED_CONFIG_KEYFILE_PASSWORD`
//! environment variable of the build, e.g.
//! `SEALED_CONFIG_KEYFILE_PASSWORD='...' cargo build --release`.
//! Nothing reads it from the runtime environment.

use crate::error::StoreError;

pub const BUILD_SECRET_ENV: &str = "SEALED_CONFIG_KEYFILE_PASSWORD";

const EMBEDDED: Option<&str> = option_env!("SEALED_CONFIG_KEYFILE_PASSWORD");

/// Returns the secret compiled into this binary.
pub fn embedded() -> Result<&'static str, StoreError> {
    require(EMBEDDED.unwrap_or_default())
}

/// Rejects an empty (or whitespace-only) secret.
pub fn require(secret: &str) -> Result<&str, StoreError> {
    if secret.trim().is_empty() {
        return Err(StoreError::MissingBuildSecret);
    }
    Ok(secret)
}
