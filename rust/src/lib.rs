//! Two-tier encrypted configuration store.
//!
//! Settings live in a sealed JSON document. The passphrase for that document
//! lives in a separate key file, sealed under a secret compiled into the
//! binary, so a deployment can read its own configuration without the
//! passphrase appearing in source or the environment. The operator is asked
//! for the passphrase exactly once, when the key file does not exist yet.

pub mod config;
pub mod crypto;
pub mod error;
pub mod global;
pub mod keyfile;
pub mod prompt;
pub mod secret;
pub mod store;
pub mod value;

mod fsio;

pub use config::StoreOptions;
pub use crypto::kdf::KdfParams;
pub use crypto::{Cipher, CipherError, PassphraseCipher};
pub use error::{PersistError, StoreError};
pub use keyfile::DEFAULT_KEY_FILE;
pub use prompt::{FixedPrompt, PassphrasePrompt, StdinPrompt};
pub use store::ConfigStore;
pub use value::ValueKind;
