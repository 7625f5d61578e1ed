//! Process-wide store for code that would rather call free functions than
//! pass a [`ConfigStore`] handle around. Every function here forwards to the
//! installed store and fails with [`StoreError::NotInitialized`] before
//! [`init`] or [`install`] has run.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::config::StoreOptions;
use crate::error::StoreError;
use crate::prompt::StdinPrompt;
use crate::secret;
use crate::store::ConfigStore;

static GLOBAL_STORE: Lazy<RwLock<Option<Arc<ConfigStore>>>> = Lazy::new(|| RwLock::new(None));

/// Opens the store with the secret compiled into this binary, prompting on
/// stdin if the key file does not exist yet. An empty `key_file_path`
/// selects [`crate::DEFAULT_KEY_FILE`].
pub fn init(config_path: impl AsRef<Path>, key_file_path: impl AsRef<Path>) -> Result<(), StoreError> {
    let build_secret = secret::embedded()?;
    let options = StoreOptions::new(config_path, key_file_path);
    let store = ConfigStore::open(&options, build_secret, &mut StdinPrompt)?;
    install(store);
    Ok(())
}

/// Makes `store` the process-wide instance, replacing any previous one.
pub fn install(store: ConfigStore) -> Arc<ConfigStore> {
    let store = Arc::new(store);
    *GLOBAL_STORE.write() = Some(Arc::clone(&store));
    store
}

/// Removes the process-wide instance, returning it if there was one.
pub fn uninstall() -> Option<Arc<ConfigStore>> {
    GLOBAL_STORE.write().take()
}

pub fn handle() -> Result<Arc<ConfigStore>, StoreError> {
    GLOBAL_STORE.read().clone().ok_or(StoreError::NotInitialized)
}

pub fn get(key: &str) -> Result<Value, StoreError> {
    handle()?.get(key)
}

pub fn get_string(key: &str) -> Result<String, StoreError> {
    handle()?.get_string(key)
}

pub fn get_int(key: &str) -> Result<i64, StoreError> {
    handle()?.get_int(key)
}

pub fn get_float(key: &str) -> Result<f64, StoreError> {
    handle()?.get_float(key)
}

pub fn get_bool(key: &str) -> Result<bool, StoreError> {
    handle()?.get_bool(key)
}

pub fn get_map(key: &str) -> Result<Map<String, Value>, StoreError> {
    handle()?.get_map(key)
}

pub fn get_array(key: &str) -> Result<Vec<Value>, StoreError> {
    handle()?.get_array(key)
}

pub fn get_config_data() -> Result<Map<String, Value>, StoreError> {
    Ok(handle()?.get_config_data())
}

pub fn set_config(key: impl Into<String>, value: impl Into<Value>) -> Result<(), StoreError> {
    handle()?.set_config(key, value)
}

pub fn del_config(key: &str) -> Result<(), StoreError> {
    handle()?.del_config(key)
}

pub fn set_pass(new_passphrase: &str) -> Result<(), StoreError> {
    handle()?.set_pass(new_passphrase)
}
