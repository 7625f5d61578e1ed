//! The configuration store: bootstrap, load/save pipelines, typed accessors
//! and passphrase rotation.
//!
//! Every mutation is written back to disk before the call returns. A single
//! mutex guards the passphrase and the settings map, so concurrent callers in
//! one process cannot interleave read-modify-write sequences. Nothing
//! coordinates separate processes pointed at the same files; they will
//! overwrite each other.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::StoreOptions;
use crate::crypto::{Cipher, PassphraseCipher};
use crate::error::{PersistError, StoreError};
use crate::fsio;
use crate::keyfile::{self, KeyFile, KeyFileState};
use crate::prompt::PassphrasePrompt;
use crate::secret;
use crate::value::{self, ValueKind};

struct StoreState {
    passphrase: Zeroizing<String>,
    data: Map<String, Value>,
}

pub struct ConfigStore {
    config_path: PathBuf,
    key_file_path: PathBuf,
    build_secret: Zeroizing<String>,
    cipher: Arc<dyn Cipher>,
    state: Mutex<StoreState>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ConfigStore");
        out.field("config_path", &self.config_path)
            .field("key_file_path", &self.key_file_path);
        match self.state.try_lock() {
            Some(state) => out.field("keys", &state.data.len()),
            None => out.field("keys", &format_args!("<locked>")),
        };
        out.finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Opens (or on first run, creates) the key file and config file described
    /// by `options`, sealing new files with [`PassphraseCipher`].
    pub fn open(
        options: &StoreOptions,
        build_secret: &str,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<Self, StoreError> {
        let cipher = Arc::new(PassphraseCipher::new(options.kdf));
        Self::open_with_cipher(options, build_secret, cipher, prompt)
    }

    /// Same as [`ConfigStore::open`] with a caller-supplied cipher.
    ///
    /// Fails before touching the filesystem if `build_secret` is empty. Any
    /// failure leaves no half-initialized store behind.
    pub fn open_with_cipher(
        options: &StoreOptions,
        build_secret: &str,
        cipher: Arc<dyn Cipher>,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<Self, StoreError> {
        let build_secret = secret::require(build_secret)?;

        let key_file = KeyFile::new(&options.key_file_path, build_secret, cipher.as_ref());
        let (passphrase, found) = keyfile::bootstrap(&key_file, &options.config_path, prompt)?;

        let store = ConfigStore {
            config_path: options.config_path.clone(),
            key_file_path: options.key_file_path.clone(),
            build_secret: Zeroizing::new(build_secret.to_owned()),
            cipher,
            state: Mutex::new(StoreState {
                passphrase,
                data: Map::new(),
            }),
        };
        if let Err(err) = store.initialize() {
            if found == KeyFileState::Missing {
                fsio::discard(&store.key_file_path);
            }
            return Err(err);
        }
        Ok(store)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn key_file_path(&self) -> &Path {
        &self.key_file_path
    }

    fn key_file(&self) -> KeyFile<'_> {
        KeyFile::new(&self.key_file_path, &self.build_secret, self.cipher.as_ref())
    }

    /// Makes sure a config file exists and loads it. A config file created
    /// here is removed again if it then fails to load.
    fn initialize(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let created = self.ensure_config_file(&state)?;
        if let Err(err) = self.load_into(&mut state) {
            if created {
                fsio::discard(&self.config_path);
            }
            return Err(err);
        }
        info!(
            path = %self.config_path.display(),
            keys = state.data.len(),
            "configuration loaded"
        );
        Ok(())
    }

    /// Writes an empty sealed document if the config file does not exist yet,
    /// so loading never has to special-case the first run. Returns whether it
    /// wrote one.
    fn ensure_config_file(&self, state: &StoreState) -> Result<bool, StoreError> {
        let present = fsio::exists(&self.config_path).map_err(|source| StoreError::ConfigAccess {
            path: self.config_path.clone(),
            source,
        })?;
        if present {
            return Ok(false);
        }
        self.write_config(&state.passphrase, &Map::new())?;
        info!(path = %self.config_path.display(), "created empty config file");
        Ok(true)
    }

    fn read_config(&self, passphrase: &str) -> Result<Map<String, Value>, StoreError> {
        let sealed = fs::read(&self.config_path).map_err(|source| StoreError::ConfigAccess {
            path: self.config_path.clone(),
            source,
        })?;
        let plaintext = self
            .cipher
            .decrypt(&mut sealed.as_slice(), passphrase)
            .map_err(|source| StoreError::ConfigDecrypt {
                path: self.config_path.clone(),
                source,
            })?;
        match serde_json::from_slice::<Value>(&plaintext) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::ConfigParse {
                path: self.config_path.clone(),
                reason: format!("expected an object at the top level, found {}", ValueKind::of(&other)),
            }),
            Err(e) => Err(StoreError::ConfigParse {
                path: self.config_path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Decrypts and parses the config file, replacing the in-memory map only
    /// when every step succeeded.
    fn load_into(&self, state: &mut StoreState) -> Result<(), StoreError> {
        let data = self.read_config(&state.passphrase)?;
        debug!(path = %self.config_path.display(), keys = data.len(), "config file loaded");
        state.data = data;
        Ok(())
    }

    fn write_config(&self, passphrase: &str, data: &Map<String, Value>) -> Result<(), StoreError> {
        let persist = || -> Result<(), PersistError> {
            let json = Zeroizing::new(serde_json::to_vec_pretty(data)?);
            let mut sealed = Vec::new();
            self.cipher.encrypt(&mut sealed, passphrase, &json)?;
            fsio::replace(&self.config_path, &sealed)?;
            Ok(())
        };
        persist().map_err(|source| StoreError::ConfigPersist {
            path: self.config_path.clone(),
            source,
        })?;
        debug!(path = %self.config_path.display(), keys = data.len(), "config file saved");
        Ok(())
    }

    /// Re-reads the config file from disk, discarding the in-memory copy.
    pub fn reload(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        self.load_into(&mut state)
    }

    pub fn get(&self, key: &str) -> Result<Value, StoreError> {
        self.state
            .lock()
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_owned()))
    }

    pub fn get_string(&self, key: &str) -> Result<String, StoreError> {
        value::into_string(key, self.get(key)?)
    }

    /// Reads a number as `i64`. Non-integral numbers are truncated toward zero.
    pub fn get_int(&self, key: &str) -> Result<i64, StoreError> {
        value::into_int(key, self.get(key)?)
    }

    pub fn get_float(&self, key: &str) -> Result<f64, StoreError> {
        value::into_float(key, self.get(key)?)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        value::into_bool(key, self.get(key)?)
    }

    pub fn get_map(&self, key: &str) -> Result<Map<String, Value>, StoreError> {
        value::into_map(key, self.get(key)?)
    }

    pub fn get_array(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        value::into_array(key, self.get(key)?)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().data.contains_key(key)
    }

    /// Setting names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.lock().data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// A copy of every setting. Changes to the copy are not persisted.
    pub fn get_config_data(&self) -> Map<String, Value> {
        self.state.lock().data.clone()
    }

    /// Inserts or replaces a setting and persists the whole document.
    ///
    /// On error the new value stays in memory but not on disk; retrying the
    /// call (or any later successful mutation) brings them back in line.
    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), StoreError> {
        let key = key.into();
        let mut state = self.state.lock();
        state.data.insert(key.clone(), value.into());
        self.write_config(&state.passphrase, &state.data)?;
        debug!(key = %key, "setting stored");
        Ok(())
    }

    /// Removes a setting (a missing key is not an error) and persists.
    pub fn del_config(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let removed = state.data.remove(key).is_some();
        self.write_config(&state.passphrase, &state.data)?;
        debug!(key, removed, "setting deleted");
        Ok(())
    }

    /// Replaces the configuration passphrase.
    ///
    /// The key file is rewritten first; if that fails nothing has changed.
    /// The settings are then resealed under the new passphrase and read back.
    /// If resealing fails, the previous passphrase is restored in memory and
    /// in the key file before the error is returned.
    pub fn set_pass(&self, new_passphrase: &str) -> Result<(), StoreError> {
        let new_passphrase = Zeroizing::new(new_passphrase.trim().to_owned());
        let mut state = self.state.lock();

        self.key_file().write_passphrase(&new_passphrase)?;
        let previous = std::mem::replace(&mut state.passphrase, new_passphrase);

        if let Err(err) = self.write_config(&state.passphrase, &state.data) {
            state.passphrase = previous;
            if let Err(rollback) = self.key_file().write_passphrase(&state.passphrase) {
                warn!(
                    path = %self.key_file_path.display(),
                    error = %rollback,
                    "could not restore previous key file after failed rotation"
                );
            }
            return Err(err);
        }

        self.load_into(&mut state)?;
        info!(path = %self.config_path.display(), "configuration passphrase rotated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigStore;
    use crate::config::StoreOptions;
    use crate::crypto::kdf::KdfParams;
    use crate::crypto::PassphraseCipher;
    use crate::error::StoreError;
    use crate::keyfile::KeyFile;
    use crate::prompt::{FixedPrompt, PassphrasePrompt};
    use serde_json::json;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::tempdir;
    use zeroize::Zeroizing;

    /// Behaves like stdin closed before the operator typed anything.
    struct ClosedInput;

    impl PassphrasePrompt for ClosedInput {
        fn read_passphrase(&mut self, _config_path: &Path) -> io::Result<Zeroizing<String>> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
        }
    }

    const SECRET: &str = "build-secret";

    fn options(dir: &Path) -> StoreOptions {
        StoreOptions::new(dir.join("config.json"), dir.join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1))
    }

    fn open(options: &StoreOptions, passphrase: &str) -> ConfigStore {
        ConfigStore::open(options, SECRET, &mut FixedPrompt::new(passphrase))
            .expect("store should open")
    }

    fn cipher() -> PassphraseCipher {
        PassphraseCipher::new(KdfParams::new(1024, 1, 1))
    }

    #[test]
    fn first_run_creates_both_files_with_empty_data() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let mut prompt = FixedPrompt::new("secret123");
        let store = ConfigStore::open(&options, SECRET, &mut prompt).unwrap();

        assert!(store.get_config_data().is_empty());
        assert!(options.key_file_path.exists());
        assert!(options.config_path.exists());
        assert_eq!(prompt.calls(), 1);

        let plaintext = cipher()
            .open(&fs::read(&options.config_path).unwrap(), "secret123")
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(parsed, json!({}));
    }

    #[test]
    fn settings_survive_reopen_without_prompting() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        {
            let store = open(&options, "secret123");
            store.set_config("PORT", 8080).unwrap();
            store.set_config("CLIENT_ID", "12345").unwrap();
        }

        let mut prompt = FixedPrompt::new("ignored");
        let store = ConfigStore::open(&options, SECRET, &mut prompt).unwrap();
        assert_eq!(prompt.calls(), 0);
        assert_eq!(store.get_int("PORT").unwrap(), 8080);
        assert_eq!(store.get_string("CLIENT_ID").unwrap(), "12345");
    }

    #[test]
    fn whole_float_reads_back_as_int() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let store = open(&options, "secret123");
        store.set_config("PORT", 8080.0).unwrap();
        assert_eq!(store.get_int("PORT").unwrap(), 8080);

        let reopened = open(&options, "secret123");
        assert_eq!(reopened.get_int("PORT").unwrap(), 8080);
        assert_eq!(reopened.get_float("PORT").unwrap(), 8080.0);
    }

    #[test]
    fn accessor_failures_are_ordinary_errors() {
        let dir = tempdir().expect("temp dir");
        let store = open(&options(dir.path()), "secret123");

        assert!(matches!(
            store.get("MISSING_KEY").unwrap_err(),
            StoreError::KeyNotFound(key) if key == "MISSING_KEY"
        ));
        store.set_config("X", "y").unwrap();
        assert!(matches!(
            store.get_bool("X").unwrap_err(),
            StoreError::TypeMismatch { .. }
        ));
        assert!(matches!(
            store.get_int("MISSING_KEY").unwrap_err(),
            StoreError::KeyNotFound(_)
        ));
    }

    #[test]
    fn nested_values_round_trip() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        {
            let store = open(&options, "secret123");
            store
                .set_config("DB", json!({"host": "localhost", "port": 5432}))
                .unwrap();
            store.set_config("HOSTS", json!(["a", "b", "c"])).unwrap();
            store.set_config("DEBUG", true).unwrap();
        }
        let store = open(&options, "secret123");
        assert_eq!(store.get_map("DB").unwrap()["port"], json!(5432));
        assert_eq!(store.get_array("HOSTS").unwrap().len(), 3);
        assert!(store.get_bool("DEBUG").unwrap());
        assert_eq!(store.keys(), vec!["DB", "DEBUG", "HOSTS"]);
    }

    #[test]
    fn empty_build_secret_touches_nothing() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let mut prompt = FixedPrompt::new("secret123");
        let err = ConfigStore::open(&options, "", &mut prompt).unwrap_err();

        assert!(matches!(err, StoreError::MissingBuildSecret));
        assert_eq!(prompt.calls(), 0);
        assert!(!options.key_file_path.exists());
        assert!(!options.config_path.exists());
    }

    #[test]
    fn deleting_a_missing_key_is_a_no_op() {
        let dir = tempdir().expect("temp dir");
        let store = open(&options(dir.path()), "secret123");
        store.set_config("KEEP", 1).unwrap();
        let before = store.get_config_data();

        store.del_config("NOPE").unwrap();
        assert_eq!(store.get_config_data(), before);

        store.del_config("KEEP").unwrap();
        assert!(!store.contains_key("KEEP"));
    }

    #[test]
    fn config_data_is_a_copy() {
        let dir = tempdir().expect("temp dir");
        let store = open(&options(dir.path()), "secret123");
        store.set_config("A", 1).unwrap();

        let mut copy = store.get_config_data();
        copy.insert("B".to_owned(), json!(2));
        copy.remove("A");

        assert!(store.contains_key("A"));
        assert!(!store.contains_key("B"));
    }

    #[test]
    fn rotation_reseals_config_and_key_file() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let store = open(&options, "secret123");
        store.set_config("PORT", 8080).unwrap();

        store.set_pass("newpass").unwrap();
        assert_eq!(store.get_int("PORT").unwrap(), 8080);

        let cipher = cipher();
        let recovered = KeyFile::new(&options.key_file_path, SECRET, &cipher)
            .read_passphrase()
            .unwrap();
        assert_eq!(recovered.as_str(), "newpass");

        let sealed = fs::read(&options.config_path).unwrap();
        assert!(cipher.open(&sealed, "secret123").is_err());
        assert!(cipher.open(&sealed, "newpass").is_ok());
    }

    #[test]
    fn failed_key_file_write_leaves_rotation_untouched() {
        let dir = tempdir().expect("temp dir");
        let key_dir = dir.path().join("keys");
        fs::create_dir(&key_dir).unwrap();
        let options = StoreOptions::new(dir.path().join("config.json"), key_dir.join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1));
        let store = open(&options, "secret123");
        store.set_config("PORT", 8080).unwrap();

        fs::remove_dir_all(&key_dir).unwrap();
        let err = store.set_pass("newpass").unwrap_err();
        assert!(matches!(err, StoreError::KeyFilePersist { .. }));

        // Still sealed under the old passphrase, which the store still holds.
        store.reload().unwrap();
        assert_eq!(store.get_int("PORT").unwrap(), 8080);
        let sealed = fs::read(&options.config_path).unwrap();
        assert!(cipher().open(&sealed, "secret123").is_ok());
    }

    #[test]
    fn failed_config_write_rolls_rotation_back() {
        let dir = tempdir().expect("temp dir");
        let config_dir = dir.path().join("conf");
        fs::create_dir(&config_dir).unwrap();
        let options = StoreOptions::new(config_dir.join("config.json"), dir.path().join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1));
        let store = open(&options, "secret123");

        fs::remove_dir_all(&config_dir).unwrap();
        let err = store.set_pass("newpass").unwrap_err();
        assert!(matches!(err, StoreError::ConfigPersist { .. }));

        let cipher = cipher();
        let recovered = KeyFile::new(&options.key_file_path, SECRET, &cipher)
            .read_passphrase()
            .unwrap();
        assert_eq!(recovered.as_str(), "secret123");
    }

    #[test]
    fn save_failure_is_reported_and_memory_diverges() {
        let dir = tempdir().expect("temp dir");
        let config_dir = dir.path().join("conf");
        fs::create_dir(&config_dir).unwrap();
        let options = StoreOptions::new(config_dir.join("config.json"), dir.path().join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1));
        let store = open(&options, "secret123");

        fs::remove_dir_all(&config_dir).unwrap();
        let err = store.set_config("PORT", 8080).unwrap_err();
        assert!(matches!(err, StoreError::ConfigPersist { .. }));
        assert_eq!(store.get_int("PORT").unwrap(), 8080);

        fs::create_dir(&config_dir).unwrap();
        store.set_config("HOST", "localhost").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get_int("PORT").unwrap(), 8080);
    }

    #[test]
    fn corrupted_key_file_fails_without_prompting() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        drop(open(&options, "secret123"));

        let mut sealed = fs::read(&options.key_file_path).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x80;
        fs::write(&options.key_file_path, &sealed).unwrap();

        let mut prompt = FixedPrompt::new("secret123");
        let err = ConfigStore::open(&options, SECRET, &mut prompt).unwrap_err();
        assert!(matches!(err, StoreError::KeyFileDecrypt { .. }));
        assert_eq!(prompt.calls(), 0);
    }

    #[test]
    fn corrupted_config_file_is_a_decrypt_failure() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        drop(open(&options, "secret123"));

        let mut sealed = fs::read(&options.config_path).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x80;
        fs::write(&options.config_path, &sealed).unwrap();

        let err = ConfigStore::open(&options, SECRET, &mut FixedPrompt::new("x")).unwrap_err();
        assert!(matches!(err, StoreError::ConfigDecrypt { .. }));
    }

    #[test]
    fn non_object_and_malformed_documents_fail_to_parse() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        drop(open(&options, "secret123"));
        let cipher = cipher();

        fs::write(&options.config_path, cipher.seal("secret123", b"[1, 2, 3]").unwrap()).unwrap();
        let err = ConfigStore::open(&options, SECRET, &mut FixedPrompt::new("x")).unwrap_err();
        assert!(format!("{err}").contains("found array"));

        fs::write(&options.config_path, cipher.seal("secret123", b"{\"PORT\": ").unwrap()).unwrap();
        let err = ConfigStore::open(&options, SECRET, &mut FixedPrompt::new("x")).unwrap_err();
        assert!(matches!(err, StoreError::ConfigParse { .. }));
    }

    #[test]
    fn failed_reload_keeps_previous_data() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let store = open(&options, "secret123");
        store.set_config("PORT", 8080).unwrap();

        fs::write(&options.config_path, b"not sealed").unwrap();
        assert!(matches!(
            store.reload().unwrap_err(),
            StoreError::ConfigDecrypt { .. }
        ));
        assert_eq!(store.get_int("PORT").unwrap(), 8080);
    }

    #[test]
    fn deleted_config_is_recreated_under_recovered_passphrase() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        {
            let store = open(&options, "secret123");
            store.set_config("PORT", 8080).unwrap();
        }
        fs::remove_file(&options.config_path).unwrap();

        let mut prompt = FixedPrompt::new("ignored");
        let store = ConfigStore::open(&options, SECRET, &mut prompt).unwrap();
        assert_eq!(prompt.calls(), 0);
        assert!(store.get_config_data().is_empty());

        let plaintext = cipher()
            .open(&fs::read(&options.config_path).unwrap(), "secret123")
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(parsed, json!({}));
    }

    #[test]
    fn failed_prompt_leaves_no_files() {
        let dir = tempdir().expect("temp dir");
        let options = options(dir.path());
        let err = ConfigStore::open(&options, SECRET, &mut ClosedInput).unwrap_err();

        match err {
            StoreError::Prompt(source) => assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected a prompt failure, got {other:?}"),
        }
        assert!(!options.key_file_path.exists());
        assert!(!options.config_path.exists());
    }

    #[test]
    fn unreadable_config_path_is_an_access_failure() {
        let dir = tempdir().expect("temp dir");
        let config_dir = dir.path().join("config.json");
        fs::create_dir(&config_dir).unwrap();
        let options = StoreOptions::new(&config_dir, dir.path().join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1));

        let err = ConfigStore::open(&options, SECRET, &mut FixedPrompt::new("secret123"))
            .unwrap_err();
        assert!(matches!(err, StoreError::ConfigAccess { .. }));
        assert!(config_dir.is_dir(), "an existing path must not be removed");
        assert!(!options.key_file_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn config_under_a_regular_file_is_an_access_failure() {
        let dir = tempdir().expect("temp dir");
        let blocker = dir.path().join("plain");
        fs::write(&blocker, b"x").unwrap();
        let options = StoreOptions::new(blocker.join("config.json"), dir.path().join("config.key"))
            .with_kdf(KdfParams::new(1024, 1, 1));

        let mut prompt = FixedPrompt::new("secret123");
        let err = ConfigStore::open(&options, SECRET, &mut prompt).unwrap_err();
        assert!(matches!(err, StoreError::ConfigAccess { .. }));
        assert_eq!(prompt.calls(), 1);
        assert!(!options.key_file_path.exists());
    }

    #[test]
    fn debug_output_does_not_wait_for_the_lock() {
        let dir = tempdir().expect("temp dir");
        let store = open(&options(dir.path()), "secret123");
        let _held = store.state.lock();
        let rendered = format!("{store:?}");
        assert!(rendered.contains("<locked>"));
    }

    #[test]
    fn debug_output_omits_secrets() {
        let dir = tempdir().expect("temp dir");
        let store = open(&options(dir.path()), "secret123");
        let rendered = format!("{store:?}");
        assert!(rendered.contains("config.json"));
        assert!(!rendered.contains("secret123"));
        assert!(!rendered.contains(SECRET));
    }
}
