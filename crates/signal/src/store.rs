use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const API_KEY_ENTRY: &str = "apiKey";
pub const REGION_ENTRY: &str = "regionName";

const STORE_FILE: &str = "store.json";
const BAD_STORE_FILE: &str = "store.json.bad";
const SECRET_KEY_FILE: &str = ".secret_key";
const NONCE_LEN: usize = 12;

/// String-valued persistent entries. A missing entry is distinct from an
/// empty one.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// The two persisted values, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub api_key: Option<String>,
    pub region_code: Option<String>,
}

impl Credential {
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            api_key: store.get(API_KEY_ENTRY)?,
            region_code: store.get(REGION_ENTRY)?,
        })
    }

    /// Both entries present, as `(api_key, region_code)`.
    pub fn complete(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.region_code) {
            (Some(key), Some(region)) => Some((key.as_str(), region.as_str())),
            _ => None,
        }
    }

    pub fn save(store: &mut dyn KeyValueStore, api_key: &str, region_code: &str) -> Result<()> {
        store.set(API_KEY_ENTRY, api_key)?;
        store.set(REGION_ENTRY, region_code)
    }

    pub fn clear_region(store: &mut dyn KeyValueStore) -> Result<()> {
        store.remove(REGION_ENTRY)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Entries kept as a JSON object on disk, AES-256-GCM encrypted unless
/// opened with `encrypt = false`. Every mutation rewrites the file.
pub struct FileStore {
    dir: PathBuf,
    encrypt: bool,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn default_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "carbon-signal", "carbon-signal")
            .ok_or_else(|| anyhow!("Could not determine project directories"))?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn open(dir: impl Into<PathBuf>, encrypt: bool) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;

        let mut store = Self {
            dir,
            encrypt,
            entries: BTreeMap::new(),
        };

        let path = store.store_path();
        if path.exists() {
            match store.read_entries(&path) {
                Ok(entries) => store.entries = entries,
                Err(e) => {
                    tracing::warn!("store {} is unreadable, starting empty: {e:#}", path.display());
                    store.set_aside(&path);
                }
            }
        }

        Ok(store)
    }

    fn read_entries(&self, path: &Path) -> Result<BTreeMap<String, String>> {
        let raw = fs::read(path)?;
        let plain = if self.encrypt { self.decrypt(&raw)? } else { raw };
        serde_json::from_slice(&plain).with_context(|| format!("parsing {}", path.display()))
    }

    /// Moves an unreadable store out of the way so the next write starts fresh.
    fn set_aside(&self, path: &Path) {
        let bad = self.dir.join(BAD_STORE_FILE);
        if let Err(e) = fs::rename(path, &bad) {
            tracing::warn!("could not move {} aside: {e}", path.display());
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_vec(&self.entries)?;
        let bytes = if self.encrypt { self.encrypt(&json)? } else { json };
        write_secure_file(&self.store_path(), &bytes)
    }

    fn load_key(&self) -> Result<Option<[u8; 32]>> {
        let path = self.dir.join(SECRET_KEY_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let key_bytes = fs::read(&path)?;
        if key_bytes.len() != 32 {
            tracing::warn!("secret key file has wrong length, ignoring it");
            return Ok(None);
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&key_bytes);
        Ok(Some(key))
    }

    fn get_or_create_key(&self) -> Result<[u8; 32]> {
        if let Some(key) = self.load_key()? {
            return Ok(key);
        }

        let mut key = [0u8; 32];
        rand::thread_rng().fill(&mut key);
        write_secure_file(&self.dir.join(SECRET_KEY_FILE), &key)?;
        Ok(key)
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        use aes_gcm::{
            aead::{Aead, KeyInit},
            Aes256Gcm, Nonce,
        };

        let key = self.get_or_create_key()?;
        let cipher = Aes256Gcm::new(aes_gcm::aead::Key::<Aes256Gcm>::from_slice(&key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| anyhow!("Encryption failed"))?;

        let mut result = nonce_bytes.to_vec();
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        use aes_gcm::{
            aead::{Aead, KeyInit},
            Aes256Gcm, Nonce,
        };

        if ciphertext.len() < NONCE_LEN {
            return Err(anyhow!("Invalid ciphertext"));
        }

        let key = self
            .load_key()?
            .ok_or_else(|| anyhow!("No usable secret key"))?;
        let cipher = Aes256Gcm::new(aes_gcm::aead::Key::<Aes256Gcm>::from_slice(&key));

        let nonce = Nonce::from_slice(&ciphertext[..NONCE_LEN]);
        cipher
            .decrypt(nonce, &ciphertext[NONCE_LEN..])
            .map_err(|_| anyhow!("Decryption failed"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Writes to a sibling temp file and renames it over `path`, so a crash never
/// leaves a half-written file behind.
fn write_secure_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid path {}", path.display()))?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&tmp_path, perms)?;
    }
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn credential_is_complete_only_with_both_entries() {
        let mut store = MemoryStore::new();
        assert_eq!(Credential::load(&store).unwrap().complete(), None);

        store.set(API_KEY_ENTRY, "key").unwrap();
        assert_eq!(Credential::load(&store).unwrap().complete(), None);

        store.set(REGION_ENTRY, "DK").unwrap();
        assert_eq!(
            Credential::load(&store).unwrap().complete(),
            Some(("key", "DK"))
        );
    }

    #[test]
    fn empty_string_is_present_not_absent() {
        let store = MemoryStore::with_entries([(API_KEY_ENTRY, ""), (REGION_ENTRY, "")]);
        let credential = Credential::load(&store).unwrap();
        assert_eq!(credential.api_key.as_deref(), Some(""));
        assert!(credential.complete().is_some());
    }

    #[test]
    fn clear_region_keeps_api_key() {
        let mut store = MemoryStore::with_entries([(API_KEY_ENTRY, "key"), (REGION_ENTRY, "DK")]);
        Credential::clear_region(&mut store).unwrap();

        assert_eq!(store.get(API_KEY_ENTRY).unwrap().as_deref(), Some("key"));
        assert_eq!(store.get(REGION_ENTRY).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        {
            let mut store = FileStore::open(temp_dir.path(), true)?;
            Credential::save(&mut store, "secret-key", "US-CAL-CISO")?;
        }

        let reopened = FileStore::open(temp_dir.path(), true)?;
        let credential = Credential::load(&reopened)?;
        assert_eq!(credential.complete(), Some(("secret-key", "US-CAL-CISO")));
        Ok(())
    }

    #[test]
    fn encrypted_file_does_not_contain_plaintext() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut store = FileStore::open(temp_dir.path(), true)?;
        store.set(API_KEY_ENTRY, "very-secret-token")?;

        let raw = fs::read(store.store_path())?;
        let needle = b"very-secret-token";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
        Ok(())
    }

    #[test]
    fn plain_store_is_readable_json() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut store = FileStore::open(temp_dir.path(), false)?;
        store.set(REGION_ENTRY, "DE")?;

        let raw = fs::read_to_string(store.store_path())?;
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw)?;
        assert_eq!(parsed.get(REGION_ENTRY).map(String::as_str), Some("DE"));
        Ok(())
    }

    #[test]
    fn remove_persists_across_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        {
            let mut store = FileStore::open(temp_dir.path(), true)?;
            Credential::save(&mut store, "key", "DK")?;
            Credential::clear_region(&mut store)?;
        }

        let reopened = FileStore::open(temp_dir.path(), true)?;
        assert_eq!(reopened.get(API_KEY_ENTRY)?.as_deref(), Some("key"));
        assert_eq!(reopened.get(REGION_ENTRY)?, None);
        Ok(())
    }

    #[test]
    fn lost_secret_key_starts_empty_instead_of_failing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        {
            let mut store = FileStore::open(temp_dir.path(), true)?;
            Credential::save(&mut store, "key", "DK")?;
        }
        fs::remove_file(temp_dir.path().join(SECRET_KEY_FILE))?;

        let first = FileStore::open(temp_dir.path(), true)?;
        assert_eq!(Credential::load(&first)?, Credential::default());
        assert!(!temp_dir.path().join(SECRET_KEY_FILE).exists());
        assert!(temp_dir.path().join(BAD_STORE_FILE).exists());

        let second = FileStore::open(temp_dir.path(), true)?;
        assert_eq!(Credential::load(&second)?, Credential::default());
        Ok(())
    }

    #[test]
    fn truncated_store_starts_empty_and_is_writable_again() -> Result<()> {
        let temp_dir = TempDir::new()?;
        {
            let mut store = FileStore::open(temp_dir.path(), true)?;
            Credential::save(&mut store, "key", "DK")?;
        }
        let path = temp_dir.path().join(STORE_FILE);
        let raw = fs::read(&path)?;
        fs::write(&path, &raw[..raw.len() / 2])?;

        let mut store = FileStore::open(temp_dir.path(), true)?;
        assert_eq!(Credential::load(&store)?.complete(), None);
        Credential::save(&mut store, "fresh", "DE")?;

        let reopened = FileStore::open(temp_dir.path(), true)?;
        assert_eq!(Credential::load(&reopened)?.complete(), Some(("fresh", "DE")));
        Ok(())
    }

    #[test]
    fn disabling_encryption_over_encrypted_store_starts_empty() -> Result<()> {
        let temp_dir = TempDir::new()?;
        {
            let mut store = FileStore::open(temp_dir.path(), true)?;
            Credential::save(&mut store, "key", "DK")?;
        }

        let store = FileStore::open(temp_dir.path(), false)?;
        assert_eq!(Credential::load(&store)?, Credential::default());
        Ok(())
    }

    #[test]
    fn writes_leave_no_temp_files_behind() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut store = FileStore::open(temp_dir.path(), true)?;
        store.set(API_KEY_ENTRY, "key")?;

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }
}
