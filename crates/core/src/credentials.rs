//! Persistent credential storage
//!
//! Holds at most one bearer token per [`SessionKind`]. The contract is
//! infallible: a store whose backing medium is unavailable logs a warning,
//! turns writes into no-ops and reads into absence. Callers must never
//! assume a write succeeded.
//!
//! # File Format
//!
//! [`FileCredentialStore`] keeps a flat JSON object keyed by
//! [`SessionKind::storage_key`]:
//!
//! ```json
//! {
//!   "admin_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "auth_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```

use crate::session_kind::{SessionKind, SessionToken};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable key/value slot per session kind
///
/// Fails silently: `get` returns `None` when storage cannot be read, `set`
/// and `clear` do nothing when it cannot be written.
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: SessionKind) -> Option<SessionToken>;

    fn set(&self, kind: SessionKind, token: &SessionToken);

    fn clear(&self, kind: SessionKind);

    /// Clear every slot
    fn clear_all(&self) {
        for kind in SessionKind::ALL {
            self.clear(kind);
        }
    }
}

/// Process-local store, forgotten on exit
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<HashMap<SessionKind, SessionToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, kind: SessionKind) -> Option<SessionToken> {
        self.slots.read().get(&kind).cloned()
    }

    fn set(&self, kind: SessionKind, token: &SessionToken) {
        self.slots.write().insert(kind, token.clone());
    }

    fn clear(&self, kind: SessionKind) {
        self.slots.write().remove(&kind);
    }
}

/// JSON file store, the terminal counterpart of browser local storage
///
/// Every read goes to disk so another process logging in or out is seen on
/// the next guard check. Writes are serialized within the process and are
/// last-write-wins across processes.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Default credentials file path
    /// - `$XDG_CONFIG_HOME/aspire/credentials.json`
    /// - `$HOME/.config/aspire/credentials.json`
    /// - `.aspire/credentials.json` when neither is set
    pub fn default_path() -> PathBuf {
        if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            if !dir.is_empty() {
                return PathBuf::from(dir).join("aspire").join("credentials.json");
            }
        }
        match std::env::var("HOME") {
            Ok(home) if !home.is_empty() => PathBuf::from(home)
                .join(".config")
                .join("aspire")
                .join("credentials.json"),
            _ => PathBuf::from(".aspire").join("credentials.json"),
        }
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, slots: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(slots)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Readers in other processes see either the old file or the new one
        let staging = self.staging_path();
        fs::write(&staging, contents)?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&staging, fs::Permissions::from_mode(0o600)) {
                let _ = fs::remove_file(&staging);
                return Err(e);
            }
        }

        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            e
        })
    }

    /// Sibling of the credentials file, unique per process
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "credentials.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    fn update(&self, op: &str, kind: SessionKind, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.write_lock.lock();

        // A corrupt file is replaced rather than blocking every future login
        let mut slots = self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable credentials file");
            BTreeMap::new()
        });
        apply(&mut slots);

        if let Err(e) = self.save(&slots) {
            tracing::warn!(
                path = %self.path.display(),
                kind = %kind,
                error = %e,
                "Credential store unavailable, {} skipped",
                op
            );
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: SessionKind) -> Option<SessionToken> {
        match self.load() {
            Ok(slots) => slots
                .get(kind.storage_key())
                .and_then(|raw| SessionToken::new(raw.as_str())),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), kind = %kind, error = %e, "Credential store unreadable");
                None
            }
        }
    }

    fn set(&self, kind: SessionKind, token: &SessionToken) {
        self.update("write", kind, |slots| {
            slots.insert(kind.storage_key().to_string(), token.as_str().to_string());
        });
    }

    fn clear(&self, kind: SessionKind) {
        let _guard = self.write_lock.lock();
        // Nothing on disk means nothing to clear; avoid creating the file
        let mut slots = match self.load() {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable credentials file");
                BTreeMap::new()
            }
        };
        if slots.remove(kind.storage_key()).is_none() && !self.path.exists() {
            return;
        }
        if let Err(e) = self.save(&slots) {
            tracing::warn!(
                path = %self.path.display(),
                kind = %kind,
                error = %e,
                "Credential store unavailable, clear skipped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("aspire-credentials-{}", uuid::Uuid::now_v7()))
            .join(name)
    }

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).unwrap()
    }

    #[test]
    fn test_memory_store_slots_are_independent() {
        let store = MemoryCredentialStore::new();
        store.set(SessionKind::Admin, &token("a1"));

        assert_eq!(store.get(SessionKind::Admin), Some(token("a1")));
        assert_eq!(store.get(SessionKind::User), None);

        store.clear(SessionKind::User);
        assert_eq!(store.get(SessionKind::Admin), Some(token("a1")));

        store.clear_all();
        assert_eq!(store.get(SessionKind::Admin), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.set(SessionKind::User, &token("u1"));
        store.set(SessionKind::Admin, &token("a1"));

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get(SessionKind::User), Some(token("u1")));
        assert_eq!(reopened.get(SessionKind::Admin), Some(token("a1")));

        reopened.clear(SessionKind::User);
        assert_eq!(store.get(SessionKind::User), None);
        assert_eq!(store.get(SessionKind::Admin), Some(token("a1")));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("admin_token"));
        assert!(!raw.contains("auth_token"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.set(SessionKind::Admin, &token("a1"));

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_noop() {
        // Parent "directory" is a regular file, so nothing can be written
        let blocker = temp_path("blocker");
        fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileCredentialStore::new(blocker.join("credentials.json"));
        store.set(SessionKind::Admin, &token("a1"));
        assert_eq!(store.get(SessionKind::Admin), None);
        store.clear(SessionKind::Admin);
        store.clear_all();

        let _ = fs::remove_dir_all(blocker.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let path = temp_path("credentials.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.get(SessionKind::User), None);

        store.set(SessionKind::User, &token("u2"));
        assert_eq!(store.get(SessionKind::User), Some(token("u2")));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_writes_replace_file_without_leftovers() {
        let path = temp_path("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.set(SessionKind::User, &token("u1"));
        store.set(SessionKind::Admin, &token("a1"));
        store.clear(SessionKind::User);

        let dir = path.parent().unwrap();
        let entries: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["credentials.json".to_string()]);

        let slots: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(slots.get("admin_token").map(String::as_str), Some("a1"));
        assert!(!slots.contains_key("auth_token"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_clear_without_file_creates_nothing() {
        let path = temp_path("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.clear(SessionKind::Admin);
        assert!(!path.exists());
    }
}
