use super::errors::CredentialStoreError;
use super::types::Credential;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persistent store for the signed-in credential.
///
/// Holds the bearer token and cached user profile across restarts as a
/// single JSON record, so the token/profile pair invariant cannot be
/// violated on disk: both are written together and cleared together, and
/// a record missing either half is discarded on load.
///
/// Write discipline: only two code paths may mutate this store, the
/// login/registration success path and the session guard's teardown path.
/// Everything else treats it as read-only.
pub struct CredentialStore {
    path: PathBuf,
    cached: Mutex<Option<Credential>>,
}

impl CredentialStore {
    /// Opens the store at the platform data directory
    /// (e.g. `~/.local/share/bookly/credentials.json`).
    pub fn new() -> Result<Self, CredentialStoreError> {
        let dir = dirs::data_dir()
            .ok_or(CredentialStoreError::NoDataDir)?
            .join("bookly");
        Ok(Self::with_path(dir.join("credentials.json")))
    }

    /// Opens the store at an explicit path. Used by tests and by
    /// configuration overrides.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: Mutex::new(None),
        }
    }

    /// Loads the persisted credential, if any.
    ///
    /// A file that cannot be parsed as a complete token/profile pair is
    /// removed rather than partially honored.
    pub fn load(&self) -> Option<Credential> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read credential file: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&raw) {
            Ok(credential) => {
                if let Ok(mut cached) = self.cached.lock() {
                    *cached = Some(credential.clone());
                }
                Some(credential)
            }
            Err(e) => {
                log::warn!("Discarding unreadable credential record: {e}");
                self.clear();
                None
            }
        }
    }

    /// Persists a credential pair, replacing any previous one.
    pub fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written pair.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(credential)?)?;
        fs::rename(&tmp, &self.path)?;

        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(credential.clone());
        }
        log::debug!("Credential saved for {}", credential.user.email);
        Ok(())
    }

    /// Removes the persisted credential pair. Safe to call when nothing
    /// is stored.
    pub fn clear(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Credential cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove credential file: {e}"),
        }
    }

    /// The credential most recently loaded or saved in this process.
    pub fn current(&self) -> Option<Credential> {
        self.cached.lock().ok().and_then(|cached| cached.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Role, UserProfile};
    use claims::{assert_none, assert_ok, assert_some};

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::with_path(dir.path().join("credentials.json"))
    }

    fn credential() -> Credential {
        Credential::new(
            "tok-abc",
            UserProfile {
                id: 1,
                email: "client@example.com".to_string(),
                role: Role::Client,
                created_at: None,
            },
        )
    }

    #[test]
    fn save_then_load_round_trips_the_pair() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert_ok!(store.save(&credential()));

        let fresh = store_in(&dir);
        let loaded = assert_some!(fresh.load());
        assert_eq!(loaded, credential());
        assert_eq!(assert_some!(fresh.current()), credential());
    }

    #[test]
    fn load_on_empty_store_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_none!(store_in(&dir).load());
    }

    #[test]
    fn clear_removes_pair_and_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert_ok!(store.save(&credential()));

        store.clear();
        store.clear();

        assert_none!(store.current());
        assert_none!(store_in(&dir).load());
    }

    #[test]
    fn corrupt_record_is_discarded_not_honored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"token":"orphaned-token"}"#).expect("write");

        let store = CredentialStore::with_path(path.clone());
        assert_none!(store.load());
        assert!(!path.exists(), "half-pair record should be removed");
    }
}
