//! Session Store
//!
//! Persistence for the session record. The coordinator is the sole
//! writer; concurrent readers are masked by re-derivation (check-auth
//! always re-verifies) rather than locking.

use aegis_storage::Database;

use crate::session::{Session, UserProfile};
use crate::Result;

const KEY_TOKEN: &str = "token";
const KEY_EMAIL: &str = "email";
const KEY_NAME: &str = "name";
const KEY_ROLE: &str = "role";

const ALL_KEYS: [&str; 4] = [KEY_TOKEN, KEY_EMAIL, KEY_NAME, KEY_ROLE];

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Write the whole session in one transaction: either all four keys
    /// land or none do.
    pub fn put_session(&self, session: &Session) -> Result<()> {
        self.db.set(&[
            (KEY_TOKEN, &session.token),
            (KEY_EMAIL, &session.email),
            (KEY_NAME, &session.name),
            (KEY_ROLE, &session.role),
        ])?;

        tracing::debug!(email = %session.email, "Session stored");
        Ok(())
    }

    /// Load the session, if any.
    ///
    /// A record with a token but no email can only come from state written
    /// outside the transactional path (an older version, a crashed partial
    /// write). Such a session is corrupt: clear it and report none.
    pub fn load(&self) -> Result<Option<Session>> {
        let record = self.db.get(&ALL_KEYS)?;

        let token = match record.get(KEY_TOKEN) {
            Some(token) => token.clone(),
            None => return Ok(None),
        };

        if !record.contains_key(KEY_EMAIL) {
            tracing::warn!("Session has token but no email; clearing corrupt session");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(Session {
            token,
            email: record.get(KEY_EMAIL).cloned().unwrap_or_default(),
            name: record.get(KEY_NAME).cloned().unwrap_or_default(),
            role: record.get(KEY_ROLE).cloned().unwrap_or_default(),
        }))
    }

    /// Read just the credential, without the corruption check. Used by the
    /// verify path, which is about to re-derive the rest anyway.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.db.get_one(KEY_TOKEN)?)
    }

    /// The user-facing fields, present only when a token is stored.
    pub fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.load()?.map(|session| session.profile()))
    }

    /// Refresh the identity fields after a successful token verification.
    pub fn refresh_identity(&self, email: &str, name: &str) -> Result<()> {
        self.db.set(&[(KEY_EMAIL, email), (KEY_NAME, name)])?;
        Ok(())
    }

    /// Remove all four keys. Removing an already-empty session is fine.
    pub fn clear(&self) -> Result<()> {
        self.db.remove(&ALL_KEYS)?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.db.get(&ALL_KEYS)?.is_empty())
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Database::open_in_memory().unwrap())
    }

    fn sample_session() -> Session {
        Session::new(
            "T1".to_string(),
            "a@b.com".to_string(),
            "A".to_string(),
            "doctor".to_string(),
        )
    }

    #[test]
    fn test_put_and_load_round_trip() {
        let store = store();
        store.put_session(&sample_session()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, sample_session());
    }

    #[test]
    fn test_load_empty_store() {
        let store = store();
        assert!(store.load().unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let store = store();
        store.put_session(&sample_session()).unwrap();
        store.clear().unwrap();

        assert!(store.is_empty().unwrap());
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = store();
        store.put_session(&sample_session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_corrupt_session_cleared_on_load() {
        let store = store();
        // Token without email: state no put_session could have written.
        store.db.set(&[("token", "T1"), ("role", "doctor")]).unwrap();

        assert!(store.load().unwrap().is_none());
        // The recovery clear removed the stragglers too.
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_refresh_identity_keeps_token_and_role() {
        let store = store();
        store.put_session(&sample_session()).unwrap();
        store.refresh_identity("new@b.com", "New Name").unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "T1");
        assert_eq!(loaded.email, "new@b.com");
        assert_eq!(loaded.name, "New Name");
        assert_eq!(loaded.role, "doctor");
    }
}
