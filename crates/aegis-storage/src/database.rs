//! Database connection and key-value operations
//!
//! The contract mirrors a browser local storage area: `get` returns a
//! partial record for the requested keys, `set` and `remove` acknowledge
//! after the write lands. Unlike the browser area, multi-key writes here
//! are transactional.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        // Run migrations
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Read a partial record: only keys that exist appear in the result.
    pub fn get(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        self.with_connection(|conn| {
            let mut record = HashMap::with_capacity(keys.len());
            for key in keys {
                let value: Option<String> = conn
                    .query_row(
                        "SELECT value FROM local_store WHERE key = ?1",
                        [key],
                        |row| row.get(0),
                    )
                    .optional()?;
                if let Some(value) = value {
                    record.insert((*key).to_string(), value);
                }
            }
            Ok(record)
        })
    }

    pub fn get_one(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM local_store WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Write a partial record. All pairs land in one transaction.
    pub fn set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.transaction(|conn| {
            for (key, value) in pairs {
                conn.execute(
                    "INSERT OR REPLACE INTO local_store (key, value, updated_at)
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![key, value, updated_at],
                )?;
            }
            Ok(())
        })
    }

    /// Remove keys. Missing keys are not an error; all removals land in
    /// one transaction.
    pub fn remove(&self, keys: &[&str]) -> Result<()> {
        self.transaction(|conn| {
            for key in keys {
                conn.execute("DELETE FROM local_store WHERE key = ?1", [key])?;
            }
            Ok(())
        })
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_one(key)?.is_some())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM local_store", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_set_and_get_partial_record() {
        let db = Database::open_in_memory().unwrap();
        db.set(&[("token", "T1"), ("email", "a@b.com")]).unwrap();

        let record = db.get(&["token", "email", "name"]).unwrap();
        assert_eq!(record.get("token").map(String::as_str), Some("T1"));
        assert_eq!(record.get("email").map(String::as_str), Some("a@b.com"));
        assert!(!record.contains_key("name"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.set(&[("token", "T1")]).unwrap();

        db.remove(&["token", "email"]).unwrap();
        db.remove(&["token", "email"]).unwrap();

        assert!(!db.contains("token").unwrap());
    }

    #[test]
    fn test_set_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.set(&[("token", "T1")]).unwrap();
        db.set(&[("token", "T2")]).unwrap();

        assert_eq!(db.get_one("token").unwrap().as_deref(), Some("T2"));
    }
}
