//! SQLite-backed option table

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use siteguard_core::{Error, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Key/value option store backed by SQLite.
///
/// Values are JSON documents. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::Database(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;
        debug!("Opened option store at {}", path.as_ref().display());
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            Error::Database(format!("Failed to create in-memory database: {}", e))
        })?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Database("Connection lock poisoned".into()))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS options (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| Error::Database(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    /// Read and decode an option
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let conn = self.lock()?;
        let raw = select_value(&conn, name)?;
        raw.map(|value| serde_json::from_str(&value).map_err(Error::from))
            .transpose()
    }

    /// Insert or replace an option
    pub fn set<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let conn = self.lock()?;
        upsert_value(&conn, name, &json)
    }

    /// Remove an option, returning whether it existed
    pub fn delete(&self, name: &str) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn
            .execute("DELETE FROM options WHERE name = ?1", [name])
            .map_err(|e| Error::Database(format!("Failed to delete option: {}", e)))?;
        Ok(changed > 0)
    }

    /// Read and delete an option in one transaction.
    ///
    /// Two concurrent callers never both receive the same value.
    pub fn take<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        let raw = select_value(&tx, name)?;
        if raw.is_some() {
            tx.execute("DELETE FROM options WHERE name = ?1", [name])
                .map_err(|e| Error::Database(format!("Failed to delete option: {}", e)))?;
        }
        tx.commit()
            .map_err(|e| Error::Database(format!("Failed to commit: {}", e)))?;

        raw.map(|value| serde_json::from_str(&value).map_err(Error::from))
            .transpose()
    }

    /// Read-modify-write an option under the connection lock
    pub fn update<T, F>(&self, name: &str, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T),
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut value: T = match select_value(&tx, name)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => T::default(),
        };
        f(&mut value);
        upsert_value(&tx, name, &serde_json::to_string(&value)?)?;

        tx.commit()
            .map_err(|e| Error::Database(format!("Failed to commit: {}", e)))?;
        Ok(value)
    }

    /// All options whose name starts with `prefix`, in name order
    pub fn scan_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<(String, T)>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT name, value FROM options WHERE substr(name, 1, ?1) = ?2 ORDER BY name")
            .map_err(|e| Error::Database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![prefix.len() as i64, prefix], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| Error::Database(format!("Failed to query options: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            let (name, raw) =
                row.map_err(|e| Error::Database(format!("Failed to read option: {}", e)))?;
            out.push((name, serde_json::from_str(&raw)?));
        }
        Ok(out)
    }

    /// Number of stored options
    pub fn option_count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM options", [], |row| row.get(0))
            .map_err(|e| Error::Database(format!("Failed to count options: {}", e)))?;
        Ok(count as u64)
    }
}

fn select_value(conn: &Connection, name: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM options WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .optional()
    .map_err(|e| Error::Database(format!("Failed to read option: {}", e)))
}

fn upsert_value(conn: &Connection, name: &str, json: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO options (name, value, updated_at) VALUES (?1, ?2, ?3)",
        params![name, json, chrono::Utc::now().to_rfc3339()],
    )
    .map_err(|e| Error::Database(format!("Failed to write option: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.option_count().unwrap(), 0);
    }

    #[test]
    fn test_set_get_delete() {
        let db = Database::in_memory().unwrap();
        db.set("greeting", &vec!["hello", "world"]).unwrap();

        let value: Vec<String> = db.get("greeting").unwrap().unwrap();
        assert_eq!(value, vec!["hello", "world"]);

        db.set("greeting", &vec!["bye"]).unwrap();
        assert_eq!(db.option_count().unwrap(), 1);

        assert!(db.delete("greeting").unwrap());
        assert!(!db.delete("greeting").unwrap());
        assert!(db.get::<Vec<String>>("greeting").unwrap().is_none());
    }

    #[test]
    fn test_take_is_at_most_once() {
        let db = Database::in_memory().unwrap();
        db.set("token", &42u32).unwrap();

        assert_eq!(db.take::<u32>("token").unwrap(), Some(42));
        assert_eq!(db.take::<u32>("token").unwrap(), None);
    }

    #[test]
    fn test_update_and_prefix_scan() {
        let db = Database::in_memory().unwrap();
        let list: Vec<u8> = db.update("list", |v: &mut Vec<u8>| v.push(1)).unwrap();
        assert_eq!(list, vec![1]);
        db.update("list", |v: &mut Vec<u8>| v.push(2)).unwrap();
        assert_eq!(db.get::<Vec<u8>>("list").unwrap(), Some(vec![1, 2]));

        db.set("scan_b", &2u8).unwrap();
        db.set("scan_a", &1u8).unwrap();
        db.set("fix_a", &9u8).unwrap();
        let scans: Vec<(String, u8)> = db.scan_prefix("scan_").unwrap();
        assert_eq!(scans, vec![("scan_a".into(), 1), ("scan_b".into(), 2)]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siteguard.db");

        Database::open(&path).unwrap().set("kept", &true).unwrap();
        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.get::<bool>("kept").unwrap(), Some(true));
    }
}
