use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};

use crate::{errors::StorageError, kv_store::KeyValueStore};

/// Durable local store: one sqlite table of string keys and values.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        check_or_create_db_tables(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        check_or_create_db_tables(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

fn check_or_create_db_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.prepare(
        "create table if not exists local_storage (
            key text not null unique primary key,
            value text not null
        )",
    )?
    .execute([])?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn.prepare_cached("SELECT value FROM local_storage WHERE key = ?1")?;

        Ok(stmt.query_row(params![key], |row| row.get(0)).optional()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn.prepare_cached(
            "replace into local_storage (key, value)
                values (?1, ?2)",
        )?;
        stmt.execute(params![key, value])?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn.prepare_cached("DELETE FROM local_storage WHERE key = ?1")?;
        stmt.execute(params![key])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_replaced_and_deleted() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("partyfud_cart_items").unwrap(), None);

        store.set("partyfud_cart_items", "[1]").unwrap();
        store.set("partyfud_cart_items", "[1,2]").unwrap();
        assert_eq!(
            store.get("partyfud_cart_items").unwrap().as_deref(),
            Some("[1,2]")
        );

        store.delete("partyfud_cart_items").unwrap();
        assert_eq!(store.get("partyfud_cart_items").unwrap(), None);
    }

    #[test]
    fn keys_are_independent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
