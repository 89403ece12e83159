//! SQLite-based user storage.
//!
//! `SqliteUserStore` owns a single connection and is not `Sync`; share it
//! through `UserClient`, which serializes access.

use rusqlite::{params, Connection};
use std::path::Path;
use userdesk_core::DatabaseError;

use crate::error::{UserStoreError, UserStoreResult};
use crate::types::{NewUser, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, active, country";

/// SQLite-based user storage.
pub struct SqliteUserStore {
    conn: Connection,
}

impl SqliteUserStore {
    /// Open (or create) a user store at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn new<P: AsRef<Path>>(path: P) -> UserStoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    UserStoreError::Storage(userdesk_core::DatabaseError::ConnectionFailed(
                        e.to_string(),
                    ))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory user store.
    pub fn in_memory() -> UserStoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> UserStoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                active INTEGER NOT NULL DEFAULT 0,
                country TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_country ON users(country);
            CREATE INDEX IF NOT EXISTS idx_users_active ON users(active);
            "#,
        )?;
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            active: row.get::<_, i32>(4)? != 0,
            country: row.get(5)?,
        })
    }

    /// Insert a user after validating the request.
    ///
    /// # Errors
    /// `Validation` for bad input, `Conflict` if the email is taken.
    pub fn create(&self, request: &NewUser) -> UserStoreResult<User> {
        let user = request.normalized()?;

        self.conn.execute(
            "INSERT INTO users (first_name, last_name, email, active, country)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.first_name,
                user.last_name,
                user.email,
                user.active as i32,
                user.country,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Created user with ID: {}", id);

        self.get(id)?.ok_or_else(|| missing_after_insert(id))
    }

    /// Get a user by ID.
    pub fn get(&self, id: i64) -> UserStoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;

        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_user(row)?)),
            None => Ok(None),
        }
    }

    /// List users, optionally restricted to one `active` value.
    pub fn list(&self, active: Option<bool>) -> UserStoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE (?1 IS NULL OR active = ?1) ORDER BY id",
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![active.map(i32::from)], Self::row_to_user)?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// List users in a country. The code is matched case-insensitively.
    pub fn list_by_country(&self, country: &str, active: Option<bool>) -> UserStoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE country = ?1 AND (?2 IS NULL OR active = ?2) ORDER BY id",
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![country.trim().to_ascii_uppercase(), active.map(i32::from)],
            Self::row_to_user,
        )?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// First/last name pairs in insertion order, for duplicate aggregation.
    pub fn name_pairs(&self, active: Option<bool>) -> UserStoreResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT first_name, last_name FROM users
             WHERE (?1 IS NULL OR active = ?1)
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![active.map(i32::from)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete every user, returning how many rows were removed.
    pub fn delete_all(&self) -> UserStoreResult<usize> {
        let deleted = self.conn.execute("DELETE FROM users", [])?;
        tracing::debug!("Deleted {} users", deleted);
        Ok(deleted)
    }
}

/// A row we just inserted is gone; that is a storage fault, not bad input.
fn missing_after_insert(id: i64) -> UserStoreError {
    UserStoreError::Storage(DatabaseError::QueryFailed(format!(
        "user {} missing after insert",
        id
    )))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn create_test_store() -> SqliteUserStore {
        SqliteUserStore::in_memory().expect("Failed to create in-memory store")
    }

    fn new_user(first: &str, last: &str, email: &str, active: bool, country: &str) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            active,
            country: country.to_string(),
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let store = create_test_store();

        let user = store
            .create(&new_user("Allen", "Crassel", "allen.crassel0@example.com", true, "us"))
            .unwrap();
        assert!(user.id > 0);
        assert_eq!(user.country, "US");
        assert!(user.active);

        let retrieved = store.get(user.id).unwrap().unwrap();
        assert_eq!(retrieved, user);
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let store = create_test_store();
        store.create(&new_user("Bob", "Dog", "bob@example.com", true, "US")).unwrap();

        let result = store.create(&new_user("Bobby", "Dog", "bob@example.com", false, "CA"));
        assert!(matches!(result, Err(UserStoreError::Conflict(_))));
        assert_eq!(store.list(None).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_user_not_inserted() {
        let store = create_test_store();
        let result = store.create(&new_user("", "Dog", "x@example.com", true, "US"));
        assert!(matches!(result, Err(UserStoreError::Validation(_))));
        assert_eq!(store.list(None).unwrap().len(), 0);
    }

    #[test]
    fn test_list_with_active_filter() {
        let store = create_test_store();
        store.create(&new_user("A", "One", "a@example.com", true, "US")).unwrap();
        store.create(&new_user("B", "Two", "b@example.com", false, "US")).unwrap();
        store.create(&new_user("C", "Three", "c@example.com", true, "FR")).unwrap();

        assert_eq!(store.list(None).unwrap().len(), 3);

        let active = store.list(Some(true)).unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|u| u.active));

        let inactive = store.list(Some(false)).unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].first_name, "B");
    }

    #[test]
    fn test_list_by_country_is_case_insensitive() {
        let store = create_test_store();
        store.create(&new_user("A", "One", "a@example.com", true, "US")).unwrap();
        store.create(&new_user("B", "Two", "b@example.com", false, "us")).unwrap();
        store.create(&new_user("C", "Three", "c@example.com", true, "DE")).unwrap();

        let us = store.list_by_country("us", None).unwrap();
        assert_eq!(us.len(), 2);

        let active_us = store.list_by_country("US", Some(true)).unwrap();
        assert_eq!(active_us.len(), 1);
        assert_eq!(active_us[0].first_name, "A");

        assert!(store.list_by_country("MX", None).unwrap().is_empty());
    }

    #[test]
    fn test_name_pairs_in_insertion_order() {
        let store = create_test_store();
        store.create(&new_user("Yeti", "Dog", "y@example.com", true, "UK")).unwrap();
        store.create(&new_user("Brooks", "Mercer", "b@example.com", false, "UK")).unwrap();

        let pairs = store.name_pairs(None).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("Yeti".to_string(), "Dog".to_string()),
                ("Brooks".to_string(), "Mercer".to_string()),
            ]
        );

        assert_eq!(store.name_pairs(Some(false)).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_all() {
        let store = create_test_store();
        store.create(&new_user("A", "One", "a@example.com", true, "US")).unwrap();
        store.create(&new_user("B", "Two", "b@example.com", true, "US")).unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert_eq!(store.list(None).unwrap().len(), 0);
        assert_eq!(store.delete_all().unwrap(), 0);
    }

    #[test]
    fn test_missing_row_after_insert_is_server_fault() {
        let err = missing_after_insert(7);
        assert!(matches!(err, UserStoreError::Storage(DatabaseError::QueryFailed(_))));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        assert!(store.get(99999).unwrap().is_none());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("users.db");

        {
            let store = SqliteUserStore::new(&path).unwrap();
            store.create(&new_user("PJ", "Mercer", "pj@example.com", true, "MX")).unwrap();
        }

        let reopened = SqliteUserStore::new(&path).unwrap();
        assert_eq!(reopened.list(None).unwrap().len(), 1);
    }
}
