//! SQLite-backed implementation of the core's store capability.

mod schema;

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;

use tango_core::{StoreError, Word, WordStore};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

type Result<T> = std::result::Result<T, DbError>;

/// Word store backed by a local SQLite database. Every mutating
/// operation runs in a single transaction, so records are replaced or
/// deleted atomically.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    fn get_test(&self, name: &str) -> Result<Option<Vec<Word>>> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM test_records WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT en, ja FROM test_words WHERE test_name = ?1 ORDER BY position",
        )?;
        let words = stmt
            .query_map(params![name], |row| {
                Ok(Word {
                    en: row.get(0)?,
                    ja: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Some(words))
    }

    fn put_test(&mut self, name: &str, words: &[Word]) -> Result<()> {
        let tx = self.conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO test_records (name, updated_at) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET updated_at = ?2",
            params![name, now],
        )?;
        tx.execute("DELETE FROM test_words WHERE test_name = ?1", params![name])?;
        for (position, word) in words.iter().enumerate() {
            tx.execute(
                "INSERT INTO test_words (test_name, position, en, ja) VALUES (?1, ?2, ?3, ?4)",
                params![name, position as i64, word.en, word.ja],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_test(&mut self, name: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM test_words WHERE test_name = ?1", params![name])?;
        tx.execute("DELETE FROM test_records WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(())
    }

    fn test_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM test_records ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn get_vocabulary(&self) -> Result<Option<Vec<Word>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT en, ja FROM vocabulary_words ORDER BY position")?;
        let words = stmt
            .query_map([], |row| {
                Ok(Word {
                    en: row.get(0)?,
                    ja: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if words.is_empty() {
            Ok(None)
        } else {
            Ok(Some(words))
        }
    }

    fn put_vocabulary(&mut self, words: &[Word]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM vocabulary_words", [])?;
        for (position, word) in words.iter().enumerate() {
            tx.execute(
                "INSERT INTO vocabulary_words (position, en, ja) VALUES (?1, ?2, ?3)",
                params![position as i64, word.en, word.ja],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        StoreError::backend(e.to_string())
    }
}

impl WordStore for SqliteStore {
    fn load_test(&self, name: &str) -> std::result::Result<Option<Vec<Word>>, StoreError> {
        Ok(self.get_test(name)?)
    }

    fn replace_test(&mut self, name: &str, words: &[Word]) -> std::result::Result<(), StoreError> {
        Ok(self.put_test(name, words)?)
    }

    fn delete_test(&mut self, name: &str) -> std::result::Result<(), StoreError> {
        Ok(self.remove_test(name)?)
    }

    fn list_tests(&self) -> std::result::Result<Vec<String>, StoreError> {
        Ok(self.test_names()?)
    }

    fn load_vocabulary(&self) -> std::result::Result<Option<Vec<Word>>, StoreError> {
        Ok(self.get_vocabulary()?)
    }

    fn save_vocabulary(&mut self, words: &[Word]) -> std::result::Result<(), StoreError> {
        Ok(self.put_vocabulary(words)?)
    }
}
