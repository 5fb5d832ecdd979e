//! Database connection management
//!
//! This module provides the core database connection wrapper used by the gateway.

use anyhow::{anyhow, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around SQLite connections,
/// handling both file-based and in-memory databases with consistent
/// configuration and error handling.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    /// A missing file at `path` is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| anyhow!("Failed to open database at '{}': {}", p, e))?,
            None => Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    /// Open a database file that must already exist
    ///
    /// The exercise database ships with the quiz, so a missing file is an
    /// error rather than an empty new database. The file is checked once so
    /// that a corrupt or non-SQLite file fails here instead of on the first
    /// learner query. With `read_only` set, statements that write fail with
    /// an engine error instead of changing the file.
    pub fn open_existing(path: &str, read_only: bool) -> Result<Self> {
        if !Path::new(path).is_file() {
            return Err(anyhow!("Database file '{}' does not exist", path));
        }

        let mode = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        let flags = mode | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| anyhow!("Failed to open database at '{}': {}", path, e))?;

        let _: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to read database at '{}': {}", path, e))?;

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    /// Configure the connection
    fn configure(&self) -> Result<()> {
        // Store temp tables in memory
        self.conn
            .execute("PRAGMA temp_store=MEMORY", [])
            .map_err(|e| anyhow!("Failed to set temp store: {}", e))?;

        // Enable foreign keys
        self.conn
            .execute("PRAGMA foreign_keys=ON", [])
            .map_err(|e| anyhow!("Failed to enable foreign keys: {}", e))?;

        Ok(())
    }

    /// Execute one or more SQL statements without parameters
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| anyhow!("Failed to execute SQL: {}", e))
    }
}
