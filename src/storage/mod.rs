/*!
# Storage module
Read access to the variation database. Only SQLite is supported.
*/
/// Table definitions for the tables we read
pub mod schema;
/// Loads variation sources
pub mod source_adaptor;

use log::debug;
use rusqlite::Connection;
use std::path::Path;

use crate::storage::source_adaptor::SourceAdaptor;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no row in {table} matching {key}")]
    NotFound { table: &'static str, key: String },
    #[error("invalid value in {table}.{column}: {value:?}")]
    InvalidValue { table: &'static str, column: &'static str, value: String },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error)
}

/// Handle on a variation database
pub struct VariationDb {
    conn: Connection
}

impl VariationDb {
    /// Opens an existing database file
    /// # Arguments
    /// * `filename` - path to the SQLite file
    /// # Errors
    /// * if the file cannot be opened as a database
    pub fn open(filename: &Path) -> Result<Self, StorageError> {
        debug!("Opening variation database at {filename:?}");
        let conn = Connection::open(filename)?;
        Ok(Self { conn })
    }

    /// Opens a fresh in-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Creates any missing tables
    pub fn create_schema(&self) -> Result<(), StorageError> {
        schema::create_schema(&self.conn)?;
        Ok(())
    }

    /// Returns an adaptor for the `source` table
    pub fn source_adaptor(&self) -> SourceAdaptor<'_> {
        SourceAdaptor::new(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
