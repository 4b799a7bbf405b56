//! Durable storage for account records
//!
//! The user table is append-only at record granularity: rows are added by
//! registration and read by login, never updated or deleted.

pub mod csv_store;

pub use csv_store::CsvRecordStore;

use crate::models::UserRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing the user table
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid row in user table: {0}")]
    InvalidRow(String),
}

/// Which column a lookup keys on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyColumn {
    UserId,
    UserName,
}

/// Trait for account record storage backends
///
/// This trait defines the interface for storing and retrieving account
/// records. Implementations can use different storage backends as long as
/// they preserve the append-only contract.
pub trait RecordStore: Send + Sync {
    /// Find a record by login identifier. First match wins.
    fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Find a record by account name. First match wins.
    fn find_by_name(&self, user_name: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Add a record to the table.
    ///
    /// Append never overwrites: a row is always added, even when a record
    /// with the same `user_id` already exists. Duplicate detection is the
    /// registrar's responsibility, not the store's.
    fn append(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Find a record by the given key column.
    fn find_by_key(
        &self,
        column: KeyColumn,
        value: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        match column {
            KeyColumn::UserId => self.find_by_id(value),
            KeyColumn::UserName => self.find_by_name(value),
        }
    }
}
