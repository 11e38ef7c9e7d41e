//! Storage traits and error types
//!
//! This module defines the trait interface for document stores and
//! associated error types.

use crate::storage::{Document, DocumentMeta};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store implementations
///
/// A store receives every successfully fetched page exactly once, keyed by
/// its `doc_id`. Writing a `doc_id` that already exists replaces it.
pub trait DocumentStore: Send {
    /// Removes every stored document, returning how many were removed
    ///
    /// Only documents are touched; unrelated files or tables are left alone.
    fn clear(&mut self) -> StorageResult<u64>;

    /// Persists a document body and its metadata
    fn put(&mut self, doc: &Document) -> StorageResult<()>;

    /// Reads back the metadata stored for a document
    fn get_meta(&self, doc_id: u64) -> StorageResult<Option<DocumentMeta>>;

    /// Number of documents currently stored
    fn count(&self) -> StorageResult<u64>;

    /// Short name of the layout, for logs
    fn kind(&self) -> &'static str;
}
