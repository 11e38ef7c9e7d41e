//! Storage module for persisting fetched documents
//!
//! This module handles writing every successfully fetched page, including:
//! - The document record and its derived metadata (size, digest)
//! - A flat-file layout (`<doc_id>.html` plus a JSON sidecar)
//! - A SQLite catalog layout (`documents.db`)

mod files;
mod schema;
mod sqlite;
mod traits;

pub use files::FsDocumentStore;
pub use schema::{get_schema_version, initialize_schema, SCHEMA_VERSION};
pub use sqlite::SqliteDocumentStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::config::{OutputConfig, OutputFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// File name of the SQLite catalog inside the documents directory
pub const SQLITE_FILE_NAME: &str = "documents.db";

/// A successfully fetched page, ready to persist
#[derive(Debug, Clone)]
pub struct Document {
    pub doc_id: u64,
    /// Normalized URL that was requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub content_type: String,
    pub title: Option<String>,
    pub depth: u32,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

impl Document {
    /// Computes the metadata record stored next to the body
    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            doc_id: self.doc_id,
            url: self.url.clone(),
            final_url: self.final_url.clone(),
            status_code: self.status_code,
            content_type: self.content_type.clone(),
            title: self.title.clone(),
            depth: self.depth,
            size: self.body.len() as u64,
            sha256: body_digest(&self.body),
            fetched_at: self.fetched_at.to_rfc3339(),
        }
    }
}

/// Metadata describing a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub doc_id: u64,
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub content_type: String,
    pub title: Option<String>,
    pub depth: u32,
    /// Body length in bytes
    pub size: u64,
    /// Lowercase hex SHA-256 of the body
    pub sha256: String,
    /// RFC 3339 timestamp
    pub fetched_at: String,
}

/// Hex-encoded SHA-256 of a document body
pub fn body_digest(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

/// Opens the document store selected by the output configuration
///
/// Creates the documents directory if it does not exist. Documents left by a
/// previous run are removed, since `doc_id`s restart at 0 and would otherwise
/// mix two runs in one store.
pub fn open_store(config: &OutputConfig) -> StorageResult<Box<dyn DocumentStore>> {
    let dir = Path::new(&config.documents_dir);

    let mut store: Box<dyn DocumentStore> = match config.format {
        OutputFormat::Files => Box::new(FsDocumentStore::new(dir)?),
        OutputFormat::Sqlite => {
            std::fs::create_dir_all(dir)?;
            Box::new(SqliteDocumentStore::new(&dir.join(SQLITE_FILE_NAME))?)
        }
    };

    let removed = store.clear()?;
    if removed > 0 {
        tracing::warn!(
            "Removed {} document(s) from a previous run in {}",
            removed,
            dir.display()
        );
    }

    tracing::info!("Writing documents to {} ({})", dir.display(), store.kind());
    Ok(store)
}
