//! SQLite document catalog
//!
//! This module provides a SQLite-based implementation of the DocumentStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageResult};
use crate::storage::{Document, DocumentMeta};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens or creates the catalog at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Reads a stored body
    pub fn get_body(&self, doc_id: u64) -> StorageResult<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE doc_id = ?1",
                params![doc_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn put(&mut self, doc: &Document) -> StorageResult<()> {
        let meta = doc.meta();
        self.conn.execute(
            "INSERT OR REPLACE INTO documents
                (doc_id, url, final_url, status_code, content_type, title, depth,
                 size, sha256, fetched_at, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                meta.doc_id as i64,
                meta.url,
                meta.final_url,
                meta.status_code,
                meta.content_type,
                meta.title,
                meta.depth,
                meta.size as i64,
                meta.sha256,
                meta.fetched_at,
                doc.body,
            ],
        )?;
        Ok(())
    }

    fn get_meta(&self, doc_id: u64) -> StorageResult<Option<DocumentMeta>> {
        let meta = self
            .conn
            .query_row(
                "SELECT doc_id, url, final_url, status_code, content_type, title, depth,
                        size, sha256, fetched_at
                 FROM documents WHERE doc_id = ?1",
                params![doc_id as i64],
                |row| {
                    Ok(DocumentMeta {
                        doc_id: row.get::<_, i64>(0)? as u64,
                        url: row.get(1)?,
                        final_url: row.get(2)?,
                        status_code: row.get(3)?,
                        content_type: row.get(4)?,
                        title: row.get(5)?,
                        depth: row.get(6)?,
                        size: row.get::<_, i64>(7)? as u64,
                        sha256: row.get(8)?,
                        fetched_at: row.get(9)?,
                    })
                },
            )
            .optional()?;
        Ok(meta)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear(&mut self) -> StorageResult<u64> {
        let removed = self.conn.execute("DELETE FROM documents", [])?;
        Ok(removed as u64)
    }

    fn kind(&self) -> &'static str {
        "sqlite"
    }
}
