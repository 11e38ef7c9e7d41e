//! Flat-file document store
//!
//! Each document becomes two files in the documents directory:
//! `<doc_id>.html` with the raw body and `<doc_id>.json` with its metadata.

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{Document, DocumentMeta};
use std::fs;
use std::path::{Path, PathBuf};

/// Document store writing plain files into one directory
pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    /// Creates the store, creating `dir` and its parents if needed
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn body_path(&self, doc_id: u64) -> PathBuf {
        self.dir.join(format!("{}.html", doc_id))
    }

    pub fn meta_path(&self, doc_id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", doc_id))
    }

    /// Paths of every `<doc_id>.html` and `<doc_id>.json` in the directory
    fn document_files(&self) -> StorageResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_doc_file = path
                .extension()
                .is_some_and(|ext| ext == "json" || ext == "html")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem.parse::<u64>().is_ok());
            if is_doc_file && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl DocumentStore for FsDocumentStore {
    fn put(&mut self, doc: &Document) -> StorageResult<()> {
        let meta = serde_json::to_string_pretty(&doc.meta())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(self.body_path(doc.doc_id), doc.body.as_bytes())?;
        fs::write(self.meta_path(doc.doc_id), meta)?;
        Ok(())
    }

    fn get_meta(&self, doc_id: u64) -> StorageResult<Option<DocumentMeta>> {
        let path = self.meta_path(doc_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let meta = serde_json::from_str(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(meta))
    }

    fn count(&self) -> StorageResult<u64> {
        let mut count = 0;
        for path in self.document_files()? {
            if path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }

    fn clear(&mut self) -> StorageResult<u64> {
        let removed = self.count()?;
        for path in self.document_files()? {
            fs::remove_file(path)?;
        }
        Ok(removed)
    }

    fn kind(&self) -> &'static str {
        "files"
    }
}
