//! File access for persisted documents
//!
//! One document per file. Writes go to a temp file under an exclusive lock
//! and are renamed into place, so a crash mid-write never leaves a truncated
//! document behind and a document on disk is either the old or the new text.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::codec;
use crate::domain::Document;

/// Reads and writes one document file.
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    /// Creates a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the document.
    ///
    /// The caller stamps `path` onto the result; a store only knows about
    /// bytes and format.
    pub fn read(&self) -> Result<Document> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read document: {}", self.path.display()))?;
        let document = codec::deserialize(&text)
            .with_context(|| format!("Failed to decode document: {}", self.path.display()))?;
        Ok(document)
    }

    /// Serializes and writes the document atomically.
    pub fn write(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let text = codec::serialize(document).context("Failed to serialize document")?;

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonlo.tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on document")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(text.as_bytes())
                .context("Failed to write document")?;
            writer.flush().context("Failed to flush document")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_document() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("doc.jsonlo"));

        let mut doc = Document::new("Test");
        doc.add_event(1969, "Moon landing", "");
        store.write(&doc).unwrap();

        let loaded = store.read().unwrap();
        assert_eq!(loaded.name, "Test");
        assert_eq!(loaded.events().len(), 1);
        assert!(loaded.saved);
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("missing.jsonlo"));
        assert!(store.read().is_err());
    }

    #[test]
    fn read_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonlo");
        fs::write(&path, "{ not a document").unwrap();

        assert!(DocumentStore::new(path).read().is_err());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("nested").join("dir").join("doc.jsonlo"));

        store.write(&Document::new("Test")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("doc.jsonlo"));

        store.write(&Document::new("Test")).unwrap();
        assert!(!store.path().with_extension("jsonlo.tmp").exists());
    }
}
