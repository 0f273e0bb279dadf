//! Document lifecycle management
//!
//! [`DocumentManager`] is the single owner of every open document. All
//! document-affecting actions from the presentation layer go through it:
//! create, select, close (with the confirm-before-discard protocol), save,
//! load, and the background sort. Nothing outside the manager holds a
//! long-lived mutable alias into the collection across an operation that can
//! resize it.
//!
//! Index arguments are UI-local sequence numbers, valid only within the frame
//! they were read. Selection-style setters therefore ignore invalid indices
//! silently, while direct element access treats them as programming errors
//! and panics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Document;
use crate::sort::SortTask;
use crate::storage::DocumentStore;

/// Result of a close request.
///
/// Callers must handle all three cases; collapsing this to a bool loses the
/// distinction between "nothing happened" and "present a dialog".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Index was out of range; nothing happened
    Invalid,
    /// Document was already saved and has been removed
    Closed,
    /// Document has unsaved changes; it is still open and recorded as
    /// pending. The caller should prompt, then either call
    /// [`DocumentManager::confirm_close`] or drop the request.
    ConfirmationRequired(usize),
}

/// Owner of the open-document collection and arbiter of selection, the
/// close protocol, persistence and the background sort.
#[derive(Default)]
pub struct DocumentManager {
    documents: Vec<Document>,
    current: Option<usize>,
    pending_close: Option<usize>,
    /// Feeds "New Document {n}" names. Starts at 1, never reused, reset
    /// only by constructing a new manager.
    doc_counter: u64,
    sorter: SortTask,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh document, appends it and selects it.
    ///
    /// The new document is unsaved from birth: an empty never-written
    /// document still needs the close confirmation.
    pub fn create_document(&mut self) -> &mut Document {
        self.doc_counter += 1;
        self.documents
            .push(Document::new(format!("New Document {}", self.doc_counter)));
        let index = self.documents.len() - 1;
        self.current = Some(index);
        &mut self.documents[index]
    }

    /// Returns the currently selected document, if any.
    pub fn current_document(&self) -> Option<&Document> {
        self.current.map(|i| &self.documents[i])
    }

    /// Mutable access to the currently selected document.
    pub fn current_document_mut(&mut self) -> Option<&mut Document> {
        self.current.map(|i| &mut self.documents[i])
    }

    /// Index of the current document; `None` exactly when no documents are
    /// open.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Direct element access. Panics on an out-of-range index: indices must
    /// come from this manager within the same frame.
    pub fn document(&self, index: usize) -> &Document {
        &self.documents[index]
    }

    /// See [`DocumentManager::document`].
    pub fn document_mut(&mut self, index: usize) -> &mut Document {
        &mut self.documents[index]
    }

    /// Selects a document. Silently ignored when out of range.
    pub fn set_current(&mut self, index: usize) {
        if index < self.documents.len() {
            self.current = Some(index);
        }
    }

    /// Index recorded by the last `ConfirmationRequired` outcome.
    pub fn pending_close(&self) -> Option<usize> {
        self.pending_close
    }

    /// Overrides the pending-close index. Silently ignored when out of
    /// range.
    pub fn set_pending_close(&mut self, index: usize) {
        if index < self.documents.len() {
            self.pending_close = Some(index);
        }
    }

    /// First half of the close protocol.
    ///
    /// A saved document closes immediately. An unsaved one is recorded as
    /// pending and left untouched so the caller can prompt the user; a
    /// cancelled prompt needs no manager call at all, the stale pending
    /// index is simply overwritten by the next request.
    pub fn request_close(&mut self, index: usize) -> CloseOutcome {
        if index >= self.documents.len() {
            return CloseOutcome::Invalid;
        }
        self.pending_close = Some(index);
        if self.documents[index].saved {
            self.confirm_close();
            CloseOutcome::Closed
        } else {
            CloseOutcome::ConfirmationRequired(index)
        }
    }

    /// Second half of the close protocol: discards the pending document.
    ///
    /// Calling this without a prior `ConfirmationRequired` outcome is a
    /// caller error; with no valid pending index it does nothing.
    pub fn confirm_close(&mut self) {
        let Some(index) = self.pending_close.take() else {
            return;
        };
        if index >= self.documents.len() {
            return;
        }
        self.documents.remove(index);

        self.current = if self.documents.is_empty() {
            None
        } else {
            // Keep the selection valid; removal below the current index
            // shifts elements left, past-the-end clamps to the last slot.
            Some(self.current.map_or(0, |c| c.min(self.documents.len() - 1)))
        };
    }

    /// Replaces the document at `index` wholesale. Silently ignored when out
    /// of range (the slot may have been closed while a sort was running).
    pub fn replace_document(&mut self, document: Document, index: usize) {
        if index < self.documents.len() {
            self.documents[index] = document;
        }
    }

    /// Saves the current document to its recorded path.
    ///
    /// Returns `Ok(false)` without touching the filesystem when there is no
    /// current document, it has no unsaved changes, or it has never been
    /// given a path (that requires [`DocumentManager::save_current_as`]).
    /// The dirty flag clears only after the write fully succeeds.
    pub fn save_current(&mut self) -> Result<bool> {
        let Some(index) = self.current else {
            return Ok(false);
        };
        let document = &self.documents[index];
        let Some(path) = document.path.clone() else {
            return Ok(false);
        };
        if document.saved {
            return Ok(false);
        }

        DocumentStore::new(&path).write(document)?;
        self.documents[index].saved = true;
        Ok(true)
    }

    /// Stamps a path onto the current document and saves unconditionally.
    pub fn save_current_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let Some(index) = self.current else {
            anyhow::bail!("No document is open");
        };
        let path = path.into();
        DocumentStore::new(&path).write(&self.documents[index])?;
        self.documents[index].path = Some(path);
        self.documents[index].saved = true;
        Ok(())
    }

    /// Loads a document from disk and appends it without changing the
    /// selection. Returns the new document's index.
    ///
    /// Failure leaves the collection untouched: the document is decoded
    /// completely before anything is appended.
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut document = DocumentStore::new(path)
            .read()
            .with_context(|| format!("Failed to load document: {}", path.display()))?;
        document.path = Some(path.to_path_buf());
        self.documents.push(document);
        if self.current.is_none() {
            self.current = Some(0);
        }
        Ok(self.documents.len() - 1)
    }

    /// Starts a background sort of the document at `index`.
    ///
    /// Returns false when the index is out of range or a sort is already in
    /// flight (at most one sort runs at a time, across all documents). Edits
    /// to the document between start and [`DocumentManager::pump_sort`]'s
    /// commit are overwritten by the sorted snapshot; callers should
    /// suppress them while [`DocumentManager::is_sorting`] is true.
    pub fn start_sort(&mut self, index: usize) -> bool {
        if index >= self.documents.len() {
            return false;
        }
        self.sorter.start(self.documents[index].clone(), index)
    }

    /// True while a sort is in flight. Poll once per frame.
    pub fn is_sorting(&self) -> bool {
        self.sorter.is_sorting()
    }

    /// Commits a finished sort, if any. Call once per frame.
    ///
    /// Returns true when a sorted document was committed this call. If the
    /// slot was closed mid-sort the commit is dropped silently.
    pub fn pump_sort(&mut self) -> bool {
        match self.sorter.try_finish() {
            Some(outcome) => {
                self.replace_document(outcome.document, outcome.index);
                true
            }
            None => false,
        }
    }

    /// Blocks until an in-flight sort is committed. Shutdown/batch helper;
    /// interactive callers use [`DocumentManager::pump_sort`].
    pub fn finish_sort(&mut self) {
        if let Some(outcome) = self.sorter.finish() {
            self.replace_document(outcome.document, outcome.index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assert_selection_invariant(manager: &DocumentManager) {
        match manager.current_index() {
            None => assert_eq!(manager.document_count(), 0),
            Some(i) => assert!(i < manager.document_count()),
        }
    }

    #[test]
    fn create_assigns_sequential_names_and_selects() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.create_document();

        assert_eq!(manager.document(0).name, "New Document 1");
        assert_eq!(manager.document(1).name, "New Document 2");
        assert_eq!(manager.current_index(), Some(1));
        assert!(!manager.current_document().unwrap().saved);
    }

    #[test]
    fn name_counter_is_not_reused_after_close() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.document_mut(0).saved = true;
        assert_eq!(manager.request_close(0), CloseOutcome::Closed);

        manager.create_document();
        assert_eq!(manager.document(0).name, "New Document 2");
    }

    #[test]
    fn close_of_saved_document_needs_no_confirmation() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.document_mut(0).saved = true;

        assert_eq!(manager.request_close(0), CloseOutcome::Closed);
        assert_eq!(manager.document_count(), 0);
        assert_eq!(manager.current_index(), None);
    }

    #[test]
    fn close_of_unsaved_document_requires_confirmation() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.create_document();
        manager.set_current(0);

        // Scenario: request, then confirm
        assert_eq!(manager.request_close(0), CloseOutcome::ConfirmationRequired(0));
        assert_eq!(manager.document_count(), 2);
        assert_eq!(manager.pending_close(), Some(0));

        manager.confirm_close();
        assert_eq!(manager.document_count(), 1);
        assert_eq!(manager.current_index(), Some(0));
        assert_eq!(manager.document(0).name, "New Document 2");
    }

    #[test]
    fn close_with_invalid_index_reports_invalid() {
        let mut manager = DocumentManager::new();
        manager.create_document();

        assert_eq!(manager.request_close(5), CloseOutcome::Invalid);
        assert_eq!(manager.document_count(), 1);
    }

    #[test]
    fn cancelled_close_leaves_manager_usable() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.create_document();

        assert_eq!(manager.request_close(1), CloseOutcome::ConfirmationRequired(1));
        // User cancels: no manager call. The stale pending index is
        // overwritten by the next request.
        assert_eq!(manager.request_close(0), CloseOutcome::ConfirmationRequired(0));
        manager.confirm_close();

        assert_eq!(manager.document_count(), 1);
        assert_eq!(manager.document(0).name, "New Document 2");
    }

    #[test]
    fn confirm_close_without_pending_is_noop() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.confirm_close();
        assert_eq!(manager.document_count(), 1);
    }

    #[test]
    fn selection_invariant_holds_across_sequences() {
        let mut manager = DocumentManager::new();
        assert_selection_invariant(&manager);

        for _ in 0..3 {
            manager.create_document();
            assert_selection_invariant(&manager);
        }
        manager.set_current(2);
        while manager.document_count() > 0 {
            let last = manager.document_count() - 1;
            manager.request_close(last);
            manager.confirm_close();
            assert_selection_invariant(&manager);
        }
        assert_eq!(manager.current_index(), None);
    }

    #[test]
    fn set_current_ignores_invalid_index() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.set_current(9);
        assert_eq!(manager.current_index(), Some(0));
    }

    #[test]
    fn replace_document_ignores_invalid_index() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.replace_document(Document::new("ghost"), 4);
        assert_eq!(manager.document(0).name, "New Document 1");
    }

    #[test]
    fn save_without_path_is_noop() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.current_document_mut().unwrap().add_event(1990, "a", "");

        let written = manager.save_current().unwrap();
        assert!(!written);
        assert!(!manager.current_document().unwrap().saved);
    }

    #[test]
    fn save_without_current_document_is_noop() {
        let mut manager = DocumentManager::new();
        assert!(!manager.save_current().unwrap());
    }

    #[test]
    fn save_as_then_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.jsonlo");

        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.current_document_mut().unwrap().add_event(-500, "a", "b");
        manager.save_current_as(&path).unwrap();
        assert!(manager.current_document().unwrap().saved);

        // Already saved: a plain save is a no-op
        assert!(!manager.save_current().unwrap());

        // Dirty it and save again through the recorded path
        manager.current_document_mut().unwrap().add_event(1990, "c", "");
        assert!(manager.save_current().unwrap());

        let mut other = DocumentManager::new();
        let index = other.load_document(&path).unwrap();
        assert_eq!(other.document(index).events().len(), 2);
        assert_eq!(other.document(index).path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn load_missing_file_leaves_collection_unchanged() {
        let mut manager = DocumentManager::new();
        manager.create_document();

        let result = manager.load_document("missing.jsonlo");
        assert!(result.is_err());
        assert_eq!(manager.document_count(), 1);
    }

    #[test]
    fn load_malformed_file_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonlo");
        std::fs::write(&path, "{ \"Name\": \"x\" }").unwrap();

        let mut manager = DocumentManager::new();
        assert!(manager.load_document(&path).is_err());
        assert_eq!(manager.document_count(), 0);
        assert_eq!(manager.current_index(), None);
    }

    #[test]
    fn load_does_not_steal_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.jsonlo");

        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.save_current_as(&path).unwrap();

        let index = manager.load_document(&path).unwrap();
        assert_eq!(index, 1);
        assert_eq!(manager.current_index(), Some(0));
        assert!(manager.document(index).saved);
    }

    #[test]
    fn load_into_empty_manager_selects_the_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.jsonlo");
        {
            let mut manager = DocumentManager::new();
            manager.create_document();
            manager.save_current_as(&path).unwrap();
        }

        let mut manager = DocumentManager::new();
        manager.load_document(&path).unwrap();
        assert_eq!(manager.current_index(), Some(0));
    }

    #[test]
    fn sort_commits_through_replace() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        {
            let doc = manager.current_document_mut().unwrap();
            doc.add_event(1990, "tie a", "");
            doc.add_event(-500, "bc", "");
            doc.add_event(1990, "tie b", "");
        }

        assert!(manager.start_sort(0));
        assert!(manager.is_sorting());
        // A second start while in flight is refused
        assert!(!manager.start_sort(0));

        manager.finish_sort();
        assert!(!manager.is_sorting());

        let ids: Vec<u64> = manager.document(0).events().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert!(!manager.document(0).saved);
    }

    #[test]
    fn sort_with_invalid_index_is_refused() {
        let mut manager = DocumentManager::new();
        assert!(!manager.start_sort(0));
        assert!(!manager.is_sorting());
    }

    #[test]
    fn pump_sort_commits_once() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.current_document_mut().unwrap().add_event(2, "", "");
        manager.current_document_mut().unwrap().add_event(1, "", "");

        manager.start_sort(0);
        // Frame loop: poll until the worker delivers
        while !manager.pump_sort() {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(!manager.is_sorting());
        assert!(!manager.pump_sort());

        let years: Vec<i32> = manager.document(0).events().iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1, 2]);
    }

    #[test]
    fn document_closed_mid_sort_drops_the_commit() {
        let mut manager = DocumentManager::new();
        manager.create_document();
        manager.current_document_mut().unwrap().add_event(2, "", "");
        manager.current_document_mut().unwrap().add_event(1, "", "");

        manager.start_sort(0);
        manager.request_close(0);
        manager.confirm_close();
        assert_eq!(manager.document_count(), 0);

        // Commit lands on an empty collection: silently dropped
        manager.finish_sort();
        assert_eq!(manager.document_count(), 0);
        assert_eq!(manager.current_index(), None);
    }
}
