//! Background sort of a document's events
//!
//! Sorting can be slow enough on large documents to stutter the frame loop,
//! so it runs on a dedicated worker thread. The worker never touches live
//! manager state: it receives a private snapshot of the document, sorts the
//! snapshot, and sends the result back over a channel. The owner polls
//! [`SortTask::try_finish`] once per frame and commits the finished snapshot
//! by wholesale replacement.
//!
//! The snapshot boundary is what makes this safe: the only data the worker
//! and the frame loop ever share is the channel. The trade-off is that edits
//! made to the live document between start and commit are overwritten by the
//! committed snapshot, so callers should suppress structural edits while
//! [`SortTask::is_sorting`] is true. Losing an edit that raced the sort is a
//! UX wrinkle; it is never memory corruption.
//!
//! At most one sort runs at a time, across all documents. Starting a second
//! one is a silent no-op.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::domain::Document;

/// A finished sort, ready to be committed.
#[derive(Debug)]
pub struct SortOutcome {
    /// The sorted snapshot, marked unsaved (its event order was mutated)
    pub document: Document,
    /// Manager slot the snapshot was taken from
    pub index: usize,
}

/// One-shot background sort of a document snapshot.
///
/// No cancellation: a started sort always runs to completion. Dropping the
/// task joins the worker.
#[derive(Default)]
pub struct SortTask {
    rx: Option<mpsc::Receiver<SortOutcome>>,
    handle: Option<JoinHandle<()>>,
}

impl SortTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts sorting a snapshot of `document` by ascending year.
    ///
    /// The sort is stable: events with equal years keep their relative
    /// order, which is user-meaningful. Returns false (and does nothing)
    /// if a sort is already in flight.
    pub fn start(&mut self, document: Document, index: usize) -> bool {
        if self.rx.is_some() {
            return false;
        }

        let (tx, rx) = mpsc::channel();
        self.handle = Some(thread::spawn(move || {
            let mut document = document;
            let mut events = document.events().to_vec();
            events.sort_by_key(|e| e.year);
            document.replace_events(events);
            // Receiver may be gone if the owner was dropped mid-sort.
            let _ = tx.send(SortOutcome { document, index });
        }));
        self.rx = Some(rx);
        true
    }

    /// True from a successful [`SortTask::start`] until the outcome has been
    /// collected by [`SortTask::try_finish`].
    pub fn is_sorting(&self) -> bool {
        self.rx.is_some()
    }

    /// Non-blocking poll for a finished sort.
    ///
    /// Returns the outcome exactly once, joining the worker thread as a side
    /// effect. Returns `None` while the sort is still running or when no
    /// sort was started.
    pub fn try_finish(&mut self) -> Option<SortOutcome> {
        let outcome = self.rx.as_ref()?.try_recv().ok()?;
        self.rx = None;
        self.join_worker();
        Some(outcome)
    }

    /// Blocks until the in-flight sort finishes, if there is one.
    ///
    /// The frame loop never calls this; it exists for shutdown paths and
    /// tests that need a deterministic completion point.
    pub fn finish(&mut self) -> Option<SortOutcome> {
        let rx = self.rx.take()?;
        let outcome = rx.recv().ok();
        self.join_worker();
        outcome
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SortTask {
    fn drop(&mut self) {
        self.rx = None;
        self.join_worker();
    }
}
