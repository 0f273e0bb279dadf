//! Chronica - A local-first timeline document engine
//!
//! Chronica manages "timeline documents": ordered collections of dated
//! events with editor view state, persisted as plain-text `.jsonlo` files.
//! The [`manager::DocumentManager`] owns every open document and drives the
//! close-confirmation protocol, persistence and the background sort.

pub mod cli;
pub mod domain;
pub mod manager;
pub mod sort;
pub mod storage;

pub use domain::{Document, TimelineEvent, TimelineState};
pub use manager::{CloseOutcome, DocumentManager};
