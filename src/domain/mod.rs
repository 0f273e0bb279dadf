//! Domain models for Chronica
//!
//! Contains the core data model without any I/O concerns.

mod document;
mod event;

pub use document::{Document, TimelineState, SENTINEL_YEAR, ZOOM_MAX, ZOOM_MIN};
pub use event::TimelineEvent;
