//! Document codec for the `.jsonlo` format
//!
//! Documents are persisted as a single pretty-printed JSON object with
//! PascalCase keys:
//!
//! ```json
//! {
//!   "Name": "My Timeline",
//!   "Version": "1.0",
//!   "State": { "Zoom": 1.0, "Offset": 0.0 },
//!   "Events": [
//!     { "Id": 1, "Year": -500, "Headline": "...", "Description": "...", "Expanded": false }
//!   ]
//! }
//! ```
//!
//! The year bounds of the view state are derived data and are not persisted;
//! they are recomputed from the event list on load. The version tag carries a
//! format revision, not the crate version: files written by a newer major
//! revision are rejected on load, minor revisions are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Document, TimelineEvent, TimelineState};

/// Current format revision, written into every file.
pub const FORMAT_MAJOR: u32 = 1;
pub const FORMAT_MINOR: u32 = 0;

/// Conventional file extension for persisted documents.
pub const FILE_EXTENSION: &str = "jsonlo";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Unsupported document version {found}, this build reads up to {supported}.x")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentFile {
    name: String,
    version: String,
    state: StateFile,
    events: Vec<EventFile>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StateFile {
    zoom: f32,
    offset: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EventFile {
    id: u64,
    year: i32,
    headline: String,
    description: String,
    expanded: bool,
}

/// Serializes a document to its persisted text form.
///
/// Output is deterministic for a given document: field order is fixed and
/// floats use the shortest exact representation. Serialization of the plain
/// data structures involved cannot fail in practice; the `Result` is kept for
/// uniform propagation at the call sites.
pub fn serialize(document: &Document) -> Result<String, CodecError> {
    let file = DocumentFile {
        name: document.name.clone(),
        version: format!("{}.{}", FORMAT_MAJOR, FORMAT_MINOR),
        state: StateFile {
            zoom: document.state.zoom,
            offset: document.state.offset,
        },
        events: document
            .events()
            .iter()
            .map(|e| EventFile {
                id: e.id,
                year: e.year,
                headline: e.headline.clone(),
                description: e.description.clone(),
                expanded: e.expanded,
            })
            .collect(),
    };
    let mut text = serde_json::to_string_pretty(&file).map_err(|e| CodecError::Malformed(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Decodes a document from its persisted text form.
///
/// Missing or wrongly shaped required fields fail with
/// [`CodecError::Malformed`]. The decoded document is marked `saved` (it is
/// by definition in sync with what was just read) and carries no `path`; the
/// caller stamps the location it read from.
pub fn deserialize(text: &str) -> Result<Document, CodecError> {
    let file: DocumentFile =
        serde_json::from_str(text).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let (major, _minor) = parse_version(&file.version)?;
    if major > FORMAT_MAJOR {
        return Err(CodecError::UnsupportedVersion {
            found: major,
            supported: FORMAT_MAJOR,
        });
    }

    let state = TimelineState {
        zoom: file.state.zoom,
        offset: file.state.offset,
        ..TimelineState::default()
    };
    let events = file
        .events
        .into_iter()
        .map(|e| TimelineEvent {
            id: e.id,
            year: e.year,
            headline: e.headline,
            description: e.description,
            expanded: e.expanded,
        })
        .collect();

    Ok(Document::from_parts(file.name, state, events))
}

fn parse_version(version: &str) -> Result<(u32, u32), CodecError> {
    let (major, minor) = version
        .split_once('.')
        .ok_or_else(|| CodecError::Malformed(format!("invalid version tag '{version}'")))?;
    let major = major
        .parse()
        .map_err(|_| CodecError::Malformed(format!("invalid version tag '{version}'")))?;
    let minor = minor
        .parse()
        .map_err(|_| CodecError::Malformed(format!("invalid version tag '{version}'")))?;
    Ok((major, minor))
}
