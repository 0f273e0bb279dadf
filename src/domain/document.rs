//! Timeline document model
//!
//! A document is an ordered collection of events plus the view state of the
//! editor (zoom, pan, year bounds) and persistence metadata (dirty flag,
//! on-disk path). All mutation goes through methods that keep the dirty flag
//! and the derived year bounds in sync with the event set.

use std::path::PathBuf;

use super::event::TimelineEvent;

/// Zoom range enforced by [`TimelineState::set_zoom`].
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;

/// Year used for both bounds when a document has no events.
pub const SENTINEL_YEAR: i32 = 2000;

/// View state of the timeline widget, persisted with the document.
///
/// `min_year`/`max_year` are derived from the event set and recomputed on
/// every change; they are not part of the persisted format.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineState {
    pub zoom: f32,
    pub offset: f32,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: 0.0,
            min_year: SENTINEL_YEAR,
            max_year: SENTINEL_YEAR,
        }
    }
}

impl TimelineState {
    /// Sets the zoom level, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }
}

/// One timeline project: ordered events, view state and persistence metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Display name, shown in the tab bar
    pub name: String,
    /// True when in-memory state matches the last persisted write
    pub saved: bool,
    /// On-disk location; `None` until the first save-as
    pub path: Option<PathBuf>,
    events: Vec<TimelineEvent>,
    pub state: TimelineState,
    /// Next event id to hand out. Monotonic, never reused.
    next_event_id: u64,
}

impl Document {
    /// Creates an empty, unsaved document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            saved: false,
            path: None,
            events: Vec::new(),
            state: TimelineState::default(),
            next_event_id: 1,
        }
    }

    /// Rebuilds a document from decoded parts.
    ///
    /// Used by the codec: the id counter resumes past the largest persisted
    /// id so reloaded documents never reissue an id.
    pub(crate) fn from_parts(name: String, state: TimelineState, events: Vec<TimelineEvent>) -> Self {
        let next_event_id = events.iter().map(|e| e.id + 1).max().unwrap_or(1);
        let mut doc = Self {
            name,
            saved: true,
            path: None,
            events,
            state,
            next_event_id,
        };
        doc.recompute_year_bounds();
        doc
    }

    /// Read access to the ordered event list.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Appends a new event and returns its id. Marks the document unsaved.
    pub fn add_event(
        &mut self,
        year: i32,
        headline: impl Into<String>,
        description: impl Into<String>,
    ) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(TimelineEvent {
            id,
            year,
            headline: headline.into(),
            description: description.into(),
            expanded: false,
        });
        self.touch();
        id
    }

    /// Removes the event with the given id. Returns false if no such event.
    pub fn remove_event(&mut self, id: u64) -> bool {
        let len_before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == len_before {
            return false;
        }
        self.touch();
        true
    }

    /// Mutable access to a single event by id.
    ///
    /// Callers must pair content edits with [`Document::touch`]; the borrow
    /// itself cannot know whether anything changed.
    pub fn event_mut(&mut self, id: u64) -> Option<&mut TimelineEvent> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    /// Replaces the event list wholesale, keeping the id counter monotonic.
    ///
    /// This is the commit half of the background sort: the sorted snapshot
    /// contains the same events, reordered.
    pub fn replace_events(&mut self, events: Vec<TimelineEvent>) {
        let max_seen = events.iter().map(|e| e.id + 1).max().unwrap_or(1);
        self.next_event_id = self.next_event_id.max(max_seen);
        self.events = events;
        self.touch();
    }

    /// Marks the document dirty and refreshes the derived year bounds.
    pub fn touch(&mut self) {
        self.saved = false;
        self.recompute_year_bounds();
    }

    /// Adds one default event if the document is empty.
    ///
    /// The editor calls this every frame for a freshly created document, so
    /// it must be idempotent: a document that already has events is left
    /// alone.
    pub fn seed_default_event(&mut self) {
        if self.events.is_empty() {
            self.add_event(SENTINEL_YEAR, "New event", "");
        }
    }

    fn recompute_year_bounds(&mut self) {
        match self.events.iter().map(|e| e.year).fold(None, |acc, year| {
            let (min, max) = acc.unwrap_or((year, year));
            Some((min.min(year), max.max(year)))
        }) {
            Some((min, max)) => {
                self.state.min_year = min;
                self.state.max_year = max;
            }
            None => {
                self.state.min_year = SENTINEL_YEAR;
                self.state.max_year = SENTINEL_YEAR;
            }
        }
    }
}
