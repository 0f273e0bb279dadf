//! Timeline event model
//!
//! An event is one dated entry within a document: a year, a headline and a
//! longer description. Events keep the id they were created with for their
//! whole lifetime; position in the document is presentation order only.

/// A single dated entry in a timeline document.
///
/// Identity is carried by `id`, never by position: reordering a document
/// (manually or via the background sort) must not change which event is
/// which. Ids are handed out by the owning [`Document`](super::Document) and
/// are never reused, even after the event is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// Document-unique id, immutable after creation
    pub id: u64,
    /// Calendar year; negative values are BC
    pub year: i32,
    /// Short display text, may be empty
    pub headline: String,
    /// Long display text, may be empty
    pub description: String,
    /// Whether the event is expanded in the editor (persisted UI hint)
    pub expanded: bool,
}

impl TimelineEvent {
    /// Creates an event with the given id and year and empty text fields.
    pub fn new(id: u64, year: i32) -> Self {
        Self {
            id,
            year,
            headline: String::new(),
            description: String::new(),
            expanded: false,
        }
    }

    /// Returns true if this is the same event as `other`, by id.
    pub fn same_event(&self, other: &TimelineEvent) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_id_not_content() {
        let a = TimelineEvent::new(1, 1990);
        let mut b = TimelineEvent::new(1, -500);
        b.headline = "different".to_string();

        assert!(a.same_event(&b));
        assert!(!a.same_event(&TimelineEvent::new(2, 1990)));
    }

    #[test]
    fn new_event_has_empty_text() {
        let event = TimelineEvent::new(7, -44);
        assert_eq!(event.year, -44);
        assert!(event.headline.is_empty());
        assert!(event.description.is_empty());
        assert!(!event.expanded);
    }
}
