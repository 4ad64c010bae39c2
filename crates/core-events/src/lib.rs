//! Core document event types for Trailmark.
//!
//! The host delivers events serially on its main loop; every consumer handles
//! an event to completion before the next one is delivered. There is no
//! channel or async machinery here: events are plain values returned by the
//! workspace mutation that produced them and routed synchronously by
//! `core-model`.

use std::fmt;

/// Stable identity of an open document. Ids are never reused within a
/// workspace, so a closed document's id can't alias a newly opened one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Event produced by the host for a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Document became visible to the editor (file opened, scratch created).
    Opened(DocumentId),
    ContentChanged(DocumentId),
    Saved(DocumentId),
    /// Content replaced by a revert-from-disk.
    Reloaded(DocumentId),
    /// Cursor or viewport moved, or a view property (line numbers) changed.
    ViewportOrCursorMoved(DocumentId),
    /// Mode / language association reassigned. The host strips document-local
    /// hooks when this happens.
    ModeChanged(DocumentId),
    Closed(DocumentId),
}

impl DocumentEvent {
    pub fn document(&self) -> DocumentId {
        match *self {
            DocumentEvent::Opened(id)
            | DocumentEvent::ContentChanged(id)
            | DocumentEvent::Saved(id)
            | DocumentEvent::Reloaded(id)
            | DocumentEvent::ViewportOrCursorMoved(id)
            | DocumentEvent::ModeChanged(id)
            | DocumentEvent::Closed(id) => id,
        }
    }

    /// The document-local hook that must be registered for this event to reach
    /// a subscriber. `None` for events the host always delivers (open, close)
    /// or delivers through the shared structural listener (mode change).
    pub fn local_hook(&self) -> Option<HookSet> {
        match self {
            DocumentEvent::ContentChanged(_) => Some(HookSet::CONTENT_CHANGED),
            DocumentEvent::Saved(_) => Some(HookSet::SAVED),
            DocumentEvent::Reloaded(_) => Some(HookSet::RELOADED),
            DocumentEvent::ViewportOrCursorMoved(_) => Some(HookSet::VIEWPORT_MOVED),
            DocumentEvent::Opened(_) | DocumentEvent::ModeChanged(_) | DocumentEvent::Closed(_) => {
                None
            }
        }
    }

    /// Short stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentEvent::Opened(_) => "opened",
            DocumentEvent::ContentChanged(_) => "content_changed",
            DocumentEvent::Saved(_) => "saved",
            DocumentEvent::Reloaded(_) => "reloaded",
            DocumentEvent::ViewportOrCursorMoved(_) => "viewport_moved",
            DocumentEvent::ModeChanged(_) => "mode_changed",
            DocumentEvent::Closed(_) => "closed",
        }
    }
}

bitflags::bitflags! {
    /// Document-local hook registrations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HookSet: u8 {
        const CONTENT_CHANGED = 1;
        const SAVED = 2;
        const RELOADED = 4;
        const VIEWPORT_MOVED = 8;
    }
}

/// Optional hooks that can observe events at the routing boundary. These
/// should not block.
pub trait EventHooks {
    fn pre_handle(&self, _event: &DocumentEvent) {}
    fn post_handle(&self, _event: &DocumentEvent) {}
}

/// Default no-op hooks implementation.
pub struct NoopEventHooks;

impl EventHooks for NoopEventHooks {}

/// Hooks implementation that records each routed event at trace level.
pub struct TracingEventHooks;

impl EventHooks for TracingEventHooks {
    fn pre_handle(&self, event: &DocumentEvent) {
        tracing::trace!(
            target: "events",
            doc = %event.document(),
            kind = event.kind(),
            "event_routed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hook_mapping() {
        let id = DocumentId(3);
        assert_eq!(
            DocumentEvent::ContentChanged(id).local_hook(),
            Some(HookSet::CONTENT_CHANGED)
        );
        assert_eq!(DocumentEvent::Saved(id).local_hook(), Some(HookSet::SAVED));
        assert_eq!(DocumentEvent::Reloaded(id).local_hook(), Some(HookSet::RELOADED));
        assert_eq!(
            DocumentEvent::ViewportOrCursorMoved(id).local_hook(),
            Some(HookSet::VIEWPORT_MOVED)
        );
        assert_eq!(DocumentEvent::ModeChanged(id).local_hook(), None);
        assert_eq!(DocumentEvent::Closed(id).local_hook(), None);
        assert_eq!(DocumentEvent::Opened(id).local_hook(), None);
    }

    #[test]
    fn document_accessor_and_display() {
        let ev = DocumentEvent::Reloaded(DocumentId(7));
        assert_eq!(ev.document(), DocumentId(7));
        assert_eq!(ev.kind(), "reloaded");
        assert_eq!(DocumentId(7).to_string(), "doc#7");
    }

    #[test]
    fn hookset_all_has_four_bits() {
        assert_eq!(HookSet::all().bits().count_ones(), 4);
        assert!(HookSet::default().is_empty());
    }
}
