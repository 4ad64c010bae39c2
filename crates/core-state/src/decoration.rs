//! Margin decorations and the faces they are painted with.
//!
//! A decoration is a zero-width annotation: it is anchored at a char offset and
//! never covers text, so edits can't split it. Content is a short list of styled
//! segments drawn in the chosen margin on the row containing the anchor.
//!
//! Invariants:
//! * Ids are allocated monotonically and never reused, so a stale handle held
//!   by a feature can never remove somebody else's decoration.
//! * Every decoration belongs to exactly one document; closing a document drops
//!   whatever is still attached to it.

use core_events::DocumentId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginSide {
    Left,
    Right,
}

/// Named visual styles known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Host line-number column style.
    LineNumber,
    /// Trailing newline marker glyph.
    TrailingNewlineMarker,
    /// Next line number appended to the marker glyph.
    TrailingNewlineNumber,
}

impl Face {
    pub fn name(self) -> &'static str {
        match self {
            Face::LineNumber => "line-number",
            Face::TrailingNewlineMarker => "trailing-newline-marker",
            Face::TrailingNewlineNumber => "trailing-newline-number",
        }
    }

    /// Face this one inherits unspecified attributes from.
    pub fn inherits(self) -> Option<Face> {
        match self {
            Face::LineNumber => None,
            Face::TrailingNewlineMarker => Some(Face::LineNumber),
            Face::TrailingNewlineNumber => Some(Face::TrailingNewlineMarker),
        }
    }

    /// Height relative to the inherited face.
    pub fn relative_height(self) -> f32 {
        match self {
            Face::TrailingNewlineNumber => 0.8,
            _ => 1.0,
        }
    }

    /// Walk the inheritance chain back to the root face.
    pub fn root(self) -> Face {
        let mut face = self;
        while let Some(parent) = face.inherits() {
            face = parent;
        }
        face
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSegment {
    pub text: String,
    pub face: Face,
}

impl GlyphSegment {
    pub fn new(text: impl Into<String>, face: Face) -> Self {
        Self {
            text: text.into(),
            face,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Char offset the decoration is attached to.
    pub anchor: usize,
    pub side: MarginSide,
    pub content: Vec<GlyphSegment>,
}

impl Decoration {
    pub fn margin(anchor: usize, side: MarginSide, content: Vec<GlyphSegment>) -> Self {
        Self {
            anchor,
            side,
            content,
        }
    }

    /// Concatenated text of every segment.
    pub fn text(&self) -> String {
        self.content.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Default)]
pub struct DecorationStore {
    entries: BTreeMap<DecorationId, (DocumentId, Decoration)>,
    next_id: u64,
}

impl DecorationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, doc: DocumentId, decoration: Decoration) -> DecorationId {
        let id = DecorationId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, (doc, decoration));
        id
    }

    /// Remove a decoration only if it belongs to `doc`. Returns true when removed.
    pub fn remove(&mut self, doc: DocumentId, id: DecorationId) -> bool {
        match self.entries.get(&id) {
            Some((owner, _)) if *owner == doc => {
                self.entries.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: DecorationId) -> Option<&Decoration> {
        self.entries.get(&id).map(|(_, d)| d)
    }

    pub fn for_document(&self, doc: DocumentId) -> impl Iterator<Item = (DecorationId, &Decoration)> {
        self.entries
            .iter()
            .filter(move |(_, (owner, _))| *owner == doc)
            .map(|(id, (_, d))| (*id, d))
    }

    pub fn count_for(&self, doc: DocumentId) -> usize {
        self.for_document(doc).count()
    }

    /// Drop every decoration attached to `doc`, returning how many were removed.
    pub fn drop_document(&mut self, doc: DocumentId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (owner, _)| *owner != doc);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deco(anchor: usize) -> Decoration {
        Decoration::margin(
            anchor,
            MarginSide::Left,
            vec![GlyphSegment::new("x", Face::TrailingNewlineMarker)],
        )
    }

    #[test]
    fn ids_are_not_reused() {
        let mut store = DecorationStore::new();
        let a = store.add(DocumentId(1), deco(0));
        assert!(store.remove(DocumentId(1), a));
        let b = store.add(DocumentId(1), deco(0));
        assert_ne!(a, b);
    }

    #[test]
    fn remove_requires_owner() {
        let mut store = DecorationStore::new();
        let a = store.add(DocumentId(1), deco(3));
        assert!(!store.remove(DocumentId(2), a));
        assert_eq!(store.count_for(DocumentId(1)), 1);
        assert!(store.remove(DocumentId(1), a));
        assert!(!store.remove(DocumentId(1), a));
        assert!(store.is_empty());
    }

    #[test]
    fn drop_document_only_touches_owner() {
        let mut store = DecorationStore::new();
        store.add(DocumentId(1), deco(0));
        store.add(DocumentId(1), deco(1));
        store.add(DocumentId(2), deco(0));
        assert_eq!(store.drop_document(DocumentId(1)), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_for(DocumentId(2)), 1);
    }

    #[test]
    fn face_inheritance_chain() {
        assert_eq!(Face::TrailingNewlineMarker.inherits(), Some(Face::LineNumber));
        assert_eq!(Face::TrailingNewlineNumber.root(), Face::LineNumber);
        assert!(Face::TrailingNewlineNumber.relative_height() < 1.0);
        assert_eq!(Face::TrailingNewlineMarker.relative_height(), 1.0);
        assert_eq!(Face::TrailingNewlineNumber.name(), "trailing-newline-number");
    }

    #[test]
    fn decoration_text_concatenates_segments() {
        let d = Decoration::margin(
            0,
            MarginSide::Left,
            vec![
                GlyphSegment::new("⏎", Face::TrailingNewlineMarker),
                GlyphSegment::new(" 3", Face::TrailingNewlineNumber),
            ],
        );
        assert_eq!(d.text(), "⏎ 3");
    }
}
