//! Host workspace state: open documents, their document-local hook
//! registrations, the shared structural-change listener, and margin
//! decorations.
//!
//! Every mutation returns the `DocumentEvent` it produced (or `None` when the
//! target document is unknown). The workspace never routes events itself;
//! `core-model` feeds them to subscribers, which keeps this crate free of any
//! feature knowledge.
//!
//! Hook registrations behave like a host hook list rather than a set: adding
//! the same hook twice registers it twice and the router will then deliver the
//! event twice. Subscribers are expected to check `has_hook` before adding.
//!
//! Mode reassignment (`set_mode`) strips every document-local hook, mirroring
//! a host whose mode reset wipes local state. Anything that must survive a
//! mode change has to live outside `Document`.

use anyhow::Result;
use core_events::{DocumentEvent, DocumentId, HookSet};
use core_text::Buffer;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod decoration;

pub use decoration::{
    Decoration, DecorationId, DecorationStore, Face, GlyphSegment, MarginSide,
};

/// What kind of buffer a document is, as far as auto-enable policies care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Regular file-backed (or file-visiting) text.
    File,
    /// Scratch text with no file behind it.
    Scratch,
    /// Minibuffer / command prompt style ephemeral input.
    Minibuffer,
    /// Read-only system view (messages, help, listings).
    Special,
}

/// Line ending style detected from source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Cr,
    Crlf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    pub original: LineEnding,
    pub had_trailing_newline: bool,
}

/// Normalize CRLF and lone CR to LF so the trailing-newline check only ever has
/// to look for `\n`. The majority style is reported (ties: CRLF > LF > CR).
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let mut crlf = 0usize;
    let mut lf = 0usize;
    let mut cr = 0usize;
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    crlf += 1;
                } else {
                    cr += 1;
                }
                out.push('\n');
            }
            '\n' => {
                lf += 1;
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    NormalizedText {
        had_trailing_newline: out.ends_with('\n'),
        normalized: out,
        original,
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub buffer: Buffer,
    pub kind: DocumentKind,
    pub path: Option<PathBuf>,
    /// Language / mode association ("text", "rust", ...).
    pub mode: String,
    pub dirty: bool,
    /// Host line-number display currently on for this document's view.
    pub line_numbers: bool,
    pub cursor_line: usize,
    pub original_line_ending: LineEnding,
    saved: String,
    hooks: Vec<HookSet>,
}

impl Document {
    pub fn name(&self) -> &str {
        &self.buffer.name
    }

    pub fn is_file_backed(&self) -> bool {
        self.kind == DocumentKind::File && self.path.is_some()
    }

    /// Union of registered hooks.
    pub fn hooks(&self) -> HookSet {
        self.hooks.iter().fold(HookSet::empty(), |acc, h| acc | *h)
    }

    /// Number of registrations for a single hook.
    pub fn hook_count(&self, hook: HookSet) -> usize {
        self.hooks.iter().filter(|h| **h == hook).count()
    }
}

/// Parameters for opening a document.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub name: String,
    pub content: String,
    pub kind: DocumentKind,
    pub path: Option<PathBuf>,
    pub mode: String,
}

impl OpenRequest {
    pub fn scratch(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: DocumentKind::Scratch,
            path: None,
            mode: "text".to_string(),
        }
    }

    /// A file-kind document with a path but content supplied in memory.
    pub fn file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        Self {
            mode: mode_for_path(&path),
            name,
            content: content.into(),
            kind: DocumentKind::File,
            path: Some(path),
        }
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Guess a mode name from the file extension.
pub fn mode_for_path(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("rs") => "rust",
        Some("md") | Some("markdown") => "markdown",
        Some("toml") => "toml",
        Some("py") => "python",
        _ => "text",
    }
    .to_string()
}

#[derive(Debug)]
pub struct Workspace {
    documents: BTreeMap<DocumentId, Document>,
    pub decorations: DecorationStore,
    structural_listeners: usize,
    next_doc: u64,
    pub active: Option<DocumentId>,
    /// Line-number display applied to newly opened documents.
    pub default_line_numbers: bool,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
            decorations: DecorationStore::new(),
            structural_listeners: 0,
            next_doc: 1,
            active: None,
            default_line_numbers: true,
        }
    }

    /// Open a document from an in-memory request. The new document becomes active.
    pub fn open(&mut self, req: OpenRequest) -> Result<DocumentEvent> {
        let norm = normalize_line_endings(&req.content);
        let buffer = Buffer::from_str(req.name, &norm.normalized)?;
        let id = DocumentId(self.next_doc);
        self.next_doc += 1;
        tracing::debug!(
            target: "workspace",
            doc = %id,
            name = buffer.name.as_str(),
            len_chars = buffer.len_chars(),
            had_trailing_newline = norm.had_trailing_newline,
            "document_opened"
        );
        self.documents.insert(
            id,
            Document {
                id,
                kind: req.kind,
                path: req.path,
                mode: req.mode,
                dirty: false,
                line_numbers: self.default_line_numbers,
                cursor_line: 0,
                original_line_ending: norm.original,
                saved: norm.normalized,
                hooks: Vec::new(),
                buffer,
            },
        );
        self.active = Some(id);
        Ok(DocumentEvent::Opened(id))
    }

    /// Read a file from disk and open it as a file-kind document.
    pub fn open_file(&mut self, path: &Path) -> Result<DocumentEvent> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
        self.open(OpenRequest::file(path, content))
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn buffer(&self, id: DocumentId) -> Option<&Buffer> {
        self.documents.get(&id).map(|d| &d.buffer)
    }

    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn edit<F>(&mut self, id: DocumentId, f: F) -> Option<DocumentEvent>
    where
        F: FnOnce(&mut Buffer),
    {
        let doc = self.documents.get_mut(&id)?;
        f(&mut doc.buffer);
        doc.dirty = true;
        let last_line = doc.buffer.line_count().saturating_sub(1);
        doc.cursor_line = doc.cursor_line.min(last_line);
        Some(DocumentEvent::ContentChanged(id))
    }

    pub fn append(&mut self, id: DocumentId, text: &str) -> Option<DocumentEvent> {
        self.edit(id, |b| b.append(text))
    }

    pub fn insert(&mut self, id: DocumentId, char_idx: usize, text: &str) -> Option<DocumentEvent> {
        self.edit(id, |b| b.insert(char_idx, text))
    }

    pub fn delete_last(&mut self, id: DocumentId) -> Option<DocumentEvent> {
        self.edit(id, |b| {
            b.delete_last();
        })
    }

    pub fn delete_range(&mut self, id: DocumentId, start: usize, end: usize) -> Option<DocumentEvent> {
        self.edit(id, |b| {
            b.delete_chars(start, end);
        })
    }

    /// Mark the current content as saved. The workspace keeps the saved
    /// snapshot in memory; writing to disk is the embedding host's concern.
    pub fn save(&mut self, id: DocumentId) -> Option<DocumentEvent> {
        let doc = self.documents.get_mut(&id)?;
        doc.saved = doc.buffer.contents();
        doc.dirty = false;
        Some(DocumentEvent::Saved(id))
    }

    /// Restore the last saved content.
    pub fn revert(&mut self, id: DocumentId) -> Option<DocumentEvent> {
        let doc = self.documents.get_mut(&id)?;
        doc.buffer.replace_all(&doc.saved);
        doc.dirty = false;
        let last_line = doc.buffer.line_count().saturating_sub(1);
        doc.cursor_line = doc.cursor_line.min(last_line);
        Some(DocumentEvent::Reloaded(id))
    }

    /// Reassign the document's mode. Strips all document-local hooks.
    pub fn set_mode(&mut self, id: DocumentId, mode: &str) -> Option<DocumentEvent> {
        let doc = self.documents.get_mut(&id)?;
        doc.mode = mode.to_string();
        let stripped = doc.hooks.len();
        doc.hooks.clear();
        tracing::debug!(target: "workspace", doc = %id, mode, stripped, "mode_reassigned");
        Some(DocumentEvent::ModeChanged(id))
    }

    pub fn set_line_numbers(&mut self, id: DocumentId, on: bool) -> Option<DocumentEvent> {
        let doc = self.documents.get_mut(&id)?;
        doc.line_numbers = on;
        Some(DocumentEvent::ViewportOrCursorMoved(id))
    }

    /// Move the cursor to a zero-based line (clamped).
    pub fn move_cursor(&mut self, id: DocumentId, line: usize) -> Option<DocumentEvent> {
        let doc = self.documents.get_mut(&id)?;
        let last_line = doc.buffer.line_count().saturating_sub(1);
        doc.cursor_line = line.min(last_line);
        Some(DocumentEvent::ViewportOrCursorMoved(id))
    }

    /// Remove the document and every decoration still attached to it. Returns
    /// `None` for unknown documents.
    pub fn close(&mut self, id: DocumentId) -> Option<DocumentEvent> {
        self.documents.remove(&id)?;
        let dropped = self.decorations.drop_document(id);
        if dropped > 0 {
            tracing::debug!(target: "workspace", doc = %id, dropped, "orphan_decorations_dropped");
        }
        if self.active == Some(id) {
            self.active = self.documents.keys().next_back().copied();
        }
        Some(DocumentEvent::Closed(id))
    }

    // ---------------------------------------------------------------------------------------------
    // Hook registration
    // ---------------------------------------------------------------------------------------------

    pub fn has_hook(&self, id: DocumentId, hook: HookSet) -> bool {
        self.documents
            .get(&id)
            .is_some_and(|d| d.hooks().contains(hook))
    }

    /// Register each hook in `hooks` once more (no dedup).
    pub fn add_hooks(&mut self, id: DocumentId, hooks: HookSet) {
        if let Some(doc) = self.documents.get_mut(&id) {
            doc.hooks.extend(hooks.iter());
        }
    }

    /// Remove every registration of the hooks in `hooks`.
    pub fn remove_hooks(&mut self, id: DocumentId, hooks: HookSet) {
        if let Some(doc) = self.documents.get_mut(&id) {
            doc.hooks.retain(|h| !hooks.contains(*h));
        }
    }

    /// Registrations of `hook` on `id` (how many times the router will deliver it).
    pub fn hook_count(&self, id: DocumentId, hook: HookSet) -> usize {
        self.documents.get(&id).map_or(0, |d| d.hook_count(hook))
    }

    pub fn attach_structural_listener(&mut self) {
        self.structural_listeners += 1;
    }

    pub fn detach_structural_listener(&mut self) {
        self.structural_listeners = 0;
    }

    pub fn structural_listener_count(&self) -> usize {
        self.structural_listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws_with(content: &str) -> (Workspace, DocumentId) {
        let mut ws = Workspace::new();
        let id = ws.open(OpenRequest::scratch("t", content)).unwrap().document();
        (ws, id)
    }

    #[test]
    fn normalize_crlf_to_lf() {
        let n = normalize_line_endings("a\r\nb\r\n");
        assert_eq!(n.normalized, "a\nb\n");
        assert_eq!(n.original, LineEnding::Crlf);
        assert!(n.had_trailing_newline);
    }

    #[test]
    fn normalize_lone_cr() {
        let n = normalize_line_endings("a\rb");
        assert_eq!(n.normalized, "a\nb");
        assert_eq!(n.original, LineEnding::Cr);
        assert!(!n.had_trailing_newline);
    }

    #[test]
    fn open_assigns_fresh_ids_and_activates() {
        let mut ws = Workspace::new();
        let a = ws.open(OpenRequest::scratch("a", "")).unwrap().document();
        let b = ws.open(OpenRequest::scratch("b", "")).unwrap().document();
        assert_ne!(a, b);
        assert_eq!(ws.active, Some(b));
        ws.close(b);
        assert_eq!(ws.active, Some(a));
        let c = ws.open(OpenRequest::scratch("c", "")).unwrap().document();
        assert_ne!(c, b, "ids never reused");
    }

    #[test]
    fn edits_mark_dirty_and_emit_content_changed() {
        let (mut ws, id) = ws_with("abc");
        assert_eq!(ws.append(id, "\n"), Some(DocumentEvent::ContentChanged(id)));
        assert!(ws.document(id).unwrap().dirty);
        assert!(ws.buffer(id).unwrap().ends_with_newline());
        assert_eq!(ws.append(DocumentId(999), "x"), None);
    }

    #[test]
    fn save_then_revert_restores_snapshot() {
        let (mut ws, id) = ws_with("abc\n");
        ws.append(id, "more");
        assert_eq!(ws.revert(id), Some(DocumentEvent::Reloaded(id)));
        assert_eq!(ws.buffer(id).unwrap().contents(), "abc\n");
        ws.delete_last(id);
        assert_eq!(ws.save(id), Some(DocumentEvent::Saved(id)));
        ws.append(id, "\n\n");
        ws.revert(id);
        assert_eq!(ws.buffer(id).unwrap().contents(), "abc");
        assert!(!ws.document(id).unwrap().dirty);
    }

    #[test]
    fn hooks_are_a_list_and_mode_change_strips_them() {
        let (mut ws, id) = ws_with("");
        ws.add_hooks(id, HookSet::CONTENT_CHANGED | HookSet::SAVED);
        ws.add_hooks(id, HookSet::CONTENT_CHANGED);
        assert_eq!(ws.hook_count(id, HookSet::CONTENT_CHANGED), 2);
        assert_eq!(ws.hook_count(id, HookSet::SAVED), 1);
        assert!(ws.has_hook(id, HookSet::SAVED));
        ws.remove_hooks(id, HookSet::CONTENT_CHANGED);
        assert_eq!(ws.hook_count(id, HookSet::CONTENT_CHANGED), 0);
        assert_eq!(ws.set_mode(id, "rust"), Some(DocumentEvent::ModeChanged(id)));
        assert!(ws.document(id).unwrap().hooks().is_empty());
        assert_eq!(ws.document(id).unwrap().mode, "rust");
    }

    #[test]
    fn close_drops_remaining_decorations() {
        let (mut ws, id) = ws_with("x\n");
        ws.decorations.add(
            id,
            Decoration::margin(2, MarginSide::Left, vec![GlyphSegment::new("⏎", Face::TrailingNewlineMarker)]),
        );
        assert_eq!(ws.close(id), Some(DocumentEvent::Closed(id)));
        assert!(ws.decorations.is_empty());
        assert_eq!(ws.close(id), None);
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let (mut ws, id) = ws_with("a\nb\n");
        ws.move_cursor(id, 50);
        assert_eq!(ws.document(id).unwrap().cursor_line, 2);
        ws.delete_range(id, 1, 4);
        assert_eq!(ws.document(id).unwrap().cursor_line, 0);
    }

    #[test]
    fn file_request_guesses_mode_and_kind() {
        let req = OpenRequest::file("/tmp/src/lib.rs", "fn x() {}\n");
        assert_eq!(req.mode, "rust");
        assert_eq!(req.name, "lib.rs");
        let mut ws = Workspace::new();
        let id = ws.open(req).unwrap().document();
        assert!(ws.document(id).unwrap().is_file_backed());
    }

    #[test]
    fn structural_listener_counts() {
        let mut ws = Workspace::new();
        ws.attach_structural_listener();
        assert_eq!(ws.structural_listener_count(), 1);
        ws.detach_structural_listener();
        assert_eq!(ws.structural_listener_count(), 0);
    }
}
