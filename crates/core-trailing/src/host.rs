//! The editor seam used by the decorator.

use core_events::{DocumentId, HookSet};
use core_state::{Decoration, DecorationId, DocumentKind, Workspace};
use core_text::Buffer;

/// Operations the decorator needs from the editor. Implemented for the
/// in-tree `Workspace`; other hosts can provide their own.
pub trait DecorationHost {
    fn buffer(&self, doc: DocumentId) -> Option<&Buffer>;
    /// Whether the document's view currently shows line numbers.
    fn line_numbers_active(&self, doc: DocumentId) -> bool;
    fn document_kind(&self, doc: DocumentId) -> Option<DocumentKind>;
    /// Whether the document visits a real file.
    fn has_file(&self, doc: DocumentId) -> bool;
    fn documents(&self) -> Vec<DocumentId>;

    /// Place a decoration. `None` when the document is unknown.
    fn place_decoration(&mut self, doc: DocumentId, decoration: Decoration) -> Option<DecorationId>;
    fn remove_decoration(&mut self, doc: DocumentId, id: DecorationId) -> bool;

    fn has_hook(&self, doc: DocumentId, hook: HookSet) -> bool;
    /// Register hooks. Hosts are not required to deduplicate.
    fn add_hooks(&mut self, doc: DocumentId, hooks: HookSet);
    fn remove_hooks(&mut self, doc: DocumentId, hooks: HookSet);

    fn attach_structural_listener(&mut self);
    fn detach_structural_listener(&mut self);
}

impl DecorationHost for Workspace {
    fn buffer(&self, doc: DocumentId) -> Option<&Buffer> {
        Workspace::buffer(self, doc)
    }

    fn line_numbers_active(&self, doc: DocumentId) -> bool {
        self.document(doc).is_some_and(|d| d.line_numbers)
    }

    fn document_kind(&self, doc: DocumentId) -> Option<DocumentKind> {
        self.document(doc).map(|d| d.kind)
    }

    fn has_file(&self, doc: DocumentId) -> bool {
        self.document(doc).is_some_and(|d| d.path.is_some())
    }

    fn documents(&self) -> Vec<DocumentId> {
        self.ids()
    }

    fn place_decoration(&mut self, doc: DocumentId, decoration: Decoration) -> Option<DecorationId> {
        self.document(doc)?;
        Some(self.decorations.add(doc, decoration))
    }

    fn remove_decoration(&mut self, doc: DocumentId, id: DecorationId) -> bool {
        self.decorations.remove(doc, id)
    }

    fn has_hook(&self, doc: DocumentId, hook: HookSet) -> bool {
        Workspace::has_hook(self, doc, hook)
    }

    fn add_hooks(&mut self, doc: DocumentId, hooks: HookSet) {
        Workspace::add_hooks(self, doc, hooks)
    }

    fn remove_hooks(&mut self, doc: DocumentId, hooks: HookSet) {
        Workspace::remove_hooks(self, doc, hooks)
    }

    fn attach_structural_listener(&mut self) {
        Workspace::attach_structural_listener(self)
    }

    fn detach_structural_listener(&mut self) {
        Workspace::detach_structural_listener(self)
    }
}
