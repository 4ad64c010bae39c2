//! Editor model: the host integration layer.
//!
//! `EditorModel` owns the host `Workspace` and the `TrailingNewlineDecorator`
//! and wires workspace events to the decorator's observer API. Routing mirrors
//! a host hook list:
//!
//! * Content change, save, revert and viewport/cursor events reach the
//!   decorator once per registration of the matching document-local hook. No
//!   registration means the event is dropped, which is how a stripped hook
//!   becomes observable staleness.
//! * Mode changes travel through the shared structural listener, delivered once
//!   per attachment.
//! * Open and close are always delivered. Close is delivered *before* the
//!   workspace drops the document so teardown can still reach it.
//!
//! Invariants (hold after every public call):
//! * The workspace and decorator agree on which documents exist: the decorator
//!   never retains state for a closed document.
//! * Every mutation routes the event it produced before returning.

use anyhow::Result;
use core_events::{DocumentEvent, DocumentId, EventHooks, NoopEventHooks};
use core_state::{OpenRequest, Workspace};
use core_trailing::{DecoratorStats, GlyphOptions, ToggleArg, TrailingNewlineDecorator};
use std::path::Path;
use tracing::trace;

pub struct EditorModel {
    workspace: Workspace,
    decorator: TrailingNewlineDecorator,
    hooks: Box<dyn EventHooks>,
}

impl Default for EditorModel {
    fn default() -> Self {
        Self::new(GlyphOptions::default())
    }
}

impl EditorModel {
    pub fn new(options: GlyphOptions) -> Self {
        Self {
            workspace: Workspace::new(),
            decorator: TrailingNewlineDecorator::new(options),
            hooks: Box::new(NoopEventHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Box<dyn EventHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Direct workspace access. Mutations made through this bypass routing;
    /// tests use it to simulate a host clearing hooks behind the decorator's back.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn decorator(&self) -> &TrailingNewlineDecorator {
        &self.decorator
    }

    pub fn active(&self) -> Option<DocumentId> {
        self.workspace.active
    }

    pub fn set_active(&mut self, doc: DocumentId) -> bool {
        if self.workspace.document(doc).is_none() {
            return false;
        }
        self.workspace.active = Some(doc);
        true
    }

    pub fn stats(&self) -> DecoratorStats {
        self.decorator.stats()
    }

    /// Route one event to the decorator according to the host's current
    /// registrations.
    pub fn route(&mut self, event: DocumentEvent) {
        self.hooks.pre_handle(&event);
        let doc = event.document();
        match event {
            DocumentEvent::Opened(_) => self.decorator.on_opened(&mut self.workspace, doc),
            DocumentEvent::Closed(_) => self.decorator.on_closed(&mut self.workspace, doc),
            DocumentEvent::ModeChanged(_) => {
                let deliveries = self.workspace.structural_listener_count();
                trace!(target: "model", doc = %doc, event = event.kind(), deliveries, "event_routed");
                for _ in 0..deliveries {
                    self.decorator.on_structural_change(&mut self.workspace, doc);
                }
            }
            DocumentEvent::ContentChanged(_)
            | DocumentEvent::Saved(_)
            | DocumentEvent::Reloaded(_)
            | DocumentEvent::ViewportOrCursorMoved(_) => {
                let Some(hook) = event.local_hook() else {
                    return;
                };
                let deliveries = self.workspace.hook_count(doc, hook);
                trace!(target: "model", doc = %doc, event = event.kind(), deliveries, "event_routed");
                for _ in 0..deliveries {
                    match event {
                        DocumentEvent::ContentChanged(_) => {
                            self.decorator.on_content_changed(&mut self.workspace, doc)
                        }
                        DocumentEvent::Saved(_) => self.decorator.on_saved(&mut self.workspace, doc),
                        DocumentEvent::Reloaded(_) => {
                            self.decorator.on_reloaded(&mut self.workspace, doc)
                        }
                        _ => self
                            .decorator
                            .on_viewport_or_cursor_moved(&mut self.workspace, doc),
                    }
                }
            }
        }
        self.hooks.post_handle(&event);
    }

    fn route_opt(&mut self, event: Option<DocumentEvent>) -> bool {
        match event {
            Some(ev) => {
                self.route(ev);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Host operations (each routes the event it produced)
    // ---------------------------------------------------------------------------------------------

    pub fn open(&mut self, req: OpenRequest) -> Result<DocumentId> {
        let ev = self.workspace.open(req)?;
        self.route(ev);
        Ok(ev.document())
    }

    pub fn open_file(&mut self, path: &Path) -> Result<DocumentId> {
        let ev = self.workspace.open_file(path)?;
        self.route(ev);
        Ok(ev.document())
    }

    pub fn append(&mut self, doc: DocumentId, text: &str) -> bool {
        let ev = self.workspace.append(doc, text);
        self.route_opt(ev)
    }

    pub fn insert(&mut self, doc: DocumentId, char_idx: usize, text: &str) -> bool {
        let ev = self.workspace.insert(doc, char_idx, text);
        self.route_opt(ev)
    }

    pub fn delete_last(&mut self, doc: DocumentId) -> bool {
        let ev = self.workspace.delete_last(doc);
        self.route_opt(ev)
    }

    pub fn delete_range(&mut self, doc: DocumentId, start: usize, end: usize) -> bool {
        let ev = self.workspace.delete_range(doc, start, end);
        self.route_opt(ev)
    }

    pub fn save(&mut self, doc: DocumentId) -> bool {
        let ev = self.workspace.save(doc);
        self.route_opt(ev)
    }

    pub fn revert(&mut self, doc: DocumentId) -> bool {
        let ev = self.workspace.revert(doc);
        self.route_opt(ev)
    }

    pub fn set_mode(&mut self, doc: DocumentId, mode: &str) -> bool {
        let ev = self.workspace.set_mode(doc, mode);
        self.route_opt(ev)
    }

    pub fn set_line_numbers(&mut self, doc: DocumentId, on: bool) -> bool {
        let ev = self.workspace.set_line_numbers(doc, on);
        self.route_opt(ev)
    }

    pub fn move_cursor(&mut self, doc: DocumentId, line: usize) -> bool {
        let ev = self.workspace.move_cursor(doc, line);
        self.route_opt(ev)
    }

    /// Close a document. Teardown is routed first, then the document is dropped.
    pub fn close(&mut self, doc: DocumentId) -> bool {
        if self.workspace.document(doc).is_none() {
            return false;
        }
        self.route(DocumentEvent::Closed(doc));
        self.workspace.close(doc).is_some()
    }

    // ---------------------------------------------------------------------------------------------
    // Feature commands
    // ---------------------------------------------------------------------------------------------

    pub fn toggle_trailing(&mut self, doc: DocumentId, arg: ToggleArg) -> bool {
        self.decorator.toggle(&mut self.workspace, doc, arg)
    }

    pub fn toggle_global(&mut self, arg: ToggleArg) -> bool {
        self.decorator.set_global(&mut self.workspace, arg)
    }

    pub fn set_glyph_options(&mut self, options: GlyphOptions) {
        self.decorator.set_options(options);
        self.decorator.refresh_all(&mut self.workspace);
    }
}
