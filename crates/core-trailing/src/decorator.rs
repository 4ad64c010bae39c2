//! Per-document enable/disable/recompute and the host-facing observer API.

use crate::glyph::{GlyphOptions, build_glyph};
use crate::host::DecorationHost;
use crate::registry::TrailingRegistry;
use crate::state::FeatureStates;
use core_events::{DocumentId, HookSet};
use core_state::{Decoration, DocumentKind, MarginSide};
use tracing::{debug, info, trace};

/// Document-local hooks registered while the indicator is enabled.
pub const LOCAL_HOOKS: HookSet = HookSet::all();

/// Argument of the toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleArg {
    Toggle,
    Enable,
    Disable,
}

impl ToggleArg {
    /// Numeric prefix semantics: none toggles, positive enables, zero or
    /// negative disables.
    pub fn from_prefix(prefix: Option<i64>) -> Self {
        match prefix {
            None => ToggleArg::Toggle,
            Some(n) if n > 0 => ToggleArg::Enable,
            Some(_) => ToggleArg::Disable,
        }
    }

    pub fn from_bool(on: bool) -> Self {
        if on { ToggleArg::Enable } else { ToggleArg::Disable }
    }

    fn resolve(self, currently_on: bool) -> bool {
        match self {
            ToggleArg::Toggle => !currently_on,
            ToggleArg::Enable => true,
            ToggleArg::Disable => false,
        }
    }
}

/// Counters for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoratorStats {
    pub recomputes: u64,
    pub reattachments: u64,
}

#[derive(Debug, Default)]
pub struct TrailingNewlineDecorator {
    options: GlyphOptions,
    registry: TrailingRegistry,
    states: FeatureStates,
    global: bool,
    stats: DecoratorStats,
}

impl TrailingNewlineDecorator {
    pub fn new(options: GlyphOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &GlyphOptions {
        &self.options
    }

    /// Replace the glyph options. Callers should recompute enabled documents
    /// afterwards (`refresh_all`).
    pub fn set_options(&mut self, options: GlyphOptions) {
        self.options = options;
    }

    pub fn registry(&self) -> &TrailingRegistry {
        &self.registry
    }

    pub fn states(&self) -> &FeatureStates {
        &self.states
    }

    pub fn stats(&self) -> DecoratorStats {
        self.stats
    }

    pub fn is_enabled(&self, doc: DocumentId) -> bool {
        self.states.is_enabled(doc)
    }

    pub fn global_enabled(&self) -> bool {
        self.global
    }

    // ---------------------------------------------------------------------------------------------
    // Enable / disable
    // ---------------------------------------------------------------------------------------------

    /// Turn the indicator on for `doc`. Returns false (and does nothing) when
    /// already enabled or the document is unknown to the host.
    pub fn enable<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) -> bool {
        if self.states.is_enabled(doc) || host.buffer(doc).is_none() {
            return false;
        }
        self.states.entry(doc).enabled = true;
        let active = self.registry.increment();
        self.register_local_hooks(host, doc);
        if self.registry.claim_structural() {
            host.attach_structural_listener();
            debug!(target: "trailing", "structural_listener_attached");
        }
        self.recompute(host, doc);
        info!(target: "trailing", doc = %doc, active, "enabled");
        true
    }

    /// Turn the indicator off for `doc`. Returns false when it wasn't enabled.
    pub fn disable<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) -> bool {
        if !self.states.is_enabled(doc) {
            return false;
        }
        self.remove_decoration(host, doc);
        self.states.forget(doc);
        let active = self.registry.decrement();
        host.remove_hooks(doc, LOCAL_HOOKS);
        if self.registry.release_structural_if_idle() {
            host.detach_structural_listener();
            debug!(target: "trailing", "structural_listener_detached");
        }
        info!(target: "trailing", doc = %doc, active, "disabled");
        true
    }

    /// Apply a toggle argument. Returns the resulting enabled state.
    pub fn toggle<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId, arg: ToggleArg) -> bool {
        if arg.resolve(self.is_enabled(doc)) {
            self.enable(host, doc);
        } else {
            self.disable(host, doc);
        }
        self.is_enabled(doc)
    }

    // ---------------------------------------------------------------------------------------------
    // Recompute
    // ---------------------------------------------------------------------------------------------

    /// Drop the current decoration for `doc` and place a fresh one if the
    /// document ends with a newline.
    pub fn recompute<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        self.stats.recomputes += 1;
        self.remove_decoration(host, doc);

        let Some(buffer) = host.buffer(doc) else {
            return;
        };
        if !buffer.ends_with_newline() {
            trace!(target: "trailing", doc = %doc, "no_trailing_newline");
            return;
        }
        // 1-based line of the final newline char; the empty line after it is one more.
        let newline_line = buffer.line_of_char(buffer.len_chars() - 1) + 1;
        let next_line = newline_line + 1;
        let anchor = buffer.end_offset();
        let numbers = host.line_numbers_active(doc);
        let content = build_glyph(&self.options, next_line, numbers);

        let decoration = Decoration::margin(anchor, MarginSide::Left, content);
        if let Some(id) = host.place_decoration(doc, decoration) {
            self.states.entry(doc).decoration = Some(id);
            trace!(target: "trailing", doc = %doc, next_line, anchor, "decoration_placed");
        }
    }

    /// Recompute every enabled document (after an options change).
    pub fn refresh_all<H: DecorationHost>(&mut self, host: &mut H) {
        for doc in self.states.enabled_documents() {
            self.recompute(host, doc);
        }
    }

    fn remove_decoration<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        if let Some(id) = self.states.take_decoration(doc) {
            host.remove_decoration(doc, id);
        }
    }

    fn register_local_hooks<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        let missing: HookSet = LOCAL_HOOKS
            .iter()
            .filter(|h| !host.has_hook(doc, *h))
            .fold(HookSet::empty(), |acc, h| acc | h);
        if !missing.is_empty() {
            host.add_hooks(doc, missing);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Observer entry points
    // ---------------------------------------------------------------------------------------------

    pub fn on_content_changed<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        self.recompute_if_enabled(host, doc);
    }

    pub fn on_saved<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        self.recompute_if_enabled(host, doc);
    }

    pub fn on_reloaded<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        self.recompute_if_enabled(host, doc);
    }

    pub fn on_viewport_or_cursor_moved<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        self.recompute_if_enabled(host, doc);
    }

    fn recompute_if_enabled<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        if self.states.is_enabled(doc) {
            self.recompute(host, doc);
        }
    }

    /// Structural change (mode reassignment) on `doc`. If the document is still
    /// enabled but lost its content-change hook, re-register the local hooks.
    /// Only the content-change hook is inspected.
    pub fn on_structural_change<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        if !self.states.is_enabled(doc) || host.has_hook(doc, HookSet::CONTENT_CHANGED) {
            return;
        }
        self.register_local_hooks(host, doc);
        self.stats.reattachments += 1;
        debug!(target: "trailing", doc = %doc, "local_hooks_reattached");
        self.recompute(host, doc);
    }

    /// Document is closing: tear everything down whether or not it was
    /// explicitly disabled.
    pub fn on_closed<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        if !self.disable(host, doc) {
            self.remove_decoration(host, doc);
        }
        self.states.forget(doc);
    }

    /// Newly opened document: auto-enable under the global policy.
    pub fn on_opened<H: DecorationHost>(&mut self, host: &mut H, doc: DocumentId) {
        if self.global && self.is_suitable(host, doc) {
            self.enable(host, doc);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Global policy
    // ---------------------------------------------------------------------------------------------

    /// True iff `doc` is a real file-backed document (not a minibuffer, not a
    /// special view) that doesn't already have the indicator enabled.
    pub fn is_suitable<H: DecorationHost>(&self, host: &H, doc: DocumentId) -> bool {
        let kind_ok = match host.document_kind(doc) {
            Some(DocumentKind::Minibuffer) | Some(DocumentKind::Special) | None => false,
            Some(DocumentKind::File) | Some(DocumentKind::Scratch) => true,
        };
        kind_ok && host.has_file(doc) && !self.states.is_enabled(doc)
    }

    /// Switch the global policy. Turning it on enables every suitable open
    /// document; turning it off disables the indicator everywhere.
    pub fn set_global<H: DecorationHost>(&mut self, host: &mut H, arg: ToggleArg) -> bool {
        let on = arg.resolve(self.global);
        self.global = on;
        if on {
            for doc in host.documents() {
                if self.is_suitable(host, doc) {
                    self.enable(host, doc);
                }
            }
        } else {
            for doc in self.states.enabled_documents() {
                self.disable(host, doc);
            }
        }
        info!(target: "trailing", global = on, active = self.registry.active_count(), "global_policy");
        on
    }
}
