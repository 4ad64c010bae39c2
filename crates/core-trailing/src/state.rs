//! Per-document feature state owned outside the host.
//!
//! The host wipes document-local state on mode reassignment. The enabled flag
//! must survive that, so it lives here, keyed by `DocumentId`, and is only
//! dropped when the document closes or the feature is turned off.

use core_events::DocumentId;
use core_state::DecorationId;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeatureState {
    pub enabled: bool,
    /// Handle of the single live decoration, if any.
    pub decoration: Option<DecorationId>,
}

#[derive(Debug, Default)]
pub struct FeatureStates {
    docs: HashMap<DocumentId, FeatureState>,
}

impl FeatureStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, doc: DocumentId) -> Option<&FeatureState> {
        self.docs.get(&doc)
    }

    pub fn entry(&mut self, doc: DocumentId) -> &mut FeatureState {
        self.docs.entry(doc).or_default()
    }

    pub fn is_enabled(&self, doc: DocumentId) -> bool {
        self.docs.get(&doc).is_some_and(|s| s.enabled)
    }

    pub fn decoration(&self, doc: DocumentId) -> Option<DecorationId> {
        self.docs.get(&doc).and_then(|s| s.decoration)
    }

    /// Detach and return the stored decoration handle.
    pub fn take_decoration(&mut self, doc: DocumentId) -> Option<DecorationId> {
        self.docs.get_mut(&doc).and_then(|s| s.decoration.take())
    }

    pub fn forget(&mut self, doc: DocumentId) -> Option<FeatureState> {
        self.docs.remove(&doc)
    }

    /// Documents with the feature enabled, sorted for deterministic iteration.
    pub fn enabled_documents(&self) -> Vec<DocumentId> {
        let mut ids: Vec<_> = self
            .docs
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn enabled_count(&self) -> usize {
        self.docs.values().filter(|s| s.enabled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_defaults_to_disabled() {
        let mut s = FeatureStates::new();
        assert!(!s.entry(DocumentId(1)).enabled);
        assert!(!s.is_enabled(DocumentId(1)));
        assert_eq!(s.enabled_count(), 0);
    }

    #[test]
    fn take_decoration_clears_handle() {
        let mut s = FeatureStates::new();
        s.entry(DocumentId(1)).decoration = Some(DecorationId(4));
        assert_eq!(s.take_decoration(DocumentId(1)), Some(DecorationId(4)));
        assert_eq!(s.decoration(DocumentId(1)), None);
        assert_eq!(s.take_decoration(DocumentId(2)), None);
    }

    #[test]
    fn enabled_documents_sorted() {
        let mut s = FeatureStates::new();
        s.entry(DocumentId(5)).enabled = true;
        s.entry(DocumentId(2)).enabled = true;
        s.entry(DocumentId(3));
        assert_eq!(s.enabled_documents(), vec![DocumentId(2), DocumentId(5)]);
        s.forget(DocumentId(5));
        assert_eq!(s.enabled_count(), 1);
    }
}
