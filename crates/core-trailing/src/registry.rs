//! Shared context for every document running the indicator.

use tracing::warn;

/// Owns the number of documents with the indicator enabled and whether the
/// shared structural-change listener is currently attached. One registry is
/// shared by all documents, so only one structural listener ever exists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrailingRegistry {
    active_count: usize,
    structural_attached: bool,
}

impl TrailingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn structural_attached(&self) -> bool {
        self.structural_attached
    }

    pub fn increment(&mut self) -> usize {
        self.active_count += 1;
        self.active_count
    }

    /// Decrement, clamped at zero. A decrement at zero means enable/disable
    /// calls were mismatched somewhere; it is logged and ignored.
    pub fn decrement(&mut self) -> usize {
        if self.active_count == 0 {
            warn!(target: "trailing", "active_count_underflow_clamped");
            return 0;
        }
        self.active_count -= 1;
        self.active_count
    }

    /// Record that the structural listener must be attached. Returns true when
    /// the caller has to actually attach it.
    pub fn claim_structural(&mut self) -> bool {
        if self.structural_attached {
            return false;
        }
        self.structural_attached = true;
        true
    }

    /// Returns true when the count reached zero and the listener was attached,
    /// meaning the caller has to detach it now.
    pub fn release_structural_if_idle(&mut self) -> bool {
        if self.active_count == 0 && self.structural_attached {
            self.structural_attached = false;
            return true;
        }
        false
    }
}
