//! Trailing-newline margin indicator.
//!
//! A buffer whose last character is `\n` renders one more (empty) visual line
//! than its text suggests. This crate paints a marker glyph in the left margin
//! of that line, optionally followed by the line number the empty line would
//! carry.
//!
//! Pieces:
//! - `TrailingNewlineDecorator`: per-document enable/disable/recompute and the
//!   observer entry points the host integration layer calls (`on_*`).
//! - `TrailingRegistry`: shared context owning the active-document count and the
//!   structural-change listener's attachment state.
//! - `FeatureStates`: per-document enabled flag and decoration handle, kept
//!   outside the host so a mode reassignment cannot clear them.
//! - `DecorationHost`: the seam to the editor (buffers, decorations, hooks).
//!
//! Everything runs synchronously inside the host's event handler. Nothing here
//! returns an error: an unknown document, an empty document, and a document
//! without a trailing newline all simply end up without a decoration.
//!
//! Known limitation: reattachment after a structural change inspects only the
//! content-change hook. If a host strips the save/revert/viewport hooks without
//! touching the content-change hook, those stay detached.

pub mod decorator;
pub mod glyph;
pub mod host;
pub mod registry;
pub mod state;

pub use decorator::{DecoratorStats, LOCAL_HOOKS, ToggleArg, TrailingNewlineDecorator};
pub use glyph::{GlyphOptions, build_glyph};
pub use host::DecorationHost;
pub use registry::TrailingRegistry;
pub use state::{FeatureState, FeatureStates};
