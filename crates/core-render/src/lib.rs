//! Document rendering: text rows with a left margin and an optional
//! line-number column, plus a one-line status.
//!
//! Rendering is a two-stage pipeline: `view::compose` builds `RenderedRow`s
//! from workspace state (pure data, easy to assert on), then `view::to_plain`
//! or `view::write_styled` turns them into text. Styled output maps host faces
//! to `crossterm` styles through `style::face_style`.

pub mod status;
pub mod style;
pub mod view;

pub use status::{StatusContext, StatusSegment, compose_status, format_status};
pub use view::{ComposedView, RenderedRow, compose, to_plain, write_styled};
