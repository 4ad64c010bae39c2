//! Face to terminal style mapping.
//!
//! Terminals have no per-cell font size, so the relative height of the
//! number face is approximated with the dim attribute on top of the inherited
//! colour.

use core_state::Face;
use crossterm::style::{Attribute, Color, ContentStyle};

/// Terminal style for a face, resolved through its inheritance chain.
pub fn face_style(face: Face) -> ContentStyle {
    let mut style = match face.inherits() {
        Some(parent) => face_style(parent),
        None => ContentStyle::new(),
    };
    match face {
        Face::LineNumber => {
            style.foreground_color = Some(Color::DarkGrey);
        }
        Face::TrailingNewlineMarker => {}
        Face::TrailingNewlineNumber => {
            if face.relative_height() < 1.0 {
                style.attributes.set(Attribute::Dim);
            }
        }
    }
    style
}
