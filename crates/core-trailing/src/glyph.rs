//! Margin glyph construction.

use core_state::{Face, GlyphSegment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphOptions {
    /// Marker text painted in the margin.
    pub marker: String,
    /// Append the next line number when the document shows line numbers.
    pub show_line_number: bool,
}

impl Default for GlyphOptions {
    fn default() -> Self {
        Self {
            marker: "\u{23CE}".to_string(),
            show_line_number: true,
        }
    }
}

/// Build the glyph for the empty line numbered `next_line` (1-based).
///
/// The number suffix needs both the option and the document's current
/// line-number display; either one off yields the bare marker.
pub fn build_glyph(opts: &GlyphOptions, next_line: usize, line_numbers_active: bool) -> Vec<GlyphSegment> {
    let mut segments = vec![GlyphSegment::new(opts.marker.clone(), Face::TrailingNewlineMarker)];
    if opts.show_line_number && line_numbers_active {
        segments.push(GlyphSegment::new(
            format!(" {next_line}"),
            Face::TrailingNewlineNumber,
        ));
    }
    segments
}
