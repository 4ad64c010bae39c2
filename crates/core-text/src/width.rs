//! Display width of short margin strings.
//!
//! Margin glyphs are user-configurable text, so they can be any grapheme
//! sequence. Width is summed per extended grapheme cluster; a cluster never
//! counts as zero cells (combining-only input still occupies a column once
//! painted next to a base).

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Terminal cell width of a single grapheme cluster.
pub fn egc_width(cluster: &str) -> u16 {
    let w = UnicodeWidthStr::width(cluster);
    w.clamp(1, 2) as u16
}

/// Terminal cell width of `text`, summed across grapheme clusters.
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(|g| egc_width(g) as usize).sum()
}
