//! Row composition for a single document.
//!
//! Layout of each row: `[left margin][line number column][text]`.
//! * The left margin is as wide as the widest left-margin decoration of the
//!   document (zero when there are none); narrower content is right-padded
//!   and a single space separates it from whatever follows on the row.
//! * The line-number column is present only while the document shows line
//!   numbers; it is right-aligned to the digit count of the last line, then a
//!   single space unless the row has no text.
//! * A buffer ending in `\n` yields one extra empty row; that is where an
//!   end-of-buffer decoration lands.
//!
//! Decorations anchored past the end (a stale anchor left behind when events
//! were missed) clamp to the last row rather than being dropped.

use crate::style::face_style;
use core_events::DocumentId;
use core_state::{Face, GlyphSegment, MarginSide, Workspace};
use core_text::display_width;
use crossterm::style::{PrintStyledContent, StyledContent};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub margin: Vec<GlyphSegment>,
    /// 1-based line number when the column is shown.
    pub number: Option<usize>,
    pub text: String,
}

/// Composition result plus the column widths needed to format it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedView {
    pub rows: Vec<RenderedRow>,
    pub margin_width: usize,
    pub number_width: usize,
}

/// Build rows for `doc`. `None` when the document is unknown.
pub fn compose(ws: &Workspace, doc: DocumentId) -> Option<ComposedView> {
    let document = ws.document(doc)?;
    let buffer = &document.buffer;
    let line_count = buffer.line_count();

    let mut rows: Vec<RenderedRow> = (0..line_count)
        .map(|idx| RenderedRow {
            margin: Vec::new(),
            number: document.line_numbers.then_some(idx + 1),
            text: buffer.line_content(idx),
        })
        .collect();

    let mut margin_width = 0usize;
    for (_, deco) in ws.decorations.for_document(doc) {
        if deco.side != MarginSide::Left {
            continue;
        }
        let row = buffer.line_of_char(deco.anchor);
        if let Some(target) = rows.get_mut(row) {
            target.margin.extend(deco.content.iter().cloned());
            let width: usize = target.margin.iter().map(|s| display_width(&s.text)).sum();
            margin_width = margin_width.max(width);
        }
    }

    let number_width = if document.line_numbers {
        line_count.max(1).to_string().len()
    } else {
        0
    };
    tracing::trace!(target: "render", doc = %doc, rows = rows.len(), margin_width, "view_composed");
    Some(ComposedView {
        rows,
        margin_width,
        number_width,
    })
}

fn margin_text(row: &RenderedRow) -> String {
    row.margin.iter().map(|s| s.text.as_str()).collect()
}

fn number_text(view: &ComposedView, row: &RenderedRow) -> String {
    match row.number {
        Some(n) if row.text.is_empty() => format!("{:>width$}", n, width = view.number_width),
        Some(n) => format!("{:>width$} ", n, width = view.number_width),
        None => String::new(),
    }
}

fn separator(view: &ComposedView, number: &str, row: &RenderedRow) -> &'static str {
    if view.margin_width > 0 && !(number.is_empty() && row.text.is_empty()) {
        " "
    } else {
        ""
    }
}

/// Plain text rendering (no escape sequences), one string per row.
pub fn to_plain(view: &ComposedView) -> Vec<String> {
    view.rows
        .iter()
        .map(|row| {
            let margin = margin_text(row);
            let number = number_text(view, row);
            if separator(view, &number, row).is_empty() {
                return format!("{margin}{number}{}", row.text);
            }
            let pad = view.margin_width.saturating_sub(display_width(&margin));
            format!("{margin}{} {number}{}", " ".repeat(pad), row.text)
        })
        .collect()
}

/// Styled rendering through crossterm, one row per line.
pub fn write_styled<W: Write>(out: &mut W, view: &ComposedView) -> anyhow::Result<()> {
    for row in &view.rows {
        let mut used = 0usize;
        for seg in &row.margin {
            used += display_width(&seg.text);
            crossterm::queue!(
                out,
                PrintStyledContent(StyledContent::new(face_style(seg.face), seg.text.as_str()))
            )?;
        }
        let number = number_text(view, row);
        let sep = separator(view, &number, row);
        if !sep.is_empty() {
            let pad = " ".repeat(view.margin_width.saturating_sub(used));
            write!(out, "{pad}{sep}")?;
        }
        if !number.is_empty() {
            crossterm::queue!(
                out,
                PrintStyledContent(StyledContent::new(face_style(Face::LineNumber), number.as_str()))
            )?;
        }
        writeln!(out, "{}", row.text)?;
    }
    out.flush()?;
    Ok(())
}
