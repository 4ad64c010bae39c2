//! Rope-based text buffer abstraction.
//!
//! The buffer is intentionally small: the margin indicator only needs to ask
//! "is the last character a newline, and on which line does it sit", while the
//! host workspace needs a handful of edits (append, range delete, wholesale
//! replace for revert). All offsets exposed here are char indices unless a
//! method name says `bytes`.

use anyhow::Result;
use ropey::Rope;

pub mod width;

pub use width::display_width;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("len_chars", &self.rope.len_chars())
            .field("line_count", &self.rope.len_lines())
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of lines in the buffer. A trailing newline contributes one
    /// extra (empty) line, which is exactly the line the margin marker annotates.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Last character of the buffer, `None` when empty.
    pub fn last_char(&self) -> Option<char> {
        let len = self.rope.len_chars();
        if len == 0 {
            return None;
        }
        Some(self.rope.char(len - 1))
    }

    /// True iff the buffer is non-empty and its final character is `\n`.
    pub fn ends_with_newline(&self) -> bool {
        self.last_char() == Some('\n')
    }

    /// Zero-based line index containing the char at `char_idx` (clamped to the
    /// end of the buffer). Only `\n` breaks lines.
    pub fn line_of_char(&self, char_idx: usize) -> usize {
        let idx = char_idx.min(self.rope.len_chars());
        self.rope.char_to_line(idx)
    }

    /// Char offset one past the final character (the anchor for end-of-buffer
    /// decorations).
    pub fn end_offset(&self) -> usize {
        self.rope.len_chars()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Line content without its terminator; empty for out of range indices.
    pub fn line_content(&self, idx: usize) -> String {
        let mut s = self.line(idx).unwrap_or_default();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Append text at the end of the buffer.
    pub fn append(&mut self, text: &str) {
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
    }

    /// Insert text at a char offset (clamped to the buffer end).
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.rope.len_chars());
        self.rope.insert(idx, text);
    }

    /// Delete the chars in `[start,end)` (clamped). Returns the removed text.
    pub fn delete_chars(&mut self, start: usize, end: usize) -> String {
        let total = self.rope.len_chars();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        let removed = self.rope.slice(s..e).to_string();
        self.rope.remove(s..e);
        removed
    }

    /// Delete the final character, if any. Returns it.
    pub fn delete_last(&mut self) -> Option<char> {
        let last = self.last_char()?;
        let len = self.rope.len_chars();
        self.rope.remove(len - 1..len);
        Some(last)
    }

    /// Replace the entire content (used by revert-from-disk style reloads).
    pub fn replace_all(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }

    /// Owned copy of the full content.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lf_breaks_lines() {
        let b = Buffer::from_str("t", "page1\x0cpage2\u{2028}x\u{85}y\u{b}z\n").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_of_char(b.len_chars() - 1), 0);
        assert_eq!(b.line_content(0), "page1\x0cpage2\u{2028}x\u{85}y\u{b}z");
    }

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
        assert_eq!(b.line_content(0), "hello");
    }

    #[test]
    fn trailing_newline_adds_empty_line() {
        let b = Buffer::from_str("t", "line1\nline2\n").unwrap();
        assert_eq!(b.line_count(), 3);
        assert_eq!(b.line(2).unwrap(), "");
        assert!(b.ends_with_newline());
        // final newline char sits on the second line (index 1)
        assert_eq!(b.line_of_char(b.len_chars() - 1), 1);
    }

    #[test]
    fn empty_buffer_has_no_last_char() {
        let b = Buffer::from_str("t", "").unwrap();
        assert!(b.is_empty());
        assert_eq!(b.last_char(), None);
        assert!(!b.ends_with_newline());
        assert_eq!(b.end_offset(), 0);
    }

    #[test]
    fn multibyte_content_uses_char_offsets() {
        let b = Buffer::from_str("t", "héllo😀\n").unwrap();
        assert_eq!(b.len_chars(), 7);
        assert!(b.len_bytes() > b.len_chars());
        assert_eq!(b.last_char(), Some('\n'));
    }

    #[test]
    fn append_and_delete_last() {
        let mut b = Buffer::from_str("t", "abc").unwrap();
        b.append("\n");
        assert!(b.ends_with_newline());
        assert_eq!(b.delete_last(), Some('\n'));
        assert_eq!(b.contents(), "abc");
        let mut empty = Buffer::from_str("t", "").unwrap();
        assert_eq!(empty.delete_last(), None);
    }

    #[test]
    fn delete_chars_clamps() {
        let mut b = Buffer::from_str("t", "abcdef").unwrap();
        assert_eq!(b.delete_chars(4, 100), "ef");
        assert_eq!(b.delete_chars(3, 1), "");
        assert_eq!(b.contents(), "abcd");
    }

    #[test]
    fn replace_all_swaps_content() {
        let mut b = Buffer::from_str("t", "old\n").unwrap();
        b.replace_all("new");
        assert_eq!(b.contents(), "new");
        assert!(!b.ends_with_newline());
    }

    #[test]
    fn insert_clamps_to_end() {
        let mut b = Buffer::from_str("t", "ab").unwrap();
        b.insert(1, "X");
        b.insert(99, "\n");
        assert_eq!(b.contents(), "aXb\n");
    }
}
