//! Byte ↔ character offset conversion.
//!
//! The graph stores byte offsets so spans slice `&str` directly. The
//! interchange format counts characters:
//!
//! ```text
//!   Text:   "Pt's café hx"
//!   bytes:   0123456789AB C      ('é' = 2 bytes, bytes 8-9)
//!   chars:   0123456789AB        (one index per char)
//! ```
//!
//! [`OffsetConverter`] precomputes both tables once per document so each
//! conversion is O(1); ASCII documents skip the tables entirely.

use crate::Span;

/// Precomputed byte/char tables for one text.
#[derive(Debug, Clone)]
pub struct OffsetConverter {
    byte_to_char: Vec<usize>,
    char_to_byte: Vec<usize>,
    is_ascii: bool,
    byte_len: usize,
}

impl OffsetConverter {
    /// Build a converter for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                byte_to_char: Vec::new(),
                char_to_byte: Vec::new(),
                is_ascii: true,
                byte_len: text.len(),
            };
        }

        let mut byte_to_char = vec![0usize; text.len() + 1];
        let mut char_to_byte = Vec::with_capacity(text.len() + 1);
        for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
            for slot in &mut byte_to_char[byte_idx..byte_idx + ch.len_utf8()] {
                *slot = char_idx;
            }
            char_to_byte.push(byte_idx);
        }
        byte_to_char[text.len()] = char_to_byte.len();
        char_to_byte.push(text.len());

        Self {
            byte_to_char,
            char_to_byte,
            is_ascii: false,
            byte_len: text.len(),
        }
    }

    /// Number of characters in the text.
    #[must_use]
    pub fn char_len(&self) -> usize {
        if self.is_ascii {
            self.byte_len
        } else {
            self.char_to_byte.len() - 1
        }
    }

    /// Character index of a byte offset (clamped to the end of the text).
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx.min(self.byte_len)
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or_else(|| self.char_len())
        }
    }

    /// Byte offset of a character index, `None` past the end.
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> Option<usize> {
        if self.is_ascii {
            (char_idx <= self.byte_len).then_some(char_idx)
        } else {
            self.char_to_byte.get(char_idx).copied()
        }
    }

    /// Convert a byte span into `(char_begin, char_end)`.
    #[must_use]
    pub fn to_chars(&self, span: Span) -> (usize, usize) {
        (self.byte_to_char(span.begin), self.byte_to_char(span.end))
    }

    /// Convert character offsets into a byte span.
    #[must_use]
    pub fn from_chars(&self, char_begin: usize, char_end: usize) -> Option<Span> {
        Some(Span::new(
            self.char_to_byte(char_begin)?,
            self.char_to_byte(char_end)?,
        ))
    }
}
