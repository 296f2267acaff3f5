//! Clean-text accumulator used while walking a markup tree.
//!
//! Text runs are normalized as they arrive, so the buffer is always in
//! normalized form: no leading or trailing whitespace, single spaces only.
//! Whitespace is held back as a pending separator and only written once the
//! next visible character arrives.

use crate::text_normalizer::strip_symbols;

/// Position in the accumulated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    byte: usize,
    chars: usize,
}

#[derive(Debug, Default)]
pub(crate) struct TextAccumulator {
    out: String,
    char_len: usize,
    pending_space: bool,
}

impl TextAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a raw text run
    pub(crate) fn push(&mut self, raw: &str) {
        for c in strip_symbols(raw).chars() {
            if c.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.out.is_empty() {
                self.out.push(' ');
                self.char_len += 1;
            }
            self.pending_space = false;
            self.out.push(c);
            self.char_len += 1;
        }
    }

    /// Force a word boundary before the next visible character
    pub(crate) fn boundary(&mut self) {
        self.pending_space = true;
    }

    /// Current length in characters
    pub(crate) fn offset(&self) -> usize {
        self.char_len
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            byte: self.out.len(),
            chars: self.char_len,
        }
    }

    /// Character range and text written since `mark`, without the separator
    /// that may have been emitted in front of it
    pub(crate) fn since(&self, mark: Mark) -> (usize, usize, &str) {
        let mut start = mark;
        if self.out[start.byte..].starts_with(' ') {
            start.byte += 1;
            start.chars += 1;
        }
        (start.chars, self.char_len, &self.out[start.byte..])
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
