//! Character-by-character reveal cursor.

/// Tracks how much of a line has been revealed.
///
/// The revealed part is always a prefix of the full text and always ends on
/// a character boundary, so multi-byte text reveals one glyph per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Typewriter {
    full: String,
    /// Byte length of the revealed prefix.
    cursor: usize,
}

impl Typewriter {
    /// Starts a reveal of `text` with nothing shown.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            full: text.into(),
            cursor: 0,
        }
    }

    /// Reveals one more character and returns it, or `None` once the whole
    /// text is visible.
    pub fn step(&mut self) -> Option<char> {
        let next = self.full[self.cursor..].chars().next()?;
        self.cursor += next.len_utf8();
        Some(next)
    }

    /// Reveals the remaining text at once.
    pub fn finish(&mut self) {
        self.cursor = self.full.len();
    }

    /// The currently visible prefix.
    #[must_use]
    pub fn revealed(&self) -> &str {
        &self.full[..self.cursor]
    }

    /// Returns `true` when nothing is left to reveal.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor == self.full.len()
    }
}
