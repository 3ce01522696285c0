use serde::{Deserialize, Serialize};

/// Byte-offset span in source code, tagged with the 1-based line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// Zero-width span at `offset`.
    pub fn point(offset: usize, line: usize) -> Self {
        Self { start: offset, end: offset, line }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0, line: 0 }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`; keeps the earlier line.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: if self.start <= other.start { self.line } else { other.line },
        }
    }
}
