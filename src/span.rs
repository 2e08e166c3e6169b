//! Byte-range spans into the source buffer, and offset-to-(line, column)
//! lookup.

/// A half-open byte range `[start, end)` into the source buffer handed to
/// [`crate::compile`].
///
/// Spans are used exclusively for diagnostics; they are never mutated and
/// never outlive the compile call that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

impl Span {
    /// Creates a new span over `[start, end)`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-length span at `offset`, used for end-of-input diagnostics.
    #[must_use]
    pub const fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// The smallest span covering both `self` and `other`.
    #[must_use]
    pub fn encompass(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slices `source` with this span.
    ///
    /// # Panics
    ///
    /// Panics if the span does not land on a char boundary of `source`, or
    /// is out of bounds. Spans produced by [`crate::lex::Lexer`] always
    /// satisfy this.
    #[must_use]
    pub fn slice<'a>(self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A 1-based (line, column) position, counted in chars rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1; counted in chars, not bytes.
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A precomputed index of line-start byte offsets for a source buffer,
/// giving `O(log n)` offset-to-position lookup.
///
/// The lexer tracks line/column incrementally while scanning forward, but
/// diagnostics are sometimes raised against spans assembled out of scan
/// order (an `encompass`ed range covering a whole sub-expression); a
/// `SourceMap` lets those be resolved without rescanning from the start.
pub struct SourceMap<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    /// Builds a source map over `source`, recording the byte offset just
    /// past every `\n`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Resolves a byte offset to a 1-based (line, column) position.
    ///
    /// `offset` is clamped to the source length.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self.source[line_start..offset].chars().count() + 1;
        Position {
            line: line_index + 1,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encompass_takes_the_union() {
        let a = Span::new(4, 8);
        let b = Span::new(2, 5);
        assert_eq!(a.encompass(b), Span::new(2, 8));
    }

    #[test]
    fn position_tracks_lines_and_columns() {
        let src = "ab\ncde\nfg";
        let map = SourceMap::new(src);
        assert_eq!(map.position(0), Position { line: 1, column: 1 });
        assert_eq!(map.position(2), Position { line: 1, column: 3 });
        assert_eq!(map.position(3), Position { line: 2, column: 1 });
        assert_eq!(map.position(7), Position { line: 3, column: 1 });
    }

    #[test]
    fn position_clamps_to_source_end() {
        let src = "abc";
        let map = SourceMap::new(src);
        assert_eq!(map.position(100), map.position(3));
    }
}
