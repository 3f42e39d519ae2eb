//! Byte offset <-> (line, column) conversion.
//!
//! Diagnostics in this pipeline are reported as 1-based line and column
//! numbers (see the Error shape in the external-interfaces section of the
//! spec), while every other stage of the pipeline addresses source text by
//! byte offset. `LineMap` bridges the two on demand; nothing in the hot
//! path (lexing, parsing, resolving) ever needs it.

/// A 1-based (line, column) position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in Unicode scalar values.
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Line map for efficient byte-offset <-> `Position` conversion.
///
/// Stores the starting byte offset of every line so offset-to-position
/// lookups are a binary search rather than a linear rescan.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line; `line_starts[0]` is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based `Position`.
    #[must_use]
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = usize::try_from(self.line_starts.get(line).copied().unwrap_or(0))
            .unwrap_or(usize::MAX)
            .min(source.len());
        let clamped_end = usize::try_from(offset).unwrap_or(source.len()).min(source.len());
        let start = line_start.min(clamped_end);
        let column = source.get(start..clamped_end).unwrap_or("").chars().count() as u32 + 1;

        Position { line: line as u32 + 1, column }
    }

    /// Number of lines recorded (always at least 1).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Starting byte offset of a 0-indexed line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_byte_is_line_one_column_one() {
        let map = LineMap::build("abc\ndef");
        assert_eq!(map.offset_to_position(0, "abc\ndef"), Position::new(1, 1));
    }

    #[test]
    fn offset_on_second_line() {
        let src = "abc\ndef";
        let map = LineMap::build(src);
        // 'd' is at byte offset 4, the first byte of line 2.
        assert_eq!(map.offset_to_position(4, src), Position::new(2, 1));
    }

    #[test]
    fn offset_past_newline_within_line() {
        let src = "ab\ncdef";
        let map = LineMap::build(src);
        assert_eq!(map.offset_to_position(6, src), Position::new(2, 4));
    }

    #[test]
    fn counts_unicode_scalars_not_bytes() {
        let src = "café\nx";
        let map = LineMap::build(src);
        // 'x' starts the second line regardless of the multi-byte 'é' above it.
        let pos = map.offset_to_position(src.find('x').unwrap() as u32, src);
        assert_eq!(pos, Position::new(2, 1));
    }

    #[test]
    fn line_count_counts_newlines_plus_one() {
        let map = LineMap::build("a\nb\nc");
        assert_eq!(map.line_count(), 3);
    }
}
