//! Line/column source positions.
//!
//! Joos sources are small ASCII files, so positions are tracked as 1-based
//! line and column numbers rather than byte offsets. Diagnostics print them
//! directly.

use std::fmt;

/// A 1-based (line, column) position in one source unit.
///
/// `Position::UNKNOWN` marks values that have no meaningful location, such
/// as nodes produced by reducing an empty right-hand side.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    /// Position for synthetic values with no source location.
    pub const UNKNOWN: Position = Position { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }

    /// True for positions that do not point into the source.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_is_line_colon_col() {
        assert_eq!(Position::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn unknown_displays_placeholder() {
        assert_eq!(Position::UNKNOWN.to_string(), "<unknown>");
        assert!(Position::UNKNOWN.is_unknown());
        assert!(!Position::new(1, 1).is_unknown());
    }
}
