//! Stable error codes for searchability.

use std::fmt;

/// One code per distinct failure the front end can report.
///
/// `E00xx` are lexical, `E01xx` syntactic, `E02xx` driver/environment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// A byte outside 7-bit ASCII was read.
    NonAsciiInput,
    /// No automaton accepted any prefix at the current position.
    UnrecognizedCharacter,
    /// An integer literal exceeds the representable range.
    IntOutOfRange,
    /// The serialized parsing table is internally inconsistent.
    MalformedTable,
    /// The parser has no action for the current (state, lookahead) pair.
    UnexpectedToken,
    /// A source unit or grammar artifact could not be read.
    Io,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NonAsciiInput => "E0001",
            ErrorCode::UnrecognizedCharacter => "E0002",
            ErrorCode::IntOutOfRange => "E0003",
            ErrorCode::MalformedTable => "E0101",
            ErrorCode::UnexpectedToken => "E0102",
            ErrorCode::Io => "E0201",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
