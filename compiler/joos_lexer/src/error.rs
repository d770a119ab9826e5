//! Lexical error types.

use joos_diagnostic::{Diagnostic, ErrorCode};
use joos_ir::Position;
use thiserror::Error;

/// A fatal lexical failure. The first error aborts the current source unit;
/// nothing is retried and no tokens after the failure point are emitted.
#[derive(Debug, Error)]
pub enum LexError {
    /// No automaton accepted any prefix at this position.
    #[error("{pos}: unrecognized character sequence starting at {snippet:?}")]
    UnrecognizedCharacter { pos: Position, snippet: String },

    /// A byte outside 7-bit ASCII was read.
    #[error("{pos}: non-ASCII byte 0x{byte:02X} in input")]
    NonAsciiInput { pos: Position, byte: u8 },

    /// A decimal integer literal exceeds 2^31.
    #[error("{pos}: integer literal {lexeme} out of range")]
    IntOutOfRange { pos: Position, lexeme: String },

    /// The underlying reader failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl LexError {
    /// Position of the failure, when one exists.
    pub fn pos(&self) -> Option<Position> {
        match self {
            LexError::UnrecognizedCharacter { pos, .. }
            | LexError::NonAsciiInput { pos, .. }
            | LexError::IntOutOfRange { pos, .. } => Some(*pos),
            LexError::Io(_) => None,
        }
    }

    /// Convert into a structured diagnostic for the named source unit.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let code = match self {
            LexError::UnrecognizedCharacter { .. } => ErrorCode::UnrecognizedCharacter,
            LexError::NonAsciiInput { .. } => ErrorCode::NonAsciiInput,
            LexError::IntOutOfRange { .. } => ErrorCode::IntOutOfRange,
            LexError::Io(_) => ErrorCode::Io,
        };
        let mut diag = Diagnostic::error(code, self.to_string()).in_source(source);
        if let Some(pos) = self.pos() {
            diag = diag.at(pos);
        }
        diag
    }
}
