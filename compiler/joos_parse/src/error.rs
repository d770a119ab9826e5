//! Parse failure types.

use joos_diagnostic::{Diagnostic, ErrorCode};
use joos_ir::{Position, TokenKind};
use thiserror::Error;

/// A fatal parse failure. The first error aborts the current source unit.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The table defines no action for this lookahead in the current state.
    #[error("{pos}: unexpected {kind} {lexeme:?}")]
    UnexpectedToken {
        pos: Position,
        kind: TokenKind,
        lexeme: String,
    },

    /// The table drove the engine into a contradiction (stack underflow,
    /// missing goto, a construction rule rejecting its children). The table
    /// passed load-time validation, so this means the file is stale or was
    /// generated for a different grammar.
    #[error("inconsistent parse table: {0}")]
    Inconsistent(String),
}

impl ParseError {
    /// Position of the failure, when one exists.
    pub fn pos(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { pos, .. } => Some(*pos),
            ParseError::Inconsistent(_) => None,
        }
    }

    /// Convert into a structured diagnostic for the named source unit.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let code = match self {
            ParseError::UnexpectedToken { .. } => ErrorCode::UnexpectedToken,
            ParseError::Inconsistent(_) => ErrorCode::MalformedTable,
        };
        let mut diag = Diagnostic::error(code, self.to_string()).in_source(source);
        if let Some(pos) = self.pos() {
            diag = diag.at(pos);
        }
        diag
    }
}
