//! The diagnostic value itself.

use std::fmt;

use joos_ir::Position;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A structured diagnostic: severity, code, message, and location.
///
/// `source` is the display name of the source unit (the path the driver
/// opened, or the grammar artifact for table errors). `pos` is absent for
/// failures with no meaningful position, such as a malformed table.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub source: String,
    pub pos: Option<Position>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
            source: String::new(),
            pos: None,
        }
    }

    /// Attach the source unit's display name.
    #[must_use]
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Attach a position.
    #[must_use]
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = Some(pos);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: ", self.severity, self.code)?;
        if !self.source.is_empty() {
            write!(f, "{}", self.source)?;
            if let Some(pos) = self.pos {
                write!(f, ":{pos}")?;
            }
            write!(f, ": ")?;
        }
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_includes_code_source_and_position() {
        let d = Diagnostic::error(ErrorCode::UnexpectedToken, "unexpected token RPAREN")
            .in_source("A.java")
            .at(Position::new(3, 7));
        assert_eq!(
            d.to_string(),
            "error[E0102]: A.java:3:7: unexpected token RPAREN"
        );
    }

    #[test]
    fn display_without_location() {
        let d = Diagnostic::error(ErrorCode::MalformedTable, "dangling state 9");
        assert_eq!(d.to_string(), "error[E0101]: dangling state 9");
    }
}
