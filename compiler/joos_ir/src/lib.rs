//! Shared front-end types for the Joos compiler.
//!
//! Everything the lexer produces and the parser consumes lives here:
//! source positions, source-unit identities, token kinds, tokens, and the
//! syntax tree handed to semantic analysis. The crate deliberately has no
//! dependencies so external tools (formatters, highlighters) can use it
//! without pulling in the compiler.

pub mod ast;
mod position;
mod token;

pub use ast::{Node, NodeKind};
pub use position::Position;
pub use token::{SourceId, Token, TokenKind};
