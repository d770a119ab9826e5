//! Low-level character source for the Joos lexer.
//!
//! Standalone by design: external tools can tokenize Joos sources without
//! pulling in the rest of the compiler.

mod char_stream;

pub use char_stream::{CharStream, CharStreamError};
