//! Lexer for the Joos compiler.
//!
//! One deterministic finite automaton per lexical category, combined by a
//! single maximal-munch tokenizer: every automaton runs from the same mark,
//! the longest match wins, and equal-length matches go to the automaton
//! listed earlier in the priority order (keywords before identifiers).
//! Layout categories (whitespace, comments) are consumed but suppressed
//! from the emitted stream.

mod automaton;
mod categories;
mod error;
mod lexer;

pub use automaton::{Action, Automaton, AutomatonMatch, Predicate, State, Transition};
pub use categories::standard_automata;
pub use error::LexError;
pub use lexer::Lexer;
