//! Table-driven LR parsing for Joos.
//!
//! The grammar lives outside the binary: a serialized parse table
//! ([`ParseTable`]) is loaded and validated at startup, a [`Parser`] binds
//! it to the per-production construction rules, and each tokenized source
//! unit is reduced bottom-up into a typed [`joos_ir::Node`] tree.

mod engine;
mod error;
mod rules;
mod table;

pub use engine::Parser;
pub use error::ParseError;
pub use table::{NtId, ParseAction, ParseTable, Production, Symbol, TableError};
