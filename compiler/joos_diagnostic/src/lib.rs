//! Diagnostics for the Joos front end.
//!
//! Lexical and syntactic failures are surfaced as structured [`Diagnostic`]
//! values carrying the source identity, position, error code, and message.
//! The driver decides formatting and exit behavior; nothing in this crate
//! prints or exits.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
