//! The batch compiler driver.
//!
//! One [`Compiler`] loads the serialized grammar table once and processes
//! any number of source units sequentially: tokenize eagerly, parse, hand
//! the syntax tree to the caller. Every failure is surfaced as a
//! [`Diagnostic`] naming the offending file; the first failed unit stops
//! the batch.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Once;

use joos_diagnostic::Diagnostic;
use joos_ir::{Node, SourceId, Token};
use joos_lexer::{LexError, Lexer};
use joos_parse::{ParseTable, Parser};
use tracing::debug;

/// Exit status for a clean batch.
pub const EXIT_OK: i32 = 0;
/// Conventional exit status for a rejected source unit.
pub const EXIT_REJECTED: i32 = 42;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call once at startup; safe to call again. Enable with
/// `RUST_LOG=joosc=debug` or `RUST_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// A loaded grammar plus the standard tokenizer, ready to process units.
pub struct Compiler {
    lexer: Lexer,
    table: ParseTable,
    table_name: String,
}

impl Compiler {
    /// Load the serialized grammar table from `path` and validate it
    /// against the construction rules.
    pub fn load(path: &Path) -> Result<Self, Diagnostic> {
        let name = path.display().to_string();
        let file = File::open(path)
            .map_err(|e| joos_parse::TableError::Io(e).to_diagnostic(&name))?;
        let table = ParseTable::load(file).map_err(|e| e.to_diagnostic(&name))?;
        Compiler::from_table(table, name)
    }

    /// Wrap an already-loaded table. `table_name` labels table-related
    /// diagnostics.
    pub fn from_table(table: ParseTable, table_name: impl Into<String>) -> Result<Self, Diagnostic> {
        let table_name = table_name.into();
        // Bind once up front so a table that disagrees with the rules is
        // rejected before any source unit is read.
        Parser::new(&table).map_err(|e| e.to_diagnostic(&table_name))?;
        Ok(Compiler {
            lexer: Lexer::joos(),
            table,
            table_name,
        })
    }

    /// Tokenize one source unit. `name` labels diagnostics.
    pub fn tokenize<R: Read>(
        &self,
        source: SourceId,
        name: &str,
        input: R,
    ) -> Result<Vec<Token>, Diagnostic> {
        let tokens = self
            .lexer
            .tokenize(source, input)
            .map_err(|e| e.to_diagnostic(name))?;
        debug!(unit = name, count = tokens.len(), "tokenized");
        Ok(tokens)
    }

    /// Parse one tokenized source unit into its syntax tree root.
    pub fn parse(&self, name: &str, tokens: &[Token]) -> Result<Node, Diagnostic> {
        let parser = Parser::new(&self.table).map_err(|e| e.to_diagnostic(&self.table_name))?;
        let root = parser.parse(tokens).map_err(|e| e.to_diagnostic(name))?;
        debug!(unit = name, "parsed");
        Ok(root)
    }

    /// Tokenize and parse one source unit.
    pub fn compile_source<R: Read>(
        &self,
        source: SourceId,
        name: &str,
        input: R,
    ) -> Result<Node, Diagnostic> {
        let tokens = self.tokenize(source, name, input)?;
        self.parse(name, &tokens)
    }

    /// Compile one source file.
    pub fn compile_file(&self, source: SourceId, path: &Path) -> Result<Node, Diagnostic> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| LexError::Io(e).to_diagnostic(&name))?;
        self.compile_source(source, &name, file)
    }
}
