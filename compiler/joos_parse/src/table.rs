//! The serialized parse table.
//!
//! Tables are produced offline by an LR generator and shipped as a
//! line-oriented text file:
//!
//! ```text
//! <terminal count>
//! <terminal name> ...            one per line
//! <nonterminal count>
//! <nonterminal name> ...         one per line
//! <start nonterminal>
//! <production count>
//! <LHS> <RHS symbol> ...         one production per line, RHS may be empty
//! <state count>
//! <transition count>
//! <state> <symbol> shift <state>
//! <state> <symbol> reduce <production>
//! ```
//!
//! Loading validates everything up front: every terminal name must be a
//! known token kind, every symbol must be declared, and every state and
//! production reference must be in range. A table that loads is safe to
//! drive the parser with no further checking per action.

use std::io::Read;
use std::str::FromStr;

use joos_diagnostic::{Diagnostic, ErrorCode};
use joos_ir::TokenKind;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Index of a nonterminal in the table's name list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NtId(pub u32);

/// A grammar symbol: a token kind or a table-local nonterminal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(NtId),
}

/// One production: `lhs -> rhs...`. An empty `rhs` is an epsilon production.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Production {
    pub lhs: NtId,
    pub rhs: Vec<Symbol>,
}

/// A parse action. Nonterminal "shifts" are the goto half of the table.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ParseAction {
    Shift(u32),
    Reduce(u32),
}

/// Failure to load or validate a serialized table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The text does not follow the table format.
    #[error("table line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The table is well-formed but internally inconsistent, or it
    /// disagrees with the registered construction rules.
    #[error("{message}")]
    Invalid { message: String },

    /// The underlying reader failed.
    #[error("i/o error reading table: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Convert into a structured diagnostic for the named table file.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let code = match self {
            TableError::Syntax { .. } | TableError::Invalid { .. } => ErrorCode::MalformedTable,
            TableError::Io(_) => ErrorCode::Io,
        };
        Diagnostic::error(code, self.to_string()).in_source(source)
    }
}

/// A validated LR parse table.
pub struct ParseTable {
    /// Action per (state, symbol); absence means a syntax error on that
    /// lookahead (or, for `Eof`, possibly acceptance).
    states: Vec<FxHashMap<Symbol, ParseAction>>,
    productions: Vec<Production>,
    nonterminal_names: Vec<String>,
    start: NtId,
}

impl ParseTable {
    /// Read and parse a table from `input`.
    pub fn load<R: Read>(mut input: R) -> Result<Self, TableError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        text.parse()
    }

    /// The action for `symbol` in `state`, if the table defines one.
    #[inline]
    pub fn action(&self, state: u32, symbol: Symbol) -> Option<ParseAction> {
        self.states
            .get(state as usize)
            .and_then(|row| row.get(&symbol).copied())
    }

    pub fn production(&self, index: u32) -> &Production {
        &self.productions[index as usize]
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn nonterminal_name(&self, id: NtId) -> &str {
        &self.nonterminal_names[id.0 as usize]
    }

    pub fn start(&self) -> NtId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl FromStr for ParseTable {
    type Err = TableError;

    fn from_str(text: &str) -> Result<Self, TableError> {
        let mut lines = Lines::new(text);

        // Terminals.
        let terminal_count = lines.count("terminal count")?;
        let mut terminals: FxHashMap<&str, TokenKind> = FxHashMap::default();
        for _ in 0..terminal_count {
            let name = lines.next()?;
            let Some(kind) = TokenKind::from_name(name) else {
                return Err(lines.err(format!("unknown terminal {name:?}")));
            };
            if terminals.insert(name, kind).is_some() {
                return Err(lines.err(format!("duplicate terminal {name:?}")));
            }
        }

        // Nonterminals.
        let nonterminal_count = lines.count("nonterminal count")?;
        let mut nonterminal_names = Vec::with_capacity(nonterminal_count);
        let mut nonterminals: FxHashMap<&str, NtId> = FxHashMap::default();
        for i in 0..nonterminal_count {
            let name = lines.next()?;
            if terminals.contains_key(name) {
                return Err(lines.err(format!("{name:?} is declared as both terminal and nonterminal")));
            }
            if nonterminals.insert(name, NtId(i as u32)).is_some() {
                return Err(lines.err(format!("duplicate nonterminal {name:?}")));
            }
            nonterminal_names.push(name.to_owned());
        }

        let resolve = |lines: &Lines<'_>, name: &str| -> Result<Symbol, TableError> {
            if let Some(&kind) = terminals.get(name) {
                Ok(Symbol::Terminal(kind))
            } else if let Some(&id) = nonterminals.get(name) {
                Ok(Symbol::NonTerminal(id))
            } else {
                Err(lines.err(format!("undeclared symbol {name:?}")))
            }
        };

        // Start symbol.
        let start_name = lines.next()?;
        let Some(&start) = nonterminals.get(start_name) else {
            return Err(lines.err(format!("start symbol {start_name:?} is not a nonterminal")));
        };

        // Productions.
        let production_count = lines.count("production count")?;
        let mut productions = Vec::with_capacity(production_count);
        for _ in 0..production_count {
            let line = lines.next()?;
            let mut fields = line.split_whitespace();
            let Some(lhs_name) = fields.next() else {
                return Err(lines.err("empty production line"));
            };
            let Some(&lhs) = nonterminals.get(lhs_name) else {
                return Err(lines.err(format!(
                    "production left-hand side {lhs_name:?} is not a nonterminal"
                )));
            };
            let rhs = fields
                .map(|name| resolve(&lines, name))
                .collect::<Result<Vec<Symbol>, TableError>>()?;
            productions.push(Production { lhs, rhs });
        }

        // Transitions.
        let state_count = lines.count("state count")?;
        let transition_count = lines.count("transition count")?;
        let mut states: Vec<FxHashMap<Symbol, ParseAction>> =
            vec![FxHashMap::default(); state_count];
        for _ in 0..transition_count {
            let line = lines.next()?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [state, symbol, verb, target] = fields[..] else {
                return Err(lines.err(format!("malformed transition {line:?}")));
            };
            let state: usize = state
                .parse()
                .ok()
                .filter(|&s| s < state_count)
                .ok_or_else(|| lines.err(format!("state {state:?} out of range")))?;
            let symbol = resolve(&lines, symbol)?;
            let target: usize = target
                .parse()
                .map_err(|_| lines.err(format!("malformed target {target:?}")))?;
            let action = match verb {
                "shift" if target < state_count => ParseAction::Shift(target as u32),
                "shift" => return Err(lines.err(format!("shift target {target} out of range"))),
                "reduce" if target < production_count => ParseAction::Reduce(target as u32),
                "reduce" => {
                    return Err(lines.err(format!("reduce production {target} out of range")))
                }
                other => return Err(lines.err(format!("unknown action {other:?}"))),
            };
            if states[state].insert(symbol, action).is_some() {
                return Err(lines.err(format!("duplicate action for state {state} on {symbol:?}")));
            }
        }

        // Anything left over means the counts and the content disagree.
        if let Ok(extra) = lines.next() {
            return Err(lines.err(format!("trailing input {extra:?} after transitions")));
        }

        Ok(ParseTable {
            states,
            productions,
            nonterminal_names,
            start,
        })
    }
}

/// Non-blank line reader with position tracking for error reporting.
struct Lines<'a> {
    iter: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            iter: text.lines().enumerate(),
            line: 0,
        }
    }

    /// Next non-blank line, trimmed.
    fn next(&mut self) -> Result<&'a str, TableError> {
        for (i, raw) in self.iter.by_ref() {
            self.line = i + 1;
            let line = raw.trim();
            if !line.is_empty() {
                return Ok(line);
            }
        }
        self.line += 1;
        Err(TableError::Syntax {
            line: self.line,
            message: "unexpected end of table".to_owned(),
        })
    }

    /// Next line parsed as a count.
    fn count(&mut self, what: &str) -> Result<usize, TableError> {
        let line = self.next()?;
        line.parse()
            .map_err(|_| self.err(format!("malformed {what} {line:?}")))
    }

    /// A syntax error at the current line.
    fn err(&self, message: impl Into<String>) -> TableError {
        TableError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests;
