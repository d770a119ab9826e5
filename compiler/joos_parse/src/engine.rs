//! The shift-reduce engine.
//!
//! [`Parser::new`] binds a validated table to the construction rule
//! registry, resolving every production to either a typed build function or
//! the generic fold. [`Parser::parse`] then drives the table over an eagerly
//! tokenized source unit: for each lookahead it applies every enabled
//! reduction, then shifts; acceptance happens when the `Eof` lookahead
//! arrives with a single start-symbol value left on the stack.

use joos_ir::{Node, Position, Token, TokenKind};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::error::ParseError;
use crate::rules::{self, BuildFn};
use crate::table::{NtId, ParseAction, ParseTable, Symbol, TableError};

/// How one production builds its node, resolved at bind time.
#[derive(Copy, Clone)]
enum Binding {
    Typed(BuildFn),
    Fold,
}

/// A table-driven LR parser bound to one parse table.
///
/// Stateless across invocations: one `Parser` can parse any number of token
/// sequences.
pub struct Parser<'t> {
    table: &'t ParseTable,
    /// Indexed by production, same order as the table's production list.
    bindings: Vec<Binding>,
}

impl<'t> Parser<'t> {
    /// Bind `table` to the construction rules.
    ///
    /// Every production whose left-hand side has a registered rule must have
    /// a right-hand-side length the rule declares; a mismatch means the
    /// table was generated for a different grammar and is rejected here
    /// rather than failing mid-parse.
    pub fn new(table: &'t ParseTable) -> Result<Self, TableError> {
        let registry = rules::registry();
        let mut bindings = Vec::with_capacity(table.productions().len());
        for (index, production) in table.productions().iter().enumerate() {
            let name = table.nonterminal_name(production.lhs);
            match registry.get(name) {
                Some(rule) if rule.arities.contains(&production.rhs.len()) => {
                    bindings.push(Binding::Typed(rule.build));
                }
                Some(rule) => {
                    return Err(TableError::Invalid {
                        message: format!(
                            "production {index}: {name} with {} symbols does not match \
                             its construction rule (expected one of {:?})",
                            production.rhs.len(),
                            rule.arities
                        ),
                    });
                }
                None => bindings.push(Binding::Fold),
            }
        }
        Ok(Parser { table, bindings })
    }

    /// Parse one tokenized source unit into its syntax tree root.
    ///
    /// `tokens` is the tokenizer's output: the full ordered sequence,
    /// terminated by an `Eof` token.
    pub fn parse(&self, tokens: &[Token]) -> Result<Node, ParseError> {
        let mut states: SmallVec<[u32; 64]> = smallvec![0];
        let mut values: Vec<(Symbol, Node)> = Vec::new();
        let mut accepted = false;

        'tokens: for token in tokens {
            let lookahead = Symbol::Terminal(token.kind);
            loop {
                let state = states[states.len() - 1];
                match self.table.action(state, lookahead) {
                    Some(ParseAction::Reduce(production)) => {
                        self.reduce(production, &mut states, &mut values)?;
                    }
                    Some(ParseAction::Shift(next)) => {
                        trace!(state, kind = %token.kind, next, "shift");
                        states.push(next);
                        values.push((lookahead, Node::terminal(token.clone())));
                        break;
                    }
                    None => {
                        if token.kind == TokenKind::Eof && self.at_accept(&values) {
                            accepted = true;
                            break 'tokens;
                        }
                        return Err(ParseError::UnexpectedToken {
                            pos: token.pos,
                            kind: token.kind,
                            lexeme: token.lexeme.clone(),
                        });
                    }
                }
            }
        }

        if accepted {
            if let Some((_, root)) = values.pop() {
                trace!(root = %root, "accept");
                return Ok(root);
            }
        }
        // Ran out of tokens without reaching acceptance.
        match tokens.last() {
            Some(last) => Err(ParseError::UnexpectedToken {
                pos: last.pos,
                kind: last.kind,
                lexeme: last.lexeme.clone(),
            }),
            None => Err(ParseError::UnexpectedToken {
                pos: Position::UNKNOWN,
                kind: TokenKind::Eof,
                lexeme: "$".to_owned(),
            }),
        }
    }

    /// A single value remains and it is the start symbol.
    fn at_accept(&self, values: &[(Symbol, Node)]) -> bool {
        match values {
            [(symbol, _)] => *symbol == Symbol::NonTerminal(self.table.start()),
            _ => false,
        }
    }

    /// Pop one production's right-hand side, build its node, and take the
    /// goto transition for its left-hand side.
    fn reduce(
        &self,
        production: u32,
        states: &mut SmallVec<[u32; 64]>,
        values: &mut Vec<(Symbol, Node)>,
    ) -> Result<(), ParseError> {
        let rule = self.table.production(production);
        let arity = rule.rhs.len();
        let lhs = rule.lhs;
        let name = self.table.nonterminal_name(lhs);
        trace!(production, lhs = name, arity, "reduce");

        if values.len() < arity {
            return Err(ParseError::Inconsistent(format!(
                "reducing {name} pops {arity} values but only {} are on the stack",
                values.len()
            )));
        }
        let children: Vec<Node> = values.drain(values.len() - arity..).map(|(_, n)| n).collect();
        states.truncate(states.len() - arity);

        let pos = children.first().map_or(Position::UNKNOWN, |c| c.pos);
        let node = match self.bindings[production as usize] {
            Binding::Typed(build) => build(pos, children)
                .map_err(|e| ParseError::Inconsistent(format!("{name}: {e}")))?,
            Binding::Fold => rules::fold_seq(name, pos, children),
        };

        let state = states[states.len() - 1];
        let symbol = Symbol::NonTerminal(lhs);
        match self.table.action(state, symbol) {
            Some(ParseAction::Shift(next)) => {
                states.push(next);
                values.push((symbol, node));
                Ok(())
            }
            _ => Err(ParseError::Inconsistent(format!(
                "no goto from state {state} on {name}"
            ))),
        }
    }
}
