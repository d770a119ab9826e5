//! Deterministic finite automaton model.
//!
//! An [`Automaton`] is an immutable description of one lexical category:
//! states (plain indices, accepting flag) and per-state ordered transition
//! lists. A transition matches either a literal character or a named
//! character class ([`Predicate`]), and may carry an [`Action`] that appends
//! transformed bytes to the match's value buffer — this is how escape
//! sequences in char and string literals are decoded during matching.
//!
//! [`Automaton::run`] realizes maximal munch with backtrack-to-last-accept
//! for a single category: it consumes characters greedily and reports the
//! longest prefix that ended in an accepting state.

use joos_ir::TokenKind;
use joos_lexer_core::{CharStream, CharStreamError};
use std::io::Read;

/// Character predicate on a transition: a literal or a named class.
///
/// Classes are explicit tags rather than reserved character values, so the
/// predicate space can never collide with real input.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Predicate {
    /// Exactly this character.
    Literal(char),
    /// `[A-Za-z_$]`.
    Letter,
    /// `[0-9]`.
    Digit,
    /// `[1-9]`.
    NonZeroDigit,
    /// A named escape code character: one of `btnfr"'\`.
    EscapeCode,
    /// Space, tab, newline, or carriage return.
    Whitespace,
    /// Anything except `"`, `\`, or a line break.
    AnyButQuote,
    /// Anything except `'`, `\`, or a line break.
    AnyButApostrophe,
    /// Anything except `*`.
    AnyButStar,
    /// Anything except `*` or `/`.
    AnyButStarSlash,
    /// `[0-3]` (first digit of a three-digit octal escape).
    ZeroToThree,
    /// `[4-7]`.
    FourToSeven,
    /// `[0-7]`.
    OctalDigit,
    /// Anything except a line break.
    RestOfLine,
}

impl Predicate {
    /// Whether the predicate accepts `c`.
    pub fn matches(self, c: char) -> bool {
        match self {
            Predicate::Literal(l) => c == l,
            Predicate::Letter => c.is_ascii_alphabetic() || c == '_' || c == '$',
            Predicate::Digit => c.is_ascii_digit(),
            Predicate::NonZeroDigit => ('1'..='9').contains(&c),
            Predicate::EscapeCode => matches!(c, 'b' | 't' | 'n' | 'f' | 'r' | '"' | '\'' | '\\'),
            Predicate::Whitespace => matches!(c, ' ' | '\t' | '\n' | '\r'),
            Predicate::AnyButQuote => !matches!(c, '"' | '\\' | '\n' | '\r'),
            Predicate::AnyButApostrophe => !matches!(c, '\'' | '\\' | '\n' | '\r'),
            Predicate::AnyButStar => c != '*',
            Predicate::AnyButStarSlash => c != '*' && c != '/',
            Predicate::ZeroToThree => ('0'..='3').contains(&c),
            Predicate::FourToSeven => ('4'..='7').contains(&c),
            Predicate::OctalDigit => ('0'..='7').contains(&c),
            Predicate::RestOfLine => c != '\n' && c != '\r',
        }
    }
}

/// Value-buffer action attached to a transition.
///
/// The run loop owns the scratch state (the octal accumulator); actions are
/// pure tags, so automata stay immutable and shareable.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Action {
    /// Append the consumed character as-is.
    AppendChar,
    /// Append the byte a named escape code stands for (`n` -> 0x0A, ...).
    AppendEscape,
    /// Append the numeric value of a decimal digit (integer literals).
    AppendDigit,
    /// Start the octal accumulator with this digit.
    OctalFirst,
    /// Fold another digit into the octal accumulator.
    OctalFold,
    /// Append the accumulator (octal escape terminated by a delimiter).
    OctalFlush,
    /// Append the accumulator, then the consumed character (octal escape
    /// terminated by an ordinary body character).
    OctalFlushChar,
}

/// One automaton state. Identity is its index within the owning automaton.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct State {
    pub accepting: bool,
}

/// A transition out of a state, tried in declaration order.
#[derive(Copy, Clone, Debug)]
pub struct Transition {
    pub on: Predicate,
    pub to: usize,
    pub action: Option<Action>,
}

/// The longest prefix an automaton accepted, plus its decoded payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonMatch {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: Vec<u8>,
}

impl AutomatonMatch {
    /// Number of characters consumed by this match.
    #[inline]
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    /// True only for a zero-length match (an accepting initial state).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }
}

/// Immutable DFA for one lexical category.
pub struct Automaton {
    kind: TokenKind,
    states: Vec<State>,
    /// Outgoing transitions per state, in declaration order (first match
    /// wins, which lets literal edges shadow class edges).
    transitions: Vec<Vec<Transition>>,
}

impl Automaton {
    /// Build an automaton from accepting flags and a flat transition list.
    ///
    /// State 0 is the initial state. Transition order is preserved per
    /// source state.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if a transition references a state out of
    /// range; automata are compiled-in data, so this is a programming error,
    /// not an input error.
    pub fn new(
        kind: TokenKind,
        accepting: &[bool],
        edges: Vec<(usize, Predicate, usize, Option<Action>)>,
    ) -> Self {
        let states: Vec<State> = accepting.iter().map(|&a| State { accepting: a }).collect();
        let mut transitions: Vec<Vec<Transition>> = vec![Vec::new(); states.len()];
        for (from, on, to, action) in edges {
            debug_assert!(from < states.len() && to < states.len());
            transitions[from].push(Transition { on, to, action });
        }
        Automaton {
            kind,
            states,
            transitions,
        }
    }

    /// The token category this automaton accepts.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Number of states (diagnostics only).
    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Greedily consume characters from `src` and report the longest
    /// accepted prefix, or `None` if no accepting state was ever reached.
    ///
    /// The read cursor is left wherever scanning stopped; the caller rewinds
    /// to the mark before trying the next automaton and commits the winning
    /// length afterwards.
    pub fn run<R: Read>(
        &self,
        src: &mut CharStream<R>,
    ) -> Result<Option<AutomatonMatch>, CharStreamError> {
        let mut state = 0usize;
        let mut image = String::new();
        let mut value: Vec<u8> = Vec::new();
        let mut octal: u8 = 0;
        // Longest accepted prefix so far: (image length, value length).
        let mut best: Option<(usize, usize)> = None;

        loop {
            if self.states[state].accepting {
                best = Some((image.len(), value.len()));
            }
            let c = match src.next() {
                Ok(c) => c,
                Err(CharStreamError::EndOfInput) => break,
                Err(e) => return Err(e),
            };
            let Some(tr) = self.transitions[state].iter().find(|t| t.on.matches(c)) else {
                break;
            };
            if let Some(action) = tr.action {
                apply(action, c, &mut value, &mut octal);
            }
            state = tr.to;
            image.push(c);
        }

        let Some((image_len, value_len)) = best else {
            return Ok(None);
        };
        image.truncate(image_len);
        value.truncate(value_len);
        Ok(Some(AutomatonMatch {
            kind: self.kind,
            lexeme: image,
            value,
        }))
    }
}

/// Apply one transition action to the value buffer.
fn apply(action: Action, c: char, value: &mut Vec<u8>, octal: &mut u8) {
    match action {
        Action::AppendChar => value.push(c as u8),
        Action::AppendEscape => value.push(decode_escape(c)),
        Action::AppendDigit => value.push(c as u8 - b'0'),
        Action::OctalFirst => *octal = c as u8 - b'0',
        Action::OctalFold => *octal = (*octal << 3) + (c as u8 - b'0'),
        Action::OctalFlush => value.push(*octal),
        Action::OctalFlushChar => {
            value.push(*octal);
            value.push(c as u8);
        }
    }
}

/// The byte a named escape code stands for.
fn decode_escape(c: char) -> u8 {
    match c {
        'b' => 0x08,
        't' => b'\t',
        'n' => b'\n',
        'f' => 0x0C,
        'r' => b'\r',
        '"' => b'"',
        '\'' => b'\'',
        '\\' => b'\\',
        // Unreachable for transitions guarded by `Predicate::EscapeCode`;
        // pass other characters through unchanged.
        other => other as u8,
    }
}
