//! The Joos lexical categories as automata.
//!
//! One constructor per non-trivial category, plus a generic fixed-lexeme
//! automaton covering keywords, separators, and operators. The full
//! priority-ordered set is assembled by [`standard_automata`]; the order
//! follows [`TokenKind::ALL`], which lists every fixed-lexeme category
//! before the identifier automaton so keywords win equal-length ties.

use joos_ir::TokenKind;

use crate::automaton::{Action, Automaton, Predicate};

use Action::{AppendChar, AppendDigit, AppendEscape, OctalFirst, OctalFlush, OctalFlushChar, OctalFold};
use Predicate::{
    AnyButApostrophe, AnyButQuote, AnyButStar, AnyButStarSlash, Digit, EscapeCode, FourToSeven,
    Letter, Literal, NonZeroDigit, OctalDigit, RestOfLine, Whitespace, ZeroToThree,
};

/// All automata in tokenizer priority order. `Eof` has no automaton; the
/// tokenizer appends its token after the input is exhausted.
pub fn standard_automata() -> Vec<Automaton> {
    let mut automata = Vec::new();
    for &kind in TokenKind::ALL {
        let dfa = match kind {
            TokenKind::Whitespace => whitespace(),
            TokenKind::Comment => comment(),
            TokenKind::CharLiteral => char_literal(),
            TokenKind::StrLiteral => string_literal(),
            TokenKind::IntLiteral => int_literal(),
            TokenKind::Id => identifier(),
            TokenKind::Eof => continue,
            other => match other.fixed_lexeme() {
                Some(text) => fixed(other, text),
                // Every remaining kind must carry a fixed lexeme; a None here
                // would mean a category with no way to match it.
                None => continue,
            },
        };
        automata.push(dfa);
    }
    automata
}

/// One or more whitespace characters.
pub fn whitespace() -> Automaton {
    Automaton::new(
        TokenKind::Whitespace,
        &[false, true],
        vec![
            (0, Whitespace, 1, None),
            (1, Whitespace, 1, None),
        ],
    )
}

/// `// ...` to end of line, or a `/* ... */` block.
pub fn comment() -> Automaton {
    Automaton::new(
        TokenKind::Comment,
        // 0 start, 1 saw `/`, 2 line comment (accepting), 3 block body,
        // 4 block body after `*`, 5 closed block (accepting)
        &[false, false, true, false, false, true],
        vec![
            (0, Literal('/'), 1, None),
            // line comment
            (1, Literal('/'), 2, None),
            (2, RestOfLine, 2, None),
            // block comment
            (1, Literal('*'), 3, None),
            (3, Literal('*'), 4, None),
            (3, AnyButStar, 3, None),
            (4, Literal('*'), 4, None),
            (4, Literal('/'), 5, None),
            (4, AnyButStarSlash, 3, None),
        ],
    )
}

/// A keyword, separator, or operator: one state per character.
pub fn fixed(kind: TokenKind, text: &str) -> Automaton {
    debug_assert!(!text.is_empty());
    let len = text.len();
    let mut accepting = vec![false; len + 1];
    accepting[len] = true;
    let edges = text
        .chars()
        .enumerate()
        .map(|(i, c)| (i, Literal(c), i + 1, None))
        .collect();
    Automaton::new(kind, &accepting, edges)
}

/// `'x'` with named and octal escapes, decoded into the value buffer.
pub fn char_literal() -> Automaton {
    Automaton::new(
        TokenKind::CharLiteral,
        // 0 start, 1 open quote, 2 saw the character, 3 saw `\`,
        // 4 named escape, 5..7 octal digits remaining, 8 closed (accepting)
        &[false, false, false, false, false, false, false, false, true],
        vec![
            (0, Literal('\''), 1, None),
            (1, AnyButApostrophe, 2, Some(AppendChar)),
            // named escapes
            (1, Literal('\\'), 3, None),
            (3, EscapeCode, 4, Some(AppendEscape)),
            // octal escapes: a leading 0-3 allows up to three digits
            (3, ZeroToThree, 5, Some(OctalFirst)),
            (3, FourToSeven, 6, Some(OctalFirst)),
            (5, OctalDigit, 6, Some(OctalFold)),
            (6, OctalDigit, 7, Some(OctalFold)),
            // closing apostrophe
            (2, Literal('\''), 8, None),
            (4, Literal('\''), 8, None),
            (5, Literal('\''), 8, Some(OctalFlush)),
            (6, Literal('\''), 8, Some(OctalFlush)),
            (7, Literal('\''), 8, Some(OctalFlush)),
        ],
    )
}

/// `"..."` with named and octal escapes, decoded into the value buffer.
pub fn string_literal() -> Automaton {
    Automaton::new(
        TokenKind::StrLiteral,
        // 0 start, 1 body, 2 saw `\`, 3 named escape, 4..6 octal digits
        // remaining, 7 closed (accepting)
        &[false, false, false, false, false, false, false, true],
        vec![
            (0, Literal('"'), 1, None),
            (1, AnyButQuote, 1, Some(AppendChar)),
            // named escapes
            (1, Literal('\\'), 2, None),
            (2, EscapeCode, 3, Some(AppendEscape)),
            // octal escapes
            (2, ZeroToThree, 4, Some(OctalFirst)),
            (2, FourToSeven, 5, Some(OctalFirst)),
            (4, OctalDigit, 5, Some(OctalFold)),
            (5, OctalDigit, 6, Some(OctalFold)),
            // closing quote
            (1, Literal('"'), 7, None),
            (3, Literal('"'), 7, None),
            (4, Literal('"'), 7, Some(OctalFlush)),
            (5, Literal('"'), 7, Some(OctalFlush)),
            (6, Literal('"'), 7, Some(OctalFlush)),
            // resume the body after an escape
            (3, AnyButQuote, 1, Some(AppendChar)),
            (4, AnyButQuote, 1, Some(OctalFlushChar)),
            (5, AnyButQuote, 1, Some(OctalFlushChar)),
            (6, AnyButQuote, 1, Some(OctalFlushChar)),
            (3, Literal('\\'), 2, None),
            (4, Literal('\\'), 2, Some(OctalFlush)),
            (5, Literal('\\'), 2, Some(OctalFlush)),
            (6, Literal('\\'), 2, Some(OctalFlush)),
        ],
    )
}

/// A decimal integer: `0` alone, or a nonzero digit followed by digits.
/// No octal literals, so `0` cannot lead a longer literal.
pub fn int_literal() -> Automaton {
    Automaton::new(
        TokenKind::IntLiteral,
        &[false, true, true],
        vec![
            (0, Literal('0'), 1, Some(AppendDigit)),
            (0, NonZeroDigit, 2, Some(AppendDigit)),
            (2, Digit, 2, Some(AppendDigit)),
        ],
    )
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn identifier() -> Automaton {
    Automaton::new(
        TokenKind::Id,
        &[false, true],
        vec![
            (0, Letter, 1, None),
            (1, Letter, 1, None),
            (1, Digit, 1, None),
        ],
    )
}
