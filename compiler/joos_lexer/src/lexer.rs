//! The maximal-munch tokenizer.
//!
//! Owns one automaton per category in a fixed priority order. At each mark
//! it runs every automaton from the same position, keeps the longest match
//! (ties go to the earlier automaton), commits the winning prefix, and
//! emits a token unless the category is suppressed. The whole source unit
//! is tokenized eagerly; the parser never sees a partially-lexed stream.

use std::io::Read;

use joos_ir::{Position, SourceId, Token, TokenKind};
use joos_lexer_core::{CharStream, CharStreamError};

use crate::automaton::{Automaton, AutomatonMatch};
use crate::categories::standard_automata;
use crate::error::LexError;

/// Largest allowed integer literal magnitude: 2^31, the magnitude of the
/// most negative 32-bit value. Sign handling is a semantic-analysis concern.
const MAX_INT_MAGNITUDE: u64 = 0x8000_0000;

/// The tokenizer for one lexical configuration.
///
/// Stateless across invocations: one `Lexer` can tokenize any number of
/// source units, sequentially or from multiple threads.
pub struct Lexer {
    automata: Vec<Automaton>,
    suppressed: Vec<TokenKind>,
}

impl Lexer {
    /// Tokenizer with an explicit automaton priority order and suppressed
    /// category set.
    pub fn new(automata: Vec<Automaton>, suppressed: Vec<TokenKind>) -> Self {
        Lexer {
            automata,
            suppressed,
        }
    }

    /// The standard Joos configuration: every category of
    /// [`standard_automata`], with whitespace and comments suppressed.
    pub fn joos() -> Self {
        Lexer::new(
            standard_automata(),
            vec![TokenKind::Whitespace, TokenKind::Comment],
        )
    }

    /// Tokenize one source unit eagerly.
    ///
    /// Returns the full ordered token sequence, terminated by an `Eof`
    /// token, or the first lexical error.
    pub fn tokenize<R: Read>(
        &self,
        source: SourceId,
        input: R,
    ) -> Result<Vec<Token>, LexError> {
        let mut src = CharStream::new(input);
        let mut tokens = Vec::new();

        loop {
            let pos = Position::new(src.line(), src.col());
            if src.is_end_of_input().map_err(|e| stream_error_at(pos, e))? {
                break;
            }

            let mut best: Option<AutomatonMatch> = None;
            for automaton in &self.automata {
                // Every automaton retries from the same mark.
                src.rewind_to_mark();
                match automaton.run(&mut src) {
                    Ok(Some(m)) => {
                        // Strictly longer wins; equal length keeps the
                        // earlier automaton. A zero-length match commits
                        // nothing and counts as a miss, so the loop always
                        // advances even for an automaton whose initial
                        // state accepts.
                        if !m.is_empty() && best.as_ref().map_or(true, |b| m.len() > b.len()) {
                            best = Some(m);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => return Err(stream_error(&src, pos, e)),
                }
            }

            let Some(winning) = best else {
                let snippet = String::from_utf8_lossy(src.buffered()).into_owned();
                return Err(LexError::UnrecognizedCharacter { pos, snippet });
            };

            src.rewind_to_mark();
            src.advance(winning.len());

            if !self.suppressed.contains(&winning.kind) {
                tokens.push(build_token(source, winning, pos)?);
            }
        }

        let eof_pos = Position::new(src.line(), src.col());
        tokens.push(Token::new(source, TokenKind::Eof, "$", eof_pos));
        Ok(tokens)
    }
}

/// Map a stream failure that happened mid-scan, locating non-ASCII bytes at
/// the exact character they occupy.
fn stream_error<R: Read>(src: &CharStream<R>, mark: Position, e: CharStreamError) -> LexError {
    match e {
        CharStreamError::NonAscii { byte } => LexError::NonAsciiInput {
            pos: position_after(mark, src.buffered()),
            byte,
        },
        other => stream_error_at(mark, other),
    }
}

fn stream_error_at(pos: Position, e: CharStreamError) -> LexError {
    match e {
        CharStreamError::NonAscii { byte } => LexError::NonAsciiInput { pos, byte },
        CharStreamError::Io(io) => LexError::Io(io),
        // The run loop turns EndOfInput into "stop scanning"; seeing it
        // here means the stream and tokenizer disagree about exhaustion.
        CharStreamError::EndOfInput => LexError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "read past end of input",
        )),
    }
}

/// Advance `pos` over `consumed` bytes, tracking newlines.
fn position_after(pos: Position, consumed: &[u8]) -> Position {
    let mut line = pos.line;
    let mut col = pos.col;
    for &b in consumed {
        if b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    Position::new(line, col)
}

/// Build the emitted token, applying literal post-processing.
fn build_token(source: SourceId, m: AutomatonMatch, pos: Position) -> Result<Token, LexError> {
    match m.kind {
        TokenKind::IntLiteral => {
            let mut magnitude: u64 = 0;
            for &digit in &m.value {
                magnitude = magnitude * 10 + u64::from(digit);
                if magnitude > MAX_INT_MAGNITUDE {
                    return Err(LexError::IntOutOfRange {
                        pos,
                        lexeme: m.lexeme,
                    });
                }
            }
            // Stored big-endian, the byte order the code generator expects.
            let value = (magnitude as u32).to_be_bytes().to_vec();
            Ok(Token::with_value(source, m.kind, m.lexeme, value, pos))
        }
        TokenKind::CharLiteral | TokenKind::StrLiteral => {
            Ok(Token::with_value(source, m.kind, m.lexeme, m.value, pos))
        }
        _ => Ok(Token::new(source, m.kind, m.lexeme, pos)),
    }
}

#[cfg(test)]
mod tests;
