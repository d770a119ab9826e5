use joos_ir::{Position, SourceId, TokenKind};
use pretty_assertions::assert_eq;

use crate::error::LexError;
use crate::lexer::Lexer;

const SRC: SourceId = SourceId(0);

fn tokenize(input: &str) -> Result<Vec<joos_ir::Token>, LexError> {
    Lexer::joos().tokenize(SRC, input.as_bytes())
}

fn kinds(input: &str) -> Vec<TokenKind> {
    match tokenize(input) {
        Ok(tokens) => tokens.iter().map(|t| t.kind).collect(),
        Err(e) => panic!("tokenize failed: {e}"),
    }
}

// === Basic token streams ===

#[test]
fn empty_input_yields_only_eof() {
    let tokens = match tokenize("") {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].lexeme, "$");
    assert_eq!(tokens[0].pos, Position::new(1, 1));
}

#[test]
fn single_identifier() {
    assert_eq!(kinds("ab"), vec![TokenKind::Id, TokenKind::Eof]);
}

#[test]
fn a_small_declaration() {
    assert_eq!(
        kinds("class A { int x = 42; }"),
        vec![
            TokenKind::Class,
            TokenKind::Id,
            TokenKind::LBrace,
            TokenKind::Int,
            TokenKind::Id,
            TokenKind::Eq,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

// === Maximal munch and tie-breaking ===

#[test]
fn keyword_beats_identifier_on_equal_length() {
    assert_eq!(kinds("int"), vec![TokenKind::Int, TokenKind::Eof]);
}

#[test]
fn longer_identifier_beats_keyword_prefix() {
    assert_eq!(kinds("ints"), vec![TokenKind::Id, TokenKind::Eof]);
}

#[test]
fn longest_operator_wins() {
    assert_eq!(kinds(">>>="), vec![TokenKind::URShiftEq, TokenKind::Eof]);
    assert_eq!(
        kinds(">>> ="),
        vec![TokenKind::URShift, TokenKind::Eq, TokenKind::Eof]
    );
}

#[test]
fn adjacent_tokens_need_no_separator() {
    assert_eq!(
        kinds("x=1;"),
        vec![
            TokenKind::Id,
            TokenKind::Eq,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

// === Suppression and positions ===

#[test]
fn whitespace_and_comments_are_suppressed_but_advance_positions() {
    let tokens = match tokenize("a //x\nb") {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Id);
    assert_eq!(tokens[0].pos, Position::new(1, 1));
    assert_eq!(tokens[1].kind, TokenKind::Id);
    assert_eq!(tokens[1].pos, Position::new(2, 1));
    assert_eq!(tokens[2].kind, TokenKind::Eof);
    assert_eq!(tokens[2].pos, Position::new(2, 2));
}

#[test]
fn block_comment_advances_lines() {
    let tokens = match tokenize("/* a\n b */x") {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    assert_eq!(tokens[0].kind, TokenKind::Id);
    assert_eq!(tokens[0].pos, Position::new(2, 6));
}

#[test]
fn an_accepting_initial_state_cannot_stall_the_tokenizer() {
    // An automaton that accepts the empty string would commit zero
    // characters per iteration; its matches must count as misses.
    let empty = crate::automaton::Automaton::new(TokenKind::Id, &[true], Vec::new());
    let lexer = Lexer::new(vec![empty], Vec::new());
    let err = match lexer.tokenize(SRC, "a".as_bytes()) {
        Ok(t) => panic!("expected failure, got {t:?}"),
        Err(e) => e,
    };
    assert!(matches!(err, LexError::UnrecognizedCharacter { .. }));
}

#[test]
fn a_bare_lexer_keeps_whitespace_and_comments() {
    let lexer = Lexer::new(crate::categories::standard_automata(), Vec::new());
    let tokens = match lexer.tokenize(SRC, "a //x".as_bytes()) {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Id,
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::Eof,
        ]
    );
}

// === Literal post-processing ===

#[test]
fn int_literal_value_is_big_endian() {
    let tokens = match tokenize("7 2147483648") {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    assert_eq!(tokens[0].value.as_deref(), Some(&[0, 0, 0, 7][..]));
    // 2^31 itself is allowed; it is the magnitude of the most negative int.
    assert_eq!(
        tokens[1].value.as_deref(),
        Some(&[0x80, 0, 0, 0][..])
    );
}

#[test]
fn int_literal_above_the_limit_is_rejected() {
    let err = match tokenize("2147483649") {
        Ok(t) => panic!("expected failure, got {t:?}"),
        Err(e) => e,
    };
    match err {
        LexError::IntOutOfRange { pos, lexeme } => {
            assert_eq!(pos, Position::new(1, 1));
            assert_eq!(lexeme, "2147483649");
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn char_and_string_literals_carry_decoded_values() {
    let tokens = match tokenize(r#"'\n' "a\101b""#) {
        Ok(t) => t,
        Err(e) => panic!("tokenize failed: {e}"),
    };
    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].value.as_deref(), Some(&b"\n"[..]));
    assert_eq!(tokens[1].kind, TokenKind::StrLiteral);
    assert_eq!(tokens[1].lexeme, r#""a\101b""#);
    assert_eq!(tokens[1].value.as_deref(), Some(&b"aAb"[..]));
}

// === Failures ===

#[test]
fn unrecognized_character_reports_its_position() {
    let err = match tokenize("ab\n  #") {
        Ok(t) => panic!("expected failure, got {t:?}"),
        Err(e) => e,
    };
    match err {
        LexError::UnrecognizedCharacter { pos, snippet } => {
            assert_eq!(pos, Position::new(2, 3));
            assert!(snippet.starts_with('#'));
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn non_ascii_byte_is_located_mid_token() {
    let err = match Lexer::joos().tokenize(SRC, &[b'a', b'b', 0xC3][..]) {
        Ok(t) => panic!("expected failure, got {t:?}"),
        Err(e) => e,
    };
    match err {
        LexError::NonAsciiInput { pos, byte } => {
            assert_eq!(byte, 0xC3);
            assert_eq!(pos, Position::new(1, 3));
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn nothing_after_the_failure_point_is_emitted() {
    assert!(tokenize("x # y").is_err());
}
