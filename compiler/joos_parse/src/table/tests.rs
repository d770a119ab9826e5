use joos_diagnostic::ErrorCode;
use joos_ir::TokenKind;
use pretty_assertions::assert_eq;

use crate::table::{ParseAction, ParseTable, Symbol, TableError};

/// `S -> LPAREN E RPAREN`, `E -> INTLITERAL`.
const PAREN_TABLE: &str = "\
4
LPAREN
RPAREN
INTLITERAL
EOF
2
S
E
S
2
S LPAREN E RPAREN
E INTLITERAL
6
7
0 LPAREN shift 1
1 INTLITERAL shift 2
1 E shift 3
2 RPAREN reduce 1
3 RPAREN shift 4
4 EOF reduce 0
0 S shift 5
";

fn load(text: &str) -> Result<ParseTable, TableError> {
    text.parse()
}

fn syntax_message(result: Result<ParseTable, TableError>) -> String {
    match result {
        Ok(_) => panic!("expected the table to be rejected"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn loads_a_well_formed_table() {
    let table = match load(PAREN_TABLE) {
        Ok(t) => t,
        Err(e) => panic!("load failed: {e}"),
    };
    assert_eq!(table.state_count(), 6);
    assert_eq!(table.productions().len(), 2);
    assert_eq!(table.nonterminal_name(table.start()), "S");
    assert_eq!(table.production(0).rhs.len(), 3);
    assert_eq!(table.production(1).rhs, vec![Symbol::Terminal(TokenKind::IntLiteral)]);
}

#[test]
fn actions_resolve_by_state_and_symbol() {
    let table = match load(PAREN_TABLE) {
        Ok(t) => t,
        Err(e) => panic!("load failed: {e}"),
    };
    assert_eq!(
        table.action(0, Symbol::Terminal(TokenKind::LParen)),
        Some(ParseAction::Shift(1))
    );
    assert_eq!(
        table.action(2, Symbol::Terminal(TokenKind::RParen)),
        Some(ParseAction::Reduce(1))
    );
    assert_eq!(table.action(5, Symbol::Terminal(TokenKind::Eof)), None);
    assert_eq!(table.action(99, Symbol::Terminal(TokenKind::Eof)), None);
}

#[test]
fn blank_lines_are_skipped() {
    let spaced = PAREN_TABLE.replace("6\n7\n", "6\n\n7\n\n");
    assert!(load(&spaced).is_ok());
}

#[test]
fn loading_is_deterministic() {
    let (a, b) = match (load(PAREN_TABLE), load(PAREN_TABLE)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => panic!("load failed"),
    };
    assert_eq!(a.productions(), b.productions());
    assert_eq!(a.state_count(), b.state_count());
}

#[test]
fn unknown_terminal_is_rejected_with_its_line() {
    let bad = PAREN_TABLE.replace("LPAREN\n", "BOGUS\n");
    let message = syntax_message(load(&bad));
    assert!(message.contains("line 2"), "{message}");
    assert!(message.contains("BOGUS"), "{message}");
}

#[test]
fn undeclared_symbol_in_a_production_is_rejected() {
    let bad = PAREN_TABLE.replace("E INTLITERAL", "E STRLITERAL");
    let message = syntax_message(load(&bad));
    assert!(message.contains("STRLITERAL"), "{message}");
}

#[test]
fn start_symbol_must_be_a_nonterminal() {
    let bad = PAREN_TABLE.replace("S\n2\nS LPAREN", "LPAREN\n2\nS LPAREN");
    let message = syntax_message(load(&bad));
    assert!(message.contains("start symbol"), "{message}");
}

#[test]
fn truncated_table_is_rejected() {
    let bad = PAREN_TABLE.replace("0 S shift 5\n", "");
    let message = syntax_message(load(&bad));
    assert!(message.contains("unexpected end"), "{message}");
}

#[test]
fn shift_target_out_of_range_is_rejected() {
    let bad = PAREN_TABLE.replace("0 LPAREN shift 1", "0 LPAREN shift 6");
    let message = syntax_message(load(&bad));
    assert!(message.contains("out of range"), "{message}");
}

#[test]
fn reduce_production_out_of_range_is_rejected() {
    let bad = PAREN_TABLE.replace("2 RPAREN reduce 1", "2 RPAREN reduce 9");
    let message = syntax_message(load(&bad));
    assert!(message.contains("out of range"), "{message}");
}

#[test]
fn duplicate_actions_are_rejected() {
    let bad = PAREN_TABLE.replace("7\n0 LPAREN", "8\n0 LPAREN shift 1\n0 LPAREN");
    let message = syntax_message(load(&bad));
    assert!(message.contains("duplicate action"), "{message}");
}

#[test]
fn unknown_action_verb_is_rejected() {
    let bad = PAREN_TABLE.replace("0 LPAREN shift 1", "0 LPAREN jump 1");
    let message = syntax_message(load(&bad));
    assert!(message.contains("jump"), "{message}");
}

#[test]
fn trailing_input_is_rejected() {
    let bad = format!("{PAREN_TABLE}0 RPAREN shift 1\n");
    let message = syntax_message(load(&bad));
    assert!(message.contains("trailing input"), "{message}");
}

#[test]
fn errors_convert_to_malformed_table_diagnostics() {
    let bad = PAREN_TABLE.replace("LPAREN\n", "BOGUS\n");
    let Err(err) = load(&bad) else {
        panic!("expected the table to be rejected");
    };
    let diag = err.to_diagnostic("grammar.lr1");
    assert_eq!(diag.code, ErrorCode::MalformedTable);
    assert_eq!(diag.source, "grammar.lr1");
}
