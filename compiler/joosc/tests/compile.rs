//! End-to-end driver tests over a small grammar fixture.

use std::path::PathBuf;

use joos_diagnostic::ErrorCode;
use joos_ir::{NodeKind, SourceId};
use joosc::Compiler;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn compiler() -> Compiler {
    match Compiler::load(&fixture("names.lr1")) {
        Ok(c) => c,
        Err(diag) => panic!("table load failed: {diag}"),
    }
}

#[test]
fn compiles_a_source_unit_end_to_end() {
    let compiler = compiler();
    let root = match compiler.compile_source(SourceId(0), "A.java", "a.b".as_bytes()) {
        Ok(root) => root,
        Err(diag) => panic!("compile failed: {diag}"),
    };
    match root.kind {
        NodeKind::QualifiedName { id, .. } => assert_eq!(id.lexeme, "b"),
        other => panic!("expected a qualified name, got {}", other.name()),
    }
}

#[test]
fn one_compiler_processes_units_sequentially() {
    let compiler = compiler();
    for (index, text) in ["a", "a.b", "x.y.z"].iter().enumerate() {
        let result = compiler.compile_source(SourceId(index as u32), "A.java", text.as_bytes());
        assert!(result.is_ok(), "unit {index} failed");
    }
}

#[test]
fn parse_errors_name_the_unit_and_position() {
    let compiler = compiler();
    let Err(diag) = compiler.compile_source(SourceId(0), "A.java", "a..b".as_bytes()) else {
        panic!("expected the unit to be rejected");
    };
    assert_eq!(diag.code, ErrorCode::UnexpectedToken);
    let rendered = diag.to_string();
    assert!(rendered.contains("A.java"), "{rendered}");
    assert!(rendered.contains("1:3"), "{rendered}");
}

#[test]
fn lex_errors_surface_as_diagnostics() {
    let compiler = compiler();
    let Err(diag) = compiler.compile_source(SourceId(0), "A.java", "a # b".as_bytes()) else {
        panic!("expected the unit to be rejected");
    };
    assert_eq!(diag.code, ErrorCode::UnrecognizedCharacter);
}

#[test]
fn missing_table_is_an_io_diagnostic() {
    let Err(diag) = Compiler::load(&fixture("no-such.lr1")) else {
        panic!("expected the load to fail");
    };
    assert_eq!(diag.code, ErrorCode::Io);
}

#[test]
fn malformed_table_is_rejected_at_load() {
    let Err(diag) = Compiler::load(&fixture("bogus.lr1")) else {
        panic!("expected the load to fail");
    };
    // Either way the file never becomes a usable compiler.
    assert!(matches!(
        diag.code,
        ErrorCode::MalformedTable | ErrorCode::Io
    ));
}
