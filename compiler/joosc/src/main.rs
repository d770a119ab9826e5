//! Joos compiler CLI.
//!
//! `joosc <grammar.lr1> <file.java>...` compiles each file in order and
//! stops at the first rejected unit, exiting 42 the way the marking
//! harness expects. A bad table or bad usage exits 1 instead; those are
//! configuration errors, not judgements about the source.

use std::path::Path;

use joos_ir::SourceId;
use joosc::{init_tracing, Compiler, EXIT_OK, EXIT_REJECTED};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut print_tokens = false;
    let mut print_tree = false;
    let mut paths: Vec<&str> = Vec::new();

    for arg in &args {
        match arg.as_str() {
            "--print-tokens" => print_tokens = true,
            "--print-tree" => print_tree = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("error: unknown option {other}");
                print_usage();
                std::process::exit(1);
            }
            other => paths.push(other),
        }
    }

    let [table_path, sources @ ..] = &paths[..] else {
        print_usage();
        std::process::exit(1);
    };
    if sources.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let compiler = match Compiler::load(Path::new(table_path)) {
        Ok(compiler) => compiler,
        Err(diag) => {
            eprintln!("{diag}");
            std::process::exit(1);
        }
    };

    for (index, path) in sources.iter().enumerate() {
        let source = SourceId(index as u32);
        let path = Path::new(path);
        let name = path.display().to_string();

        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("error: cannot open {name}: {e}");
                std::process::exit(EXIT_REJECTED);
            }
        };
        let tokens = match compiler.tokenize(source, &name, file) {
            Ok(tokens) => tokens,
            Err(diag) => {
                eprintln!("{diag}");
                std::process::exit(EXIT_REJECTED);
            }
        };
        if print_tokens {
            for token in &tokens {
                println!("{token:?}");
            }
        }
        match compiler.parse(&name, &tokens) {
            Ok(root) => {
                if print_tree {
                    print!("{}", root.render());
                }
            }
            Err(diag) => {
                eprintln!("{diag}");
                std::process::exit(EXIT_REJECTED);
            }
        }
    }

    std::process::exit(EXIT_OK);
}

fn print_usage() {
    eprintln!("Usage: joosc <grammar.lr1> <file.java>... [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --print-tokens   Print the token stream of each unit");
    eprintln!("  --print-tree     Print the syntax tree of each unit");
    eprintln!("  -h, --help       Show this help");
}
