//! Prints the semantic model of a directory of Go files.
//!
//! ```text
//! goaster-dump <dir>
//! ```
//!
//! `GOASTER_INCLUDE_TESTS=1` also loads `_test.go` files.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use goaster::{Kind, LoadConfig, Module, NodeRef};

fn main() -> ExitCode {
    let Some(dir) = env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: goaster-dump <dir>");
        return ExitCode::from(2);
    };
    let include_tests = env::var("GOASTER_INCLUDE_TESTS").is_ok_and(|v| v == "1" || v == "true");
    let config = LoadConfig::new().include_tests(include_tests);

    let module = match Module::load(&dir, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    for pkg in module.packages() {
        println!("package {}", pkg.name());
        for (name, import) in pkg.imports() {
            println!("  import {name} {:?}", import.path);
        }
        for file in pkg.files() {
            println!("  file {}", file.filename());
            for node in file.nodes() {
                print_node(node);
            }
        }
    }

    for diag in module.diagnostics() {
        eprintln!("warning: {diag}");
    }
    ExitCode::SUCCESS
}

fn print_node(node: NodeRef<'_>) {
    let (line, _) = node.line_col();
    if let Some(f) = node.as_func() {
        let sig = |fields: &[goaster::FuncField]| {
            fields
                .iter()
                .map(|p| {
                    let star = if p.pointer { "*" } else { "" };
                    format!("{star}{}", p.type_name)
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        let recv = f
            .recv()
            .map(|r| format!("({}{}) ", if r.pointer { "*" } else { "" }, r.type_name))
            .unwrap_or_default();
        println!(
            "    {line:>4} func {recv}{}({}) ({})",
            node.name(),
            sig(f.params()),
            sig(f.results())
        );
        return;
    }

    let Some(t) = node.as_type() else {
        return;
    };
    println!("    {line:>4} type {} {}", node.name(), node.kind());
    if node.kind() == Kind::Struct {
        for field in t.fields() {
            println!("           field {} {}", field.name, field.type_name);
        }
    }
    for m in t.methods() {
        println!("           method {}", m.name());
    }
}
