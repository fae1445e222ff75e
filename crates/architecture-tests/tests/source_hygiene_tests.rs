//! Purpose: Enforce source-level rules that keep override scopes honest.
//!
//! Non-scope: This test does not verify runtime behavior; it only checks
//! source code patterns. Files are analyzed statically.
//!
//! Invariants:
//! - Production code never mutates the process environment directly. Only
//!   dotenvy writes to it, and override scopes never do.
//! - Production code propagates errors instead of calling `unwrap()`/`expect()`.
//! - Tests use the tempfile crate instead of `std::env::temp_dir()`.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Patterns that write to the process environment.
const ENV_MUTATION_PATTERNS: &[&str] = &["env::set_var(", "env::remove_var("];

/// Patterns that panic instead of propagating an error.
const PANIC_PATTERNS: &[&str] = &[".unwrap()", ".expect("];

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

fn rust_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target" && e.file_name() != "architecture-tests")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| e.into_path())
}

fn is_test_file(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "tests")
        || path.file_name().is_some_and(|n| n == "tests.rs")
}

/// The part of a source file before its inline `#[cfg(test)] mod tests { .. }` block.
///
/// An out-of-line `mod tests;` declaration does not end production code; the
/// module file itself is skipped by `is_test_file`.
fn production_part(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let end = lines
        .windows(2)
        .position(|w| w[0].trim() == "#[cfg(test)]" && is_inline_test_module(w[1]))
        .unwrap_or(lines.len());
    lines[..end].join("\n")
}

fn is_inline_test_module(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("mod tests")
        .is_some_and(|rest| rest.trim_start().starts_with('{'))
}

/// `(line, pattern)` for every pattern hit in production code.
fn violations(content: &str, patterns: &[&str]) -> Vec<(usize, String)> {
    production_part(content)
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .flat_map(|(i, line)| {
            patterns
                .iter()
                .filter(move |p| line.contains(*p))
                .map(move |p| (i + 1, p.to_string()))
        })
        .collect()
}

fn scan(root: &Path, patterns: &[&str]) -> Vec<String> {
    rust_files(root)
        .filter(|path| !is_test_file(path))
        .flat_map(|path| {
            let content = fs::read_to_string(&path).unwrap_or_default();
            violations(&content, patterns)
                .into_iter()
                .map(move |(line, pattern)| format!("{}:{}: {}", path.display(), line, pattern))
        })
        .collect()
}

#[test]
fn test_production_code_never_mutates_process_env() {
    let found = scan(&crates_dir(), ENV_MUTATION_PATTERNS);

    assert!(
        found.is_empty(),
        "Process environment mutated outside dotenvy:\n{}",
        found.join("\n")
    );
}

#[test]
fn test_production_code_propagates_errors() {
    let found = scan(&crates_dir(), PANIC_PATTERNS);

    assert!(
        found.is_empty(),
        "unwrap()/expect() in production code:\n{}",
        found.join("\n")
    );
}

#[test]
fn test_no_manual_temp_dir_usage() {
    let found: Vec<String> = rust_files(&crates_dir())
        .filter(|path| {
            let content = fs::read_to_string(path).unwrap_or_default();
            content.contains("#[test]") && content.contains("std::env::temp_dir()")
        })
        .map(|path| {
            format!(
                "{}: uses std::env::temp_dir() - prefer tempfile::TempDir for RAII cleanup",
                path.display()
            )
        })
        .collect();

    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn test_scanner_ignores_test_modules_and_comments() {
    let source = "fn f() -> u8 {\n    // x.unwrap() in a comment\n    g().unwrap()\n}\n\n#[cfg(test)]\nmod tests {\n    fn t() { h().unwrap(); }\n}\n";

    assert_eq!(violations(source, PANIC_PATTERNS), vec![(3, ".unwrap()".to_string())]);
}

#[test]
fn test_scanner_keeps_code_after_out_of_line_test_module() {
    let source = "#[cfg(test)]\nmod tests;\n\npub fn f() -> u8 {\n    g().unwrap()\n}\n";

    assert_eq!(violations(source, PANIC_PATTERNS), vec![(5, ".unwrap()".to_string())]);
}

#[test]
fn test_scanner_walks_nested_sources_and_skips_test_dirs() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let src = temp_dir.path().join("demo").join("src");
    let tests = temp_dir.path().join("demo").join("tests");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&tests).unwrap();
    fs::write(src.join("lib.rs"), "pub fn f() { unsafe { std::env::set_var(\"A\", \"1\") } }\n").unwrap();
    fs::write(tests.join("it.rs"), "fn t() { unsafe { std::env::set_var(\"A\", \"1\") } }\n").unwrap();

    let found = scan(temp_dir.path(), ENV_MUTATION_PATTERNS);

    assert_eq!(found.len(), 1, "{found:?}");
    assert!(found[0].contains("lib.rs:1"));
}
