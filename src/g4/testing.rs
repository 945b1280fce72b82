//! Testing utilities
//!
//! Helpers shared by unit and integration tests:
//!
//! - [`sample`] / [`sample_names`] give access to the grammar fixtures under
//!   `tests/fixtures`. Prefer them over inline grammars for anything larger than
//!   a rule or two, so the same sources are exercised everywhere.
//! - [`significant_texts`] and [`comment_texts`] reduce a source to what the
//!   formatter must preserve. Comparing them before and after formatting checks
//!   that no token and no comment was lost, duplicated or reordered.
//! - [`assert_text_eq`] compares formatter output and panics with a line diff.
use similar::TextDiff;
use std::fs;
use std::path::PathBuf;

use crate::g4::lexing::{tokenize, TokenKind};

/// Directory holding the grammar fixtures
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture by file name.
///
/// # Panics
///
/// Panics if the fixture does not exist.
pub fn sample(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read fixture {}: {}", path.display(), err))
}

/// File names of every `.g4` fixture, sorted
pub fn sample_names() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| name.ends_with(".g4"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Texts of the main-channel tokens the formatter writes out.
///
/// Leaves out the end-of-input marker and whitespace inside actions, which the
/// formatter is free to drop or re-create.
pub fn significant_texts(source: &str) -> Vec<String> {
    tokenize(source)
        .tokens()
        .iter()
        .filter(|token| !token.is_hidden() && !token.is_eof())
        .filter(|token| !(token.kind == TokenKind::ActionContent && token.text.trim().is_empty()))
        .map(|token| token.text.clone())
        .collect()
}

/// Texts of every comment, doc comments included, in source order.
pub fn comment_texts(source: &str) -> Vec<String> {
    tokenize(source)
        .tokens()
        .iter()
        .filter(|token| {
            matches!(
                token.kind,
                TokenKind::BlockComment | TokenKind::LineComment | TokenKind::DocComment
            )
        })
        .map(|token| token.text.trim_end().to_string())
        .collect()
}

/// Assert that two strings are equal, with a unified diff on failure
pub fn assert_text_eq(expected: &str, actual: &str) {
    if expected == actual {
        return;
    }
    let diff = TextDiff::from_lines(expected, actual)
        .unified_diff()
        .header("expected", "actual")
        .to_string();
    panic!("\n\nText comparison failed:\n{}\nActual:\n{}\n", diff, actual);
}
