//! Token sequences for small grammar fragments, as inline snapshots

use g4fmt::g4::lexing::{tokenize, TokenKind};
use g4fmt::g4::testing::sample;

fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .tokens()
        .iter()
        .map(|token| (token.kind, token.text.clone()))
        .collect()
}

#[test]
fn test_action_and_comment_tokens() {
    let tokens = kinds_and_texts("r : {x;} // c");
    insta::assert_debug_snapshot!(tokens, @r#"
[
    (
        RuleRef,
        "r",
    ),
    (
        Whitespace,
        " ",
    ),
    (
        Colon,
        ":",
    ),
    (
        Whitespace,
        " ",
    ),
    (
        BeginAction,
        "{",
    ),
    (
        ActionContent,
        "x",
    ),
    (
        ActionContent,
        ";",
    ),
    (
        EndAction,
        "}",
    ),
    (
        Whitespace,
        " ",
    ),
    (
        LineComment,
        "// c",
    ),
    (
        Eof,
        "<EOF>",
    ),
]
"#);
}

#[test]
fn test_fixture_lines_are_tracked() {
    let stream = tokenize(&sample("Recovery.g4"));
    let broken = stream
        .tokens()
        .iter()
        .find(|token| token.text == "broken")
        .expect("rule name token");
    assert_eq!(broken.line, 5);
    let unknown: Vec<&str> = stream
        .tokens()
        .iter()
        .filter(|token| token.kind == TokenKind::Unknown)
        .map(|token| token.text.as_str())
        .collect();
    assert_eq!(unknown, vec!["%"]);
}

#[test]
fn test_every_byte_is_covered() {
    for name in g4fmt::g4::testing::sample_names() {
        let source = sample(&name);
        let rebuilt: String = tokenize(&source)
            .tokens()
            .iter()
            .filter(|token| !token.is_eof())
            .map(|token| token.text.as_str())
            .collect();
        assert_eq!(rebuilt, source, "{}", name);
    }
}
