//! Layout of small grammars, checked against exact expected output
//!
//! Each case is formatted twice: the first pass must give the expected text
//! and the second pass must leave it alone.

use g4fmt::g4::config::FormattingRules;
use g4fmt::g4::testing::{assert_text_eq, comment_texts};
use g4fmt::{format_grammar, FormatError};
use rstest::rstest;

fn format(source: &str) -> String {
    format_grammar(source, &FormattingRules::default())
        .expect("grammar to format")
        .rendered
}

fn assert_formats_to(source: &str, expected: &str) {
    let once = format(source);
    assert_text_eq(expected, &once);
    assert_text_eq(expected, &format(&once));
}

#[rstest]
#[case::rule_body_indented("grammar T;\nfoo : 'a' 'b' ;", "grammar T;\n\nfoo\n   : 'a' 'b'\n   ;\n")]
#[case::options_block(
    "grammar T;\noptions { x=1; }\n",
    "grammar T;\n\noptions\n   { x = 1; }\n"
)]
#[case::comment_above_rule(
    "grammar T;\n// lead\nfoo : A ;\n",
    "grammar T;\n\n// lead\nfoo\n   : A\n   ;\n"
)]
#[case::comment_before_header("// lead\ngrammar T;\n", "// lead\n\ngrammar T;\n")]
#[case::alternatives_on_own_lines(
    "grammar T;\nfoo : A | B ;",
    "grammar T;\n\nfoo\n   : A\n   | B\n   ;\n"
)]
#[case::sub_rule_stays_inline(
    "grammar T;\nfoo : ( A|B )* C ;",
    "grammar T;\n\nfoo\n   : (A | B)* C\n   ;\n"
)]
#[case::lexer_alternatives_stay_inline(
    "lexer grammar L;\nA : 'a' | 'b' ;",
    "lexer grammar L;\n\n\nA\n   : 'a' | 'b'\n   ;\n"
)]
#[case::mode_rules(
    "lexer grammar L;\nmode M;\nA : 'a' ;",
    "lexer grammar L;\n\nmode M;\nA\n   : 'a'\n   ;\n"
)]
#[case::doc_comment_on_rule(
    "grammar T;\n/** Doc */\nfoo : A ;",
    "grammar T;\n\n/** Doc */\nfoo\n   : A\n   ;\n"
)]
#[case::trailing_comment_moves_above_next_rule(
    "grammar T;\nfoo : A ; // tail\nbar : B ;",
    "grammar T;\n\nfoo\n   : A\n   ;\n\n// tail\nbar\n   : B\n   ;\n"
)]
#[case::action_breaks_after_statements(
    "grammar T;\nfoo : A {x(); y();} ;",
    "grammar T;\n\nfoo\n   : A{x();\n   y();\n   }\n   ;\n"
)]
fn test_layout(#[case] source: &str, #[case] expected: &str) {
    assert_formats_to(source, expected);
}

#[test]
fn test_leading_comment_is_written_once() {
    let output = format("// lead\ngrammar T;\nfoo : A ;\n");
    assert_eq!(output.matches("// lead").count(), 1);
    assert_eq!(comment_texts(&output), vec!["// lead"]);
}

#[test]
fn test_unparseable_rule_is_kept_and_reported() {
    let output = format_grammar("grammar T;\nfoo : 'a' % ;\nbar : B ;\n", &FormattingRules::default())
        .expect("grammar to format");
    assert_text_eq(
        "grammar T;\nfoo : 'a' %;\n\nbar\n   : B\n   ;\n",
        &output.rendered,
    );
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].line, 2);
}

#[rstest]
#[case::mode_without_semicolon("grammar T;\nr : A ; mode M", "grammar T;\n\nr\n   : A\n   ;\nmode M\n")]
#[case::bare_mode_keyword("grammar T;\nr : A ; mode", "grammar T;\n\nr\n   : A\n   ;\nmode\n")]
fn test_incomplete_mode_is_kept_and_reported(#[case] source: &str, #[case] expected: &str) {
    let output = format_grammar(source, &FormattingRules::default()).expect("grammar to format");
    assert_text_eq(expected, &output.rendered);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].line, 2);
    assert_text_eq(expected, &format(&output.rendered));
}

#[test]
fn test_broken_header_fails() {
    let result = format_grammar("grammar ;\nfoo : A ;", &FormattingRules::default());
    match result {
        Err(FormatError::Parse(diagnostics)) => {
            assert!(!diagnostics.is_empty());
            assert_eq!(diagnostics[0].line, 1);
        }
        other => panic!("expected a parse error, got {:?}", other.map(|output| output.rendered)),
    }
}

#[test]
fn test_empty_input_fails() {
    assert!(matches!(
        format_grammar("", &FormattingRules::default()),
        Err(FormatError::Parse(_))
    ));
}

#[test]
fn test_custom_spacing_rules() {
    let rules = FormattingRules {
        no_space_before: vec![";".to_string(), "+".to_string()],
        ..FormattingRules::default()
    };
    let output = format_grammar("grammar T;\nfoo : A+ B? ;", &rules).expect("grammar to format");
    assert_text_eq("grammar T;\n\nfoo\n   : A+ B ?\n   ;\n", &output.rendered);
}
