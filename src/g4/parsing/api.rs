//! Parsing entry point
use chumsky::Parser;

use super::combinators::ParserError;
use super::parser::grammar_spec;
use super::tree::SyntaxNode;
use crate::g4::diagnostics::FormatterDiagnostic;
use crate::g4::lexing::TokenStream;

/// Parse the main channel of `stream` into a syntax tree.
///
/// Unparseable rules are kept in recovered nodes, so this only fails when the
/// grammar header itself is broken. Each parser error becomes one diagnostic.
pub fn parse_grammar(stream: &TokenStream) -> Result<SyntaxNode, Vec<FormatterDiagnostic>> {
    grammar_spec()
        .parse(stream.main_channel())
        .map_err(|errors| errors.iter().map(|error| to_diagnostic(error, stream)).collect())
}

fn to_diagnostic(error: &ParserError, stream: &TokenStream) -> FormatterDiagnostic {
    match error.found() {
        Some(token) if token.is_eof() => {
            FormatterDiagnostic::new(token.line, "unexpected end of input")
        }
        Some(token) => FormatterDiagnostic::new(token.line, format!("unexpected `{}`", token.text)),
        None => {
            let line = stream.tokens().last().map_or(1, |token| token.line);
            FormatterDiagnostic::new(line, "unexpected end of input")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g4::lexing::tokenize;

    #[test]
    fn test_parse_ok() {
        let stream = tokenize("grammar T;\nr : A ;\n");
        let tree = parse_grammar(&stream).expect("grammar to parse");
        assert_eq!(tree.span.map(|span| span.start), Some(0));
    }

    #[test]
    fn test_broken_header_reports_line() {
        let stream = tokenize("\n\ngrammar ;\n");
        let diagnostics = parse_grammar(&stream).expect_err("header to be rejected");
        assert!(!diagnostics.is_empty());
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[0].message, "unexpected `;`");
    }
}
