//! Tokenization of grammar sources
//!
//! This is where a source string becomes a [`TokenStream`]. Logos does the flat
//! scan; this module then resolves the two things a flat scan cannot decide:
//!
//! - A braced block after `options`, `tokens` or `channels` is structure, so
//!   its body is lexed again as ordinary tokens between `{` and `}`.
//! - Any other braced block is an embedded action and is expanded into
//!   `BeginAction`, one `ActionContent` per piece, and `EndAction`.
//!
//! Block comments starting with `/**` are doc comments and live on the main
//! channel. Characters logos cannot place become `Unknown` main-channel
//! tokens, so every byte of the input is kept. The stream always ends with an
//! `Eof` marker.
use logos::Logos;
use std::ops::Range;

use super::actions::{action_pieces, braced_len};
use super::stream::TokenStream;
use super::tokens::{RawToken, Token, TokenKind};

/// Tokenize a grammar source into a token stream
pub fn tokenize(source: &str) -> TokenStream {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    lex_region(source, 0..source.len(), &lines, &mut tokens);
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "<EOF>".to_string(),
        index: 0,
        channel: TokenKind::Eof.channel(),
        span: source.len()..source.len(),
        line: lines.line_of(source.len()),
    });
    TokenStream::new(tokens)
}

fn lex_region(source: &str, region: Range<usize>, lines: &LineIndex, out: &mut Vec<Token>) {
    let offset = region.start;
    let mut lexer = RawToken::lexer(&source[region]);
    while let Some(result) = lexer.next() {
        let local = lexer.span();
        let span = local.start + offset..local.end + offset;
        match result {
            Ok(RawToken::Braced) => expand_braced(source, span, lines, out),
            Ok(raw) => {
                let kind = match raw.kind() {
                    Some(TokenKind::BlockComment) if is_doc_comment(&source[span.clone()]) => {
                        TokenKind::DocComment
                    }
                    Some(kind) => kind,
                    None => TokenKind::Unknown,
                };
                push(out, kind, source, span, lines);
            }
            Err(()) => push(out, TokenKind::Unknown, source, span, lines),
        }
    }
}

fn expand_braced(source: &str, span: Range<usize>, lines: &LineIndex, out: &mut Vec<Token>) {
    let open = span.start;
    let (_, terminated) = braced_len(&source[open + 1..span.end]);
    let body = open + 1..if terminated { span.end - 1 } else { span.end };

    let previous = out
        .iter()
        .rev()
        .find(|token| !token.is_hidden())
        .map(|token| token.kind);

    if previous.is_some_and(TokenKind::introduces_block) {
        push(out, TokenKind::LBrace, source, open..open + 1, lines);
        lex_region(source, body, lines, out);
        if terminated {
            push(out, TokenKind::RBrace, source, span.end - 1..span.end, lines);
        }
    } else {
        push(out, TokenKind::BeginAction, source, open..open + 1, lines);
        for piece in action_pieces(&source[body.clone()]) {
            let piece = piece.start + body.start..piece.end + body.start;
            push(out, TokenKind::ActionContent, source, piece, lines);
        }
        if terminated {
            push(out, TokenKind::EndAction, source, span.end - 1..span.end, lines);
        }
    }
}

fn push(out: &mut Vec<Token>, kind: TokenKind, source: &str, span: Range<usize>, lines: &LineIndex) {
    out.push(Token {
        kind,
        text: source[span.clone()].to_string(),
        index: out.len(),
        channel: kind.channel(),
        line: lines.line_of(span.start),
        span,
    });
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

/// Byte offsets of line starts, for 1-based line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(at, _)| at + 1),
        );
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g4::lexing::Channel;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .tokens()
            .iter()
            .map(|token| token.kind)
            .collect()
    }

    fn main_texts(source: &str) -> Vec<String> {
        tokenize(source)
            .main_channel()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_empty_input_is_just_eof() {
        let stream = tokenize("");
        assert_eq!(stream.len(), 1);
        assert!(stream.tokens()[0].is_eof());
    }

    #[test]
    fn test_grammar_header() {
        assert_eq!(
            kinds("grammar T;"),
            vec![
                TokenKind::Grammar,
                TokenKind::Whitespace,
                TokenKind::TokenRef,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_doc_comment_is_main_channel() {
        let stream = tokenize("/** doc */ /**/ /* c */");
        let tokens = stream.tokens();
        assert_eq!(tokens[0].kind, TokenKind::DocComment);
        assert_eq!(tokens[0].channel, Channel::Main);
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        assert_eq!(tokens[4].kind, TokenKind::BlockComment);
        assert!(tokens[4].is_hidden());
    }

    #[test]
    fn test_options_block_is_lexed_as_structure() {
        assert_eq!(
            main_texts("options { x = 1; }"),
            vec!["options", "{", "x", "=", "1", ";", "}", "<EOF>"]
        );
        let stream = tokenize("tokens { A }");
        assert_eq!(stream.tokens()[2].kind, TokenKind::LBrace);
        assert_eq!(stream.tokens()[6].kind, TokenKind::RBrace);
    }

    #[test]
    fn test_action_is_expanded_into_pieces() {
        let stream = tokenize("a : {x;} ;");
        let action: Vec<(TokenKind, &str)> = stream
            .tokens()
            .iter()
            .filter(|token| token.kind.is_action_piece())
            .map(|token| (token.kind, token.text.as_str()))
            .collect();
        assert_eq!(
            action,
            vec![
                (TokenKind::BeginAction, "{"),
                (TokenKind::ActionContent, "x"),
                (TokenKind::ActionContent, ";"),
                (TokenKind::EndAction, "}"),
            ]
        );
    }

    #[test]
    fn test_action_value_inside_options_block() {
        let stream = tokenize("options { a = {b}; }");
        let kinds: Vec<TokenKind> = stream
            .main_channel()
            .iter()
            .map(|token| token.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Options,
                TokenKind::LBrace,
                TokenKind::RuleRef,
                TokenKind::Assign,
                TokenKind::BeginAction,
                TokenKind::ActionContent,
                TokenKind::EndAction,
                TokenKind::Semi,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_action_has_no_end() {
        let stream = tokenize("{ab");
        let kinds: Vec<TokenKind> = stream.tokens().iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::BeginAction,
                TokenKind::ActionContent,
                TokenKind::ActionContent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_kept() {
        let stream = tokenize("a % b");
        assert_eq!(stream.tokens()[2].kind, TokenKind::Unknown);
        assert_eq!(stream.tokens()[2].text, "%");
    }

    #[test]
    fn test_every_byte_is_covered() {
        let source = "grammar T;\n// c\nr : 'x' {a();} -> skip ;\n";
        let stream = tokenize(source);
        let rebuilt: String = stream
            .tokens()
            .iter()
            .filter(|token| !token.is_eof())
            .map(|token| token.text.as_str())
            .collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_line_numbers() {
        let stream = tokenize("grammar T;\n\nr : A ;");
        let rule = stream
            .tokens()
            .iter()
            .find(|token| token.text == "r")
            .map(|token| token.line);
        assert_eq!(rule, Some(3));
        assert_eq!(stream.tokens()[0].line, 1);
    }
}
