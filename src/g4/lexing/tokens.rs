//! Token definitions for ANTLR v4 grammar files
//!
//! [`RawToken`] is the logos-derived lexer enum. It covers everything that can be
//! recognized with a flat scan. Braced blocks are recognized as a single
//! [`RawToken::Braced`] and split up by the lexer afterwards, because whether
//! `{` opens an options block or an embedded action depends on the preceding
//! keyword.
//!
//! [`TokenKind`] is the closed set of kinds the rest of the crate sees, and
//! [`Token`] is the immutable unit stored in the token stream.
use logos::Logos;
use std::ops::Range;

use super::actions::braced_len;

/// Raw tokens as recognized by logos
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RawToken {
    // Hidden channel
    #[token("/*", block_comment)]
    BlockComment,
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    // Literals and identifiers
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"'([^'\\\r\n]|\\.)*'")]
    StringLiteral,
    #[regex(r"\[([^\]\\]|\\.)*\]")]
    CharSet,
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    TokenRef,
    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    RuleRef,

    // Keywords
    #[token("grammar")]
    Grammar,
    #[token("lexer")]
    Lexer,
    #[token("parser")]
    Parser,
    #[token("fragment")]
    Fragment,
    #[token("import")]
    Import,
    #[token("returns")]
    Returns,
    #[token("locals")]
    Locals,
    #[token("throws")]
    Throws,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("mode")]
    Mode,
    #[token("options")]
    Options,
    #[token("tokens")]
    Tokens,
    #[token("channels")]
    Channels,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,

    // Punctuation
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{", braced_block)]
    Braced,
    #[token("}")]
    RBrace,
    #[token("->")]
    RArrow,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("+=")]
    PlusAssign,
    #[token("|")]
    Or,
    #[token("$")]
    Dollar,
    #[token(".")]
    Dot,
    #[token("..")]
    Range,
    #[token("@")]
    At,
    #[token("#")]
    Pound,
    #[token("~")]
    Not,
}

/// Consumes a block comment up to and including `*/`, or to the end of input.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    true
}

/// Consumes a balanced `{ ... }` block, or the rest of the input if unbalanced.
fn braced_block(lex: &mut logos::Lexer<RawToken>) -> bool {
    let (len, _) = braced_len(lex.remainder());
    lex.bump(len);
    true
}

impl RawToken {
    /// The public kind for this raw token. Braced blocks have none; the lexer
    /// expands them into several tokens.
    pub fn kind(self) -> Option<TokenKind> {
        use TokenKind as K;
        let kind = match self {
            RawToken::BlockComment => K::BlockComment,
            RawToken::LineComment => K::LineComment,
            RawToken::Whitespace => K::Whitespace,
            RawToken::Int => K::Int,
            RawToken::StringLiteral => K::StringLiteral,
            RawToken::CharSet => K::CharSet,
            RawToken::TokenRef => K::TokenRef,
            RawToken::RuleRef => K::RuleRef,
            RawToken::Grammar => K::Grammar,
            RawToken::Lexer => K::Lexer,
            RawToken::Parser => K::Parser,
            RawToken::Fragment => K::Fragment,
            RawToken::Import => K::Import,
            RawToken::Returns => K::Returns,
            RawToken::Locals => K::Locals,
            RawToken::Throws => K::Throws,
            RawToken::Catch => K::Catch,
            RawToken::Finally => K::Finally,
            RawToken::Mode => K::Mode,
            RawToken::Options => K::Options,
            RawToken::Tokens => K::Tokens,
            RawToken::Channels => K::Channels,
            RawToken::Public => K::Public,
            RawToken::Private => K::Private,
            RawToken::Protected => K::Protected,
            RawToken::Colon => K::Colon,
            RawToken::ColonColon => K::ColonColon,
            RawToken::Comma => K::Comma,
            RawToken::Semi => K::Semi,
            RawToken::LParen => K::LParen,
            RawToken::RParen => K::RParen,
            RawToken::Braced => return None,
            RawToken::RBrace => K::RBrace,
            RawToken::RArrow => K::RArrow,
            RawToken::Lt => K::Lt,
            RawToken::Gt => K::Gt,
            RawToken::Assign => K::Assign,
            RawToken::Question => K::Question,
            RawToken::Star => K::Star,
            RawToken::Plus => K::Plus,
            RawToken::PlusAssign => K::PlusAssign,
            RawToken::Or => K::Or,
            RawToken::Dollar => K::Dollar,
            RawToken::Dot => K::Dot,
            RawToken::Range => K::Range,
            RawToken::At => K::At,
            RawToken::Pound => K::Pound,
            RawToken::Not => K::Not,
        };
        Some(kind)
    }
}

/// Every kind of token the token stream can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    DocComment,
    BlockComment,
    LineComment,
    Whitespace,
    Int,
    StringLiteral,
    CharSet,
    TokenRef,
    RuleRef,
    Grammar,
    Lexer,
    Parser,
    Fragment,
    Import,
    Returns,
    Locals,
    Throws,
    Catch,
    Finally,
    Mode,
    Options,
    Tokens,
    Channels,
    Public,
    Private,
    Protected,
    Colon,
    ColonColon,
    Comma,
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,
    RArrow,
    Lt,
    Gt,
    Assign,
    Question,
    Star,
    Plus,
    PlusAssign,
    Or,
    Dollar,
    Dot,
    Range,
    At,
    Pound,
    Not,
    BeginAction,
    ActionContent,
    EndAction,
    Unknown,
    Eof,
}

impl TokenKind {
    /// The channel tokens of this kind are placed on
    pub fn channel(self) -> Channel {
        match self {
            TokenKind::BlockComment | TokenKind::LineComment | TokenKind::Whitespace => {
                Channel::Hidden
            }
            _ => Channel::Main,
        }
    }

    /// Check if this kind opens a brace-delimited block rather than an action
    pub fn introduces_block(self) -> bool {
        matches!(
            self,
            TokenKind::Options | TokenKind::Tokens | TokenKind::Channels
        )
    }

    /// Check if this kind is a piece of an embedded action
    pub fn is_action_piece(self) -> bool {
        matches!(
            self,
            TokenKind::BeginAction | TokenKind::ActionContent | TokenKind::EndAction
        )
    }
}

/// Main tokens are seen by the parser, hidden tokens only by the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Main,
    Hidden,
}

/// One token of a grammar source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Absolute position in the token stream
    pub index: usize,
    pub channel: Channel,
    /// Byte range in the source
    pub span: Range<usize>,
    /// 1-based source line of the first byte
    pub line: usize,
}

impl Token {
    /// Builds a detached token. The index is assigned when the token is placed
    /// into a [`TokenStream`](super::TokenStream).
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            index: 0,
            channel: kind.channel(),
            span: 0..0,
            line: 1,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.channel == Channel::Hidden
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(
            raw("grammar grammars"),
            vec![RawToken::Grammar, RawToken::Whitespace, RawToken::RuleRef]
        );
        assert_eq!(raw("Grammar"), vec![RawToken::TokenRef]);
    }

    #[test]
    fn test_longest_punctuation() {
        assert_eq!(
            raw(":: : += + .. . ->"),
            vec![
                RawToken::ColonColon,
                RawToken::Whitespace,
                RawToken::Colon,
                RawToken::Whitespace,
                RawToken::PlusAssign,
                RawToken::Whitespace,
                RawToken::Plus,
                RawToken::Whitespace,
                RawToken::Range,
                RawToken::Whitespace,
                RawToken::Dot,
                RawToken::Whitespace,
                RawToken::RArrow,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let mut lexer = RawToken::lexer(r"'a\'b' [a-z\]]");
        assert_eq!(lexer.next(), Some(Ok(RawToken::StringLiteral)));
        assert_eq!(lexer.slice(), r"'a\'b'");
        assert_eq!(lexer.next(), Some(Ok(RawToken::Whitespace)));
        assert_eq!(lexer.next(), Some(Ok(RawToken::CharSet)));
        assert_eq!(lexer.slice(), r"[a-z\]]");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_comments_consume_their_body() {
        let mut lexer = RawToken::lexer("/* a * b */x// rest\ny");
        assert_eq!(lexer.next(), Some(Ok(RawToken::BlockComment)));
        assert_eq!(lexer.slice(), "/* a * b */");
        assert_eq!(lexer.next(), Some(Ok(RawToken::RuleRef)));
        assert_eq!(lexer.next(), Some(Ok(RawToken::LineComment)));
        assert_eq!(lexer.slice(), "// rest");
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let mut lexer = RawToken::lexer("/* open");
        assert_eq!(lexer.next(), Some(Ok(RawToken::BlockComment)));
        assert_eq!(lexer.slice(), "/* open");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_braced_block_is_one_raw_token() {
        let mut lexer = RawToken::lexer("{ a { b } '}' }c");
        assert_eq!(lexer.next(), Some(Ok(RawToken::Braced)));
        assert_eq!(lexer.slice(), "{ a { b } '}' }");
        assert_eq!(lexer.next(), Some(Ok(RawToken::RuleRef)));
    }

    #[test]
    fn test_channels() {
        assert_eq!(TokenKind::LineComment.channel(), Channel::Hidden);
        assert_eq!(TokenKind::Whitespace.channel(), Channel::Hidden);
        assert_eq!(TokenKind::DocComment.channel(), Channel::Main);
        assert_eq!(TokenKind::ActionContent.channel(), Channel::Main);
        assert!(RawToken::Braced.kind().is_none());
        assert_eq!(RawToken::Semi.kind(), Some(TokenKind::Semi));
    }
}
