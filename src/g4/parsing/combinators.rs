//! Parser combinators over grammar tokens
//!
//! Every grammar rule parser produces `Parts`: the flat list of syntax elements
//! it matched. Wrapping a parser with [`node`] folds its parts into a single
//! [`SyntaxNode`]. Keeping one output type for everything lets optional and
//! repeated pieces compose with plain sequencing ([`chain!`](chain)).
use chumsky::prelude::*;

use super::tree::{NodeKind, SyntaxElement, SyntaxNode};
use crate::g4::lexing::{Token, TokenKind};

pub type ParserError = Simple<Token>;
pub type Parts = Vec<SyntaxElement>;
pub type Rule = BoxedParser<'static, Token, Parts, ParserError>;

/// Sequence parsers, concatenating their parts
macro_rules! chain {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $first $( .then($rest).map($crate::g4::parsing::combinators::join) )*
    };
}
pub(crate) use chain;

pub fn join((mut head, tail): (Parts, Parts)) -> Parts {
    head.extend(tail);
    head
}

fn concat(groups: Vec<Parts>) -> Parts {
    groups.into_iter().flatten().collect()
}

/// Match a single token of the given kind
pub fn tok(kind: TokenKind) -> Rule {
    filter(move |token: &Token| token.kind == kind)
        .map(|token: Token| vec![SyntaxElement::Token(token.index)])
        .boxed()
}

/// Match a single token of any of the given kinds
pub fn any_of(kinds: &'static [TokenKind]) -> Rule {
    filter(move |token: &Token| kinds.contains(&token.kind))
        .map(|token: Token| vec![SyntaxElement::Token(token.index)])
        .boxed()
}

/// Zero or one
pub fn opt<P>(parser: P) -> Rule
where
    P: Parser<Token, Parts, Error = ParserError> + 'static,
{
    parser.or_not().map(Option::unwrap_or_default).boxed()
}

/// Zero or more
pub fn many<P>(parser: P) -> Rule
where
    P: Parser<Token, Parts, Error = ParserError> + 'static,
{
    parser.repeated().map(concat).boxed()
}

/// One or more
pub fn many1<P>(parser: P) -> Rule
where
    P: Parser<Token, Parts, Error = ParserError> + 'static,
{
    parser.repeated().at_least(1).map(concat).boxed()
}

/// Fold the parts matched by `parser` into one node of `kind`
pub fn node<P>(kind: NodeKind, parser: P) -> Rule
where
    P: Parser<Token, Parts, Error = ParserError> + 'static,
{
    parser
        .map(move |parts| vec![SyntaxElement::Node(SyntaxNode::new(kind, parts))])
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g4::lexing::TokenStream;

    fn input(kinds: &[TokenKind]) -> Vec<Token> {
        TokenStream::new(kinds.iter().map(|kind| Token::new(*kind, "")).collect()).main_channel()
    }

    #[test]
    fn test_chain_concatenates() {
        let parser = chain!(tok(TokenKind::RuleRef), opt(tok(TokenKind::Colon)), tok(TokenKind::Semi));
        let parts = parser
            .parse(input(&[TokenKind::RuleRef, TokenKind::Semi]))
            .expect("sequence to parse");
        assert_eq!(parts, vec![SyntaxElement::Token(0), SyntaxElement::Token(1)]);
    }

    #[test]
    fn test_node_wraps_parts() {
        let parser = node(NodeKind::IdList, many1(any_of(&[TokenKind::TokenRef, TokenKind::Comma])));
        let parts = parser
            .parse(input(&[TokenKind::TokenRef, TokenKind::Comma, TokenKind::TokenRef]))
            .expect("list to parse");
        match parts.as_slice() {
            [SyntaxElement::Node(node)] => {
                assert_eq!(node.kind, NodeKind::IdList);
                assert_eq!(node.children.len(), 3);
            }
            other => panic!("expected one node, got {:?}", other),
        }
    }

    #[test]
    fn test_many_accepts_nothing() {
        let parser = many(tok(TokenKind::Pound)).then_ignore(end());
        let parts = parser.parse(input(&[])).expect("empty input to parse");
        assert!(parts.is_empty());
    }
}
