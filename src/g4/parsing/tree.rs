//! Syntax tree
//!
//! The parser produces a tree of [`SyntaxNode`]s. Every node knows which
//! grammar rule produced it ([`NodeKind`]) and the first and last token index it
//! covers. Leaves refer to tokens by their index in the [`TokenStream`], so the
//! tree never copies token text.
//!
//! The formatter does not care about most rule kinds. [`NodeKind::category`]
//! folds them onto the small closed set of [`Category`] values that carry
//! layout rules; everything else is [`Category::Other`] and inherits the layout
//! of its nearest recognized ancestor.
//!
//! Traversal goes through the [`Visitor`] trait: [`SyntaxNode::accept`] calls
//! `visit_node` before the children, `leave_node` after them, and
//! `visit_token` / `visit_error` for each leaf in source order.
use std::fmt::Write as _;

use crate::g4::lexing::{Token, TokenStream};

/// Layout-relevant category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    GrammarSpec,
    GrammarType,
    OptionsSpec,
    TokensSpec,
    ChannelsSpec,
    ModeSpec,
    RuleSpec,
    LexerRuleSpec,
    LabeledAlternative,
    ActionBlock,
    Other,
}

/// What happens to the context when a node of some category is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Push a frame and start a new line
    Block,
    /// Push a frame on the current line
    Inline,
    /// Keep the enclosing frame
    Inherit,
}

impl Category {
    pub fn entry(self) -> Entry {
        match self {
            Category::GrammarSpec
            | Category::OptionsSpec
            | Category::TokensSpec
            | Category::ChannelsSpec
            | Category::ModeSpec
            | Category::RuleSpec
            | Category::LexerRuleSpec => Entry::Block,
            Category::LabeledAlternative | Category::ActionBlock => Entry::Inline,
            Category::GrammarType | Category::Other => Entry::Inherit,
        }
    }

    pub fn owns_frame(self) -> bool {
        self.entry() != Entry::Inherit
    }
}

/// The grammar rule a node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    GrammarSpec,
    GrammarDecl,
    GrammarType,
    OptionsSpec,
    OptionEntry,
    OptionValue,
    DelegateGrammars,
    DelegateGrammar,
    TokensSpec,
    ChannelsSpec,
    IdList,
    Action,
    ActionScopeName,
    ActionBlock,
    ModeSpec,
    Rules,
    RuleSpec,
    ParserRuleSpec,
    RuleModifiers,
    RuleReturns,
    ThrowsSpec,
    LocalsSpec,
    RuleAction,
    ExceptionGroup,
    ExceptionHandler,
    FinallyClause,
    RuleBlock,
    RuleAltList,
    LabeledAlt,
    AltList,
    Alternative,
    Element,
    LabeledElement,
    EbnfSuffix,
    Block,
    Atom,
    Terminal,
    RuleRef,
    NotSet,
    BlockSet,
    SetElement,
    CharacterRange,
    ElementOptions,
    ElementOption,
    LexerRuleSpec,
    LexerRuleBlock,
    LexerAltList,
    LexerAlt,
    LexerElement,
    LabeledLexerElement,
    LexerBlock,
    LexerAtom,
    LexerCommands,
    LexerCommand,
    Identifier,
    /// Tokens the parser could not place, kept verbatim
    Recovered,
}

impl NodeKind {
    pub fn category(self) -> Category {
        match self {
            NodeKind::GrammarSpec => Category::GrammarSpec,
            NodeKind::GrammarType => Category::GrammarType,
            NodeKind::OptionsSpec => Category::OptionsSpec,
            NodeKind::TokensSpec => Category::TokensSpec,
            NodeKind::ChannelsSpec => Category::ChannelsSpec,
            NodeKind::ModeSpec => Category::ModeSpec,
            NodeKind::RuleSpec => Category::RuleSpec,
            NodeKind::LexerRuleSpec => Category::LexerRuleSpec,
            NodeKind::LabeledAlt => Category::LabeledAlternative,
            NodeKind::ActionBlock => Category::ActionBlock,
            _ => Category::Other,
        }
    }
}

/// First and last token index covered by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpan {
    pub start: usize,
    pub stop: usize,
}

impl NodeSpan {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Orders the boundaries so that `start <= stop`.
    pub fn normalized(self) -> Self {
        Self {
            start: self.start.min(self.stop),
            stop: self.start.max(self.stop),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    /// A main-channel token, by stream index
    Token(usize),
    /// A token inside a recovered region, by stream index
    Error(usize),
}

impl SyntaxElement {
    fn first_index(&self) -> Option<usize> {
        match self {
            SyntaxElement::Node(node) => node.span.map(|span| span.start),
            SyntaxElement::Token(index) | SyntaxElement::Error(index) => Some(*index),
        }
    }

    fn last_index(&self) -> Option<usize> {
        match self {
            SyntaxElement::Node(node) => node.span.map(|span| span.stop),
            SyntaxElement::Token(index) | SyntaxElement::Error(index) => Some(*index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// `None` when the node covers no tokens (an empty alternative)
    pub span: Option<NodeSpan>,
    pub children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, children: Vec<SyntaxElement>) -> Self {
        let start = children.iter().find_map(SyntaxElement::first_index);
        let stop = children.iter().rev().find_map(SyntaxElement::last_index);
        let span = match (start, stop) {
            (Some(start), Some(stop)) => Some(NodeSpan::new(start, stop)),
            _ => None,
        };
        Self {
            kind,
            span,
            children,
        }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Walks the tree in source order, reporting every node and leaf to `visitor`.
    pub fn accept<V: Visitor>(&self, stream: &TokenStream, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_node(self)?;
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.accept(stream, visitor)?,
                SyntaxElement::Token(index) => {
                    if let Some(token) = stream.get(*index) {
                        visitor.visit_token(token)?;
                    }
                }
                SyntaxElement::Error(index) => {
                    if let Some(token) = stream.get(*index) {
                        visitor.visit_error(token)?;
                    }
                }
            }
        }
        visitor.leave_node(self)
    }

    /// Iterates over the direct child nodes.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Node(node) => Some(node),
            _ => None,
        })
    }

    /// Depth-first search for every node of `kind`.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&SyntaxNode> {
        let mut found = Vec::new();
        self.collect_kind(kind, &mut found);
        found
    }

    fn collect_kind<'a>(&'a self, kind: NodeKind, found: &mut Vec<&'a SyntaxNode>) {
        if self.kind == kind {
            found.push(self);
        }
        for node in self.child_nodes() {
            node.collect_kind(kind, found);
        }
    }

    /// Renders the tree as an indented outline, one node or leaf per line.
    pub fn render_tree(&self, stream: &TokenStream) -> String {
        let mut out = String::new();
        self.render_into(stream, 0, &mut out);
        out
    }

    fn render_into(&self, stream: &TokenStream, depth: usize, out: &mut String) {
        let _ = writeln!(out, "{}{:?}", "  ".repeat(depth), self.kind);
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.render_into(stream, depth + 1, out),
                SyntaxElement::Token(index) | SyntaxElement::Error(index) => {
                    let marker = if matches!(child, SyntaxElement::Error(_)) { "!" } else { "" };
                    let text = stream.get(*index).map_or("?", |token| token.text.as_str());
                    let _ = writeln!(out, "{}{}{:?}", "  ".repeat(depth + 1), marker, text);
                }
            }
        }
    }
}

/// Receives traversal events from [`SyntaxNode::accept`]
pub trait Visitor {
    type Error;

    /// Called before a node's children
    fn visit_node(&mut self, _node: &SyntaxNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after a node's children
    fn leave_node(&mut self, _node: &SyntaxNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for every main-channel leaf
    fn visit_token(&mut self, _token: &Token) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for every leaf of a recovered region
    fn visit_error(&mut self, _token: &Token) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g4::lexing::TokenKind;

    #[derive(Default)]
    struct EventLog(Vec<String>);

    impl Visitor for EventLog {
        type Error = std::convert::Infallible;

        fn visit_node(&mut self, node: &SyntaxNode) -> Result<(), Self::Error> {
            self.0.push(format!("enter {:?}", node.kind));
            Ok(())
        }

        fn leave_node(&mut self, node: &SyntaxNode) -> Result<(), Self::Error> {
            self.0.push(format!("leave {:?}", node.kind));
            Ok(())
        }

        fn visit_token(&mut self, token: &Token) -> Result<(), Self::Error> {
            self.0.push(token.text.clone());
            Ok(())
        }

        fn visit_error(&mut self, token: &Token) -> Result<(), Self::Error> {
            self.0.push(format!("error {}", token.text));
            Ok(())
        }
    }

    fn stream() -> TokenStream {
        TokenStream::new(vec![
            Token::new(TokenKind::RuleRef, "a"),
            Token::new(TokenKind::Colon, ":"),
            Token::new(TokenKind::TokenRef, "B"),
            Token::new(TokenKind::Semi, ";"),
        ])
    }

    fn rule() -> SyntaxNode {
        let alt = SyntaxNode::new(NodeKind::LabeledAlt, vec![SyntaxElement::Token(2)]);
        SyntaxNode::new(
            NodeKind::ParserRuleSpec,
            vec![
                SyntaxElement::Token(0),
                SyntaxElement::Token(1),
                SyntaxElement::Node(alt),
                SyntaxElement::Error(3),
            ],
        )
    }

    #[test]
    fn test_span_from_leaves() {
        assert_eq!(rule().span, Some(NodeSpan::new(0, 3)));
        let empty = SyntaxNode::new(NodeKind::Alternative, vec![]);
        assert_eq!(empty.span, None);
        let wrapper = SyntaxNode::new(
            NodeKind::AltList,
            vec![SyntaxElement::Node(empty), SyntaxElement::Token(5)],
        );
        assert_eq!(wrapper.span, Some(NodeSpan::new(5, 5)));
    }

    #[test]
    fn test_normalized_span() {
        assert_eq!(NodeSpan::new(7, 3).normalized(), NodeSpan::new(3, 7));
        assert_eq!(NodeSpan::new(3, 7).normalized(), NodeSpan::new(3, 7));
    }

    #[test]
    fn test_accept_order() {
        let mut log = EventLog::default();
        let result = rule().accept(&stream(), &mut log);
        assert!(result.is_ok());
        assert_eq!(
            log.0,
            vec![
                "enter ParserRuleSpec",
                "a",
                ":",
                "enter LabeledAlt",
                "B",
                "leave LabeledAlt",
                "error ;",
                "leave ParserRuleSpec",
            ]
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(NodeKind::LabeledAlt.category(), Category::LabeledAlternative);
        assert_eq!(NodeKind::ParserRuleSpec.category(), Category::Other);
        assert_eq!(Category::RuleSpec.entry(), Entry::Block);
        assert_eq!(Category::ActionBlock.entry(), Entry::Inline);
        assert!(!Category::GrammarType.owns_frame());
    }

    #[test]
    fn test_render_tree() {
        let rendered = rule().render_tree(&stream());
        assert_eq!(
            rendered,
            "ParserRuleSpec\n  \"a\"\n  \":\"\n  LabeledAlt\n    \"B\"\n  !\";\"\n"
        );
    }
}
