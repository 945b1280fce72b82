//! Parser
//!
//! Builds a [`SyntaxNode`] tree from the main channel of a [`TokenStream`]
//! using chumsky combinators.
//!
//! Structure:
//!     [`combinators`] holds the small vocabulary every rule is written in:
//!     single-token matchers, optional and repeated pieces, and `node`, which
//!     folds a matched sequence into a tree node. [`parser`] spells out the
//!     ANTLR v4 grammar with it. [`tree`] defines the nodes, their layout
//!     categories and the visitor used to walk them.
//!
//! [`TokenStream`]: crate::g4::lexing::TokenStream

pub mod api;
pub mod combinators;
pub mod parser;
pub mod tree;

pub use api::parse_grammar;
pub use tree::{Category, Entry, NodeKind, NodeSpan, SyntaxElement, SyntaxNode, Visitor};
