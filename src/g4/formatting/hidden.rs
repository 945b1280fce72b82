//! Hidden-token locator
//!
//! Finds the comments that have to be written around a node or a leaf. The
//! locator never writes anything itself: it hands back the comment tokens and
//! remembers what it handed out.
//!
//! Three watermarks keep every comment exactly once:
//!
//! - `left` is the highest node start whose left run was flushed. Nested nodes
//!   that start on the same token only flush once.
//! - `right` is the same for node stops and the run to their right.
//! - `emitted` is the highest comment index returned so far. The run right of
//!   one node is usually also the run left of the next one; this mark stops the
//!   second flush from repeating it.
use crate::g4::config::FormattingRules;
use crate::g4::lexing::{Token, TokenStream};
use crate::g4::parsing::NodeSpan;

#[derive(Debug, Clone, Default)]
pub struct HiddenTokenLocator {
    comment_openers: Vec<String>,
    left: Option<usize>,
    right: Option<usize>,
    emitted: Option<usize>,
}

impl HiddenTokenLocator {
    pub fn new(comment_openers: Vec<String>) -> Self {
        Self {
            comment_openers,
            ..Self::default()
        }
    }

    pub fn from_rules(rules: &FormattingRules) -> Self {
        Self::new(rules.comment_openers.clone())
    }

    /// Comments in the hidden run before the node's first token, unless a node
    /// starting there was already flushed.
    pub fn flush_left<'s>(&mut self, span: NodeSpan, stream: &'s TokenStream) -> Vec<&'s Token> {
        let start = span.normalized().start;
        if self.left.is_some_and(|mark| start <= mark) {
            return Vec::new();
        }
        self.left = Some(start);
        self.take_comments(stream.hidden_to_left(start))
    }

    /// Comments in the hidden run after the node's last token, unless a node
    /// ending there was already flushed.
    pub fn flush_right<'s>(&mut self, span: NodeSpan, stream: &'s TokenStream) -> Vec<&'s Token> {
        let stop = span.normalized().stop;
        if self.right.is_some_and(|mark| stop <= mark) {
            return Vec::new();
        }
        self.right = Some(stop);
        self.take_comments(stream.hidden_to_right(stop))
    }

    /// Comments right before a leaf that no node boundary has flushed yet.
    pub fn flush_before<'s>(&mut self, index: usize, stream: &'s TokenStream) -> Vec<&'s Token> {
        self.take_comments(stream.hidden_to_left(index))
    }

    pub fn is_comment(&self, text: &str) -> bool {
        let text = text.trim();
        !text.is_empty()
            && self
                .comment_openers
                .iter()
                .any(|opener| text.starts_with(opener.as_str()))
    }

    fn take_comments<'s>(&mut self, run: &'s [Token]) -> Vec<&'s Token> {
        let comments: Vec<&Token> = run
            .iter()
            .filter(|token| self.emitted.map_or(true, |mark| token.index > mark))
            .filter(|token| self.is_comment(&token.text))
            .collect();
        if let Some(last) = comments.last() {
            self.emitted = Some(last.index);
        }
        comments
    }
}
