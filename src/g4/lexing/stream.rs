//! Random-access token stream
//!
//! The stream keeps every token the lexer produced, main and hidden channel
//! alike, in source order. A token's `index` is its position in the stream.
//! The parser only consumes the main channel; the formatter goes back to the
//! stream to find the hidden tokens (comments, whitespace) around a node.
use super::tokens::Token;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Builds a stream, renumbering every token to its position.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        for (position, token) in tokens.iter_mut().enumerate() {
            token.index = position;
        }
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Main-channel tokens, in order, as parser input.
    pub fn main_channel(&self) -> Vec<Token> {
        self.tokens
            .iter()
            .filter(|token| !token.is_hidden())
            .cloned()
            .collect()
    }

    /// The contiguous run of hidden tokens ending right before `index`.
    pub fn hidden_to_left(&self, index: usize) -> &[Token] {
        let end = index.min(self.tokens.len());
        let mut start = end;
        while start > 0 && self.tokens[start - 1].is_hidden() {
            start -= 1;
        }
        &self.tokens[start..end]
    }

    /// The contiguous run of hidden tokens starting right after `index`.
    pub fn hidden_to_right(&self, index: usize) -> &[Token] {
        let start = index.saturating_add(1).min(self.tokens.len());
        let mut end = start;
        while end < self.tokens.len() && self.tokens[end].is_hidden() {
            end += 1;
        }
        &self.tokens[start..end]
    }
}
