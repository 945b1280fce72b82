//! Lexer
//!
//! This module turns ANTLR v4 grammar text into a [`TokenStream`].
//!
//! Structure:
//!     The flat scan is done by the logos lexer in [`tokens`]. The scan keeps
//!     hidden tokens (comments and whitespace) instead of skipping them: the
//!     parser never sees them, but the formatter has to put every comment back.
//!
//! The pipeline consists of:
//! 1. Raw tokenization using logos ([`tokens::RawToken`])
//! 2. Braced block resolution ([`lexer_impl`]): options-style blocks are lexed
//!    as structure, embedded actions are split into pieces ([`actions`])
//! 3. Index assignment, so every token knows its absolute position ([`stream`])

pub mod actions;
pub mod lexer_impl;
pub mod stream;
pub mod tokens;

pub use lexer_impl::tokenize;
pub use stream::TokenStream;
pub use tokens::{Channel, Token, TokenKind};
