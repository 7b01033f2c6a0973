//! DRC Lexer
//!
//! This module turns query text into a flat token list and provides the
//! backtracking cursor the grammar runs on.

mod stream;
mod token;
mod tokenizer;

pub use stream::{Mark, TokenStream};
pub use token::Token;
pub use tokenizer::{LexError, Lexer};
