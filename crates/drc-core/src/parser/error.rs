//! Parser error types.

use crate::lexer::{LexError, Token};

/// A lexical or syntax error in query text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text could not be split into tokens.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token did not fit the grammar.
    #[error("unexpected `{found}` at token {position}: expected {}", describe(.expected))]
    Unexpected {
        /// Index of the offending token.
        position: usize,
        /// The offending token.
        found: Token,
        /// What the grammar would have accepted instead.
        expected: Vec<String>,
    },

    /// The query ended while the grammar still needed tokens.
    #[error("unexpected end of query after {position} tokens: expected {}", describe(.expected))]
    UnexpectedEnd {
        /// Number of tokens in the query.
        position: usize,
        /// What the grammar would have accepted.
        expected: Vec<String>,
    },
}

/// Joins expectations as `a, b or c`.
fn describe(expected: &[String]) -> String {
    match expected {
        [] => String::from("nothing"),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
