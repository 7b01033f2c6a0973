//! DRC tokenizer implementation.
//!
//! The tokenizer walks an ordered pattern table. At every position the first
//! pattern that matches wins; there is no longest-match rule, so the table
//! order is part of the language definition.

use std::sync::LazyLock;

use regex::Regex;

use super::Token;

/// Longest snippet of unrecognized input quoted back in a [`LexError`].
const SNIPPET_LEN: usize = 16;

/// Error raised when no pattern matches at some position of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized input at byte {position}: {snippet:?}")]
pub struct LexError {
    /// Byte offset where lexing stopped.
    pub position: usize,
    /// The input starting at `position`, cut at the next whitespace.
    pub snippet: String,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Bang,
    Identifier,
    Star,
    Quoted,
    Comma,
    And,
    Or,
    LeftParen,
    RightParen,
}

impl Pattern {
    fn token(self, lexeme: &str) -> Token {
        match self {
            Self::Bang => Token::Bang,
            Self::Identifier => Token::Identifier(String::from(lexeme)),
            Self::Star => Token::Star,
            // The pattern guarantees both delimiters are present.
            Self::Quoted => Token::Quoted(String::from(&lexeme[1..lexeme.len() - 1])),
            Self::Comma => Token::Comma,
            Self::And => Token::And,
            Self::Or => Token::Or,
            Self::LeftParen => Token::LeftParen,
            Self::RightParen => Token::RightParen,
        }
    }
}

static PATTERNS: LazyLock<Vec<(Regex, Pattern)>> = LazyLock::new(|| {
    [
        (r"^!", Pattern::Bang),
        (r"^[A-Za-z0-9]+", Pattern::Identifier),
        (r"^\*", Pattern::Star),
        (r#"^"[^"]*""#, Pattern::Quoted),
        (r"^,", Pattern::Comma),
        (r"^&&", Pattern::And),
        (r"^\|\|", Pattern::Or),
        (r"^\(", Pattern::LeftParen),
        (r"^\)", Pattern::RightParen),
    ]
    .into_iter()
    .map(|(source, pattern)| {
        let regex = Regex::new(source).expect("lexer patterns are valid regular expressions");
        (regex, pattern)
    })
    .collect()
});

/// A lexer that tokenizes DRC query text.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] at the first position where no token pattern
    /// matches. No partial token list is returned.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Scans the next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }

        for (regex, pattern) in PATTERNS.iter() {
            if let Some(found) = regex.find(rest) {
                self.pos += found.end();
                return Ok(Some(pattern.token(found.as_str())));
            }
        }

        Err(LexError {
            position: self.pos,
            snippet: rest
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .chars()
                .take(SNIPPET_LEN)
                .collect(),
        })
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}
