//! Token types for the DRC lexer.

use core::fmt;

/// A lexical unit of a DRC query.
///
/// Tokens carry no source position; their identity is their place in the
/// token list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `!`
    Bang,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `*`
    Star,
    /// Bare run of ASCII letters and digits (e.g. `student`, `S`, `2016`).
    Identifier(String),
    /// Double-quoted string with its delimiters stripped.
    Quoted(String),
}

impl Token {
    /// Returns the identifier text if this is a bare identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bang => f.write_str("!"),
            Self::And => f.write_str("&&"),
            Self::Or => f.write_str("||"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
            Self::Star => f.write_str("*"),
            Self::Identifier(name) => f.write_str(name),
            Self::Quoted(text) => write!(f, "\"{text}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_identifier() {
        assert_eq!(
            Token::Identifier(String::from("student")).as_identifier(),
            Some("student")
        );
        assert_eq!(Token::Quoted(String::from("student")).as_identifier(), None);
        assert_eq!(Token::Star.as_identifier(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Or.to_string(), "||");
        assert_eq!(Token::Quoted(String::from("Jane Dane")).to_string(), "\"Jane Dane\"");
        assert_eq!(Token::Identifier(String::from("S")).to_string(), "S");
    }
}
