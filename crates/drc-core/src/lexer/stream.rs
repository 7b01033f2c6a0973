//! Backtracking cursor over a token list.

use super::Token;

/// A saved stream position, restorable with [`TokenStream::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

/// A pull-based cursor with single-token lookahead over an immutable token
/// slice.
///
/// Positions are plain indexes, so a [`Mark`] taken at any point stays valid
/// and [`reset`](Self::reset) rewinds in constant time no matter how many
/// tokens a failed branch consumed.
///
/// The stream also remembers the farthest index at which a token expectation
/// failed, together with what was expected there. Rewinding does not clear
/// that record: it is what a syntax error reports once every alternative has
/// been exhausted.
#[derive(Debug)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    pos: usize,
    furthest: usize,
    expected: Vec<String>,
}

impl<'t> TokenStream<'t> {
    /// Creates a stream positioned at the first token.
    #[must_use]
    pub const fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Returns true if at least one token remains.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// Consumes and returns the next token.
    pub fn pop(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Saves the current position.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewinds (or fast-forwards) to a previously saved position.
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.tokens.len());
        self.pos = mark.0;
    }

    /// Index of the next token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Records that `what` was expected at the current position.
    ///
    /// Only failures at the farthest position seen so far are kept.
    pub fn expected(&mut self, what: impl Into<String>) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            let what = what.into();
            if !self.expected.contains(&what) {
                self.expected.push(what);
            }
        }
    }

    /// Farthest index where an expectation failed.
    #[must_use]
    pub const fn furthest(&self) -> usize {
        self.furthest
    }

    /// The expectations recorded at [`furthest`](Self::furthest).
    #[must_use]
    pub fn expectations(&self) -> &[String] {
        &self.expected
    }

    /// Token at an arbitrary index, if any.
    #[must_use]
    pub fn token_at(&self, index: usize) -> Option<&'t Token> {
        self.tokens.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::Identifier(String::from("p")),
            Token::LeftParen,
            Token::Star,
            Token::RightParen,
        ]
    }

    #[test]
    fn test_pop_until_exhausted() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);
        for expected in &tokens {
            assert!(stream.has_next());
            assert_eq!(stream.peek(), Some(expected));
            assert_eq!(stream.pop(), Some(expected));
        }
        assert!(!stream.has_next());
        assert_eq!(stream.peek(), None);
        assert_eq!(stream.pop(), None);
    }

    #[test]
    fn test_reset_across_several_tokens() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);
        stream.pop();
        let mark = stream.mark();
        stream.pop();
        stream.pop();
        stream.pop();
        assert!(!stream.has_next());
        stream.reset(mark);
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.pop(), Some(&Token::LeftParen));
    }

    #[test]
    fn test_nested_marks() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);
        let outer = stream.mark();
        stream.pop();
        let inner = stream.mark();
        stream.pop();
        stream.reset(inner);
        assert_eq!(stream.position(), 1);
        stream.reset(outer);
        assert_eq!(stream.position(), 0);
        assert!(outer < inner);
    }

    #[test]
    fn test_expected_keeps_farthest() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);
        stream.expected("`!`");
        stream.pop();
        stream.pop();
        stream.expected("term");
        stream.expected("term");
        stream.expected("`)`");
        stream.reset(Mark(0));
        stream.expected("predicate name");
        assert_eq!(stream.furthest(), 2);
        assert_eq!(stream.expectations(), ["term", "`)`"]);
    }
}
