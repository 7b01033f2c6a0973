//! Backtracking parser combinators over a [`TokenStream`].
//!
//! A [`Parser`] either produces a value or fails with `None`. Failure leaves
//! the stream wherever the failed attempt stopped; it is the job of the
//! combinators that try something speculatively ([`alternative`], [`many`],
//! [`sep_by`], [`optional`]) to rewind to the mark they took. [`sequence`]
//! and [`pair`] never rewind on their own.
//!
//! The combinators do not memoize. They are meant for a small LL grammar
//! without left recursion.

use std::rc::Rc;

use crate::lexer::{Token, TokenStream};

/// A parser producing values of type `T`.
pub struct Parser<T> {
    run: Rc<dyn Fn(&mut TokenStream<'_>) -> Option<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T: 'static> Parser<T> {
    /// Wraps a parsing function.
    pub fn new(run: impl Fn(&mut TokenStream<'_>) -> Option<T> + 'static) -> Self {
        Self { run: Rc::new(run) }
    }

    /// Runs the parser at the current stream position.
    pub fn parse(&self, stream: &mut TokenStream<'_>) -> Option<T> {
        (self.run)(stream)
    }

    /// Transforms the produced value.
    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        Parser::new(move |stream| self.parse(stream).map(&f))
    }
}

/// Matches exactly one token equal to `expected`.
#[must_use]
pub fn token(expected: Token) -> Parser<()> {
    let label = format!("`{expected}`");
    Parser::new(move |stream| {
        if stream.peek() == Some(&expected) {
            stream.pop();
            Some(())
        } else {
            stream.expected(label.as_str());
            None
        }
    })
}

/// Matches one token for which `f` returns a value.
///
/// `label` names what was expected when the token is rejected.
#[must_use]
pub fn satisfy<T: 'static>(
    label: &'static str,
    f: impl Fn(&Token) -> Option<T> + 'static,
) -> Parser<T> {
    Parser::new(move |stream| match stream.peek().and_then(&f) {
        Some(value) => {
            stream.pop();
            Some(value)
        }
        None => {
            stream.expected(label);
            None
        }
    })
}

/// Succeeds only when no tokens remain.
#[must_use]
pub fn eof() -> Parser<()> {
    Parser::new(|stream| {
        if stream.has_next() {
            stream.expected("end of input");
            None
        } else {
            Some(())
        }
    })
}

/// Runs every parser in order and collects their values.
///
/// Fails as soon as one parser fails, without rewinding.
#[must_use]
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<Vec<T>> {
    Parser::new(move |stream| parsers.iter().map(|p| p.parse(stream)).collect())
}

/// Runs two parsers in order and pairs their values.
#[must_use]
pub fn pair<A: 'static, B: 'static>(first: Parser<A>, second: Parser<B>) -> Parser<(A, B)> {
    Parser::new(move |stream| {
        let a = first.parse(stream)?;
        let b = second.parse(stream)?;
        Some((a, b))
    })
}

/// Runs `skip` then `keep`, returning the value of `keep`.
#[must_use]
pub fn preceded<A: 'static, B: 'static>(skip: Parser<A>, keep: Parser<B>) -> Parser<B> {
    pair(skip, keep).map(|(_, b)| b)
}

/// Runs `keep` then `skip`, returning the value of `keep`.
#[must_use]
pub fn terminated<A: 'static, B: 'static>(keep: Parser<A>, skip: Parser<B>) -> Parser<A> {
    pair(keep, skip).map(|(a, _)| a)
}

/// Tries each parser in order from the same position.
///
/// Every failed branch is rewound to the starting mark before the next one
/// runs, however many tokens it consumed. If all branches fail the stream is
/// left at the starting mark.
#[must_use]
pub fn alternative<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |stream| {
        let mark = stream.mark();
        for parser in &parsers {
            if let Some(value) = parser.parse(stream) {
                return Some(value);
            }
            stream.reset(mark);
        }
        None
    })
}

/// Runs `parser` as long as it succeeds. Never fails.
///
/// The failing attempt is rewound to the mark taken just before it. An
/// attempt that succeeds without consuming anything also ends the loop.
#[must_use]
pub fn many<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |stream| {
        let mut values = vec![];
        loop {
            let mark = stream.mark();
            match parser.parse(stream) {
                Some(value) => {
                    values.push(value);
                    if stream.mark() == mark {
                        break;
                    }
                }
                None => {
                    stream.reset(mark);
                    break;
                }
            }
        }
        Some(values)
    })
}

/// Like [`many`], but requires at least one success.
#[must_use]
pub fn many1<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    let rest = many(parser.clone());
    Parser::new(move |stream| {
        let first = parser.parse(stream)?;
        let mut values = vec![first];
        values.extend(rest.parse(stream)?);
        Some(values)
    })
}

/// Parses zero or more `item`s separated by `separator`.
///
/// A trailing separator is not consumed. When no item is present the result
/// is an empty list.
#[must_use]
pub fn sep_by<S: 'static, T: 'static>(separator: Parser<S>, item: Parser<T>) -> Parser<Vec<T>> {
    let rest = many(preceded(separator, item.clone()));
    Parser::new(move |stream| {
        let mark = stream.mark();
        let Some(first) = item.parse(stream) else {
            stream.reset(mark);
            return Some(vec![]);
        };
        let mut values = vec![first];
        values.extend(rest.parse(stream)?);
        Some(values)
    })
}

/// Parses `parser` if possible, rewinding and yielding `None` otherwise.
#[must_use]
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |stream| {
        let mark = stream.mark();
        let value = parser.parse(stream);
        if value.is_none() {
            stream.reset(mark);
        }
        Some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::Identifier(String::from(name))
    }

    fn any_ident() -> Parser<String> {
        satisfy("identifier", |t| t.as_identifier().map(String::from))
    }

    #[test]
    fn test_token_match_and_mismatch() {
        let tokens = vec![Token::Comma, Token::Star];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(token(Token::Star).parse(&mut stream), None);
        assert_eq!(stream.position(), 0);
        assert_eq!(token(Token::Comma).parse(&mut stream), Some(()));
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_token_on_empty_stream() {
        let mut stream = TokenStream::new(&[]);
        assert_eq!(token(Token::Comma).parse(&mut stream), None);
        assert_eq!(stream.expectations(), ["`,`"]);
    }

    #[test]
    fn test_sequence_does_not_rewind() {
        let tokens = vec![ident("a"), ident("b"), Token::Star];
        let mut stream = TokenStream::new(&tokens);
        let parser = sequence(vec![any_ident(), any_ident(), any_ident()]);
        assert_eq!(parser.parse(&mut stream), None);
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn test_alternative_rewinds_multi_token_branch() {
        let tokens = vec![ident("a"), ident("b"), Token::Comma];
        let mut stream = TokenStream::new(&tokens);
        let two_then_star = sequence(vec![
            any_ident().map(|_| 1),
            any_ident().map(|_| 2),
            token(Token::Star).map(|()| 3),
        ]);
        let two_then_comma = sequence(vec![
            any_ident().map(|_| 4),
            any_ident().map(|_| 5),
            token(Token::Comma).map(|()| 6),
        ]);
        let parser = alternative(vec![two_then_star, two_then_comma]);
        assert_eq!(parser.parse(&mut stream), Some(vec![4, 5, 6]));
        assert!(!stream.has_next());
    }

    #[test]
    fn test_alternative_all_fail_resets() {
        let tokens = vec![ident("a"), Token::Star];
        let mut stream = TokenStream::new(&tokens);
        let parser = alternative(vec![
            preceded(any_ident(), token(Token::Comma)),
            preceded(any_ident(), token(Token::And)),
        ]);
        assert_eq!(parser.parse(&mut stream), None);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.furthest(), 1);
        assert_eq!(stream.expectations(), ["`,`", "`&&`"]);
    }

    #[test]
    fn test_many_stops_at_failed_attempt() {
        let tokens = vec![
            Token::Comma,
            ident("a"),
            Token::Comma,
            ident("b"),
            Token::Comma,
            Token::Star,
        ];
        let mut stream = TokenStream::new(&tokens);
        let parser = many(preceded(token(Token::Comma), any_ident()));
        assert_eq!(
            parser.parse(&mut stream),
            Some(vec![String::from("a"), String::from("b")])
        );
        assert_eq!(stream.position(), 4);
    }

    #[test]
    fn test_many_zero_matches() {
        let tokens = vec![Token::Star];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(many(any_ident()).parse(&mut stream), Some(vec![]));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_many_stops_on_empty_success() {
        let tokens = vec![Token::Star];
        let mut stream = TokenStream::new(&tokens);
        let parser = many(optional(any_ident()));
        assert_eq!(parser.parse(&mut stream), Some(vec![None]));
    }

    #[test]
    fn test_many1_requires_one() {
        let tokens = vec![Token::Star];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(many1(any_ident()).parse(&mut stream), None);

        let tokens = vec![ident("a"), ident("b")];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(
            many1(any_ident()).parse(&mut stream),
            Some(vec![String::from("a"), String::from("b")])
        );
    }

    #[test]
    fn test_sep_by() {
        let tokens = vec![ident("a"), Token::Comma, ident("b"), Token::RightParen];
        let mut stream = TokenStream::new(&tokens);
        let parser = sep_by(token(Token::Comma), any_ident());
        assert_eq!(
            parser.parse(&mut stream),
            Some(vec![String::from("a"), String::from("b")])
        );
        assert_eq!(stream.peek(), Some(&Token::RightParen));
    }

    #[test]
    fn test_sep_by_empty() {
        let tokens = vec![Token::RightParen];
        let mut stream = TokenStream::new(&tokens);
        let parser = sep_by(token(Token::Comma), any_ident());
        assert_eq!(parser.parse(&mut stream), Some(vec![]));
        assert_eq!(stream.position(), 0);

        let mut stream = TokenStream::new(&[]);
        assert_eq!(parser.parse(&mut stream), Some(vec![]));
    }

    #[test]
    fn test_sep_by_leaves_trailing_separator() {
        let tokens = vec![ident("a"), Token::Comma, Token::RightParen];
        let mut stream = TokenStream::new(&tokens);
        let parser = sep_by(token(Token::Comma), any_ident());
        assert_eq!(parser.parse(&mut stream), Some(vec![String::from("a")]));
        assert_eq!(stream.peek(), Some(&Token::Comma));
    }

    #[test]
    fn test_optional() {
        let tokens = vec![Token::Bang, ident("p")];
        let mut stream = TokenStream::new(&tokens);
        let bang = optional(token(Token::Bang));
        assert_eq!(bang.parse(&mut stream), Some(Some(())));
        assert_eq!(bang.parse(&mut stream), Some(None));
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_eof() {
        let tokens = vec![Token::Star];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(eof().parse(&mut stream), None);
        stream.pop();
        assert_eq!(eof().parse(&mut stream), Some(()));
    }
}
