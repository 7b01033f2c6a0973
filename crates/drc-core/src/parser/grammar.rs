//! DRC grammar built from the combinators.
//!
//! ```text
//! formula     ::= conjunction ( "||" conjunction )* EOF
//! conjunction ::= literal ( "&&" literal )*
//! literal     ::= [ "!" ] name "(" [ term ( "," term )* ] ")"
//! term        ::= identifier | quoted-string | "*"
//! ```

use super::combinator::{
    alternative, eof, many, optional, pair, preceded, satisfy, sep_by, terminated, token, Parser,
};
use super::error::ParseError;
use crate::ast::{Conjunction, Formula, Predicate, Term};
use crate::lexer::{Lexer, Token, TokenStream};

/// A predicate argument: `*`, a quoted literal, or a bare identifier.
///
/// Bare identifiers made only of digits become constants.
#[must_use]
pub fn term() -> Parser<Term> {
    alternative(vec![
        token(Token::Star).map(|()| Term::Wildcard),
        satisfy("quoted string", |t| match t {
            Token::Quoted(text) => Some(Term::Constant(text.clone())),
            _ => None,
        }),
        satisfy("variable", |t| t.as_identifier().map(Term::from_identifier)),
    ])
}

/// A possibly negated predicate application.
#[must_use]
pub fn literal() -> Parser<Predicate> {
    let negation = optional(token(Token::Bang));
    let name = satisfy("predicate name", |t| t.as_identifier().map(String::from));
    let args = preceded(
        token(Token::LeftParen),
        terminated(sep_by(token(Token::Comma), term()), token(Token::RightParen)),
    );
    pair(negation, pair(name, args)).map(|(bang, (name, args))| Predicate {
        name,
        args,
        negated: bang.is_some(),
    })
}

/// One or more literals joined by `&&`.
#[must_use]
pub fn conjunction() -> Parser<Conjunction> {
    pair(literal(), many(preceded(token(Token::And), literal()))).map(|(first, rest)| {
        let mut predicates = vec![first];
        predicates.extend(rest);
        Conjunction::new(predicates)
    })
}

/// One or more conjunctions joined by `||`, followed by end of input.
#[must_use]
pub fn formula() -> Parser<Formula> {
    let body = pair(
        conjunction(),
        many(preceded(token(Token::Or), conjunction())),
    );
    terminated(body, eof()).map(|(first, rest)| {
        let mut conjunctions = vec![first];
        conjunctions.extend(rest);
        Formula::new(conjunctions)
    })
}

/// Parses a complete query formula.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text does not tokenize, does not match the
/// grammar, or has tokens left over after a complete formula.
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut stream = TokenStream::new(&tokens);
    formula()
        .parse(&mut stream)
        .ok_or_else(|| syntax_error(&stream))
}

/// Builds the error for the farthest point any branch reached.
fn syntax_error(stream: &TokenStream<'_>) -> ParseError {
    let position = stream.furthest();
    let expected = stream.expectations().to_vec();
    match stream.token_at(position) {
        Some(found) => ParseError::Unexpected {
            position,
            found: found.clone(),
            expected,
        },
        None => ParseError::UnexpectedEnd { position, expected },
    }
}
