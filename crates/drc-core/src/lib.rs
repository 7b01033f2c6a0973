//! # drc-core
//!
//! A Domain Relational Calculus (DRC) query front end and compiler.
//!
//! This crate provides:
//! - A regex-table lexer and an index-based backtracking token stream
//! - Generic parser combinators and the DRC grammar written with them
//! - A compiler that checks a formula against a schema and the
//!   range-restriction (safety) rules and emits a [`QueryPlan`]
//! - SQL rendering of plans through a [`Dialect`](sql::Dialect)
//!
//! ## Query language
//!
//! A query is a union (`||`) of conjunctions (`&&`) of predicates, each
//! possibly negated with `!`. Predicate arguments are variables (bare
//! identifiers), constants (double-quoted strings or bare digits) or the
//! non-binding wildcard `*`:
//!
//! ```text
//! student(S, SD) && immatriculated(S, "2016") && !registered(S, *)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drc_core::{compile_query, Bindings, Schema};
//!
//! let schema = Schema::new()
//!     .with_relation("student", &["S", "SD"])
//!     .with_relation("registered", &["S", "L"]);
//!
//! let plan = compile_query(
//!     "student(S, SD) && !registered(S, *)",
//!     &schema,
//!     &[String::from("SD")],
//!     &Bindings::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(plan.branches.len(), 1);
//! assert_eq!(plan.branches[0].anti_joins.len(), 1);
//! ```

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod sql;

pub use ast::{Conjunction, Formula, Predicate, Term};
pub use compiler::{compile, Bindings, CompileError, QueryPlan};
pub use lexer::{Lexer, Token, TokenStream};
pub use parser::{parse_formula, ParseError};
pub use schema::{FactStore, Schema};

/// Any error raised between query text and query plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The query text is malformed.
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    /// The formula does not fit the schema or is unsafe.
    #[error("invalid query: {0}")]
    Compile(#[from] CompileError),
}

/// Result type for query compilation.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses `input` and compiles it against `schema`.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed text and [`Error::Compile`] for
/// schema or safety violations.
pub fn compile_query(
    input: &str,
    schema: &Schema,
    wants: &[String],
    bindings: &Bindings,
) -> Result<QueryPlan> {
    let formula = parse_formula(input)?;
    Ok(compile(schema, wants, &formula, bindings)?)
}
