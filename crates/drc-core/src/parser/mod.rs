//! DRC Parser
//!
//! Generic backtracking combinators and the DRC grammar written with them.

pub mod combinator;
mod error;
mod grammar;

pub use combinator::Parser;
pub use error::ParseError;
pub use grammar::{conjunction, formula, literal, parse_formula, term};
