//! SQL rendering of query plans.
//!
//! Different databases quote identifiers and literals slightly differently.
//! [`Dialect`] captures those differences; [`QueryPlan::to_sql`] renders a
//! plan as a single `SELECT ... UNION ... ORDER BY` statement.
//!
//! [`QueryPlan::to_sql`]: crate::compiler::QueryPlan::to_sql

mod generic;
mod render;

pub use generic::GenericDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the string literal quote character.
    fn string_quote(&self) -> char {
        '\''
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Quotes a string literal, doubling any embedded quote character.
    fn quote_literal(&self, value: &str) -> String {
        let quote = self.string_quote();
        let escaped = value.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }
}
