//! Error types for fact loading and query execution.

use std::path::PathBuf;

/// Errors that can occur while loading facts or running queries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A fact file could not be read.
    #[error("Failed to read facts from '{path}': {source}")]
    Read {
        /// Path of the fact file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A line of a fact file could not be split into values.
    #[error("Malformed fact at {origin}:{line}: {message}")]
    MalformedFact {
        /// File name, or `<input>` for in-memory text.
        origin: String,
        /// One-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    /// A fact has a different number of values than earlier facts of the
    /// same predicate.
    #[error(
        "Predicate '{predicate}' has arity {expected} but the fact at {origin}:{line} has {found} values"
    )]
    ArityConflict {
        /// Predicate name.
        predicate: String,
        /// Arity inferred from earlier facts.
        expected: usize,
        /// Number of values in the offending fact.
        found: usize,
        /// File name, or `<input>` for in-memory text.
        origin: String,
        /// One-based line number.
        line: usize,
    },

    /// The query did not parse or compile.
    #[error(transparent)]
    Query(#[from] drc_core::Error),

    /// Database error while loading facts or executing a query.
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
