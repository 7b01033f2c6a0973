//! Compilation error types.

/// Errors raised while compiling a formula into a [`QueryPlan`].
///
/// Every error aborts the whole compilation. Errors tied to a conjunction
/// carry its zero-based index and its source text.
///
/// [`QueryPlan`]: super::QueryPlan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A requested output name cannot name a variable.
    #[error("invalid output variable {name:?}: {reason}")]
    InvalidOutputVariable {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A requested output name appears twice.
    #[error("output variable `{name}` is requested more than once")]
    DuplicateOutputVariable {
        /// The repeated name.
        name: String,
    },

    /// The predicate is not declared in the schema.
    #[error("unknown predicate `{predicate}` in conjunction {} ({clause})", .conjunction + 1)]
    UnknownPredicate {
        /// Name of the predicate.
        predicate: String,
        /// Index of the conjunction.
        conjunction: usize,
        /// Text of the conjunction.
        clause: String,
    },

    /// The predicate is applied to the wrong number of arguments.
    #[error(
        "predicate `{predicate}` has arity {expected} but is given {found} arguments in conjunction {} ({clause})",
        .conjunction + 1
    )]
    ArityMismatch {
        /// Name of the predicate.
        predicate: String,
        /// Declared arity.
        expected: usize,
        /// Number of arguments written.
        found: usize,
        /// Index of the conjunction.
        conjunction: usize,
        /// Text of the conjunction.
        clause: String,
    },

    /// A variable of a negated predicate is neither positively bound nor
    /// externally bound.
    #[error(
        "variable `{variable}` of `{predicate}` is only introduced by negation in conjunction {} ({clause})",
        .conjunction + 1
    )]
    UnsafeNegatedVariable {
        /// The unsafe variable.
        variable: String,
        /// The negated predicate, as written.
        predicate: String,
        /// Index of the conjunction.
        conjunction: usize,
        /// Text of the conjunction.
        clause: String,
    },

    /// A requested output variable has no positive occurrence.
    #[error(
        "output variable `{variable}` is not bound by any positive predicate in conjunction {} ({clause})",
        .conjunction + 1
    )]
    UnboundOutputVariable {
        /// The unbound variable.
        variable: String,
        /// Index of the conjunction.
        conjunction: usize,
        /// Text of the conjunction.
        clause: String,
    },
}

impl CompileError {
    /// Index of the conjunction the error was found in, if any.
    #[must_use]
    pub const fn conjunction(&self) -> Option<usize> {
        match self {
            Self::InvalidOutputVariable { .. } | Self::DuplicateOutputVariable { .. } => None,
            Self::UnknownPredicate { conjunction, .. }
            | Self::ArityMismatch { conjunction, .. }
            | Self::UnsafeNegatedVariable { conjunction, .. }
            | Self::UnboundOutputVariable { conjunction, .. } => Some(*conjunction),
        }
    }
}
