//! Abstract syntax tree of a DRC formula.
//!
//! A formula is kept in the flat normal form the language allows: a union of
//! conjunctions of (possibly negated) predicates. There is no nesting.

use core::fmt;

use serde::Serialize;

/// A predicate argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// A variable, bound by the positive predicates it appears in.
    Variable(String),
    /// A literal value (quoted string or bare digits).
    Constant(String),
    /// `*`: matches any value and binds nothing.
    Wildcard,
}

impl Term {
    /// Classifies a bare identifier: digits only is a constant, anything
    /// else is a variable.
    #[must_use]
    pub fn from_identifier(text: &str) -> Self {
        if is_numeric(text) {
            Self::Constant(String::from(text))
        } else {
            Self::Variable(String::from(text))
        }
    }

    /// Returns the variable name if this term is a variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }
}

/// Returns true for a non-empty run of ASCII digits.
pub(crate) fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::Constant(value) => write!(f, "\"{value}\""),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// A named predicate applied to terms, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Predicate {
    /// Relation name.
    pub name: String,
    /// Arguments, one per relation column.
    pub args: Vec<Term>,
    /// True when written with a leading `!`.
    pub negated: bool,
}

impl Predicate {
    /// Creates a positive predicate.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            args,
            negated: false,
        }
    }

    /// Creates a negated predicate.
    #[must_use]
    pub fn negated(name: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            args,
            negated: true,
        }
    }

    /// Iterates over the variable names among the arguments, in order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter_map(Term::as_variable)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Predicates joined by `&&`.
///
/// Order matters: the first positive occurrence of a variable is the one the
/// compiler projects and compares against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conjunction {
    /// The predicates, in source order.
    pub predicates: Vec<Predicate>,
}

impl Conjunction {
    /// Creates a conjunction.
    #[must_use]
    pub const fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// Iterates over the non-negated predicates.
    pub fn positive(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter().filter(|p| !p.negated)
    }

    /// Iterates over the negated predicates.
    pub fn negative(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter().filter(|p| p.negated)
    }

    /// Returns true if a positive predicate mentions the variable.
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        self.positive().any(|p| p.variables().any(|v| v == name))
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}

/// Conjunctions joined by `||`; evaluates to the set union of their results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Formula {
    /// The conjunctions, in source order.
    pub conjunctions: Vec<Conjunction>,
}

impl Formula {
    /// Creates a formula.
    #[must_use]
    pub const fn new(conjunctions: Vec<Conjunction>) -> Self {
        Self { conjunctions }
    }

    /// Returns the variables positively bound in every conjunction, in the
    /// order they are first seen.
    ///
    /// These are exactly the variables the formula can project.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        let mut seen: Vec<&str> = vec![];
        for name in self
            .conjunctions
            .iter()
            .flat_map(Conjunction::positive)
            .flat_map(Predicate::variables)
        {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
            .into_iter()
            .filter(|name| self.conjunctions.iter().all(|c| c.binds(name)))
            .map(String::from)
            .collect()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conjunction) in self.conjunctions.iter().enumerate() {
            if i > 0 {
                f.write_str(" || ")?;
            }
            write!(f, "{conjunction}")?;
        }
        Ok(())
    }
}
