//! Relation schemas as seen by the compiler.

use std::collections::BTreeMap;

use serde::Serialize;

/// Maps each predicate name to its ordered column names.
///
/// The arity of a predicate is the number of its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    relations: BTreeMap<String, Vec<String>>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            relations: BTreeMap::new(),
        }
    }

    /// Declares (or replaces) a relation.
    pub fn insert(&mut self, name: impl Into<String>, columns: Vec<String>) {
        self.relations.insert(name.into(), columns);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_relation(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.insert(name, columns.iter().map(|c| String::from(*c)).collect());
        self
    }

    /// Returns the columns of a relation.
    #[must_use]
    pub fn columns(&self, name: &str) -> Option<&[String]> {
        self.relations.get(name).map(Vec::as_slice)
    }

    /// Returns the arity of a relation.
    #[must_use]
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.relations.get(name).map(Vec::len)
    }

    /// Iterates over relations in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.relations
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    /// Number of declared relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns true if no relation is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// A source of stored relations.
///
/// The compiler only reads the schema; executing a plan against the stored
/// tuples is up to the implementor.
pub trait FactStore {
    /// Returns the schema of the stored relations.
    fn schema(&self) -> &Schema;
}
