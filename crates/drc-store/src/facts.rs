//! Loading facts from flat text files.
//!
//! Each non-empty line holds one fact: the predicate name followed by its
//! values. Lines containing a tab are split on tabs, so values may contain
//! spaces. Other lines are split on runs of whitespace, and a value wrapped
//! in double quotes may contain whitespace. Surrounding double quotes are
//! stripped in both modes. Lines whose first non-blank character is `#` are
//! comments.
//!
//! ```text
//! # university facts
//! student         jane    "Jane Dane"
//! immatriculated  jane    2016
//! ```
//!
//! The arity of a predicate is inferred from its first fact; every later
//! fact of the same predicate must agree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use drc_core::Schema;
use tracing::debug;

use crate::error::{Result, StoreError};

/// A stored tuple, or a query result row.
pub type Row = Vec<String>;

/// The tuples of one predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    arity: usize,
    tuples: BTreeSet<Row>,
}

impl Relation {
    /// Number of values per tuple.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// The distinct tuples, in text order.
    #[must_use]
    pub const fn tuples(&self) -> &BTreeSet<Row> {
        &self.tuples
    }

    /// Number of distinct tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true if the relation holds no tuple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

/// Facts grouped by predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    relations: BTreeMap<String, Relation>,
}

impl FactSet {
    /// Creates an empty fact set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            relations: BTreeMap::new(),
        }
    }

    /// Parses facts from text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedFact`] or [`StoreError::ArityConflict`]
    /// for the first offending line.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        let mut facts = Self::new();
        facts.extend_from_str("<input>", text)?;
        Ok(facts)
    }

    /// Reads and merges several fact files.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if a file cannot be read, or a parse
    /// error for the first offending line.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut facts = Self::new();
        for path in paths {
            facts.extend_from_file(path.as_ref())?;
        }
        Ok(facts)
    }

    /// Reads one fact file into this set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file cannot be read, or a parse
    /// error for the first offending line.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.extend_from_str(&path.display().to_string(), &text)
    }

    /// Parses facts from text into this set. `origin` names the text in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedFact`] or [`StoreError::ArityConflict`]
    /// for the first offending line.
    pub fn extend_from_str(&mut self, origin: &str, text: &str) -> Result<()> {
        let before = self.fact_count();
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let malformed = |message: &str| StoreError::MalformedFact {
                origin: String::from(origin),
                line: index + 1,
                message: String::from(message),
            };
            let mut fields = split_fields(line).map_err(malformed)?.into_iter();
            let predicate = fields
                .next()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| malformed("missing predicate name"))?;
            let values: Row = fields.collect();

            let relation = self
                .relations
                .entry(predicate.clone())
                .or_insert_with(|| Relation {
                    arity: values.len(),
                    tuples: BTreeSet::new(),
                });
            if relation.arity != values.len() {
                return Err(StoreError::ArityConflict {
                    predicate,
                    expected: relation.arity,
                    found: values.len(),
                    origin: String::from(origin),
                    line: index + 1,
                });
            }
            relation.tuples.insert(values);
        }
        debug!(
            origin,
            facts = self.fact_count() - before,
            relations = self.relations.len(),
            "loaded facts"
        );
        Ok(())
    }

    /// Returns a relation by predicate name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// Iterates over relations in name order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().map(|(name, rel)| (name.as_str(), rel))
    }

    /// Total number of distinct facts.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.relations.values().map(Relation::len).sum()
    }

    /// The inferred schema: relation `p` of arity `n` has columns
    /// `c1..cn`.
    #[must_use]
    pub fn schema(&self) -> Schema {
        let mut schema = Schema::new();
        for (name, relation) in &self.relations {
            schema.insert(name.clone(), column_names(relation.arity));
        }
        schema
    }

    pub(crate) fn into_relations(self) -> BTreeMap<String, Relation> {
        self.relations
    }
}

/// Column names used for inferred relations.
#[must_use]
pub fn column_names(arity: usize) -> Vec<String> {
    (1..=arity).map(|i| format!("c{i}")).collect()
}

fn split_fields(line: &str) -> std::result::Result<Vec<String>, &'static str> {
    if line.contains('\t') {
        return Ok(line
            .trim_start()
            .split('\t')
            .map(|field| unquote(field.trim()))
            .collect());
    }

    let mut fields = vec![];
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').ok_or("unterminated quoted value")?;
            fields.push(String::from(&quoted[..end]));
            rest = &quoted[end + 1..];
            if rest.starts_with(|c: char| !c.is_whitespace()) {
                return Err("unexpected text after quoted value");
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            fields.push(String::from(&rest[..end]));
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    Ok(fields)
}

fn unquote(field: &str) -> String {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Row {
        values.iter().map(|v| String::from(*v)).collect()
    }

    #[test]
    fn test_split_whitespace() {
        assert_eq!(
            split_fields("  student jane   \"Jane Dane\" "),
            Ok(row(&["student", "jane", "Jane Dane"]))
        );
        assert_eq!(split_fields("flag"), Ok(row(&["flag"])));
        assert_eq!(split_fields(r#"p """#), Ok(row(&["p", ""])));
    }

    #[test]
    fn test_split_tabs_keeps_spaces() {
        assert_eq!(
            split_fields("lecture\talgebra1\tAlgebra 1"),
            Ok(row(&["lecture", "algebra1", "Algebra 1"]))
        );
        assert_eq!(
            split_fields("student\tjane\t\"Jane Dane\""),
            Ok(row(&["student", "jane", "Jane Dane"]))
        );
    }

    #[test]
    fn test_split_tabs_trims_fields() {
        assert_eq!(
            split_fields("  student\tjane \t Jane Dane  "),
            Ok(row(&["student", "jane", "Jane Dane"]))
        );
        assert_eq!(split_fields("\tp\t\"a \" "), Ok(row(&["p", "a "])));

        let facts = FactSet::from_str("  student\tjane \nregistered jane algebra1\n").unwrap();
        let names: Vec<&str> = facts.relations().map(|(name, _)| name).collect();
        assert_eq!(names, ["registered", "student"]);
        assert!(facts
            .relation("student")
            .is_some_and(|r| r.tuples().contains(&row(&["jane"]))));
    }

    #[test]
    fn test_split_errors() {
        assert_eq!(
            split_fields(r#"p "abc"#),
            Err("unterminated quoted value")
        );
        assert_eq!(
            split_fields(r#"p "a"b"#),
            Err("unexpected text after quoted value")
        );
    }

    #[test]
    fn test_parse_and_infer_schema() {
        let facts = FactSet::from_str(
            "# comment\n\nstudent jane \"Jane Dane\"\nstudent john \"John Doe\"\nflag\nstudent jane \"Jane Dane\"\n",
        )
        .unwrap();
        assert_eq!(facts.fact_count(), 3);
        assert_eq!(facts.relation("student").map(Relation::len), Some(2));
        assert_eq!(facts.relation("flag").map(Relation::arity), Some(0));

        let schema = facts.schema();
        assert_eq!(
            schema.columns("student"),
            Some(&[String::from("c1"), String::from("c2")][..])
        );
        assert_eq!(schema.arity("flag"), Some(0));
    }

    #[test]
    fn test_arity_conflict() {
        let err = FactSet::from_str("p a b\np c\n").unwrap_err();
        match err {
            StoreError::ArityConflict {
                predicate,
                expected,
                found,
                line,
                ..
            } => {
                assert_eq!(predicate, "p");
                assert_eq!((expected, found, line), (2, 1, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_line_number() {
        let err = FactSet::from_str("p a\n\np \"b\n").unwrap_err();
        assert!(matches!(err, StoreError::MalformedFact { line: 3, .. }));
    }

    #[test]
    fn test_empty_predicate_name() {
        let err = FactSet::from_str("\ta\tb\n").unwrap_err();
        assert!(matches!(err, StoreError::MalformedFact { line: 1, .. }));
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_names(3), ["c1", "c2", "c3"]);
        assert!(column_names(0).is_empty());
    }
}
