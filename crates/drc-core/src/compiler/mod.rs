//! DRC query compiler.
//!
//! Turns a parsed [`Formula`] into a [`QueryPlan`] after checking it against
//! a [`Schema`] and the range-restriction rules:
//!
//! - every variable of a negated predicate must be bound by a positive
//!   predicate of the same conjunction or by an external binding;
//! - every output variable must be bound by a positive predicate of every
//!   conjunction.
//!
//! Within a conjunction the first positive occurrence of a variable is its
//! canonical occurrence. The projection reads it, and every other occurrence
//! is constrained to equal it (a star, not a chain).

mod error;
mod plan;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

pub use error::CompileError;
pub use plan::{AntiJoin, Branch, ColumnRef, Condition, Filter, Operand, QueryPlan, Scan};

use crate::ast::{is_numeric, Conjunction, Formula, Predicate, Term};
use crate::schema::Schema;

/// External variable bindings: variable name to literal value.
pub type Bindings = BTreeMap<String, String>;

/// Compiles `formula` into a plan projecting `wants`.
///
/// `bindings` fixes the value of variables in every conjunction.
///
/// # Errors
///
/// Returns a [`CompileError`] if an output name is malformed or repeated, a
/// predicate is unknown or has the wrong arity, a negated variable is unsafe,
/// or an output variable is never positively bound.
pub fn compile(
    schema: &Schema,
    wants: &[String],
    formula: &Formula,
    bindings: &Bindings,
) -> Result<QueryPlan, CompileError> {
    validate_wants(wants)?;

    let branches = formula
        .conjunctions
        .iter()
        .enumerate()
        .map(|(index, conjunction)| {
            BranchCompiler::new(schema, index, conjunction).compile(wants, bindings)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        branches = branches.len(),
        columns = wants.len(),
        "compiled formula"
    );

    Ok(QueryPlan {
        columns: wants.to_vec(),
        branches,
    })
}

fn validate_wants(wants: &[String]) -> Result<(), CompileError> {
    for (i, name) in wants.iter().enumerate() {
        let reason = if name == "*" {
            Some("the wildcard never binds a value")
        } else if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some("not an identifier")
        } else if is_numeric(name) {
            Some("digits denote a constant")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CompileError::InvalidOutputVariable {
                name: name.clone(),
                reason,
            });
        }
        if wants[..i].contains(name) {
            return Err(CompileError::DuplicateOutputVariable { name: name.clone() });
        }
    }
    Ok(())
}

/// Positive occurrences of each variable, in first-seen order.
#[derive(Debug, Default)]
struct Occurrences<'a> {
    order: Vec<&'a str>,
    columns: HashMap<&'a str, Vec<ColumnRef>>,
}

impl<'a> Occurrences<'a> {
    fn record(&mut self, name: &'a str, column: ColumnRef) {
        self.columns
            .entry(name)
            .or_insert_with(|| {
                self.order.push(name);
                vec![]
            })
            .push(column);
    }

    fn canonical(&self, name: &str) -> Option<ColumnRef> {
        self.columns.get(name).and_then(|cols| cols.first().copied())
    }

    fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Variables with all their occurrences, in first-seen order.
    fn iter(&self) -> impl Iterator<Item = (&'a str, &[ColumnRef])> + '_ {
        self.order
            .iter()
            .map(|name| (*name, self.columns[name].as_slice()))
    }
}

/// Compiles a single conjunction.
struct BranchCompiler<'a> {
    schema: &'a Schema,
    index: usize,
    conjunction: &'a Conjunction,
}

impl<'a> BranchCompiler<'a> {
    const fn new(schema: &'a Schema, index: usize, conjunction: &'a Conjunction) -> Self {
        Self {
            schema,
            index,
            conjunction,
        }
    }

    fn clause(&self) -> String {
        self.conjunction.to_string()
    }

    fn compile(&self, wants: &[String], bindings: &Bindings) -> Result<Branch, CompileError> {
        self.validate_predicates()?;

        let mut scans = vec![];
        let mut constants = vec![];
        let mut occurrences = Occurrences::default();
        for (scan, predicate) in self.conjunction.positive().enumerate() {
            for (column, arg) in predicate.args.iter().enumerate() {
                let at = ColumnRef::new(scan, column);
                match arg {
                    Term::Wildcard => {}
                    Term::Constant(value) => constants.push(Filter {
                        column: at,
                        operand: Operand::Value(value.clone()),
                    }),
                    Term::Variable(name) => occurrences.record(name, at),
                }
            }
            scans.push(self.scan(predicate));
        }

        self.check_negation_safety(&occurrences, bindings)?;

        let projection = wants
            .iter()
            .map(|want| {
                occurrences
                    .canonical(want)
                    .ok_or_else(|| CompileError::UnboundOutputVariable {
                        variable: want.clone(),
                        conjunction: self.index,
                        clause: self.clause(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut filters = vec![];
        for (_, columns) in occurrences.iter() {
            if let Some((canonical, rest)) = columns.split_first() {
                filters.extend(rest.iter().map(|column| Filter {
                    column: *column,
                    operand: Operand::Column(*canonical),
                }));
            }
        }
        filters.extend(constants);
        for (name, columns) in occurrences.iter() {
            if let (Some(value), Some(canonical)) = (bindings.get(name), columns.first()) {
                filters.push(Filter {
                    column: *canonical,
                    operand: Operand::Value(value.clone()),
                });
            }
        }

        let anti_joins = self
            .conjunction
            .negative()
            .map(|predicate| Self::anti_join(self.scan(predicate), predicate, &occurrences, bindings))
            .collect::<Vec<_>>();

        debug!(
            conjunction = self.index,
            scans = scans.len(),
            filters = filters.len(),
            anti_joins = anti_joins.len(),
            "compiled conjunction"
        );

        Ok(Branch {
            scans,
            projection,
            filters,
            anti_joins,
        })
    }

    fn validate_predicates(&self) -> Result<(), CompileError> {
        for predicate in &self.conjunction.predicates {
            let Some(arity) = self.schema.arity(&predicate.name) else {
                return Err(CompileError::UnknownPredicate {
                    predicate: predicate.name.clone(),
                    conjunction: self.index,
                    clause: self.clause(),
                });
            };
            if arity != predicate.args.len() {
                return Err(CompileError::ArityMismatch {
                    predicate: predicate.name.clone(),
                    expected: arity,
                    found: predicate.args.len(),
                    conjunction: self.index,
                    clause: self.clause(),
                });
            }
        }
        Ok(())
    }

    fn check_negation_safety(
        &self,
        occurrences: &Occurrences<'_>,
        bindings: &Bindings,
    ) -> Result<(), CompileError> {
        for predicate in self.conjunction.negative() {
            if let Some(variable) = predicate
                .variables()
                .find(|name| !occurrences.contains(name) && !bindings.contains_key(*name))
            {
                return Err(CompileError::UnsafeNegatedVariable {
                    variable: String::from(variable),
                    predicate: predicate.to_string(),
                    conjunction: self.index,
                    clause: self.clause(),
                });
            }
        }
        Ok(())
    }

    fn scan(&self, predicate: &Predicate) -> Scan {
        Scan {
            relation: predicate.name.clone(),
            columns: self
                .schema
                .columns(&predicate.name)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }

    /// Builds the anti-join of a negated predicate whose variables were
    /// already checked to be bound.
    fn anti_join(
        scan: Scan,
        predicate: &Predicate,
        occurrences: &Occurrences<'_>,
        bindings: &Bindings,
    ) -> AntiJoin {
        let conditions = predicate
            .args
            .iter()
            .enumerate()
            .filter_map(|(column, arg)| {
                let operand = match arg {
                    Term::Wildcard => return None,
                    Term::Constant(value) => Operand::Value(value.clone()),
                    Term::Variable(name) => match occurrences.canonical(name) {
                        Some(canonical) => Operand::Column(canonical),
                        None => Operand::Value(bindings.get(name)?.clone()),
                    },
                };
                Some(Condition { column, operand })
            })
            .collect();
        AntiJoin {
            relation: scan.relation,
            columns: scan.columns,
            conditions,
        }
    }
}
