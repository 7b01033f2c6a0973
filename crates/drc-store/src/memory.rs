//! In-memory fact store and plan evaluator.

use std::collections::{BTreeMap, BTreeSet};

use drc_core::compiler::{AntiJoin, Branch, ColumnRef, Filter, Operand};
use drc_core::{compile_query, Bindings, FactStore, QueryPlan, Schema};
use tracing::debug;

use crate::error::Result;
use crate::facts::{FactSet, Row};

static EMPTY: BTreeSet<Row> = BTreeSet::new();

/// Relations held in memory, evaluated with nested-loop joins.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schema: Schema,
    relations: BTreeMap<String, BTreeSet<Row>>,
}

impl MemoryStore {
    /// Creates a store holding the given facts.
    #[must_use]
    pub fn new(facts: FactSet) -> Self {
        let schema = facts.schema();
        let relations = facts
            .into_relations()
            .into_iter()
            .map(|(name, relation)| (name, relation.tuples().clone()))
            .collect();
        Self { schema, relations }
    }

    /// Parses, compiles and executes a query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`](crate::StoreError::Query) if the query
    /// does not parse or compile against this store's schema.
    pub fn query(&self, text: &str, wants: &[String], bindings: &Bindings) -> Result<Vec<Row>> {
        let plan = compile_query(text, &self.schema, wants, bindings)?;
        Ok(self.execute(&plan))
    }

    /// Executes a plan.
    ///
    /// Returns the union of all branches, without duplicates, sorted by
    /// output columns compared as text. A relation missing from the store
    /// is treated as empty.
    #[must_use]
    pub fn execute(&self, plan: &QueryPlan) -> Vec<Row> {
        let mut results = BTreeSet::new();
        for branch in &plan.branches {
            BranchEval::new(self, branch).run(&mut results);
        }
        debug!(
            branches = plan.branches.len(),
            rows = results.len(),
            "executed plan in memory"
        );
        results.into_iter().collect()
    }

    fn tuples(&self, relation: &str) -> &BTreeSet<Row> {
        self.relations.get(relation).unwrap_or(&EMPTY)
    }
}

impl FactStore for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Evaluation state for one branch.
struct BranchEval<'s> {
    store: &'s MemoryStore,
    branch: &'s Branch,
    inputs: Vec<&'s BTreeSet<Row>>,
    /// Filters grouped by the deepest scan they read.
    checks: Vec<Vec<&'s Filter>>,
}

impl<'s> BranchEval<'s> {
    fn new(store: &'s MemoryStore, branch: &'s Branch) -> Self {
        let inputs = branch
            .scans
            .iter()
            .map(|scan| store.tuples(&scan.relation))
            .collect();
        let mut checks = vec![Vec::new(); branch.scans.len()];
        for filter in &branch.filters {
            if let Some(level) = checks.get_mut(filter.depth()) {
                level.push(filter);
            }
        }
        Self {
            store,
            branch,
            inputs,
            checks,
        }
    }

    fn run(&self, results: &mut BTreeSet<Row>) {
        let mut bound = Vec::with_capacity(self.inputs.len());
        self.join(0, &mut bound, results);
    }

    fn join(&self, depth: usize, bound: &mut Vec<&'s Row>, results: &mut BTreeSet<Row>) {
        if depth == self.inputs.len() {
            let bound: &[&Row] = bound;
            if !self.branch.anti_joins.iter().any(|anti| self.matches(anti, bound)) {
                let row: Option<Row> = self
                    .branch
                    .projection
                    .iter()
                    .map(|column| value(bound, *column).map(String::from))
                    .collect();
                if let Some(row) = row {
                    results.insert(row);
                }
            }
            return;
        }

        for tuple in self.inputs[depth] {
            bound.push(tuple);
            if self.checks[depth].iter().all(|filter| holds(filter, bound)) {
                self.join(depth + 1, bound, results);
            }
            bound.pop();
        }
    }

    /// True if some tuple of the negated relation satisfies every condition.
    fn matches(&self, anti: &AntiJoin, bound: &[&Row]) -> bool {
        self.store.tuples(&anti.relation).iter().any(|tuple| {
            anti.conditions.iter().all(|condition| {
                let expected = resolve(bound, &condition.operand);
                expected.is_some() && tuple.get(condition.column).map(String::as_str) == expected
            })
        })
    }
}

fn value<'r>(bound: &[&'r Row], column: ColumnRef) -> Option<&'r str> {
    bound
        .get(column.scan)
        .and_then(|tuple| tuple.get(column.column))
        .map(String::as_str)
}

fn resolve<'r>(bound: &[&'r Row], operand: &'r Operand) -> Option<&'r str> {
    match operand {
        Operand::Column(column) => value(bound, *column),
        Operand::Value(literal) => Some(literal),
    }
}

fn holds(filter: &Filter, bound: &[&Row]) -> bool {
    let left = value(bound, filter.column);
    left.is_some() && left == resolve(bound, &filter.operand)
}
