//! Executable query plans.
//!
//! A [`QueryPlan`] is the union of one [`Branch`] per conjunction. A branch
//! is a select-project-join over the positive predicates with anti-joins for
//! the negated ones. Executors must return the union of all branches with
//! duplicates removed, sorted by the output columns compared as text.

use core::fmt;

use serde::Serialize;

/// A column of one of the branch's positive scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnRef {
    /// Index into [`Branch::scans`].
    pub scan: usize,
    /// Column position within the scanned relation.
    pub column: usize,
}

impl ColumnRef {
    /// Creates a column reference.
    #[must_use]
    pub const fn new(scan: usize, column: usize) -> Self {
        Self { scan, column }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}.{}", self.scan, self.column)
    }
}

/// The right-hand side of an equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    /// Value of a positive scan column.
    Column(ColumnRef),
    /// A literal value.
    Value(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => write!(f, "{column}"),
            Self::Value(value) => write!(f, "{value:?}"),
        }
    }
}

/// One stored relation read by a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scan {
    /// Relation name.
    pub relation: String,
    /// Column names of the relation, from the schema.
    pub columns: Vec<String>,
}

/// `column = operand` over the joined positive scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Filter {
    /// Constrained column.
    pub column: ColumnRef,
    /// Value it must equal.
    pub operand: Operand,
}

impl Filter {
    /// Highest scan index the filter reads; it can be checked once all scans
    /// up to this one are bound.
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.operand {
            Operand::Column(other) => self.column.scan.max(other.scan),
            Operand::Value(_) => self.column.scan,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.operand)
    }
}

/// `relation.column = operand` inside an anti-join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Condition {
    /// Column position within the negated relation.
    pub column: usize,
    /// Value it must equal.
    pub operand: Operand,
}

/// "No tuple of `relation` satisfies all `conditions`."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AntiJoin {
    /// Negated relation.
    pub relation: String,
    /// Column names of the relation, from the schema.
    pub columns: Vec<String>,
    /// Equalities every matching tuple would satisfy.
    pub conditions: Vec<Condition>,
}

/// The compiled form of one conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Branch {
    /// Positive predicates, joined.
    pub scans: Vec<Scan>,
    /// One column per output variable.
    pub projection: Vec<ColumnRef>,
    /// Equalities over the joined scans.
    pub filters: Vec<Filter>,
    /// Negated predicates; all must hold.
    pub anti_joins: Vec<AntiJoin>,
}

/// A compiled formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryPlan {
    /// Output variable names, in result column order.
    pub columns: Vec<String>,
    /// One branch per conjunction; the result is their union.
    pub branches: Vec<Branch>,
}

impl QueryPlan {
    /// Number of output columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "union ({})", self.columns.join(", "))?;
        for (i, branch) in self.branches.iter().enumerate() {
            writeln!(f, "  branch {i}")?;
            for (s, scan) in branch.scans.iter().enumerate() {
                writeln!(f, "    scan t{s} = {}/{}", scan.relation, scan.columns.len())?;
            }
            for filter in &branch.filters {
                writeln!(f, "    filter {filter}")?;
            }
            for anti in &branch.anti_joins {
                write!(f, "    anti-join {}", anti.relation)?;
                for (c, condition) in anti.conditions.iter().enumerate() {
                    let sep = if c == 0 { " where" } else { " and" };
                    write!(f, "{sep} .{} = {}", condition.column, condition.operand)?;
                }
                writeln!(f)?;
            }
            let projection: Vec<String> = branch.projection.iter().map(ToString::to_string).collect();
            writeln!(f, "    project ({})", projection.join(", "))?;
        }
        Ok(())
    }
}
