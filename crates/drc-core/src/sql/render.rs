//! Plan to SQL rendering.

use core::fmt::Write;

use super::Dialect;
use crate::compiler::{AntiJoin, Branch, ColumnRef, Operand, QueryPlan};

impl QueryPlan {
    /// Renders the plan as a parameterized SQL query.
    ///
    /// Literal values become `?` placeholders; the returned parameters are
    /// in placeholder order.
    #[must_use]
    pub fn to_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> (String, Vec<String>) {
        let mut renderer = Renderer::new(dialect, false);
        renderer.plan(self);
        (renderer.sql, renderer.params)
    }

    /// Renders the plan as SQL with literals inlined and escaped.
    ///
    /// **Warning**: meant for display; prefer [`to_sql`](Self::to_sql) when
    /// sending the query to a database.
    #[must_use]
    pub fn to_sql_inline<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        let mut renderer = Renderer::new(dialect, true);
        renderer.plan(self);
        renderer.sql
    }
}

struct Renderer<'d, D: ?Sized> {
    dialect: &'d D,
    inline: bool,
    sql: String,
    params: Vec<String>,
}

impl<'d, D: Dialect + ?Sized> Renderer<'d, D> {
    const fn new(dialect: &'d D, inline: bool) -> Self {
        Self {
            dialect,
            inline,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn plan(&mut self, plan: &QueryPlan) {
        for (i, branch) in plan.branches.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(" UNION ");
            }
            self.branch(branch, &plan.columns);
        }
        if !plan.columns.is_empty() && !plan.branches.is_empty() {
            let positions: Vec<String> = (1..=plan.columns.len()).map(|n| n.to_string()).collect();
            let _ = write!(self.sql, " ORDER BY {}", positions.join(", "));
        }
    }

    fn branch(&mut self, branch: &Branch, names: &[String]) {
        self.sql.push_str("SELECT DISTINCT ");
        if branch.projection.is_empty() {
            self.sql.push('1');
        }
        for (i, (column, name)) in branch.projection.iter().zip(names).enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.column(branch, *column);
            let alias = self.dialect.quote_identifier(name);
            let _ = write!(self.sql, " AS {alias}");
        }

        for (i, scan) in branch.scans.iter().enumerate() {
            self.sql.push_str(if i == 0 { " FROM " } else { ", " });
            let table = self.dialect.quote_identifier(&scan.relation);
            let _ = write!(self.sql, "{table} AS t{i}");
        }

        let mut first = true;
        let mut next_conjunct = |sql: &mut String| {
            sql.push_str(if first { " WHERE " } else { " AND " });
            first = false;
        };
        for filter in &branch.filters {
            next_conjunct(&mut self.sql);
            self.column(branch, filter.column);
            self.sql.push_str(" = ");
            self.operand(branch, &filter.operand);
        }
        for (n, anti) in branch.anti_joins.iter().enumerate() {
            next_conjunct(&mut self.sql);
            self.anti_join(branch, anti, n);
        }
    }

    fn anti_join(&mut self, branch: &Branch, anti: &AntiJoin, n: usize) {
        let table = self.dialect.quote_identifier(&anti.relation);
        let _ = write!(self.sql, "NOT EXISTS (SELECT 1 FROM {table} AS n{n}");
        for (i, condition) in anti.conditions.iter().enumerate() {
            self.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            let column = self.column_name(&anti.columns, condition.column);
            let _ = write!(self.sql, "n{n}.{column} = ");
            self.operand(branch, &condition.operand);
        }
        self.sql.push(')');
    }

    fn column(&mut self, branch: &Branch, column: ColumnRef) {
        let name = branch
            .scans
            .get(column.scan)
            .map_or_else(String::new, |scan| self.column_name(&scan.columns, column.column));
        let _ = write!(self.sql, "t{}.{name}", column.scan);
    }

    fn column_name(&self, columns: &[String], index: usize) -> String {
        columns.get(index).map_or_else(
            || self.dialect.quote_identifier(&format!("c{}", index + 1)),
            |name| self.dialect.quote_identifier(name),
        )
    }

    fn operand(&mut self, branch: &Branch, operand: &Operand) {
        match operand {
            Operand::Column(column) => self.column(branch, *column),
            Operand::Value(value) if self.inline => {
                let literal = self.dialect.quote_literal(value);
                self.sql.push_str(&literal);
            }
            Operand::Value(value) => {
                self.sql.push('?');
                self.params.push(value.clone());
            }
        }
    }
}
