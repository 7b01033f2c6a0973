//! The query pipeline behind the command line.

use drc_core::sql::{Dialect, GenericDialect};
use drc_core::{compile, parse_formula, Bindings, Formula, QueryPlan};
use drc_store::{FactSet, MemoryStore, SqliteDialect, SqliteStore};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Backend, Cli, Explain};
use crate::format;

#[derive(Serialize)]
struct Explanation<'a> {
    query: String,
    formula: &'a Formula,
    plan: &'a QueryPlan,
}

/// Runs the query described by `cli` and returns the text to print.
///
/// # Errors
///
/// Returns an error if a fact file cannot be read, the query does not parse
/// or compile, or the backend fails to execute it.
pub async fn run(cli: &Cli) -> anyhow::Result<String> {
    let formula = parse_formula(&cli.query)?;
    let bindings: Bindings = cli.bindings.iter().cloned().collect();
    let wants = output_columns(cli, &formula, &bindings);
    debug!(formula = %formula, wants = ?wants, "parsed query");

    let facts = FactSet::load(&cli.facts)?;
    info!(
        files = cli.facts.len(),
        facts = facts.fact_count(),
        "loaded facts"
    );

    let plan = compile(&facts.schema(), &wants, &formula, &bindings)?;
    if let Some(kind) = cli.explain {
        return match cli.backend {
            Backend::Memory => explain(kind, &formula, &plan, &GenericDialect::new()),
            Backend::Sqlite => explain(kind, &formula, &plan, &SqliteDialect::new()),
        };
    }

    let rows = match cli.backend {
        Backend::Memory => MemoryStore::new(facts).execute(&plan),
        Backend::Sqlite => SqliteStore::open(&facts).await?.execute(&plan).await?,
    };
    info!(rows = rows.len(), "query complete");

    Ok(format::render(
        cli.format,
        &plan.columns,
        &rows,
        !cli.no_header,
        cli.delimiter,
    )?)
}

/// Columns requested with `--output`, or else every variable bound in all
/// conjunctions and not fixed by `--bind`, in order of first appearance.
fn output_columns(cli: &Cli, formula: &Formula, bindings: &Bindings) -> Vec<String> {
    if !cli.output.is_empty() {
        return cli.output.clone();
    }
    formula
        .variables()
        .into_iter()
        .filter(|name| !bindings.contains_key(name))
        .collect()
}

fn explain(
    kind: Explain,
    formula: &Formula,
    plan: &QueryPlan,
    dialect: &dyn Dialect,
) -> anyhow::Result<String> {
    let mut out = match kind {
        Explain::Sql => plan.to_sql_inline(dialect),
        Explain::Plan => plan.to_string(),
        Explain::Json => serde_json::to_string_pretty(&Explanation {
            query: formula.to_string(),
            formula,
            plan,
        })?,
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
