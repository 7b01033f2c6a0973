//! SQLite-backed fact store.
//!
//! Facts are copied into an in-memory SQLite database, one `TEXT` table per
//! relation, and plans run as the SQL rendered by [`SqliteDialect`].

use drc_core::sql::Dialect;
use drc_core::{compile_query, Bindings, FactStore, QueryPlan, Schema};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row as _;
use tracing::{debug, trace};

use crate::dialect::SqliteDialect;
use crate::error::Result;
use crate::facts::{FactSet, Row};

/// Placeholder column for relations of arity zero, which SQL tables cannot
/// express directly.
const UNIT_COLUMN: &str = "_unit";

/// Relations held in an in-memory SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    schema: Schema,
    dialect: SqliteDialect,
}

impl SqliteStore {
    /// Creates an in-memory database and loads the facts into it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) if the
    /// database cannot be opened or written.
    pub async fn open(facts: &FactSet) -> Result<Self> {
        // Every SQLite connection to `:memory:` is a separate database, so
        // the pool must hold exactly one connection for its whole life.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self {
            pool,
            schema: facts.schema(),
            dialect: SqliteDialect::new(),
        };
        store.load(facts).await?;
        Ok(store)
    }

    async fn load(&self, facts: &FactSet) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (name, relation) in facts.relations() {
            let table = self.dialect.quote_identifier(name);
            let columns = self.schema.columns(name).unwrap_or_default();

            let (create, insert) = if columns.is_empty() {
                (
                    format!("CREATE TABLE {table} (\"{UNIT_COLUMN}\" INTEGER NOT NULL DEFAULT 0)"),
                    format!("INSERT INTO {table} DEFAULT VALUES"),
                )
            } else {
                let definitions: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{} TEXT NOT NULL", self.dialect.quote_identifier(c)))
                    .collect();
                let placeholders = vec!["?"; columns.len()].join(", ");
                (
                    format!("CREATE TABLE {table} ({})", definitions.join(", ")),
                    format!("INSERT INTO {table} VALUES ({placeholders})"),
                )
            };

            trace!(sql = %create, "creating table");
            sqlx::query(&create).execute(&mut *tx).await?;
            for tuple in relation.tuples() {
                let mut query = sqlx::query(&insert);
                for value in tuple {
                    query = query.bind(value.as_str());
                }
                query.execute(&mut *tx).await?;
            }
        }
        tx.commit().await?;
        debug!(
            relations = self.schema.len(),
            facts = facts.fact_count(),
            "loaded facts into sqlite"
        );
        Ok(())
    }

    /// Parses, compiles and executes a query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`](crate::StoreError::Query) if the query
    /// does not parse or compile, or
    /// [`StoreError::Database`](crate::StoreError::Database) if it fails to
    /// run.
    pub async fn query(&self, text: &str, wants: &[String], bindings: &Bindings) -> Result<Vec<Row>> {
        let plan = compile_query(text, &self.schema, wants, bindings)?;
        self.execute(&plan).await
    }

    /// Executes a plan as SQL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) if the
    /// statement fails or a value is not text.
    pub async fn execute(&self, plan: &QueryPlan) -> Result<Vec<Row>> {
        let (sql, params) = plan.to_sql(&self.dialect);
        trace!(sql = %sql, params = ?params, "executing plan");

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param.as_str());
        }
        let records = query.fetch_all(&self.pool).await?;

        let width = plan.width();
        let rows = records
            .iter()
            .map(|record| {
                (0..width)
                    .map(|i| record.try_get::<String, _>(i))
                    .collect::<std::result::Result<Row, sqlx::Error>>()
            })
            .collect::<std::result::Result<Vec<Row>, sqlx::Error>>()?;
        debug!(rows = rows.len(), "executed plan in sqlite");
        Ok(rows)
    }

    /// The dialect used to render plans.
    #[must_use]
    pub const fn dialect(&self) -> &SqliteDialect {
        &self.dialect
    }
}

impl FactStore for SqliteStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}
