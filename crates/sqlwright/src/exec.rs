//! Execution bridge: hands compiled text to the `Database` collaborator
//! and shapes the result.

use crate::clause::ColumnRef;
use crate::client::{Database, QueryOutput};
use crate::compile::render_condition_column;
use crate::error::{SqlError, SqlResult};
use crate::query::{Query, QueryKind};
use crate::row::{FromRow, Row, Rows};
use crate::value::Value;

impl Query {
    /// Compile and execute, returning the backend's output for the
    /// statement kind.
    pub async fn execute(&mut self, db: &impl Database) -> SqlResult<QueryOutput> {
        let kind = self.kind.ok_or_else(|| {
            SqlError::state("statement kind not set; call select(), insert(), update() or delete() first")
        })?;
        let sql = self.compile(db)?;
        tracing::debug!(kind = ?kind, "executing statement");
        db.query(kind, &sql).await
    }

    /// Execute a SELECT and return its row cursor, keyed when an
    /// `index_by` hint is set.
    pub async fn get(&mut self, db: &impl Database) -> SqlResult<Rows> {
        let output = self.execute(db).await?;
        let mut rows = output.into_rows()?;
        if let Some(column) = self.index_hint.clone() {
            rows.index_by(&column);
        }
        Ok(rows)
    }

    /// Execute and materialize every row.
    pub async fn all(&mut self, db: &impl Database) -> SqlResult<Vec<Row>> {
        Ok(self.get(db).await?.into_vec())
    }

    /// Execute and hydrate every row into `T`.
    pub async fn all_as<T: FromRow>(&mut self, db: &impl Database) -> SqlResult<Vec<T>> {
        self.get(db).await?.all_as()
    }

    /// Execute with `LIMIT 1` on a derived copy and return the first row,
    /// leaving this builder untouched.
    pub async fn one(&self, db: &impl Database) -> SqlResult<Option<Row>> {
        let mut query = self.clone().limit(1);
        Ok(query.get(db).await?.into_vec().into_iter().next())
    }

    /// Like [`Query::one`], hydrating the row into `T`.
    pub async fn one_as<T: FromRow>(&self, db: &impl Database) -> SqlResult<Option<T>> {
        match self.one(db).await? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Count the rows this query would return.
    ///
    /// Compiles a derived counting statement (`COUNT(*)`, or
    /// `COUNT(DISTINCT first-column)` when the distinct flag is set) with
    /// the ORDER BY cleared. The derivation is a separate value; this
    /// builder keeps its column list and ordering.
    pub async fn count(&self, db: &impl Database) -> SqlResult<u64> {
        let mut counting = self.counting_query(db)?;
        let rows = counting.get(db).await?;
        match rows.scalar("count").and_then(Value::as_i64) {
            Some(n) => Ok(n.max(0) as u64),
            None => Err(SqlError::decode(
                "count",
                "counting statement returned no numeric value",
            )),
        }
    }

    fn counting_query(&self, db: &impl Database) -> SqlResult<Query> {
        let mut query = self.clone();
        query.kind = Some(QueryKind::Select);

        let column = if self.distinct {
            let first = self.select.first().ok_or_else(|| {
                SqlError::construction("COUNT(DISTINCT) needs at least one selected column")
            })?;
            ColumnRef::alias(
                ColumnRef::expr(format!(
                    "COUNT(DISTINCT {})",
                    render_condition_column(db, first)
                )),
                "count",
            )
        } else {
            ColumnRef::alias(ColumnRef::expr("COUNT(*)"), "count")
        };

        query.select = vec![column];
        // The aggregate absorbs the distinct flag.
        query.distinct = false;
        query.order_by.clear();
        Ok(query)
    }
}
