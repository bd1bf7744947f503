//! Database collaborator contract consumed by the execution bridge.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::query::QueryKind;
use crate::row::Rows;
use crate::value::Value;
use std::future::Future;

/// Output of running one compiled statement, shaped by its kind.
#[derive(Clone, Debug)]
pub enum QueryOutput {
    /// Row set for `SELECT`.
    Rows(Rows),
    /// Last insert id for `INSERT`.
    InsertId(u64),
    /// Affected-row count for `UPDATE` / `DELETE`.
    Affected(u64),
}

impl QueryOutput {
    /// Unwrap the row set of a SELECT.
    pub fn into_rows(self) -> SqlResult<Rows> {
        match self {
            QueryOutput::Rows(rows) => Ok(rows),
            other => Err(SqlError::state(format!(
                "statement returned {other:?}, not a row set"
            ))),
        }
    }

    /// Insert id, if this was an INSERT.
    pub fn insert_id(&self) -> Option<u64> {
        match self {
            QueryOutput::InsertId(id) => Some(*id),
            _ => None,
        }
    }

    /// Affected-row count, if this was an UPDATE or DELETE.
    pub fn affected(&self) -> Option<u64> {
        match self {
            QueryOutput::Affected(n) => Some(*n),
            _ => None,
        }
    }
}

/// What the builder needs from a database backend.
///
/// Quoting is synchronous and pure; [`Database::query`] is the only
/// blocking boundary. The quoting methods have default implementations
/// that delegate to the backend's [`Dialect`], so a typical backend only
/// supplies `dialect()` and `query()`.
pub trait Database: Sync {
    /// Dialect driving identifier and literal quoting.
    fn dialect(&self) -> Dialect;

    /// Quote a literal value.
    fn quote(&self, value: &Value) -> String {
        self.dialect().quote(value)
    }

    /// Quote a column name, preserving dotted paths and `*`.
    fn quote_column(&self, name: &str) -> String {
        self.dialect().quote_column(name)
    }

    /// Quote a table name.
    fn quote_table(&self, name: &str) -> String {
        self.dialect().quote_table(name)
    }

    /// Quote a single bare identifier such as an alias.
    fn quote_identifier(&self, name: &str) -> String {
        self.dialect().quote_identifier(name)
    }

    /// Render an `expr AS alias` pair.
    fn quote_alias(&self, expr: &str, alias: &str) -> String {
        format!("{expr} AS {}", self.quote_identifier(alias))
    }

    /// Execute compiled SQL, returning an output shaped by `kind`.
    fn query(
        &self,
        kind: QueryKind,
        sql: &str,
    ) -> impl Future<Output = SqlResult<QueryOutput>> + Send;
}
