//! # sqlwright
//!
//! A dialect-aware fluent SQL statement builder.
//!
//! ## Features
//!
//! - **One builder, four statement kinds**: SELECT (with JOIN, UNION,
//!   GROUP BY/HAVING, ORDER BY, LIMIT/OFFSET), INSERT (VALUES or
//!   `INSERT ... SELECT`), UPDATE and DELETE
//! - **Tagged operands**: a value is a literal, a named parameter
//!   reference, a raw expression or a list, decided at the call site and
//!   never guessed from its shape
//! - **Dialect-safe text**: every identifier and literal is quoted
//!   through the [`Database`] collaborator; nothing unescaped reaches the
//!   compiled string
//! - **Named parameters**: fixed values or shared late-binding cells,
//!   substituted in a single final pass
//! - **Explicit injection**: compiling and executing take the backend as
//!   an argument; there is no ambient connection
//!
//! ## Usage
//!
//! ```ignore
//! use sqlwright::{select, Direction};
//!
//! let mut query = select()
//!     .from("users")
//!     .and_where("status", "=", "active")
//!     .and_where("age", ">=", 18)
//!     .order_by("created_at", Direction::Desc)
//!     .limit(20);
//!
//! let sql = query.compile(&db)?;
//! let rows = query.get(&db).await?;
//!
//! // INSERT
//! let mut stmt = sqlwright::insert("users")
//!     .columns(["name", "email"])
//!     .values(["alice", "alice@example.com"])?;
//! stmt.execute(&db).await?;
//! ```

pub mod clause;
pub mod client;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod param;
pub mod query;
pub mod row;
pub mod value;

mod compile;
mod exec;

pub use clause::{ColumnRef, Direction, InsertSource, JoinSpec, JoinType, OrderTerm, TableRef, UnionBranch};
pub use client::{Database, QueryOutput};
pub use condition::{ConditionNode, Connector};
pub use dialect::Dialect;
pub use error::{SqlError, SqlResult};
pub use param::{ParamBind, ParamSlot};
pub use query::{Query, QueryKind};
pub use row::{FromRow, Row, Rows};
pub use value::{Operand, Value};

/// Start a `SELECT *` query.
pub fn select() -> Query {
    Query::new().select(std::iter::empty::<ColumnRef>())
}

/// Start a SELECT with an explicit column list.
pub fn select_columns<I, C>(columns: I) -> Query
where
    I: IntoIterator<Item = C>,
    C: Into<ColumnRef>,
{
    Query::new().select(columns)
}

/// Start an INSERT into the given table.
pub fn insert(table: impl Into<TableRef>) -> Query {
    Query::new().insert(table)
}

/// Start an UPDATE of the given table.
pub fn update(table: impl Into<TableRef>) -> Query {
    Query::new().update(table)
}

/// Start a DELETE from the given table.
pub fn delete(table: impl Into<TableRef>) -> Query {
    Query::new().delete(table)
}

#[cfg(test)]
mod tests;
