//! Typed clause containers read by the statement compilers.

use crate::query::Query;
use crate::value::Operand;

/// A column reference: plain name, raw expression, or `expr AS alias`.
///
/// Which part of an alias pair is rendered depends on the clause: the
/// SELECT list renders the full pair, WHERE/HAVING/ON compare against the
/// expression, and GROUP BY/ORDER BY use the output alias.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnRef {
    /// Bare column name, possibly dotted (`users.id`).
    Name(String),
    /// Raw SQL expression spliced verbatim.
    Expr(String),
    /// `(expression, alias)` pair.
    Alias(Box<ColumnRef>, String),
}

impl ColumnRef {
    /// Reference a plain column name.
    pub fn name(name: impl Into<String>) -> Self {
        ColumnRef::Name(name.into())
    }

    /// Splice a raw SQL expression.
    pub fn expr(sql: impl Into<String>) -> Self {
        ColumnRef::Expr(sql.into())
    }

    /// Alias an expression or column.
    pub fn alias(expr: impl Into<ColumnRef>, alias: impl Into<String>) -> Self {
        ColumnRef::Alias(Box::new(expr.into()), alias.into())
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<(&str, &str)> for ColumnRef {
    fn from((name, alias): (&str, &str)) -> Self {
        ColumnRef::Alias(Box::new(ColumnRef::Name(name.to_string())), alias.to_string())
    }
}

impl From<(String, String)> for ColumnRef {
    fn from((name, alias): (String, String)) -> Self {
        ColumnRef::Alias(Box::new(ColumnRef::Name(name)), alias)
    }
}

/// A table reference: plain name or `name AS alias`.
#[derive(Clone, Debug, PartialEq)]
pub enum TableRef {
    /// Bare table name, possibly schema-qualified.
    Name(String),
    /// `(table, alias)` pair.
    Alias(String, String),
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Name(name)
    }
}

impl From<(&str, &str)> for TableRef {
    fn from((name, alias): (&str, &str)) -> Self {
        TableRef::Alias(name.to_string(), alias.to_string())
    }
}

impl From<(String, String)> for TableRef {
    fn from((name, alias): (String, String)) -> Self {
        TableRef::Alias(name, alias)
    }
}

/// JOIN type keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
        }
    }
}

/// One JOIN clause.
///
/// `using` takes precedence over the `on` conditions when non-empty.
#[derive(Clone, Debug)]
pub struct JoinSpec {
    pub(crate) table: TableRef,
    pub(crate) join_type: Option<JoinType>,
    pub(crate) on: Vec<(ColumnRef, String, ColumnRef)>,
    pub(crate) using: Vec<String>,
}

impl JoinSpec {
    pub(crate) fn new(table: TableRef, join_type: Option<JoinType>) -> Self {
        Self {
            table,
            join_type,
            on: Vec::new(),
            using: Vec::new(),
        }
    }
}

/// Sort direction for ORDER BY terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY term.
#[derive(Clone, Debug)]
pub struct OrderTerm {
    pub(crate) column: ColumnRef,
    pub(crate) direction: Option<Direction>,
}

/// One UNION branch; the sub-query must be of SELECT kind.
#[derive(Clone, Debug)]
pub struct UnionBranch {
    pub(crate) query: Query,
    pub(crate) all: bool,
}

/// INSERT row source.
///
/// The enum makes literal VALUES groups and `INSERT ... SELECT`
/// structurally exclusive.
#[derive(Clone, Debug)]
pub enum InsertSource {
    /// Ordered groups of row values.
    Groups(Vec<Vec<Operand>>),
    /// A SELECT sub-query supplying the rows.
    Select(Box<Query>),
}

impl Default for InsertSource {
    fn default() -> Self {
        InsertSource::Groups(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_conversions() {
        assert_eq!(ColumnRef::from("id"), ColumnRef::Name("id".to_string()));
        assert_eq!(
            ColumnRef::from(("users.name", "n")),
            ColumnRef::Alias(Box::new(ColumnRef::Name("users.name".to_string())), "n".to_string())
        );
    }

    #[test]
    fn table_conversions() {
        assert_eq!(TableRef::from("users"), TableRef::Name("users".to_string()));
        assert_eq!(
            TableRef::from(("users", "u")),
            TableRef::Alias("users".to_string(), "u".to_string())
        );
    }
}
