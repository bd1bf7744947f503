//! The `Query` aggregate root and its fluent builder operations.

use crate::clause::{
    ColumnRef, Direction, InsertSource, JoinSpec, JoinType, OrderTerm, TableRef, UnionBranch,
};
use crate::condition::{ConditionNode, Connector, TreeId};
use crate::error::{SqlError, SqlResult};
use crate::param::{ParamBind, ParamSlot};
use crate::value::{Operand, Value};
use std::collections::BTreeMap;

/// Statement kind, set by the first `select`/`insert`/`update`/`delete`
/// call and required before compiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// A fluent SQL statement builder.
///
/// A `Query` is a plain mutable value: builder calls append to typed
/// clause containers and two condition trees, `compile()` renders them in
/// fixed clause order through a [`Database`](crate::Database) quoter, and
/// a final pass substitutes named parameters. No internal synchronization;
/// one builder belongs to one caller at a time.
#[derive(Clone, Debug, Default)]
pub struct Query {
    pub(crate) kind: Option<QueryKind>,
    pub(crate) raw_sql: Option<String>,

    // SELECT
    pub(crate) select: Vec<ColumnRef>,
    pub(crate) distinct: bool,
    pub(crate) from: Vec<TableRef>,
    pub(crate) joins: Vec<JoinSpec>,
    pub(crate) group_by: Vec<ColumnRef>,
    pub(crate) order_by: Vec<OrderTerm>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) unions: Vec<UnionBranch>,

    // Condition trees
    pub(crate) where_tree: Vec<ConditionNode>,
    pub(crate) having_tree: Vec<ConditionNode>,
    pub(crate) open_groups: Vec<TreeId>,

    // INSERT / UPDATE / DELETE
    pub(crate) table: Option<TableRef>,
    pub(crate) columns: Vec<String>,
    pub(crate) source: InsertSource,
    pub(crate) assignments: Vec<(String, Operand)>,

    // Parameters and execution hints
    pub(crate) params: BTreeMap<String, ParamSlot>,
    pub(crate) index_hint: Option<String>,
    pub(crate) last_sql: Option<String>,
}

impl Query {
    /// Create an empty builder with no statement kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the builder with raw SQL text and a kind.
    ///
    /// `compile()` returns the text after parameter substitution instead
    /// of rendering clauses.
    pub fn raw(sql: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            kind: Some(kind),
            raw_sql: Some(sql.into()),
            ..Self::default()
        }
    }

    /// The statement kind, if one has been established.
    pub fn kind(&self) -> Option<QueryKind> {
        self.kind
    }

    /// The most recently compiled SQL text.
    pub fn last_sql(&self) -> Option<&str> {
        self.last_sql.as_deref()
    }

    /// Clear every clause container, condition tree, parameter and cached
    /// text back to construction defaults, so the builder can be reused.
    pub fn reset(self) -> Self {
        Self::default()
    }

    // ==================== SELECT ====================

    /// Mark the statement as a SELECT and, when `columns` is non-empty,
    /// replace the column list.
    pub fn select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.kind = Some(QueryKind::Select);
        let columns: Vec<ColumnRef> = columns.into_iter().map(Into::into).collect();
        if !columns.is_empty() {
            self.select = columns;
        }
        self
    }

    /// Append one SELECT column.
    pub fn add_select(mut self, column: impl Into<ColumnRef>) -> Self {
        self.select.push(column.into());
        self
    }

    /// Enable or disable `SELECT DISTINCT`.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Append a FROM table.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from.push(table.into());
        self
    }

    // ==================== JOIN ====================

    /// Append a JOIN clause; `None` renders a bare `JOIN`.
    pub fn join(mut self, table: impl Into<TableRef>, join_type: impl Into<Option<JoinType>>) -> Self {
        self.joins.push(JoinSpec::new(table.into(), join_type.into()));
        self
    }

    /// Append an INNER JOIN.
    pub fn inner_join(self, table: impl Into<TableRef>) -> Self {
        self.join(table, JoinType::Inner)
    }

    /// Append a LEFT JOIN.
    pub fn left_join(self, table: impl Into<TableRef>) -> Self {
        self.join(table, JoinType::Left)
    }

    /// Append a RIGHT JOIN.
    pub fn right_join(self, table: impl Into<TableRef>) -> Self {
        self.join(table, JoinType::Right)
    }

    /// Add an `ON left op right` condition to the most recent join.
    pub fn on(
        mut self,
        left: impl Into<ColumnRef>,
        op: impl Into<String>,
        right: impl Into<ColumnRef>,
    ) -> SqlResult<Self> {
        match self.joins.last_mut() {
            Some(join) => {
                join.on.push((left.into(), op.into(), right.into()));
                Ok(self)
            }
            None => Err(SqlError::construction("on() requires a preceding join()")),
        }
    }

    /// Add `USING (columns)` to the most recent join; takes precedence
    /// over its ON conditions.
    pub fn using<I, S>(mut self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.joins.last_mut() {
            Some(join) => {
                join.using.extend(columns.into_iter().map(Into::into));
                Ok(self)
            }
            None => Err(SqlError::construction("using() requires a preceding join()")),
        }
    }

    // ==================== WHERE ====================

    /// Alias of [`Query::and_where`].
    pub fn where_(
        self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.and_where(column, op, value)
    }

    /// Append an AND-connected WHERE predicate.
    pub fn and_where(
        mut self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.where_tree
            .push(ConditionNode::predicate(Connector::And, column, op, value));
        self
    }

    /// Append an OR-connected WHERE predicate.
    pub fn or_where(
        mut self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.where_tree
            .push(ConditionNode::predicate(Connector::Or, column, op, value));
        self
    }

    /// Append several AND-connected WHERE predicates in one call.
    pub fn and_where_all<I, C, O, V>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (C, O, V)>,
        C: Into<ColumnRef>,
        O: Into<String>,
        V: Into<Operand>,
    {
        for (column, op, value) in conditions {
            self.where_tree
                .push(ConditionNode::predicate(Connector::And, column, op, value));
        }
        self
    }

    /// Append several OR-connected WHERE predicates in one call.
    pub fn or_where_all<I, C, O, V>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (C, O, V)>,
        C: Into<ColumnRef>,
        O: Into<String>,
        V: Into<Operand>,
    {
        for (column, op, value) in conditions {
            self.where_tree
                .push(ConditionNode::predicate(Connector::Or, column, op, value));
        }
        self
    }

    /// Alias of [`Query::and_filter`].
    pub fn filter(
        self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.and_filter(column, op, value)
    }

    /// Like [`Query::and_where`], but a no-op when the value is blank
    /// (NULL, whitespace-only text, or an empty list). Convenient for
    /// optional search-form fields.
    pub fn and_filter(
        self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        let value = value.into();
        if value.is_blank() {
            return self;
        }
        self.and_where(column, op, value)
    }

    /// Like [`Query::or_where`], but a no-op when the value is blank.
    pub fn or_filter(
        self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        let value = value.into();
        if value.is_blank() {
            return self;
        }
        self.or_where(column, op, value)
    }

    /// Open an AND-connected parenthesized WHERE group.
    pub fn and_where_open(mut self) -> Self {
        self.where_tree.push(ConditionNode::Open(Connector::And));
        self.open_groups.push(TreeId::Where);
        self
    }

    /// Open an OR-connected parenthesized WHERE group.
    pub fn or_where_open(mut self) -> Self {
        self.where_tree.push(ConditionNode::Open(Connector::Or));
        self.open_groups.push(TreeId::Where);
        self
    }

    // ==================== HAVING ====================

    /// Alias of [`Query::and_having`].
    pub fn having(
        self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.and_having(column, op, value)
    }

    /// Append an AND-connected HAVING predicate.
    pub fn and_having(
        mut self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.having_tree
            .push(ConditionNode::predicate(Connector::And, column, op, value));
        self
    }

    /// Append an OR-connected HAVING predicate.
    pub fn or_having(
        mut self,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.having_tree
            .push(ConditionNode::predicate(Connector::Or, column, op, value));
        self
    }

    /// Append several AND-connected HAVING predicates in one call.
    pub fn and_having_all<I, C, O, V>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (C, O, V)>,
        C: Into<ColumnRef>,
        O: Into<String>,
        V: Into<Operand>,
    {
        for (column, op, value) in conditions {
            self.having_tree
                .push(ConditionNode::predicate(Connector::And, column, op, value));
        }
        self
    }

    /// Open an AND-connected parenthesized HAVING group.
    pub fn and_having_open(mut self) -> Self {
        self.having_tree.push(ConditionNode::Open(Connector::And));
        self.open_groups.push(TreeId::Having);
        self
    }

    /// Open an OR-connected parenthesized HAVING group.
    pub fn or_having_open(mut self) -> Self {
        self.having_tree.push(ConditionNode::Open(Connector::Or));
        self.open_groups.push(TreeId::Having);
        self
    }

    /// Close the innermost open condition group, on whichever tree it
    /// was opened.
    ///
    /// With `check_for_empty`, a group that received no predicate is
    /// removed entirely instead of rendering `()`. Calling `end` with
    /// nothing open is a no-op.
    pub fn end(mut self, check_for_empty: bool) -> Self {
        let Some(tree_id) = self.open_groups.pop() else {
            tracing::warn!("end() called with no open condition group");
            return self;
        };
        let tree = match tree_id {
            TreeId::Where => &mut self.where_tree,
            TreeId::Having => &mut self.having_tree,
        };
        if check_for_empty && matches!(tree.last(), Some(ConditionNode::Open(_))) {
            tree.pop();
        } else {
            tree.push(ConditionNode::Close);
        }
        self
    }

    // ==================== Grouping & ordering ====================

    /// Append GROUP BY columns.
    pub fn group_by<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one ORDER BY term.
    pub fn order_by(
        mut self,
        column: impl Into<ColumnRef>,
        direction: impl Into<Option<Direction>>,
    ) -> Self {
        self.order_by.push(OrderTerm {
            column: column.into(),
            direction: direction.into(),
        });
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Append a UNION branch; the branch must be a SELECT query.
    pub fn union(mut self, query: Query, all: bool) -> SqlResult<Self> {
        if query.kind() != Some(QueryKind::Select) {
            return Err(SqlError::construction(
                "only SELECT queries can be used as UNION branches",
            ));
        }
        self.unions.push(UnionBranch { query, all });
        Ok(self)
    }

    // ==================== INSERT / UPDATE / DELETE ====================

    /// Mark the statement as an INSERT into `table`.
    pub fn insert(mut self, table: impl Into<TableRef>) -> Self {
        self.kind = Some(QueryKind::Insert);
        self.table = Some(table.into());
        self
    }

    /// Mark the statement as an UPDATE of `table`.
    pub fn update(mut self, table: impl Into<TableRef>) -> Self {
        self.kind = Some(QueryKind::Update);
        self.table = Some(table.into());
        self
    }

    /// Mark the statement as a DELETE from `table`.
    pub fn delete(mut self, table: impl Into<TableRef>) -> Self {
        self.kind = Some(QueryKind::Delete);
        self.table = Some(table.into());
        self
    }

    /// Set or replace the target table.
    pub fn table(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the column list for an INSERT.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one group of INSERT values.
    ///
    /// Errors when a sub-select source was already supplied: the two row
    /// sources cannot be combined.
    pub fn values<I, V>(mut self, values: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let group: Vec<Operand> = values.into_iter().map(Into::into).collect();
        match &mut self.source {
            InsertSource::Groups(groups) => {
                groups.push(group);
                Ok(self)
            }
            InsertSource::Select(_) => Err(SqlError::construction(
                "INSERT INTO ... SELECT cannot be combined with VALUES",
            )),
        }
    }

    /// Use a SELECT sub-query as the INSERT row source, replacing any
    /// pending value groups.
    pub fn subselect(mut self, query: Query) -> SqlResult<Self> {
        if query.kind() != Some(QueryKind::Select) {
            return Err(SqlError::construction(
                "only SELECT queries can provide INSERT rows",
            ));
        }
        self.source = InsertSource::Select(Box::new(query));
        Ok(self)
    }

    /// Append one UPDATE assignment. At compile time the last assignment
    /// per column wins.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    /// Append several UPDATE assignments.
    pub fn set_pairs<I, S, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in pairs {
            self.assignments.push((column.into(), value.into()));
        }
        self
    }

    // ==================== Parameters & hints ====================

    /// Bind a fixed parameter value; last write per name wins.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), ParamSlot::Fixed(value.into()));
        self
    }

    /// Merge several fixed parameters; new values win on collision.
    pub fn parameters<I, S, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in params {
            self.params.insert(name.into(), ParamSlot::Fixed(value.into()));
        }
        self
    }

    /// Bind a parameter to a shared cell, resolved when the statement is
    /// compiled rather than when `bind` is called.
    pub fn bind(mut self, name: impl Into<String>, cell: &ParamBind) -> Self {
        self.params.insert(name.into(), ParamSlot::Shared(cell.clone()));
        self
    }

    /// Key the rows returned by `get()` by `column` for `by_key` lookup.
    pub fn index_by(mut self, column: impl Into<String>) -> Self {
        self.index_hint = Some(column.into());
        self
    }
}
