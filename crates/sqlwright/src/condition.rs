//! Condition tree shared by WHERE and HAVING.

use crate::clause::ColumnRef;
use crate::value::Operand;

/// Logical connector between condition-tree nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One node of a condition tree, stored in insertion order.
#[derive(Clone, Debug)]
pub enum ConditionNode {
    /// Opens a parenthesized sub-group.
    Open(Connector),
    /// Closes the nearest open sub-group.
    Close,
    /// A `column op value` predicate.
    Predicate {
        connector: Connector,
        column: ColumnRef,
        op: String,
        value: Operand,
    },
}

impl ConditionNode {
    pub(crate) fn predicate(
        connector: Connector,
        column: impl Into<ColumnRef>,
        op: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        ConditionNode::Predicate {
            connector,
            column: column.into(),
            op: op.into(),
            value: value.into(),
        }
    }
}

/// Which condition tree an open group belongs to.
///
/// Tracked as a stack on the builder so `end()` always closes the
/// innermost open group on the tree that opened it, even when WHERE and
/// HAVING groups interleave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TreeId {
    Where,
    Having,
}
