//! Statement compilers and the named-parameter binder.
//!
//! Each statement kind has one serialization routine walking its clause
//! containers in fixed order and consulting the backend quoter. The
//! per-kind compilers are pure; only [`Query::compile`] caches.

use crate::clause::{ColumnRef, InsertSource, TableRef};
use crate::client::Database;
use crate::condition::ConditionNode;
use crate::error::{SqlError, SqlResult};
use crate::query::{Query, QueryKind};
use crate::value::{Operand, Value};

impl Query {
    /// Compile the statement for its kind, substitute parameters, and
    /// cache the resulting text.
    pub fn compile(&mut self, db: &impl Database) -> SqlResult<String> {
        let kind = self.kind.ok_or_else(|| {
            SqlError::state("statement kind not set; call select(), insert(), update() or delete() first")
        })?;
        let sql = match &self.raw_sql {
            Some(raw) => raw.clone(),
            None => match kind {
                QueryKind::Select => self.compile_select(db)?,
                QueryKind::Insert => self.compile_insert(db)?,
                QueryKind::Update => self.compile_update(db)?,
                QueryKind::Delete => self.compile_delete(db)?,
            },
        };
        let sql = self.substitute_params(db, &sql);
        tracing::debug!(kind = ?kind, sql = %sql, "compiled statement");
        self.last_sql = Some(sql.clone());
        Ok(sql)
    }

    /// Render a SELECT statement. Clause order is fixed:
    /// columns, FROM, JOIN, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT,
    /// OFFSET, UNION.
    pub fn compile_select(&self, db: &impl Database) -> SqlResult<String> {
        let mut sql = String::from("SELECT ");

        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.select.is_empty() {
            sql.push('*');
        } else {
            // Duplicates collapse by exact post-quote match, first wins.
            let mut columns: Vec<String> = Vec::with_capacity(self.select.len());
            for column in &self.select {
                let rendered = render_select_column(db, column);
                if !columns.contains(&rendered) {
                    columns.push(rendered);
                }
            }
            sql.push_str(&columns.join(", "));
        }

        if !self.from.is_empty() {
            let mut tables: Vec<String> = Vec::with_capacity(self.from.len());
            for table in &self.from {
                let rendered = render_table(db, table);
                if !tables.contains(&rendered) {
                    tables.push(rendered);
                }
            }
            sql.push_str(" FROM ");
            sql.push_str(&tables.join(", "));
        }

        if !self.joins.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_joins(db));
        }

        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile_conditions(db, &self.where_tree));
        }

        if !self.group_by.is_empty() {
            let grouped: Vec<String> = self
                .group_by
                .iter()
                .map(|column| render_output_column(db, column))
                .collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&grouped.join(", "));
        }

        if !self.having_tree.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&compile_conditions(db, &self.having_tree));
        }

        if !self.order_by.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_order_by(db));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        if !self.unions.is_empty() {
            let mut combined = format!("({sql})");
            for branch in &self.unions {
                combined.push_str(" UNION ");
                if branch.all {
                    combined.push_str("ALL ");
                }
                combined.push('(');
                combined.push_str(&branch.query.compile_select(db)?);
                combined.push(')');
            }
            sql = combined;
        }

        Ok(sql)
    }

    /// Render an INSERT statement.
    pub fn compile_insert(&self, db: &impl Database) -> SqlResult<String> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::construction("INSERT requires a table"))?;

        let mut sql = format!("INSERT INTO {}", render_table(db, table));

        let columns: Vec<String> = self.columns.iter().map(|c| db.quote_column(c)).collect();
        sql.push_str(&format!(" ({}) ", columns.join(", ")));

        match &self.source {
            InsertSource::Groups(groups) => {
                let rendered: Vec<String> = groups
                    .iter()
                    .map(|group| {
                        let values: Vec<String> =
                            group.iter().map(|value| render_operand(db, value)).collect();
                        format!("({})", values.join(", "))
                    })
                    .collect();
                sql.push_str("VALUES ");
                sql.push_str(&rendered.join(", "));
            }
            InsertSource::Select(query) => {
                sql.push_str(&query.compile_select(db)?);
            }
        }

        Ok(sql)
    }

    /// Render an UPDATE statement.
    pub fn compile_update(&self, db: &impl Database) -> SqlResult<String> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::construction("UPDATE requires a table"))?;

        let mut sql = format!("UPDATE {}", render_table(db, table));

        if !self.joins.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_joins(db));
        }

        // Last assignment per column wins, first position kept.
        let mut set: Vec<(String, String)> = Vec::with_capacity(self.assignments.len());
        for (column, value) in &self.assignments {
            let column = db.quote_column(column);
            let value = render_operand(db, value);
            match set.iter().position(|(existing, _)| *existing == column) {
                Some(i) => set[i].1 = value,
                None => set.push((column, value)),
            }
        }
        let assignments: Vec<String> = set
            .into_iter()
            .map(|(column, value)| format!("{column} = {value}"))
            .collect();
        sql.push_str(" SET ");
        sql.push_str(&assignments.join(", "));

        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile_conditions(db, &self.where_tree));
        }

        if !self.order_by.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_order_by(db));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }

    /// Render a DELETE statement.
    pub fn compile_delete(&self, db: &impl Database) -> SqlResult<String> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::construction("DELETE requires a table"))?;

        let mut sql = format!("DELETE FROM {}", render_table(db, table));

        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile_conditions(db, &self.where_tree));
        }

        if !self.order_by.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_order_by(db));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }

    fn compile_joins(&self, db: &impl Database) -> String {
        let mut statements = Vec::with_capacity(self.joins.len());

        for join in &self.joins {
            let mut sql = match join.join_type {
                Some(join_type) => format!("{} JOIN", join_type.as_sql()),
                None => "JOIN".to_string(),
            };

            sql.push(' ');
            sql.push_str(&render_table(db, &join.table));

            if !join.using.is_empty() {
                let columns: Vec<String> =
                    join.using.iter().map(|c| db.quote_column(c)).collect();
                sql.push_str(&format!(" USING ({})", columns.join(", ")));
            } else {
                let conditions: Vec<String> = join
                    .on
                    .iter()
                    .map(|(left, op, right)| {
                        let op = if op.is_empty() {
                            String::new()
                        } else {
                            format!(" {}", op.to_uppercase())
                        };
                        format!(
                            "{}{} {}",
                            render_condition_column(db, left),
                            op,
                            render_condition_column(db, right)
                        )
                    })
                    .collect();
                sql.push_str(&format!(" ON ({})", conditions.join(" AND ")));
            }

            statements.push(sql);
        }

        statements.join(" ")
    }

    fn compile_order_by(&self, db: &impl Database) -> String {
        let terms: Vec<String> = self
            .order_by
            .iter()
            .map(|term| {
                let column = render_output_column(db, &term.column);
                match term.direction {
                    Some(direction) => format!("{column} {}", direction.as_sql()),
                    None => column,
                }
            })
            .collect();
        format!("ORDER BY {}", terms.join(", "))
    }

    /// Substitute every bound parameter name with its quoted value.
    ///
    /// Names are tried longest-first at each position and replaced text
    /// is never rescanned. Names that are substrings of surrounding SQL
    /// are the caller's responsibility to avoid.
    fn substitute_params(&self, db: &impl Database, sql: &str) -> String {
        if self.params.is_empty() {
            return sql.to_string();
        }

        let mut replacements: Vec<(&str, String)> = self
            .params
            .iter()
            .map(|(name, slot)| (name.as_str(), db.quote(&slot.resolve())))
            .collect();
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut out = String::with_capacity(sql.len());
        let mut rest = sql;
        'scan: while !rest.is_empty() {
            for (name, quoted) in &replacements {
                if rest.starts_with(name) {
                    out.push_str(quoted);
                    rest = &rest[name.len()..];
                    continue 'scan;
                }
            }
            let step = rest.chars().next().map_or(1, char::len_utf8);
            out.push_str(&rest[..step]);
            rest = &rest[step..];
        }
        out
    }
}

/// Render a condition tree, shared by WHERE and HAVING.
///
/// A connector keyword precedes every node except the first rendered
/// token and tokens directly following an open paren. A close with no
/// matching open is skipped; unclosed opens emit no implicit close.
fn compile_conditions(db: &impl Database, tree: &[ConditionNode]) -> String {
    let mut sql = String::new();
    let mut last_was_open = false;
    let mut depth = 0usize;

    for node in tree {
        match node {
            ConditionNode::Open(connector) => {
                if !sql.is_empty() && !last_was_open {
                    sql.push(' ');
                    sql.push_str(connector.keyword());
                    sql.push(' ');
                }
                sql.push('(');
                depth += 1;
                last_was_open = true;
            }
            ConditionNode::Close => {
                if depth == 0 {
                    continue;
                }
                sql.push(')');
                depth -= 1;
                last_was_open = false;
            }
            ConditionNode::Predicate {
                connector,
                column,
                op,
                value,
            } => {
                if !sql.is_empty() && !last_was_open {
                    sql.push(' ');
                    sql.push_str(connector.keyword());
                    sql.push(' ');
                }

                // Rewrite "= NULL" / "!= NULL" to IS / IS NOT.
                let mut op = op.clone();
                if matches!(value, Operand::Value(Value::Null)) {
                    if op == "=" {
                        op = "IS".to_string();
                    } else if op == "!=" {
                        op = "IS NOT".to_string();
                    }
                }
                let op = op.to_uppercase();

                let rendered = match value {
                    Operand::List(bounds) if op == "BETWEEN" && bounds.len() == 2 => {
                        format!(
                            "{} AND {}",
                            render_operand(db, &bounds[0]),
                            render_operand(db, &bounds[1])
                        )
                    }
                    other => render_operand(db, other),
                };

                sql.push_str(&format!(
                    "{} {} {}",
                    render_condition_column(db, column),
                    op,
                    rendered
                ));
                last_was_open = false;
            }
        }
    }

    sql
}

/// Render an operand. Literals are quoted, parameter references stay
/// bare for the binder, raw expressions pass through, lists parenthesize.
fn render_operand(db: &impl Database, operand: &Operand) -> String {
    match operand {
        Operand::Value(value) => db.quote(value),
        Operand::Param(name) => name.clone(),
        Operand::Expr(sql) => sql.clone(),
        Operand::List(items) => {
            let rendered: Vec<String> =
                items.iter().map(|item| render_operand(db, item)).collect();
            format!("({})", rendered.join(", "))
        }
    }
}

/// SELECT-list rendering: alias pairs render the full `expr AS alias`.
fn render_select_column(db: &impl Database, column: &ColumnRef) -> String {
    match column {
        ColumnRef::Name(name) => db.quote_column(name),
        ColumnRef::Expr(sql) => sql.clone(),
        ColumnRef::Alias(inner, alias) => {
            db.quote_alias(&render_condition_column(db, inner), alias)
        }
    }
}

/// WHERE/HAVING/ON rendering: alias pairs compare against the expression.
pub(crate) fn render_condition_column(db: &impl Database, column: &ColumnRef) -> String {
    match column {
        ColumnRef::Name(name) => db.quote_column(name),
        ColumnRef::Expr(sql) => sql.clone(),
        ColumnRef::Alias(inner, _) => render_condition_column(db, inner),
    }
}

/// GROUP BY/ORDER BY rendering: alias pairs name the output alias, which
/// the dialect accepts in these clauses.
fn render_output_column(db: &impl Database, column: &ColumnRef) -> String {
    match column {
        ColumnRef::Name(name) => db.quote_column(name),
        ColumnRef::Expr(sql) => sql.clone(),
        ColumnRef::Alias(_, alias) => db.quote_identifier(alias),
    }
}

fn render_table(db: &impl Database, table: &TableRef) -> String {
    match table {
        TableRef::Name(name) => db.quote_table(name),
        TableRef::Alias(name, alias) => {
            format!("{} AS {}", db.quote_table(name), db.quote_identifier(alias))
        }
    }
}
