//! Result rows, the cursor over them, and typed hydration.

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use std::collections::HashMap;

/// One result row: column names and values in select order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column and value lists.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, S, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let mut columns = Vec::new();
        let mut values = Vec::new();
        for (column, value) in pairs {
            columns.push(column.into());
            values.push(value.into());
        }
        Self { columns, values }
    }

    /// Value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Column names in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in select order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Integer accessor for [`FromRow`] implementations.
    pub fn get_i64(&self, column: &str) -> SqlResult<i64> {
        self.get(column)
            .and_then(Value::as_i64)
            .ok_or_else(|| SqlError::decode(column, "expected an integer value"))
    }

    /// Text accessor for [`FromRow`] implementations.
    pub fn get_str(&self, column: &str) -> SqlResult<&str> {
        self.get(column)
            .and_then(Value::as_str)
            .ok_or_else(|| SqlError::decode(column, "expected a text value"))
    }

    /// Boolean accessor for [`FromRow`] implementations.
    pub fn get_bool(&self, column: &str) -> SqlResult<bool> {
        self.get(column)
            .and_then(Value::as_bool)
            .ok_or_else(|| SqlError::decode(column, "expected a boolean value"))
    }

    /// Float accessor for [`FromRow`] implementations.
    pub fn get_f64(&self, column: &str) -> SqlResult<f64> {
        self.get(column)
            .and_then(Value::as_f64)
            .ok_or_else(|| SqlError::decode(column, "expected a numeric value"))
    }
}

/// Maps a [`Row`] onto a typed result.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> SqlResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(row.clone())
    }
}

/// Cursor-like collection of rows returned by a SELECT.
#[derive(Clone, Debug, Default)]
pub struct Rows {
    rows: Vec<Row>,
    index: Option<HashMap<String, usize>>,
}

impl Rows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, index: None }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_vec(self) -> Vec<Row> {
        self.rows
    }

    /// First row's value for `column`.
    pub fn scalar(&self, column: &str) -> Option<&Value> {
        self.rows.first().and_then(|row| row.get(column))
    }

    /// Hydrate every row into `T`.
    pub fn all_as<T: FromRow>(&self) -> SqlResult<Vec<T>> {
        self.rows.iter().map(T::from_row).collect()
    }

    /// Key subsequent [`Rows::by_key`] lookups by `column`.
    ///
    /// Rows whose key value has no text form are skipped; on duplicate
    /// keys the last row wins.
    pub fn index_by(&mut self, column: &str) {
        let mut index = HashMap::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(key) = row.get(column).and_then(Value::as_key) {
                index.insert(key, i);
            }
        }
        self.index = Some(index);
    }

    /// Row for `key`, after [`Rows::index_by`].
    pub fn by_key(&self, key: &str) -> Option<&Row> {
        self.index
            .as_ref()
            .and_then(|index| index.get(key))
            .map(|&i| &self.rows[i])
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
