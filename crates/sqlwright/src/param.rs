//! Named-parameter storage and late binding.

use crate::value::Value;
use std::sync::{Arc, RwLock};

/// One bound parameter: a fixed value or a shared late-binding cell.
#[derive(Clone, Debug)]
pub enum ParamSlot {
    /// Value captured when `param()` was called.
    Fixed(Value),
    /// Shared cell read at substitution time.
    Shared(ParamBind),
}

impl ParamSlot {
    /// The value as of the moment of substitution.
    pub(crate) fn resolve(&self) -> Value {
        match self {
            ParamSlot::Fixed(value) => value.clone(),
            ParamSlot::Shared(cell) => cell.get(),
        }
    }
}

/// A shared parameter cell resolved when the statement is compiled.
///
/// Cloning shares the underlying storage, so a value written through one
/// handle is visible to every query the cell is bound to. This is the
/// late-binding counterpart of [`Query::param`](crate::Query::param).
#[derive(Clone, Debug, Default)]
pub struct ParamBind(Arc<RwLock<Value>>);

impl ParamBind {
    /// Create a cell holding an initial value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    /// Replace the stored value.
    pub fn set(&self, value: impl Into<Value>) {
        match self.0.write() {
            Ok(mut guard) => *guard = value.into(),
            Err(poisoned) => *poisoned.into_inner() = value.into(),
        }
    }

    /// Read the stored value.
    pub fn get(&self) -> Value {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_cell_reflects_writes() {
        let cell = ParamBind::new(1i32);
        let slot = ParamSlot::Shared(cell.clone());
        assert_eq!(slot.resolve(), Value::Int(1));

        cell.set(42i32);
        assert_eq!(slot.resolve(), Value::Int(42));
    }

    #[test]
    fn fixed_slot_is_stable() {
        let slot = ParamSlot::Fixed(Value::from("x"));
        assert_eq!(slot.resolve(), Value::Text("x".to_string()));
    }
}
