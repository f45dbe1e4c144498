//! Registered server-side packages
//!
//! A [`Package`] is the in-process analogue of a stored PL/SQL package: a
//! named collection of routines implemented as Rust closures. Routines are
//! invoked from procedural blocks (`BEGIN pkg.proc(:a, :b); END;`) and
//! receive their parameters as [`ParamSlot`]s which they may read and, for
//! `OUT`/`IN OUT` parameters, mutate in place.

use crate::{
    types::{SqlType, Value},
    Error, Result,
};
use std::collections::HashMap;

/// Direction of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    In,
    Out,
    InOut,
}

/// Shape of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    Array,
}

/// Declared parameter of a registered routine.
#[derive(Debug, Clone)]
pub struct ParamDef {
    name: &'static str,
    mode: ParamMode,
    kind: ParamKind,
}

impl ParamDef {
    pub fn scalar(name: &'static str, mode: ParamMode) -> Self {
        Self { name, mode, kind: ParamKind::Scalar }
    }

    pub fn array(name: &'static str, mode: ParamMode) -> Self {
        Self { name, mode, kind: ParamKind::Array }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub(crate) fn mode(&self) -> ParamMode {
        self.mode
    }

    pub(crate) fn kind(&self) -> ParamKind {
        self.kind
    }
}

/// Runtime slot a routine reads and writes.
pub enum ParamSlot {
    Scalar(Value),
    Array(ArrayParam),
}

impl ParamSlot {
    /// Reads the slot as an integer.
    pub fn int(&self) -> Result<i64> {
        match self {
            ParamSlot::Scalar(Value::Integer(num)) => Ok(*num),
            _ => Err(Error::new("routine parameter is not an integer")),
        }
    }

    /// Reads the slot as a string.
    pub fn text(&self) -> Result<&str> {
        match self {
            ParamSlot::Scalar(Value::Text(txt)) => Ok(txt),
            _ => Err(Error::new("routine parameter is not a string")),
        }
    }

    pub fn array(&self) -> Result<&ArrayParam> {
        match self {
            ParamSlot::Array(arr) => Ok(arr),
            _ => Err(Error::new("routine parameter is not an array")),
        }
    }

    pub fn array_mut(&mut self) -> Result<&mut ArrayParam> {
        match self {
            ParamSlot::Array(arr) => Ok(arr),
            _ => Err(Error::new("routine parameter is not an array")),
        }
    }

    /// Replaces the value of a scalar slot.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<()> {
        match self {
            ParamSlot::Scalar(slot) => {
                *slot = value.into();
                Ok(())
            }
            _ => Err(Error::new("routine parameter is not a scalar")),
        }
    }
}

/// Array parameter of a routine call.
///
/// Carries the logical elements of the bound array variable together with
/// its declared capacity and per-element size, both of which are enforced
/// on writes the way the variable itself enforces them.
pub struct ArrayParam {
    data_type: SqlType,
    elems: Vec<Value>,
    capacity: usize,
    elem_size: usize,
}

impl ArrayParam {
    pub(crate) fn new(data_type: SqlType, elems: Vec<Value>, capacity: usize, elem_size: usize) -> Self {
        Self { data_type, elems, capacity, elem_size }
    }

    /// Current logical length.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elems.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.elems
    }

    /// Writes an element, extending the logical length when `index` is past
    /// the current end. Indexes at or past the declared capacity and
    /// elements exceeding the declared element size are rejected.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        if index >= self.capacity {
            return Err(Error::server(6533, "subscript beyond count"));
        }
        let value = crate::stmt::vars::coerce(self.data_type, self.elem_size, value.into())
            .map_err(|err| Error::server(6502, err.to_string()))?;
        while self.elems.len() <= index {
            self.elems.push(Value::Null);
        }
        self.elems[index] = value;
        Ok(())
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.elems
    }
}

type RoutineBody = Box<dyn Fn(&mut [ParamSlot]) -> Result<Option<Value>> + Send + Sync>;

/// A registered routine: declared parameters plus the closure implementing it.
pub struct Routine {
    params: Vec<ParamDef>,
    body: RoutineBody,
    is_function: bool,
}

impl Routine {
    /// A routine that returns a value and may be called in an expression.
    pub fn function<F>(params: Vec<ParamDef>, body: F) -> Self
    where
        F: Fn(&mut [ParamSlot]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self { params, body: Box::new(body), is_function: true }
    }

    /// A routine called as a statement for its parameter effects.
    pub fn procedure<F>(params: Vec<ParamDef>, body: F) -> Self
    where
        F: Fn(&mut [ParamSlot]) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            params,
            body: Box::new(move |slots| body(slots).map(|_| None)),
            is_function: false,
        }
    }

    pub(crate) fn params(&self) -> &[ParamDef] {
        &self.params
    }

    pub(crate) fn is_function(&self) -> bool {
        self.is_function
    }

    pub(crate) fn invoke(&self, slots: &mut [ParamSlot]) -> Result<Option<Value>> {
        (self.body)(slots)
    }
}

/// A named collection of routines.
pub struct Package {
    name: String,
    routines: HashMap<String, Routine>,
}

impl Package {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), routines: HashMap::new() }
    }

    /// Adds a routine under the given name.
    pub fn routine(mut self, name: &str, routine: Routine) -> Self {
        self.routines.insert(name.to_uppercase(), routine);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn find(&self, name: &str) -> Option<&Routine> {
        self.routines.get(&name.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_param_extends_to_written_index() -> Result<()> {
        let mut arr = ArrayParam::new(SqlType::Varchar, Vec::new(), 6, 100);
        arr.set(2, "third")?;
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(&Value::Null));
        assert_eq!(arr.get(2), Some(&Value::Text("third".into())));
        Ok(())
    }

    #[test]
    fn array_param_rejects_writes_past_capacity() {
        let mut arr = ArrayParam::new(SqlType::Varchar, Vec::new(), 2, 100);
        let err = arr.set(2, "nope").unwrap_err();
        assert_eq!(err.code(), Some(6533));
    }

    #[test]
    fn array_param_rejects_oversized_elements() {
        let mut arr = ArrayParam::new(SqlType::Varchar, Vec::new(), 2, 4);
        let err = arr.set(0, "too long").unwrap_err();
        assert_eq!(err.code(), Some(6502));
    }
}
