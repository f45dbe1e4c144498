//! Bind variables
//!
//! A [`Variable`] is an explicitly created bind value holder: it has a
//! declared type and maximum size, is bound to a statement by name, and can
//! be read after the statement executes. Variables are shared handles, so
//! the object the application holds and the object the statement writes to
//! are the same. An array variable additionally has a fixed capacity and a
//! per-element size.

use crate::{
    types::{SqlType, Value},
    Error, Result,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Coerces a value to the given type, enforcing `max_size` (characters for
/// character types, bytes for RAW; zero means unconstrained).
pub(crate) fn coerce(data_type: SqlType, max_size: usize, value: Value) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match data_type {
        SqlType::Varchar | SqlType::Char => match value {
            Value::Text(txt) => {
                check_size(txt.chars().count(), max_size)?;
                Ok(Value::Text(txt))
            }
            other => Err(mismatch(&other, data_type)),
        },
        SqlType::Raw => match value {
            Value::Bytes(bin) => {
                check_size(bin.len(), max_size)?;
                Ok(Value::Bytes(bin))
            }
            Value::Text(txt) => {
                check_size(txt.len(), max_size)?;
                Ok(Value::Bytes(txt.into_bytes()))
            }
            other => Err(mismatch(&other, data_type)),
        },
        SqlType::Number => match value {
            Value::Integer(_) | Value::Float(_) => Ok(value),
            other => Err(mismatch(&other, data_type)),
        },
        SqlType::Rowid => match value {
            Value::Rowid(_) => Ok(value),
            other => Err(mismatch(&other, data_type)),
        },
    }
}

fn check_size(actual: usize, max_size: usize) -> Result<()> {
    if max_size > 0 && actual > max_size {
        Err(Error::msg(format!(
            "value of length {} exceeds the declared variable size {}",
            actual, max_size
        )))
    } else {
        Ok(())
    }
}

fn mismatch(value: &Value, data_type: SqlType) -> Error {
    Error::msg(format!("cannot bind {:?} to a {:?} variable", value, data_type))
}

enum Data {
    Scalar(Value),
    Array { elems: Vec<Value>, capacity: usize },
}

struct Inner {
    data_type: SqlType,
    /// Scalar maximum size, or per-element size for arrays
    max_size: usize,
    data: Data,
}

/// An explicitly created bind variable, scalar or array.
#[derive(Clone)]
pub struct Variable {
    inner: Arc<RwLock<Inner>>,
}

impl Variable {
    pub(crate) fn scalar(data_type: SqlType, max_size: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { data_type, max_size, data: Data::Scalar(Value::Null) })),
        }
    }

    pub(crate) fn array(data_type: SqlType, capacity: usize, elem_size: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                data_type,
                max_size: elem_size,
                data: Data::Array { elems: Vec::new(), capacity },
            })),
        }
    }

    /// Creates a scalar variable sized and typed after the given value.
    pub(crate) fn inferred(value: Value) -> Self {
        let (data_type, max_size) = match &value {
            Value::Text(txt) => (SqlType::Varchar, txt.chars().count().max(1)),
            Value::Bytes(bin) => (SqlType::Raw, bin.len().max(1)),
            Value::Integer(_) | Value::Float(_) => (SqlType::Number, 0),
            Value::Rowid(_) => (SqlType::Rowid, 0),
            Value::Null => (SqlType::Varchar, 1),
        };
        Self {
            inner: Arc::new(RwLock::new(Inner { data_type, max_size, data: Data::Scalar(value) })),
        }
    }

    /// Creates an array variable shaped after the given elements.
    pub(crate) fn inferred_array(values: Vec<Value>) -> Result<Self> {
        let data_type = values
            .iter()
            .find_map(|val| match val {
                Value::Text(_) => Some(SqlType::Varchar),
                Value::Bytes(_) => Some(SqlType::Raw),
                Value::Integer(_) | Value::Float(_) => Some(SqlType::Number),
                _ => None,
            })
            .unwrap_or(SqlType::Varchar);
        let elem_size = values
            .iter()
            .map(|val| match val {
                Value::Text(txt) => txt.chars().count(),
                Value::Bytes(bin) => bin.len(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
            .max(1);
        let capacity = values.len();
        let var = Self::array(data_type, capacity, elem_size);
        var.replace_elements(values)?;
        Ok(var)
    }

    /// Declared data type.
    pub fn data_type(&self) -> SqlType {
        self.inner.read().data_type
    }

    /// Declared maximum size (scalar) or element size (array).
    pub fn size(&self) -> usize {
        self.inner.read().max_size
    }

    /// Returns `true` if this is an array variable.
    pub fn is_array(&self) -> bool {
        matches!(self.inner.read().data, Data::Array { .. })
    }

    /// Returns `true` for a scalar holding NULL or an array holding no elements.
    pub fn is_null(&self) -> bool {
        match &self.inner.read().data {
            Data::Scalar(value) => value.is_null(),
            Data::Array { elems, .. } => elems.is_empty(),
        }
    }

    /**
        Returns the current value of a scalar variable.

        For out and in/out parameters this is the value the server last
        wrote; for pure in parameters it is the value that was sent,
        unchanged. Reading an array variable yields NULL; use
        [`values`](Self::values) instead.
    */
    pub fn value(&self) -> Value {
        match &self.inner.read().data {
            Data::Scalar(value) => value.clone(),
            Data::Array { .. } => Value::Null,
        }
    }

    /// Sets the value of a scalar variable, coercing it to the declared
    /// type and enforcing the declared size.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<()> {
        let mut inner = self.inner.write();
        let value = coerce(inner.data_type, inner.max_size, value.into())?;
        match &mut inner.data {
            Data::Scalar(slot) => {
                *slot = value;
                Ok(())
            }
            Data::Array { .. } => Err(Error::new("set_value is not applicable to an array variable")),
        }
    }

    /// Returns the logical elements of an array variable. A scalar variable
    /// yields its single value.
    pub fn values(&self) -> Vec<Value> {
        match &self.inner.read().data {
            Data::Scalar(value) => vec![value.clone()],
            Data::Array { elems, .. } => elems.clone(),
        }
    }

    /**
        Replaces the logical contents of an array variable.

        The number of elements must not exceed the declared capacity and
        every element must fit the declared element size.
    */
    pub fn set_values<T>(&self, values: &[T]) -> Result<()>
    where
        T: Clone + Into<Value>,
    {
        let values = values.iter().cloned().map(Into::into).collect();
        self.replace_elements(values)
    }

    fn replace_elements(&self, values: Vec<Value>) -> Result<()> {
        let mut inner = self.inner.write();
        let data_type = inner.data_type;
        let elem_size = inner.max_size;
        match &mut inner.data {
            Data::Array { elems, capacity } => {
                if values.len() > *capacity {
                    return Err(Error::msg(format!(
                        "array of {} elements exceeds the variable capacity {}",
                        values.len(),
                        capacity
                    )));
                }
                let mut coerced = Vec::with_capacity(values.len());
                for value in values {
                    coerced.push(coerce(data_type, elem_size, value)?);
                }
                *elems = coerced;
                Ok(())
            }
            Data::Scalar(_) => Err(Error::new("set_values is not applicable to a scalar variable")),
        }
    }

    /// Stores a value if this is a scalar variable and the value fits its
    /// declared type and size; hands the value back otherwise so the caller
    /// can rebind with a fresh variable.
    pub(crate) fn try_store(&self, value: Value) -> std::result::Result<(), Value> {
        let mut inner = self.inner.write();
        let data_type = inner.data_type;
        let max_size = inner.max_size;
        match &mut inner.data {
            Data::Scalar(slot) => match coerce(data_type, max_size, value.clone()) {
                Ok(coerced) => {
                    *slot = coerced;
                    Ok(())
                }
                Err(_) => Err(value),
            },
            Data::Array { .. } => Err(value),
        }
    }

    /// Server-side write into a scalar variable.
    pub(crate) fn store_out(&self, value: Value) -> Result<()> {
        let mut inner = self.inner.write();
        let data_type = inner.data_type;
        let max_size = inner.max_size;
        match &mut inner.data {
            Data::Scalar(slot) => {
                let value = coerce(data_type, max_size, value)
                    .map_err(|err| Error::server(6502, err.to_string()))?;
                *slot = value;
                Ok(())
            }
            Data::Array { .. } => Err(Error::server(6502, "array variable written as a scalar")),
        }
    }

    pub(crate) fn scalar_value(&self) -> Result<Value> {
        match &self.inner.read().data {
            Data::Scalar(value) => Ok(value.clone()),
            Data::Array { .. } => Err(Error::new("array variable used where a scalar is expected")),
        }
    }

    /// Type, elements, capacity, and element size of an array variable.
    pub(crate) fn array_parts(&self) -> Result<(SqlType, Vec<Value>, usize, usize)> {
        let inner = self.inner.read();
        match &inner.data {
            Data::Array { elems, capacity } => Ok((inner.data_type, elems.clone(), *capacity, inner.max_size)),
            Data::Scalar(_) => Err(Error::new("scalar variable used where an array is expected")),
        }
    }

    /// Server-side write-back of array contents.
    pub(crate) fn store_out_array(&self, values: Vec<Value>) -> Result<()> {
        self.replace_elements(values)
            .map_err(|err| Error::server(6502, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() -> Result<()> {
        let var = Variable::scalar(SqlType::Varchar, 30);
        assert!(var.is_null());
        var.set_value("Called")?;
        assert_eq!(var.value(), Value::Text("Called".into()));
        Ok(())
    }

    #[test]
    fn declared_size_is_enforced() {
        let var = Variable::scalar(SqlType::Varchar, 4);
        assert!(var.set_value("too long").is_err());
    }

    #[test]
    fn raw_variables_accept_text() -> Result<()> {
        let var = Variable::scalar(SqlType::Raw, 30);
        var.set_value("Raw 4")?;
        assert_eq!(var.value(), Value::Bytes(b"Raw 4".to_vec()));
        Ok(())
    }

    #[test]
    fn array_capacity_is_enforced() {
        let var = Variable::array(SqlType::Varchar, 2, 10);
        let err = var.set_values(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, Error::Interface(_)));
    }

    #[test]
    fn incompatible_value_is_handed_back() {
        let var = Variable::scalar(SqlType::Number, 0);
        let returned = var.try_store(Value::Text("String 6".into())).unwrap_err();
        assert_eq!(returned, Value::Text("String 6".into()));
    }
}
