//! Binding of parameter placeholders

use super::cols::Position;
use super::vars::Variable;
use crate::{
    package::ArrayParam,
    types::{SqlType, Value},
    Error, Result,
};
use std::collections::HashMap;

/// Declares, ahead of execution, what a placeholder will carry. Used with
/// [`Statement::set_input_sizes`](crate::Statement::set_input_sizes) for
/// output parameters that are not otherwise supplied with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindHint {
    /// A scalar of the given type with that type's default size
    Type(SqlType),
    /// A character scalar with an explicit maximum size
    Size(usize),
    /// An array of the given element type with an explicit capacity
    Array(SqlType, usize),
}

/// Represents statement parameters (a.k.a. parameter placeholders)
pub(crate) struct Params {
    /// Parameter placeholder (name) indexes
    idxs: HashMap<String, usize>,
    /// Placeholder names in order of first appearance
    names: Vec<String>,
    /// Variable currently bound under each placeholder
    slots: Vec<Option<Variable>>,
}

impl Params {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let idxs = names
            .iter()
            .enumerate()
            .map(|(ix, name)| (name.clone(), ix))
            .collect();
        let slots = names.iter().map(|_| None).collect();
        Self { idxs, names, slots }
    }

    /// Returns the bind name without an optional leading colon
    fn strip_colon(name: &str) -> &str {
        name.strip_prefix(':').unwrap_or(name)
    }

    /// Returns index of the parameter placeholder.
    pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
        // Assume `name` is already uppercase and use it as-is first.
        // Explicitly convert to uppercase only if as-is search fails.
        let name = Self::strip_colon(name);
        if let Some(&ix) = self.idxs.get(name) {
            Ok(ix)
        } else if let Some(&ix) = self.idxs.get(name.to_uppercase().as_str()) {
            Ok(ix)
        } else {
            Err(Error::msg(format!("Statement does not define parameter placeholder {}", name)))
        }
    }

    pub(crate) fn name_of(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    fn slot_mut(&mut self, idx: usize) -> Result<&mut Option<Variable>> {
        let count = self.slots.len();
        self.slots.get_mut(idx).ok_or_else(|| {
            Error::msg(format!(
                "argument position {} is past the statement's {} parameter placeholders",
                idx + 1,
                count
            ))
        })
    }

    /// Binds a plain value. An already bound or declared variable keeps the
    /// binding and receives the value when it is compatible; otherwise the
    /// placeholder is rebound to a freshly inferred variable.
    pub(crate) fn bind_value(&mut self, idx: usize, value: Value) -> Result<()> {
        let slot = self.slot_mut(idx)?;
        if let Some(var) = slot {
            match var.try_store(value) {
                Ok(()) => return Ok(()),
                Err(value) => *slot = Some(Variable::inferred(value)),
            }
        } else {
            *slot = Some(Variable::inferred(value));
        }
        Ok(())
    }

    /// Binds an explicitly created variable.
    pub(crate) fn bind_var(&mut self, idx: usize, var: &Variable) -> Result<()> {
        *self.slot_mut(idx)? = Some(var.clone());
        Ok(())
    }

    /// Binds a plain sequence as an array. A declared array variable keeps
    /// the binding and receives the elements; otherwise an array variable
    /// shaped after the sequence is created.
    pub(crate) fn bind_array(&mut self, idx: usize, values: Vec<Value>) -> Result<()> {
        let slot = self.slot_mut(idx)?;
        if let Some(var) = slot {
            if var.is_array() {
                return var.set_values(&values);
            }
        }
        *slot = Some(Variable::inferred_array(values)?);
        Ok(())
    }

    /// Creates a variable per the hint and binds it, returning the handle
    /// so the caller can read the output after execution.
    pub(crate) fn declare(&mut self, idx: usize, hint: BindHint) -> Result<Variable> {
        let var = match hint {
            BindHint::Type(data_type) => Variable::scalar(data_type, data_type.default_size()),
            BindHint::Size(max_size) => Variable::scalar(SqlType::Varchar, max_size),
            BindHint::Array(data_type, capacity) => {
                Variable::array(data_type, capacity, data_type.default_size())
            }
        };
        *self.slot_mut(idx)? = Some(var.clone());
        Ok(var)
    }

    fn bound(&self, name: &str) -> Result<&Variable> {
        let ix = self.index_of(name)?;
        self.slots[ix]
            .as_ref()
            .ok_or_else(|| Error::server(1008, "not all variables bound"))
    }

    /// Reads the scalar value a placeholder carries into the engine.
    pub(crate) fn value(&self, name: &str) -> Result<Value> {
        self.bound(name)?.scalar_value()
    }

    /// Writes a scalar produced by the engine back into the bound variable.
    pub(crate) fn write(&mut self, name: &str, value: Value) -> Result<()> {
        self.bound(name)?.store_out(value)
    }

    /// Materializes the array parameter a placeholder carries. `clear` is
    /// set for out-only parameters, which start empty regardless of any
    /// elements the application put in.
    pub(crate) fn take_array(&self, name: &str, clear: bool) -> Result<ArrayParam> {
        let (data_type, elems, capacity, elem_size) = self.bound(name)?.array_parts()?;
        let elems = if clear { Vec::new() } else { elems };
        Ok(ArrayParam::new(data_type, elems, capacity, elem_size))
    }

    /// Writes the final contents of an array parameter back into the bound
    /// variable.
    pub(crate) fn restore_array(&mut self, name: &str, array: ArrayParam) -> Result<()> {
        self.bound(name)?.store_out_array(array.into_values())
    }

    /// Checks whether the value bound to the placeholder is NULL.
    pub(crate) fn is_null(&self, pos: impl Position) -> Result<bool> {
        let ix = match pos.name() {
            Some(name) => self.index_of(name)?,
            None => pos
                .index()
                .ok_or_else(|| Error::new("Parameter not found."))?,
        };
        Ok(self
            .slots
            .get(ix)
            .and_then(|slot| slot.as_ref())
            .map(|var| var.is_null())
            .unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        Params::new(vec!["VALUE".to_owned(), "ARRAY".to_owned()])
    }

    #[test]
    fn placeholder_lookup_is_case_insensitive() -> Result<()> {
        let params = params();
        assert_eq!(params.index_of(":VALUE")?, 0);
        assert_eq!(params.index_of("value")?, 0);
        assert_eq!(params.index_of("Array")?, 1);
        assert!(params.index_of("missing").is_err());
        Ok(())
    }

    #[test]
    fn value_bind_reuses_compatible_variable() -> Result<()> {
        let mut params = params();
        let var = params.declare(0, BindHint::Size(30))?;
        params.bind_value(0, Value::Text("InVal".into()))?;
        assert_eq!(var.value(), Value::Text("InVal".into()));
        Ok(())
    }

    #[test]
    fn value_bind_replaces_incompatible_variable() -> Result<()> {
        let mut params = params();
        let var = params.declare(0, BindHint::Type(SqlType::Number))?;
        params.bind_value(0, Value::Text("String 6".into()))?;
        // the declared variable was abandoned, not overwritten
        assert!(var.is_null());
        assert_eq!(params.value("VALUE")?, Value::Text("String 6".into()));
        Ok(())
    }

    #[test]
    fn reading_an_unbound_placeholder_fails() {
        let params = params();
        let err = params.value("VALUE").unwrap_err();
        assert_eq!(err.code(), Some(1008));
    }
}
