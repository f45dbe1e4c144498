//! Engine data types and values

pub(crate) mod rowid;

pub use rowid::RowID;

use std::cmp::Ordering;

/// SQL data types used to declare table columns and bind variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Fixed or floating point number
    Number,
    /// Variable length character data
    Varchar,
    /// Fixed length, blank padded character data
    Char,
    /// Variable length binary data
    Raw,
    /// Opaque row identifier
    Rowid,
}

impl SqlType {
    /// Default maximum size used when a variable of this type is declared
    /// without an explicit size.
    pub(crate) fn default_size(&self) -> usize {
        match self {
            SqlType::Varchar | SqlType::Char => 4000,
            SqlType::Raw => 2000,
            SqlType::Number | SqlType::Rowid => 0,
        }
    }
}

/// A single SQL value as stored in a table or carried through a bind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Rowid(RowID),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(txt) => Some(txt),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(num) => Some(*num),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bin) => Some(bin),
            _ => None,
        }
    }

    /// SQL equality. Comparisons that involve NULL are never true.
    pub(crate) fn sql_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => (*a as f64) == *b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Rowid(a), Value::Rowid(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering used by ORDER BY. NULLs collate last, mismatched types
    /// keep their relative input order.
    pub(crate) fn sql_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::Rowid(a), Value::Rowid(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<&str> for Value {
    fn from(txt: &str) -> Self {
        Value::Text(txt.to_owned())
    }
}

impl From<String> for Value {
    fn from(txt: String) -> Self {
        Value::Text(txt)
    }
}

impl From<&String> for Value {
    fn from(txt: &String) -> Self {
        Value::Text(txt.clone())
    }
}

impl From<i32> for Value {
    fn from(num: i32) -> Self {
        Value::Integer(num as i64)
    }
}

impl From<i64> for Value {
    fn from(num: i64) -> Self {
        Value::Integer(num)
    }
}

impl From<usize> for Value {
    fn from(num: usize) -> Self {
        Value::Integer(num as i64)
    }
}

impl From<f64> for Value {
    fn from(num: f64) -> Self {
        Value::Float(num)
    }
}

impl From<&[u8]> for Value {
    fn from(bin: &[u8]) -> Self {
        Value::Bytes(bin.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bin: Vec<u8>) -> Self {
        Value::Bytes(bin)
    }
}

impl From<RowID> for Value {
    fn from(rowid: RowID) -> Self {
        Value::Rowid(rowid)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => Value::from(val),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_never_equals() {
        assert!(!Value::Null.sql_eq(&Value::Null));
        assert!(!Value::Null.sql_eq(&Value::Integer(1)));
        assert!(!Value::Text("x".into()).sql_eq(&Value::Null));
    }

    #[test]
    fn mixed_numeric_equality() {
        assert!(Value::Integer(3).sql_eq(&Value::Float(3.0)));
        assert!(!Value::Integer(3).sql_eq(&Value::Float(3.5)));
    }

    #[test]
    fn nulls_collate_last() {
        assert_eq!(Value::Null.sql_cmp(&Value::Integer(1)), Ordering::Greater);
        assert_eq!(Value::Integer(1).sql_cmp(&Value::Null), Ordering::Less);
    }
}
