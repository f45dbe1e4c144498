//! Conversions from fetched column values

use crate::{
    types::{RowID, Value},
    Error, Result,
};
use std::convert::TryFrom;

/// A trait for types which instances can be created from the returned
/// column values.
pub trait FromSql<'a>: Sized {
    /**
        Converts, if possible, the value stored in the fetched column into
        the requested type and returns the instance of it. Returns error if
        the conversion fails or is not defined.
    */
    fn value(val: &'a Value) -> Result<Self>;
}

impl<'a> FromSql<'a> for Value {
    fn value(val: &'a Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl<'a, T: FromSql<'a>> FromSql<'a> for Option<T> {
    fn value(val: &'a Value) -> Result<Self> {
        if val.is_null() {
            Ok(None)
        } else {
            T::value(val).map(Some)
        }
    }
}

impl<'a> FromSql<'a> for String {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Text(txt) => Ok(txt.clone()),
            Value::Integer(num) => Ok(num.to_string()),
            Value::Float(num) => Ok(num.to_string()),
            Value::Rowid(rowid) => Ok(rowid.to_string()),
            _ => Err(cannot_convert(val, "String")),
        }
    }
}

impl<'a> FromSql<'a> for &'a str {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Text(txt) => Ok(txt.as_str()),
            _ => Err(cannot_convert(val, "&str")),
        }
    }
}

impl<'a> FromSql<'a> for &'a [u8] {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Bytes(bin) => Ok(bin.as_slice()),
            _ => Err(cannot_convert(val, "&[u8]")),
        }
    }
}

impl<'a> FromSql<'a> for Vec<u8> {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Bytes(bin) => Ok(bin.clone()),
            _ => Err(cannot_convert(val, "Vec<u8>")),
        }
    }
}

impl<'a> FromSql<'a> for RowID {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Rowid(rowid) => Ok(*rowid),
            _ => Err(cannot_convert(val, "RowID")),
        }
    }
}

impl<'a> FromSql<'a> for f64 {
    fn value(val: &'a Value) -> Result<Self> {
        match val {
            Value::Float(num) => Ok(*num),
            Value::Integer(num) => Ok(*num as f64),
            _ => Err(cannot_convert(val, "f64")),
        }
    }
}

impl<'a> FromSql<'a> for f32 {
    fn value(val: &'a Value) -> Result<Self> {
        let num: f64 = FromSql::value(val)?;
        Ok(num as f32)
    }
}

macro_rules! impl_int_from_sql {
    ($($t:ty),+) => {
        $(
            impl<'a> FromSql<'a> for $t {
                fn value(val: &'a Value) -> Result<Self> {
                    match val {
                        Value::Integer(num) => <$t>::try_from(*num)
                            .map_err(|_| Error::msg(format!("{} does not fit into {}", num, stringify!($t)))),
                        _ => Err(cannot_convert(val, stringify!($t))),
                    }
                }
            }
        )+
    };
}

impl_int_from_sql! { i8, i16, i32, i64, isize, u8, u16, u32, u64, usize }

fn cannot_convert(val: &Value, into: &str) -> Error {
    if val.is_null() {
        Error::msg(format!("SQL NULL requires an Option type, not {}", into))
    } else {
        Error::msg(format!("cannot convert {:?} into {}", val, into))
    }
}
