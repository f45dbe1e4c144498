//! SQL statement arguments

use super::bind::Params;
use super::vars::Variable;
use crate::{
    types::{RowID, Value},
    Result,
};

/// A trait for types that can be used as SQL arguments
pub trait ToSql {
    /**
    Binds itself to the SQL parameter placeholder

    # Parameters

    - `pos` - zero-based index of the parameter placeholder to which the
      value will be bound
    - `params` - Statement parameters as defined in the SQL

    Note that the specified position is ignored if the argument also
    provides the placeholder name to which the value should be bound.

    # Returns

    The index of the placeholder for the next argument.
    */
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize>;
}

impl ToSql for () {
    fn bind_to(&self, pos: usize, _params: &mut Params) -> Result<usize> {
        Ok(pos + 1)
    }
}

macro_rules! impl_value_to_sql {
    ($($t:ty),+) => {
        $(
            impl ToSql for $t {
                fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
                    params.bind_value(pos, Value::from(self.clone()))?;
                    Ok(pos + 1)
                }
            }
            impl ToSql for &$t {
                fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
                    params.bind_value(pos, Value::from((*self).clone()))?;
                    Ok(pos + 1)
                }
            }
        )+
    };
}

impl_value_to_sql! { i32, i64, usize, f64, String, Vec<u8>, RowID }

impl ToSql for &str {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_value(pos, Value::from(*self))?;
        Ok(pos + 1)
    }
}

impl ToSql for &&str {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_value(pos, Value::from(**self))?;
        Ok(pos + 1)
    }
}

impl ToSql for &[u8] {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_value(pos, Value::from(*self))?;
        Ok(pos + 1)
    }
}

impl ToSql for Value {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_value(pos, self.clone())?;
        Ok(pos + 1)
    }
}

impl<T> ToSql for Option<T>
where
    T: ToSql,
{
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        match self {
            Some(value) => value.bind_to(pos, params),
            None => {
                params.bind_value(pos, Value::Null)?;
                Ok(pos + 1)
            }
        }
    }
}

impl ToSql for Variable {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_var(pos, self)?;
        Ok(pos + 1)
    }
}

impl ToSql for &Variable {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_var(pos, self)?;
        Ok(pos + 1)
    }
}

impl ToSql for &[&str] {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        let values = self.iter().map(|&txt| Value::from(txt)).collect();
        params.bind_array(pos, values)?;
        Ok(pos + 1)
    }
}

impl ToSql for &[String] {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        let values = self.iter().map(Value::from).collect();
        params.bind_array(pos, values)?;
        Ok(pos + 1)
    }
}

impl ToSql for &[Value] {
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        params.bind_array(pos, self.to_vec())?;
        Ok(pos + 1)
    }
}

impl<T> ToSql for (&str, T)
where
    T: ToSql,
{
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        let idx = params.index_of(self.0)?;
        self.1.bind_to(idx, params)?;
        Ok(pos)
    }
}

impl<T1, T2> ToSql for ((&str, T1), (&str, T2))
where
    T1: ToSql,
    T2: ToSql,
{
    fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
        let idx = params.index_of(self.0 .0)?;
        self.0 .1.bind_to(idx, params)?;
        let idx = params.index_of(self.1 .0)?;
        self.1 .1.bind_to(idx, params)?;
        Ok(pos)
    }
}

macro_rules! impl_tuple_args {
    ($head:ident $($tail:ident)+) => {
        impl<$head $(, $tail)*> ToSql for ($head $(, $tail)*) where $head: ToSql $(, $tail: ToSql)* {
            #[allow(non_snake_case)]
            fn bind_to(&self, pos: usize, params: &mut Params) -> Result<usize> {
                let (ref $head $(, ref $tail)*) = *self;
                let pos = $head.bind_to(pos, params)?;
                $(
                    let pos = $tail.bind_to(pos, params)?;
                )*
                Ok(pos)
            }
        }
    };
}

impl_tuple_args! { A B C }
impl_tuple_args! { A B C D }
impl_tuple_args! { A B C D E }
impl_tuple_args! { A B C D E F }
impl_tuple_args! { A B C D E F G }
impl_tuple_args! { A B C D E F G H }
impl_tuple_args! { A B C D E F G H I }
impl_tuple_args! { A B C D E F G H I J }
impl_tuple_args! { A B C D E F G H I J K }
impl_tuple_args! { A B C D E F G H I J K L }
