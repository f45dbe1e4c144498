//! Tables, their declared shapes, and row storage

use crate::{
    types::{RowID, SqlType, Value},
    Error, Result,
};
use std::collections::HashMap;

/// Declared column of a table. Also serves as the metadata record of a
/// projected result column before character-set scaling is applied.
#[derive(Debug, Clone)]
pub(crate) struct ColumnDef {
    pub name: String,
    pub data_type: SqlType,
    /// Declared width: characters for character types, bytes for RAW,
    /// zero when not applicable.
    pub size: usize,
    pub precision: Option<u8>,
    pub scale: Option<i8>,
    pub nullable: bool,
}

impl ColumnDef {
    /// Metadata record of the ROWID pseudo-column.
    pub(crate) fn rowid_pseudo() -> Self {
        Self {
            name: "ROWID".to_owned(),
            data_type: SqlType::Rowid,
            size: 18,
            precision: None,
            scale: None,
            nullable: false,
        }
    }
}

pub(crate) struct StoredRow {
    pub rowid: RowID,
    pub values: Vec<Value>,
}

pub(crate) struct Table {
    pub name: String,
    obj: u32,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<StoredRow>,
    next_row: u64,
}

impl Table {
    fn new(name: String, obj: u32, columns: Vec<ColumnDef>) -> Self {
        Self { name, obj, columns, rows: Vec::new(), next_row: 0 }
    }

    /// Case-insensitive lookup of a declared column.
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name.eq_ignore_ascii_case(name))
    }

    /// Stores a new row. Values arrive in declared column order and are
    /// coerced to the column types; CHAR columns are blank padded to their
    /// declared width.
    pub(crate) fn insert(&mut self, values: Vec<Value>) -> Result<RowID> {
        if values.len() > self.columns.len() {
            return Err(Error::server(913, "too many values"));
        }
        if values.len() < self.columns.len() {
            return Err(Error::server(947, "not enough values"));
        }
        let mut stored = Vec::with_capacity(values.len());
        for (col, value) in self.columns.iter().zip(values) {
            stored.push(coerce_column_value(&self.name, col, value)?);
        }
        let rowid = RowID::new(self.obj, self.next_row);
        self.next_row += 1;
        self.rows.push(StoredRow { rowid, values: stored });
        Ok(rowid)
    }
}

fn coerce_column_value(table: &str, col: &ColumnDef, value: Value) -> Result<Value> {
    if value.is_null() {
        return if col.nullable {
            Ok(Value::Null)
        } else {
            Err(Error::server(1400, format!("cannot insert NULL into (\"{}\".\"{}\")", table, col.name)))
        };
    }
    match col.data_type {
        SqlType::Number => match value {
            Value::Integer(_) | Value::Float(_) => Ok(value),
            other => Err(inconsistent(col, &other)),
        },
        SqlType::Varchar => match value {
            Value::Text(txt) => {
                check_width(table, col, txt.chars().count())?;
                Ok(Value::Text(txt))
            }
            other => Err(inconsistent(col, &other)),
        },
        SqlType::Char => match value {
            Value::Text(txt) => {
                let width = txt.chars().count();
                check_width(table, col, width)?;
                let mut padded = txt;
                padded.extend(std::iter::repeat(' ').take(col.size - width));
                Ok(Value::Text(padded))
            }
            other => Err(inconsistent(col, &other)),
        },
        SqlType::Raw => match value {
            Value::Bytes(bin) => {
                check_width(table, col, bin.len())?;
                Ok(Value::Bytes(bin))
            }
            Value::Text(txt) => {
                check_width(table, col, txt.len())?;
                Ok(Value::Bytes(txt.into_bytes()))
            }
            other => Err(inconsistent(col, &other)),
        },
        SqlType::Rowid => match value {
            Value::Rowid(_) => Ok(value),
            other => Err(inconsistent(col, &other)),
        },
    }
}

fn check_width(table: &str, col: &ColumnDef, actual: usize) -> Result<()> {
    if col.size > 0 && actual > col.size {
        Err(Error::server(
            12899,
            format!(
                "value too large for column \"{}\".\"{}\" (actual: {}, maximum: {})",
                table, col.name, actual, col.size
            ),
        ))
    } else {
        Ok(())
    }
}

fn inconsistent(col: &ColumnDef, value: &Value) -> Error {
    Error::server(932, format!("inconsistent datatypes: cannot store {:?} in column {}", value, col.name))
}

/// All tables of a database, keyed by their normalized names.
pub(crate) struct Catalog {
    tables: HashMap<String, Table>,
    next_obj: u32,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self { tables: HashMap::new(), next_obj: 16 }
    }

    pub(crate) fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<()> {
        let key = name.to_uppercase();
        if self.tables.contains_key(&key) {
            return Err(Error::server(955, "name is already used by an existing object"));
        }
        let obj = self.next_obj;
        self.next_obj += 1;
        self.tables.insert(key.clone(), Table::new(key, obj, columns));
        Ok(())
    }

    pub(crate) fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(&name.to_uppercase())
            .ok_or_else(|| Error::server(942, "table or view does not exist"))
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(&name.to_uppercase())
            .ok_or_else(|| Error::server(942, "table or view does not exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef { name: "ID".into(), data_type: SqlType::Number, size: 0, precision: Some(9), scale: Some(0), nullable: false },
            ColumnDef { name: "TAG".into(), data_type: SqlType::Char, size: 8, precision: None, scale: None, nullable: true },
        ]
    }

    #[test]
    fn char_columns_are_blank_padded() -> Result<()> {
        let mut catalog = Catalog::new();
        catalog.create_table("T", columns())?;
        let table = catalog.table_mut("t")?;
        table.insert(vec![Value::Integer(1), Value::Text("ab".into())])?;
        assert_eq!(table.rows[0].values[1], Value::Text("ab      ".into()));
        Ok(())
    }

    #[test]
    fn not_null_is_enforced() -> Result<()> {
        let mut catalog = Catalog::new();
        catalog.create_table("T", columns())?;
        let table = catalog.table_mut("T")?;
        let err = table.insert(vec![Value::Null, Value::Null]).unwrap_err();
        assert_eq!(err.code(), Some(1400));
        Ok(())
    }

    #[test]
    fn oversized_text_is_rejected() -> Result<()> {
        let mut catalog = Catalog::new();
        catalog.create_table("T", columns())?;
        let table = catalog.table_mut("T")?;
        let err = table.insert(vec![Value::Integer(1), Value::Text("way too long".into())]).unwrap_err();
        assert_eq!(err.code(), Some(12899));
        Ok(())
    }

    #[test]
    fn rowids_are_unique_per_row() -> Result<()> {
        let mut catalog = Catalog::new();
        catalog.create_table("T", columns())?;
        let table = catalog.table_mut("T")?;
        let a = table.insert(vec![Value::Integer(1), Value::Null])?;
        let b = table.insert(vec![Value::Integer(2), Value::Null])?;
        assert_ne!(a, b);
        Ok(())
    }
}
