//! Projected column metadata

use crate::{
    catalog::ColumnDef,
    env::Charset,
    types::SqlType,
};
use std::collections::HashMap;

/// A columns position in the projection, or its name.
pub trait Position {
    fn index(&self) -> Option<usize>;
    fn name(&self) -> Option<&str>;
}

impl Position for usize {
    fn index(&self) -> Option<usize> {
        Some(*self)
    }
    fn name(&self) -> Option<&str> {
        None
    }
}

impl Position for &str {
    fn index(&self) -> Option<usize> {
        None
    }
    fn name(&self) -> Option<&str> {
        Some(*self)
    }
}

/// Metadata record of one projected column.
///
/// Sizes of character columns scale with the environment's character set:
/// [`display_size`](Self::display_size) is the declared width in characters
/// while [`byte_size`](Self::byte_size) is the width multiplied by the
/// character set's maximum bytes per character. Size fields not applicable
/// to a column's type are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    name: String,
    data_type: SqlType,
    display_size: Option<usize>,
    byte_size: Option<usize>,
    precision: Option<u8>,
    scale: Option<i8>,
    nullable: bool,
}

impl ColumnInfo {
    fn new(col: &ColumnDef, charset: Charset) -> Self {
        let (display_size, byte_size) = match col.data_type {
            SqlType::Varchar | SqlType::Char => {
                (Some(col.size), Some(col.size * charset.max_char_width()))
            }
            SqlType::Raw | SqlType::Rowid => (Some(col.size), Some(col.size)),
            SqlType::Number => (col.precision.map(|p| p as usize + 1), None),
        };
        Self {
            name: col.name.clone(),
            data_type: col.data_type,
            display_size,
            byte_size,
            precision: col.precision,
            scale: col.scale,
            nullable: col.nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> SqlType {
        self.data_type
    }

    pub fn display_size(&self) -> Option<usize> {
        self.display_size
    }

    pub fn byte_size(&self) -> Option<usize> {
        self.byte_size
    }

    pub fn precision(&self) -> Option<u8> {
        self.precision
    }

    pub fn scale(&self) -> Option<i8> {
        self.scale
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Metadata of all columns of a result set, in projection order.
pub(crate) struct Columns {
    cols: Vec<ColumnInfo>,
    idxs: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn new(defs: &[ColumnDef], charset: Charset) -> Self {
        let cols: Vec<ColumnInfo> = defs.iter().map(|def| ColumnInfo::new(def, charset)).collect();
        let idxs = cols
            .iter()
            .enumerate()
            .map(|(ix, col)| (col.name.clone(), ix))
            .collect();
        Self { cols, idxs }
    }

    pub(crate) fn len(&self) -> usize {
        self.cols.len()
    }

    pub(crate) fn col_index(&self, name: &str) -> Option<usize> {
        self.idxs
            .get(name)
            .or_else(|| self.idxs.get(name.to_uppercase().as_str()))
            .copied()
    }

    pub(crate) fn info(&self, pos: usize) -> Option<&ColumnInfo> {
        self.cols.get(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_col(size: usize) -> ColumnDef {
        ColumnDef {
            name: "FIXEDCHARCOL".into(),
            data_type: SqlType::Char,
            size,
            precision: None,
            scale: None,
            nullable: false,
        }
    }

    #[test]
    fn byte_size_scales_with_charset() {
        let cols = Columns::new(&[char_col(40)], Charset::Utf8);
        let info = cols.info(0).unwrap();
        assert_eq!(info.display_size(), Some(40));
        assert_eq!(info.byte_size(), Some(120));
    }

    #[test]
    fn single_byte_charset_does_not_scale() {
        let cols = Columns::new(&[char_col(40)], Charset::SingleByte);
        let info = cols.info(0).unwrap();
        assert_eq!(info.byte_size(), Some(40));
    }
}
