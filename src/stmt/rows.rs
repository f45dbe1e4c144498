//! Rows (result set) of a query

use super::cols::{Columns, Position};
use super::fromsql::FromSql;
use super::Statement;
use crate::{
    types::{RowID, Value},
    Error, Result,
};
use std::collections::VecDeque;
use std::sync::Arc;

pub(crate) struct FetchedRow {
    pub rowid: RowID,
    pub values: Vec<Value>,
}

/// Result set of a query.
///
/// Rows come back in result order; when the query specifies an explicit
/// order the fetch calls and their chunking respect it. All fetch variants
/// are idempotent at end-of-results: they report exhaustion rather than
/// raising an error.
pub struct Rows<'a> {
    stmt: &'a Statement<'a>,
    cols: Arc<Columns>,
    rows: VecDeque<FetchedRow>,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(stmt: &'a Statement<'a>, cols: Arc<Columns>, rows: Vec<FetchedRow>) -> Self {
        Self { stmt, cols, rows: rows.into() }
    }

    /**
        Returns the next row in the SELECT's result set, or `None` once the
        result set is exhausted.

        # Example
        ```
        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20) NOT NULL)")?;
        # conn.prepare("INSERT INTO pets VALUES (:ID, :NAME)")?.execute((("ID", 1), ("NAME", "Motley")))?;
        let stmt = conn.prepare("
            SELECT name
              FROM pets
             WHERE id = :id
        ")?;
        let mut rows = stmt.query(("ID", 1))?;
        while let Some(row) = rows.next()? {
            let name: &str = row.get(0)?;
            assert_eq!(name, "Motley");
        }
        # Ok::<(),pythia::Error>(())
        ```
    */
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Row>> {
        match self.rows.pop_front() {
            Some(fetched) => {
                self.stmt.add_fetched(1);
                Ok(Some(Row::new(self.cols.clone(), fetched)))
            }
            None => Ok(None),
        }
    }

    /// Fetches the next row. Same as [`next`](Self::next); reports `None`
    /// at exhaustion, never an error.
    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        self.next()
    }

    /**
        Fetches up to `count` remaining rows in result order.

        The final batch may hold fewer rows than requested; once the result
        set is exhausted an empty vector is returned.
    */
    pub fn fetch_many(&mut self, count: usize) -> Result<Vec<Row>> {
        let mut batch = Vec::with_capacity(count.min(self.rows.len()));
        while batch.len() < count {
            match self.next()? {
                Some(row) => batch.push(row),
                None => break,
            }
        }
        Ok(batch)
    }

    /// Fetches every remaining row. Calling it again after exhaustion
    /// returns an empty vector.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.fetch_many(usize::MAX)
    }
}

/// A row in the returned result set
pub struct Row {
    cols: Arc<Columns>,
    rowid: RowID,
    values: Vec<Value>,
}

impl Row {
    fn new(cols: Arc<Columns>, fetched: FetchedRow) -> Self {
        Self { cols, rowid: fetched.rowid, values: fetched.values }
    }

    fn col_index(&self, pos: impl Position) -> Option<usize> {
        pos.name()
            .and_then(|name| self.cols.col_index(name))
            .or_else(|| pos.index())
    }

    /**
        Returns `true` if the value in the specified column is NULL.

        Out of bounds or misnamed "columns" are considered NULL.
    */
    pub fn is_null(&self, pos: impl Position) -> bool {
        self.col_index(pos)
            .and_then(|ix| self.values.get(ix))
            .map(Value::is_null)
            .unwrap_or(true)
    }

    /**
        Returns the value of the specified column in the current row.

        The column can be specified by its 0-based position in the
        projection or by its name. Nullable columns should be retrieved
        into an `Option`; fetching SQL NULL into a plain type is reported
        as an error.

        # Example
        ```
        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20), owner VARCHAR2(20))")?;
        # conn.prepare("INSERT INTO pets VALUES (:ID, :NAME, :OWNER)")?
        #     .execute((("ID", 1), ("NAME", "Motley"), ("OWNER", Option::<&str>::None)))?;
        let stmt = conn.prepare("SELECT id, name, owner FROM pets")?;
        let mut rows = stmt.query(())?;
        let row = rows.next()?.expect("first row");

        // Either a 0-based column position...
        let id: i64 = row.get(0)?;
        assert_eq!(id, 1);
        // ...or the column name can be used to get the data
        let name: &str = row.get("NAME")?;
        assert_eq!(name, "Motley");
        let owner: Option<&str> = row.get("OWNER")?;
        assert!(owner.is_none());
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn get<'r, T: FromSql<'r>, P: Position>(&'r self, pos: P) -> Result<T> {
        match self.col_index(pos) {
            None => Err(Error::new("no such column")),
            Some(ix) => match self.values.get(ix) {
                None => Err(Error::new("no such column")),
                Some(value) => T::value(value),
            },
        }
    }

    /**
        Returns the `RowID` of the row. The returned `RowID` can be bound
        into an equality predicate of a later statement to address the same
        row.
    */
    pub fn rowid(&self) -> Result<RowID> {
        Ok(self.rowid)
    }
}
