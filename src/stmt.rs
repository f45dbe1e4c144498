//! SQL or PL/SQL statement

pub mod args;
pub mod bind;
pub mod cols;
pub mod fromsql;
pub mod rows;
pub mod vars;

pub use args::ToSql;
pub use bind::BindHint;
pub use cols::{ColumnInfo, Position};
pub use fromsql::FromSql;
pub use rows::{Row, Rows};
pub use vars::Variable;

use crate::{conn::Connection, exec::Outcome, sql, Error, Result};
use bind::Params;
use cols::Columns;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Represents a prepared for execution SQL or procedural block statement
pub struct Statement<'a> {
    conn: &'a Connection<'a>,
    parsed: sql::ast::Stmt,
    params: RwLock<Params>,
    cols: OnceCell<Arc<Columns>>,
    row_count: AtomicUsize,
}

impl<'a> Statement<'a> {
    /// Creates a new statement
    pub(crate) fn new(text: &str, conn: &'a Connection<'a>) -> Result<Self> {
        let parsed = sql::parse(text)?;
        tracing::debug!(sql = %text.trim(), "prepared");
        Ok(Self {
            conn,
            parsed: parsed.stmt,
            params: RwLock::new(Params::new(parsed.binds)),
            cols: OnceCell::new(),
            row_count: AtomicUsize::new(0),
        })
    }

    /**
        Executes the prepared statement. Returns the number of rows affected.

        Arguments are either positional values or `("NAME", value)` pairs;
        several arguments are passed as a tuple. A value may be a native
        scalar, an `Option` (where `None` binds SQL NULL), a sequence
        (bound as an array), or a pre-created [`Variable`].

        # Example
        ```
        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20) NOT NULL)")?;
        let stmt = conn.prepare("INSERT INTO pets VALUES (:ID, :NAME)")?;
        let count = stmt.execute((("ID", 1), ("NAME", "Motley")))?;
        assert_eq!(count, 1);
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn execute(&self, args: impl ToSql) -> Result<usize> {
        if self.parsed.is_select() {
            return Err(Error::new("Use `query` to execute SELECT"));
        }
        let mut params = self.params.write();
        args.bind_to(0, &mut params)?;
        match self.conn.run(&self.parsed, &mut params)? {
            Outcome::Affected(count) => {
                self.row_count.store(count, Ordering::Relaxed);
                tracing::debug!(rows = count, "executed");
                Ok(count)
            }
            Outcome::ResultSet { .. } => Err(Error::new("Use `query` to execute SELECT")),
        }
    }

    /**
        Executes the prepared SELECT. Returns the [`Rows`] of its result set.

        # Example
        ```
        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20) NOT NULL)")?;
        # conn.prepare("INSERT INTO pets VALUES (:ID, :NAME)")?.execute((("ID", 1), ("NAME", "Motley")))?;
        let stmt = conn.prepare("
            SELECT id, name
              FROM pets
             WHERE name = :name
        ")?;
        let mut rows = stmt.query(("NAME", "Motley"))?;
        let row = rows.next()?.expect("first row");
        let id: i64 = row.get(0)?;
        assert_eq!(id, 1);
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn query(&'a self, args: impl ToSql) -> Result<Rows<'a>> {
        if !self.parsed.is_select() {
            return Err(Error::new("Use `execute` to run statements other than SELECT"));
        }
        let mut params = self.params.write();
        args.bind_to(0, &mut params)?;
        match self.conn.run(&self.parsed, &mut params)? {
            Outcome::ResultSet { columns, rows } => {
                let charset = self.conn.charset();
                let cols = self
                    .cols
                    .get_or_init(|| Arc::new(Columns::new(&columns, charset)))
                    .clone();
                self.row_count.store(0, Ordering::Relaxed);
                Ok(Rows::new(self, cols, rows))
            }
            Outcome::Affected(_) => Err(Error::new("Use `execute` to run statements other than SELECT")),
        }
    }

    /**
        Declares the expected type and size of placeholders ahead of
        execution. This is how output-only parameters, which are not
        otherwise supplied with a value, get their variables.

        Returns a map from the placeholder name (uppercase) to the variable
        that was created and bound under it, so the output value can be
        retrieved after execution. Declaring a size as a type constant and
        as an equivalent explicit integer are interchangeable.

        # Example
        ```
        use pythia::{BindHint, SqlType, Value};

        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        let stmt = conn.prepare("begin :value := 'TSI'; end;")?;
        let vars = stmt.set_input_sizes(&[("VALUE", BindHint::Type(SqlType::Varchar))])?;
        stmt.execute(())?;
        assert_eq!(vars["VALUE"].value(), Value::Text("TSI".into()));
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn set_input_sizes(&self, decls: &[(&str, BindHint)]) -> Result<HashMap<String, Variable>> {
        let mut params = self.params.write();
        let mut vars = HashMap::with_capacity(decls.len());
        for (name, hint) in decls {
            let idx = params.index_of(name)?;
            let var = params.declare(idx, *hint)?;
            let key = params
                .name_of(idx)
                .map(str::to_owned)
                .unwrap_or_else(|| name.to_uppercase());
            vars.insert(key, var);
        }
        Ok(vars)
    }

    /// Checks whether the value bound to the named or positional parameter
    /// placeholder is NULL.
    pub fn is_null(&self, pos: impl Position) -> Result<bool> {
        self.params.read().is_null(pos)
    }

    /// Returns the number of columns in the select-list of this statement.
    /// Column metadata becomes available once the query has been executed.
    pub fn column_count(&self) -> Result<usize> {
        self.cols
            .get()
            .map(|cols| cols.len())
            .ok_or_else(|| Error::new("Columns are not available until the query is executed"))
    }

    /**
        Returns `pos` column metadata. `pos` is 0-based. Returns None if
        `pos` is greater than the number of columns in the query or if the
        prepared statement is not a SELECT or has not been executed yet.

        # Example
        ```
        use pythia::SqlType;

        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20) NOT NULL)")?;
        let stmt = conn.prepare("SELECT id, name FROM pets")?;
        let mut _rows = stmt.query(())?;
        let col = stmt.column(0).expect("id column info");
        assert_eq!(col.name(), "ID");
        assert_eq!(col.data_type(), SqlType::Number);
        assert_eq!(col.precision(), Some(9));
        assert_eq!(col.scale(), Some(0));
        assert!(!col.is_nullable());
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn column(&self, pos: usize) -> Option<ColumnInfo> {
        self.cols.get().and_then(|cols| cols.info(pos)).cloned()
    }

    /**
        Returns the number of rows fetched so far by the current query, or
        the number of rows affected by the most recent non-query execution.
    */
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.row_count.load(Ordering::Relaxed))
    }

    pub(crate) fn add_fetched(&self, count: usize) {
        self.row_count.fetch_add(count, Ordering::Relaxed);
    }
}
