//! User session

use crate::{
    catalog::Catalog,
    env::{Charset, Environment},
    exec::{self, Outcome},
    package::Package,
    sql::ast,
    stmt::{bind::Params, Statement, Variable},
    types::SqlType,
    Error, Result,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared state of a session: the table catalog plus registered packages.
pub(crate) struct Database {
    pub catalog: Catalog,
    pub packages: HashMap<String, Package>,
}

/// Represents a user session with its own, initially empty, database.
pub struct Connection<'a> {
    env: &'a Environment,
    db: Arc<RwLock<Database>>,
}

impl<'a> Connection<'a> {
    pub(crate) fn new(env: &'a Environment) -> Result<Self> {
        Ok(Self {
            env,
            db: Arc::new(RwLock::new(Database {
                catalog: Catalog::new(),
                packages: HashMap::new(),
            })),
        })
    }

    /**
        Prepares an SQL statement or procedural block for execution.

        # Example
        ```
        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        # conn.execute("CREATE TABLE pets (id NUMBER(9) NOT NULL, name VARCHAR2(20) NOT NULL)")?;
        let stmt = conn.prepare("
            SELECT name
              FROM pets
             WHERE id = :id
        ")?;
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn prepare(&self, sql: &str) -> Result<Statement> {
        Statement::new(sql, self)
    }

    /// Prepares and executes a statement that takes no arguments. A
    /// convenience for DDL.
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.prepare(sql)?.execute(())
    }

    /**
        Creates a scalar bind variable with an explicit type and maximum
        size. The variable can be bound by name, reused across executions,
        and read after each one.

        # Example
        ```
        use pythia::{SqlType, Value};

        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        let retval = conn.var(SqlType::Varchar, 30);
        let stmt = conn.prepare("begin :retval := 'Called'; end;")?;
        stmt.execute(("RETVAL", &retval))?;
        assert_eq!(retval.value(), Value::Text("Called".into()));
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn var(&self, data_type: SqlType, max_size: usize) -> Variable {
        Variable::scalar(data_type, max_size)
    }

    /// Creates an array bind variable holding up to `capacity` elements of
    /// up to `elem_size` characters (or bytes) each.
    pub fn array_var(&self, data_type: SqlType, capacity: usize, elem_size: usize) -> Variable {
        Variable::array(data_type, capacity, elem_size)
    }

    /**
        Registers a package of routines that procedural blocks can call.

        # Example
        ```
        use pythia::{Package, ParamDef, ParamMode, Routine, Value};

        # let oracle = pythia::env()?;
        # let conn = oracle.connect()?;
        let pkg = Package::new("pkg_Echo").routine(
            "Shout",
            Routine::function(
                vec![ParamDef::scalar("what", ParamMode::In)],
                |slots| Ok(Some(Value::Text(slots[0].text()?.to_uppercase()))),
            ),
        );
        conn.register_package(pkg)?;

        let stmt = conn.prepare("begin :loud := pkg_Echo.Shout(:quiet); end;")?;
        let loud = conn.var(pythia::SqlType::Varchar, 10);
        stmt.execute((("LOUD", &loud), ("QUIET", "hey")))?;
        assert_eq!(loud.value(), Value::Text("HEY".into()));
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn register_package(&self, package: Package) -> Result<()> {
        let mut db = self.db.write();
        let key = package.name().to_uppercase();
        if db.packages.contains_key(&key) {
            return Err(Error::server(955, "name is already used by an existing object"));
        }
        tracing::debug!(package = %package.name(), "registered package");
        db.packages.insert(key, package);
        Ok(())
    }

    pub(crate) fn charset(&self) -> Charset {
        self.env.charset()
    }

    pub(crate) fn run(&self, stmt: &ast::Stmt, params: &mut Params) -> Result<Outcome> {
        let mut db = self.db.write();
        exec::execute(&mut db, stmt, params)
    }
}
