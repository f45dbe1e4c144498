/*!
An embedded, Oracle-flavored SQL engine fronted by a driver-grade binding
interface: prepared statements with named and positional parameter
placeholders, explicit scalar and array bind variables, registered
server-side packages, result-set fetching, and post-execution column
metadata.

# Example

```
use pythia::Value;

let oracle = pythia::env()?;
let conn = oracle.connect()?;
conn.execute("
    CREATE TABLE pets (
        id    NUMBER(9) NOT NULL,
        name  VARCHAR2(20) NOT NULL
    )
")?;
let stmt = conn.prepare("INSERT INTO pets VALUES (:ID, :NAME)")?;
stmt.execute((("ID", 1), ("NAME", "Motley")))?;
stmt.execute((("ID", 2), ("NAME", "Zelda")))?;

let stmt = conn.prepare("
    SELECT name
      FROM pets
     WHERE id = :id
")?;
let mut rows = stmt.query(("ID", 2))?;
let row = rows.next()?.expect("one row");
let name: &str = row.get(0)?;
assert_eq!(name, "Zelda");
# Ok::<(),pythia::Error>(())
```
*/

mod catalog;
mod conn;
mod env;
mod err;
mod exec;
mod package;
mod sql;
mod stmt;
mod types;

pub use conn::Connection;
pub use env::{Charset, Environment};
pub use err::Error;
pub use package::{ArrayParam, Package, ParamDef, ParamKind, ParamMode, ParamSlot, Routine};
pub use stmt::{BindHint, ColumnInfo, FromSql, Position, Row, Rows, Statement, ToSql, Variable};
pub use types::{RowID, SqlType, Value};

pub type Result<T> = std::result::Result<T, Error>;

/**
    Returns a new environment, which is then used to start sessions.

    While there can be multiple environments, most applications most likely
    will need only one. It might be created either in `main`:

    ```
    fn main() {
        let oracle = pythia::env().expect("engine environment");
        // ...
    }
    ```

    and passed around, or it might be created statically:

    ```
    use pythia::{Environment, Result};
    use once_cell::sync::OnceCell;

    fn database() -> Result<&'static Environment> {
        static ENV: OnceCell<Environment> = OnceCell::new();
        ENV.get_or_try_init(||
            pythia::env()
        )
    }

    fn main() -> Result<()> {
        let database = database()?;
        // ...
        Ok(())
    }
    ```
*/
pub fn env() -> Result<Environment> {
    Environment::new()
}
