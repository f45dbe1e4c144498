//! Engine environment

use crate::{Connection, Result};

/// Database character set of an environment.
///
/// The character set determines how many bytes a single character of a
/// character column may occupy, which is reflected in the byte sizes
/// reported by column metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Single-byte character data (US-ASCII, ISO 8859 variants)
    SingleByte,
    /// Variable width UTF-8 encoded character data, up to 3 bytes per character
    Utf8,
}

impl Charset {
    /// Returns the maximum number of bytes a single character may occupy.
    pub fn max_char_width(&self) -> usize {
        match self {
            Charset::SingleByte => 1,
            Charset::Utf8 => 3,
        }
    }
}

/// Represents the engine environment.
///
/// While there can be multiple environments, most applications most likely
/// will need only one. As nothing can outlive its environment, when only one
/// is used it might be created in `main` and passed around, or created
/// statically:
///
/// ```
/// use pythia::{Environment, Result};
/// use once_cell::sync::OnceCell;
///
/// fn database() -> Result<&'static Environment> {
///     static ENV: OnceCell<Environment> = OnceCell::new();
///     ENV.get_or_try_init(||
///         pythia::env()
///     )
/// }
///
/// fn main() -> Result<()> {
///     let database = database()?;
///     // ...
///     Ok(())
/// }
/// ```
pub struct Environment {
    charset: Charset,
}

impl Environment {
    /// Creates a new environment with a single-byte character set.
    pub fn new() -> Result<Self> {
        Ok(Self { charset: Charset::SingleByte })
    }

    /// Creates a new environment with the specified character set.
    pub fn with_charset(charset: Charset) -> Result<Self> {
        Ok(Self { charset })
    }

    /// Returns the character set of this environment.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /**
        Starts a new session with a fresh, empty database.

        # Example
        ```
        let oracle = pythia::env()?;
        let conn = oracle.connect()?;
        conn.execute("CREATE TABLE notes (id NUMBER(9) NOT NULL, body VARCHAR2(200))")?;
        # Ok::<(),pythia::Error>(())
        ```
    */
    pub fn connect(&self) -> Result<Connection> {
        Connection::new(self)
    }
}
