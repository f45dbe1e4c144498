//! Shared test fixture: the TestStrings reference dataset and the
//! pkg_TestStringArrays package. The dataset is generated programmatically
//! and is immutable for the duration of a test; every test gets its own
//! session so tests cannot interfere with each other.

use once_cell::sync::OnceCell;
use pythia::{
    Connection, Environment, Package, ParamDef, ParamMode, Result, Routine, Row, Value,
};

pub const ROW_COUNT: i64 = 10;

pub fn database() -> &'static Environment {
    static ENV: OnceCell<Environment> = OnceCell::new();
    ENV.get_or_init(|| Environment::new().expect("engine environment"))
}

/// Starts a session with the TestStrings table, its reference rows, and
/// the pkg_TestStringArrays package in place.
pub fn connect() -> Result<Connection<'static>> {
    let conn = database().connect()?;
    setup(&conn)?;
    Ok(conn)
}

/// Creates and populates the reference schema on the given session.
pub fn setup(conn: &Connection) -> Result<()> {
    conn.execute(
        "
        CREATE TABLE TestStrings (
            IntCol        NUMBER(9) NOT NULL,
            StringCol     VARCHAR2(20) NOT NULL,
            RawCol        RAW(30) NOT NULL,
            FixedCharCol  CHAR(40) NOT NULL,
            NullableCol   VARCHAR2(50)
        )
    ",
    )?;
    let stmt = conn.prepare(
        "
        INSERT INTO TestStrings
        VALUES (:INT_COL, :STRING_COL, :RAW_COL, :FIXED_CHAR_COL, :NULLABLE_COL)
    ",
    )?;
    for i in 1..=ROW_COUNT {
        let nullable = if i % 2 == 1 {
            Some(format!("Nullable {}", i))
        } else {
            None
        };
        stmt.execute((
            ("INT_COL", i),
            ("STRING_COL", format!("String {}", i)),
            ("RAW_COL", format!("Raw {}", i).into_bytes()),
            ("FIXED_CHAR_COL", format!("Fixed Char {}", i)),
            ("NULLABLE_COL", nullable),
        ))?;
    }
    conn.register_package(string_arrays_package())?;
    Ok(())
}

/// The in-process rendition of the pkg_TestStringArrays package.
pub fn string_arrays_package() -> Package {
    Package::new("pkg_TestStringArrays")
        .routine(
            "TestInArrays",
            Routine::function(
                vec![
                    ParamDef::scalar("a_StartingValue", ParamMode::In),
                    ParamDef::array("a_Array", ParamMode::In),
                ],
                |slots| {
                    let start = slots[0].int()?;
                    let total: i64 = slots[1]
                        .array()?
                        .values()
                        .iter()
                        .map(|val| val.as_str().map(|txt| txt.chars().count() as i64).unwrap_or(0))
                        .sum();
                    Ok(Some(Value::Integer(start + total)))
                },
            ),
        )
        .routine(
            "TestInOutArrays",
            Routine::procedure(
                vec![
                    ParamDef::scalar("a_NumElems", ParamMode::In),
                    ParamDef::array("a_Array", ParamMode::InOut),
                ],
                |slots| {
                    let count = slots[0].int()? as usize;
                    let array = slots[1].array_mut()?;
                    for ix in 0..count {
                        let original_len = array
                            .get(ix)
                            .and_then(Value::as_str)
                            .map(|txt| txt.chars().count())
                            .unwrap_or(0);
                        array.set(
                            ix,
                            format!("Converted element # {} originally had length {}", ix + 1, original_len),
                        )?;
                    }
                    Ok(())
                },
            ),
        )
        .routine(
            "TestOutArrays",
            Routine::procedure(
                vec![
                    ParamDef::scalar("a_NumElems", ParamMode::In),
                    ParamDef::array("a_Array", ParamMode::Out),
                ],
                |slots| {
                    let count = slots[0].int()? as usize;
                    let array = slots[1].array_mut()?;
                    for ix in 0..count {
                        array.set(ix, format!("Test out element # {}", ix + 1))?;
                    }
                    Ok(())
                },
            ),
        )
}

pub type RowTuple = (i64, String, Vec<u8>, String, Option<String>);

/// The reference row keyed by `i`, with the fixed CHAR column blank padded
/// to its declared width of 40.
pub fn reference_row(i: i64) -> RowTuple {
    let mut fixed = format!("Fixed Char {}", i);
    while fixed.chars().count() < 40 {
        fixed.push(' ');
    }
    (
        i,
        format!("String {}", i),
        format!("Raw {}", i).into_bytes(),
        fixed,
        if i % 2 == 1 { Some(format!("Nullable {}", i)) } else { None },
    )
}

pub fn reference_data() -> Vec<RowTuple> {
    (1..=ROW_COUNT).map(reference_row).collect()
}

/// Extracts a fetched row into the reference tuple shape.
pub fn row_tuple(row: &Row) -> Result<RowTuple> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

/// Extracts a whole batch of fetched rows.
pub fn row_tuples(rows: &[Row]) -> Result<Vec<RowTuple>> {
    rows.iter().map(row_tuple).collect()
}
