//! Scalar string, raw, and rowid binding

mod common;

use pythia::{BindHint, Result, RowID, SqlType, Value};

#[test]
fn bind_string() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select * from TestStrings
        where StringCol = :value
    ",
    )?;
    let mut rows = stmt.query(("VALUE", "String 5"))?;
    let fetched = rows.fetch_all()?;
    assert_eq!(common::row_tuples(&fetched)?, vec![common::reference_row(5)]);
    Ok(())
}

#[test]
fn bind_string_for_each_row() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select * from TestStrings
        where StringCol = :value
    ",
    )?;
    for i in 1..=common::ROW_COUNT {
        let mut rows = stmt.query(("VALUE", format!("String {}", i)))?;
        let fetched = rows.fetch_all()?;
        assert_eq!(common::row_tuples(&fetched)?, vec![common::reference_row(i)]);
    }
    Ok(())
}

#[test]
fn bind_different_var_on_second_execution() -> Result<()> {
    let conn = common::connect()?;
    let retval_1 = conn.var(SqlType::Varchar, 30);
    let retval_2 = conn.var(SqlType::Varchar, 30);
    let stmt = conn.prepare("begin :retval := 'Called'; end;")?;
    stmt.execute(("RETVAL", &retval_1))?;
    assert_eq!(retval_1.value(), Value::Text("Called".into()));
    stmt.execute(("RETVAL", &retval_2))?;
    assert_eq!(retval_2.value(), Value::Text("Called".into()));
    // the first variable kept its value
    assert_eq!(retval_1.value(), Value::Text("Called".into()));
    Ok(())
}

#[test]
fn bind_string_after_number_hint() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select * from TestStrings
        where StringCol = :value
    ",
    )?;
    stmt.set_input_sizes(&[("VALUE", BindHint::Type(SqlType::Number))])?;
    let mut rows = stmt.query(("VALUE", "String 6"))?;
    let fetched = rows.fetch_all()?;
    assert_eq!(common::row_tuples(&fetched)?, vec![common::reference_row(6)]);
    Ok(())
}

#[test]
fn bind_raw() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select * from TestStrings
        where RawCol = :value
    ",
    )?;
    stmt.set_input_sizes(&[("VALUE", BindHint::Type(SqlType::Raw))])?;
    let mut rows = stmt.query(("VALUE", "Raw 4"))?;
    let fetched = rows.fetch_all()?;
    assert_eq!(common::row_tuples(&fetched)?, vec![common::reference_row(4)]);
    Ok(())
}

#[test]
fn bind_and_fetch_rowid() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select rowid
        from TestStrings
        where IntCol = 3
    ",
    )?;
    let mut rows = stmt.query(())?;
    let row = rows.next()?.expect("row keyed by 3");
    let rowid: RowID = row.get(0)?;

    let stmt = conn.prepare(
        "
        select *
        from TestStrings
        where rowid = :value
    ",
    )?;
    let mut rows = stmt.query(("VALUE", rowid))?;
    let fetched = rows.fetch_all()?;
    assert_eq!(common::row_tuples(&fetched)?, vec![common::reference_row(3)]);
    Ok(())
}

#[test]
fn bind_null() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select * from TestStrings
        where StringCol = :value
    ",
    )?;
    let mut rows = stmt.query(("VALUE", Option::<&str>::None))?;
    assert!(rows.fetch_all()?.is_empty());
    Ok(())
}

#[test]
fn bind_out_with_input_sizes_by_type() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        begin
          :value := 'TSI';
        end;
    ",
    )?;
    let vars = stmt.set_input_sizes(&[("VALUE", BindHint::Type(SqlType::Varchar))])?;
    stmt.execute(())?;
    assert_eq!(vars["VALUE"].value(), Value::Text("TSI".into()));
    Ok(())
}

#[test]
fn bind_out_with_input_sizes_by_integer() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        begin
          :value := 'TSI (I)';
        end;
    ",
    )?;
    let vars = stmt.set_input_sizes(&[("VALUE", BindHint::Size(30))])?;
    stmt.execute(())?;
    assert_eq!(vars["VALUE"].value(), Value::Text("TSI (I)".into()));
    Ok(())
}

#[test]
fn bind_in_out_with_input_sizes_by_type() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        begin
          :value := :value || ' TSI';
        end;
    ",
    )?;
    let vars = stmt.set_input_sizes(&[("VALUE", BindHint::Type(SqlType::Varchar))])?;
    stmt.execute(("VALUE", "InVal"))?;
    assert_eq!(vars["VALUE"].value(), Value::Text("InVal TSI".into()));
    Ok(())
}

#[test]
fn bind_in_out_with_input_sizes_by_integer() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        begin
          :value := :value || ' TSI (I)';
        end;
    ",
    )?;
    let vars = stmt.set_input_sizes(&[("VALUE", BindHint::Size(30))])?;
    stmt.execute(("VALUE", "InVal"))?;
    assert_eq!(vars["VALUE"].value(), Value::Text("InVal TSI (I)".into()));
    Ok(())
}

#[test]
fn bind_out_var() -> Result<()> {
    let conn = common::connect()?;
    let var = conn.var(SqlType::Varchar, 4000);
    let stmt = conn.prepare(
        "
        begin
          :value := 'TSI (VAR)';
        end;
    ",
    )?;
    stmt.execute(("VALUE", &var))?;
    assert!(!stmt.is_null("VALUE")?);
    assert_eq!(var.value(), Value::Text("TSI (VAR)".into()));
    Ok(())
}

#[test]
fn bind_in_out_var_direct_set() -> Result<()> {
    let conn = common::connect()?;
    let var = conn.var(SqlType::Varchar, 4000);
    var.set_value("InVal")?;
    let stmt = conn.prepare(
        "
        begin
          :value := :value || ' TSI (VAR)';
        end;
    ",
    )?;
    stmt.execute(("VALUE", &var))?;
    assert_eq!(var.value(), Value::Text("InVal TSI (VAR)".into()));
    Ok(())
}

#[test]
fn bind_long_string() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        declare
          t_Temp varchar2(10000);
        begin
          t_Temp := :bigString;
        end;
    ",
    )?;
    stmt.execute(("BIGSTRING", "X".repeat(10000)))?;
    Ok(())
}

#[test]
fn bind_long_string_after_setting_size() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        begin
          :test := :test;
        end;
    ",
    )?;
    let var = stmt.set_input_sizes(&[("TEST", BindHint::Size(90000))])?["TEST"].clone();
    let in_string = "1234567890".repeat(9000);
    var.set_value(in_string.as_str())?;
    stmt.execute(())?;
    let out_string = var.value();
    assert_eq!(
        out_string,
        Value::Text(in_string.clone()),
        "output does not match: in was {}",
        in_string.len()
    );
    Ok(())
}
