//! Result retrieval and column metadata

mod common;

use pythia::{Charset, Environment, Result, SqlType};

#[test]
fn fetch_all_returns_every_row_then_nothing() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare("select * From TestStrings order by IntCol")?;
    let mut rows = stmt.query(())?;
    let fetched = rows.fetch_all()?;
    assert_eq!(common::row_tuples(&fetched)?, common::reference_data());
    assert!(rows.fetch_all()?.is_empty());
    assert_eq!(stmt.row_count()?, 10);
    Ok(())
}

#[test]
fn fetch_many_partitions_in_order() -> Result<()> {
    let conn = common::connect()?;
    let data = common::reference_data();
    let stmt = conn.prepare("select * From TestStrings order by IntCol")?;
    let mut rows = stmt.query(())?;
    assert_eq!(common::row_tuples(&rows.fetch_many(3)?)?, &data[0..3]);
    assert_eq!(common::row_tuples(&rows.fetch_many(2)?)?, &data[3..5]);
    assert_eq!(common::row_tuples(&rows.fetch_many(4)?)?, &data[5..9]);
    assert_eq!(common::row_tuples(&rows.fetch_many(3)?)?, &data[9..]);
    assert!(rows.fetch_many(3)?.is_empty());
    Ok(())
}

#[test]
fn fetch_one_reports_exhaustion_as_none() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select *
        from TestStrings
        where IntCol in (3, 4)
        order by IntCol
    ",
    )?;
    let mut rows = stmt.query(())?;
    let row = rows.fetch_one()?.expect("row keyed by 3");
    assert_eq!(common::row_tuple(&row)?, common::reference_row(3));
    let row = rows.fetch_one()?.expect("row keyed by 4");
    assert_eq!(common::row_tuple(&row)?, common::reference_row(4));
    assert!(rows.fetch_one()?.is_none());
    Ok(())
}

#[test]
fn explicit_order_survives_descending() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare("select IntCol from TestStrings order by IntCol desc")?;
    let mut rows = stmt.query(())?;
    let mut fetched = Vec::new();
    while let Some(row) = rows.next()? {
        let i: i64 = row.get(0)?;
        fetched.push(i);
    }
    assert_eq!(fetched, (1..=10).rev().collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn fixed_char_values_come_back_padded() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare(
        "
        select FixedCharCol
        from TestStrings
        where IntCol = 1
    ",
    )?;
    let mut rows = stmt.query(())?;
    let row = rows.next()?.expect("row keyed by 1");
    let fixed: &str = row.get(0)?;
    assert_eq!(fixed.len(), 40);
    assert_eq!(fixed, format!("{:<40}", "Fixed Char 1"));
    Ok(())
}

#[test]
fn column_metadata_is_accurate() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare("select * from TestStrings")?;
    let mut _rows = stmt.query(())?;
    assert_eq!(stmt.column_count()?, 5);

    let col = stmt.column(0).expect("IntCol metadata");
    assert_eq!(col.name(), "INTCOL");
    assert_eq!(col.data_type(), SqlType::Number);
    assert_eq!(col.display_size(), Some(10));
    assert_eq!(col.byte_size(), None);
    assert_eq!(col.precision(), Some(9));
    assert_eq!(col.scale(), Some(0));
    assert!(!col.is_nullable());

    let col = stmt.column(1).expect("StringCol metadata");
    assert_eq!(col.name(), "STRINGCOL");
    assert_eq!(col.data_type(), SqlType::Varchar);
    assert_eq!(col.display_size(), Some(20));
    assert_eq!(col.byte_size(), Some(20));
    assert_eq!(col.precision(), None);
    assert_eq!(col.scale(), None);
    assert!(!col.is_nullable());

    let col = stmt.column(2).expect("RawCol metadata");
    assert_eq!(col.name(), "RAWCOL");
    assert_eq!(col.data_type(), SqlType::Raw);
    assert_eq!(col.display_size(), Some(30));
    assert_eq!(col.byte_size(), Some(30));
    assert!(!col.is_nullable());

    let col = stmt.column(3).expect("FixedCharCol metadata");
    assert_eq!(col.name(), "FIXEDCHARCOL");
    assert_eq!(col.data_type(), SqlType::Char);
    assert_eq!(col.display_size(), Some(40));
    assert_eq!(col.byte_size(), Some(40));
    assert!(!col.is_nullable());

    let col = stmt.column(4).expect("NullableCol metadata");
    assert_eq!(col.name(), "NULLABLECOL");
    assert_eq!(col.data_type(), SqlType::Varchar);
    assert_eq!(col.display_size(), Some(50));
    assert_eq!(col.byte_size(), Some(50));
    assert!(col.is_nullable());

    assert!(stmt.column(5).is_none());
    Ok(())
}

#[test]
fn character_sizes_scale_with_the_charset() -> Result<()> {
    let env = Environment::with_charset(Charset::Utf8)?;
    let ratio = env.charset().max_char_width();
    let conn = env.connect()?;
    common::setup(&conn)?;
    let stmt = conn.prepare("select * from TestStrings")?;
    let mut _rows = stmt.query(())?;

    let col = stmt.column(3).expect("FixedCharCol metadata");
    assert_eq!(col.display_size(), Some(40));
    assert_eq!(col.byte_size(), Some(40 * ratio));

    let col = stmt.column(1).expect("StringCol metadata");
    assert_eq!(col.byte_size(), Some(20 * ratio));

    // binary and numeric sizes do not scale
    let col = stmt.column(2).expect("RawCol metadata");
    assert_eq!(col.byte_size(), Some(30));
    let col = stmt.column(0).expect("IntCol metadata");
    assert_eq!(col.byte_size(), None);
    Ok(())
}

#[test]
fn rowid_projection_metadata() -> Result<()> {
    let conn = common::connect()?;
    let stmt = conn.prepare("select rowid, IntCol from TestStrings where IntCol = 1")?;
    let mut rows = stmt.query(())?;
    let row = rows.next()?.expect("row keyed by 1");
    let col = stmt.column(0).expect("rowid metadata");
    assert_eq!(col.name(), "ROWID");
    assert_eq!(col.data_type(), SqlType::Rowid);
    assert_eq!(col.display_size(), Some(18));
    assert_eq!(row.rowid()?.to_string().len(), 18);
    Ok(())
}
