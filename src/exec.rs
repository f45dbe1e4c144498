//! Tree-walking statement executor

use crate::{
    catalog::{ColumnDef, StoredRow, Table},
    conn::Database,
    package::{ParamKind, ParamMode, ParamSlot},
    sql::ast::{Block, BlockStmt, Call, Expr, Select, SelectItem, Stmt},
    stmt::bind::Params,
    stmt::rows::FetchedRow,
    types::Value,
    Error, Result,
};
use std::collections::HashMap;

pub(crate) enum Outcome {
    /// Rows affected by a non-query statement
    Affected(usize),
    /// Projected metadata and rows of a query
    ResultSet { columns: Vec<ColumnDef>, rows: Vec<FetchedRow> },
}

pub(crate) fn execute(db: &mut Database, stmt: &Stmt, params: &mut Params) -> Result<Outcome> {
    match stmt {
        Stmt::CreateTable { name, columns } => {
            db.catalog.create_table(name, columns.clone())?;
            tracing::debug!(table = %name, "created table");
            Ok(Outcome::Affected(0))
        }
        Stmt::Insert { table, columns, values } => {
            let row = insert_row(db, table, columns.as_deref(), values, params)?;
            Ok(Outcome::Affected(row))
        }
        Stmt::Select(select) => run_select(db, select, params),
        Stmt::Block(block) => {
            run_block(db, block, params)?;
            Ok(Outcome::Affected(1))
        }
    }
}

fn insert_row(
    db: &mut Database,
    table: &str,
    columns: Option<&[String]>,
    values: &[Expr],
    params: &Params,
) -> Result<usize> {
    let mut evaluated = Vec::with_capacity(values.len());
    for expr in values {
        evaluated.push(eval_value_expr(expr, params)?);
    }
    let table = db.catalog.table_mut(table)?;
    let row = match columns {
        None => evaluated,
        Some(names) => {
            if evaluated.len() > names.len() {
                return Err(Error::server(913, "too many values"));
            }
            if evaluated.len() < names.len() {
                return Err(Error::server(947, "not enough values"));
            }
            let mut row = vec![Value::Null; table.columns.len()];
            for (name, value) in names.iter().zip(evaluated) {
                let ix = table
                    .column_index(name)
                    .ok_or_else(|| invalid_identifier(name))?;
                row[ix] = value;
            }
            row
        }
    };
    table.insert(row)?;
    Ok(1)
}

fn eval_value_expr(expr: &Expr, params: &Params) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Bind(name) => params.value(name),
        _ => Err(Error::server(984, "column not allowed here")),
    }
}

enum Proj {
    Col(usize),
    Rowid,
}

fn run_select(db: &Database, select: &Select, params: &Params) -> Result<Outcome> {
    let table = db.catalog.table(&select.table)?;

    let mut columns = Vec::new();
    let mut plan = Vec::new();
    for item in &select.items {
        match item {
            SelectItem::Wildcard => {
                for (ix, col) in table.columns.iter().enumerate() {
                    columns.push(col.clone());
                    plan.push(Proj::Col(ix));
                }
            }
            SelectItem::Column(name) => {
                let ix = table
                    .column_index(name)
                    .ok_or_else(|| invalid_identifier(name))?;
                columns.push(table.columns[ix].clone());
                plan.push(Proj::Col(ix));
            }
            SelectItem::Rowid => {
                columns.push(ColumnDef::rowid_pseudo());
                plan.push(Proj::Rowid);
            }
        }
    }

    let mut matched: Vec<&StoredRow> = Vec::new();
    for row in &table.rows {
        let keep = match &select.filter {
            Some(filter) => eval_predicate(filter, table, row, params)?,
            None => true,
        };
        if keep {
            matched.push(row);
        }
    }

    if let Some(order) = &select.order_by {
        let ix = table
            .column_index(&order.column)
            .ok_or_else(|| invalid_identifier(&order.column))?;
        matched.sort_by(|a, b| {
            let ord = a.values[ix].sql_cmp(&b.values[ix]);
            if order.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    let rows: Vec<FetchedRow> = matched
        .into_iter()
        .map(|row| FetchedRow {
            rowid: row.rowid,
            values: plan
                .iter()
                .map(|proj| match proj {
                    Proj::Col(ix) => row.values[*ix].clone(),
                    Proj::Rowid => Value::Rowid(row.rowid),
                })
                .collect(),
        })
        .collect();

    tracing::trace!(table = %table.name, rows = rows.len(), "select");
    Ok(Outcome::ResultSet { columns, rows })
}

fn eval_predicate(expr: &Expr, table: &Table, row: &StoredRow, params: &Params) -> Result<bool> {
    match expr {
        Expr::Eq(lhs, rhs) => {
            let left = eval_operand(lhs, table, row, params)?;
            let right = eval_operand(rhs, table, row, params)?;
            Ok(values_equal(&left, &right, is_blank_padded(lhs, table) || is_blank_padded(rhs, table)))
        }
        Expr::In(lhs, list) => {
            let left = eval_operand(lhs, table, row, params)?;
            let blank_padded = is_blank_padded(lhs, table);
            for item in list {
                let right = eval_operand(item, table, row, params)?;
                if values_equal(&left, &right, blank_padded) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expr::And(lhs, rhs) => {
            Ok(eval_predicate(lhs, table, row, params)? && eval_predicate(rhs, table, row, params)?)
        }
        _ => Err(Error::server(920, "invalid relational operator")),
    }
}

/// CHAR columns compare with blank-padded semantics: trailing spaces are
/// not significant when either side of the comparison is a CHAR column.
fn is_blank_padded(expr: &Expr, table: &Table) -> bool {
    match expr {
        Expr::Column(name) => table
            .column_index(name)
            .map(|ix| table.columns[ix].data_type == crate::types::SqlType::Char)
            .unwrap_or(false),
        _ => false,
    }
}

fn values_equal(left: &Value, right: &Value, blank_padded: bool) -> bool {
    if blank_padded {
        if let (Value::Text(a), Value::Text(b)) = (left, right) {
            return a.trim_end_matches(' ') == b.trim_end_matches(' ');
        }
    }
    left.sql_eq(right)
}

fn eval_operand(expr: &Expr, table: &Table, row: &StoredRow, params: &Params) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Bind(name) => params.value(name),
        Expr::Column(name) => {
            let ix = table
                .column_index(name)
                .ok_or_else(|| invalid_identifier(name))?;
            Ok(row.values[ix].clone())
        }
        Expr::RowidRef => Ok(Value::Rowid(row.rowid)),
        _ => Err(Error::server(936, "missing expression")),
    }
}

struct LocalSlot {
    size: usize,
    value: Value,
}

fn run_block(db: &Database, block: &Block, params: &mut Params) -> Result<()> {
    let mut locals: HashMap<String, LocalSlot> = block
        .locals
        .iter()
        .map(|decl| (decl.name.clone(), LocalSlot { size: decl.size, value: Value::Null }))
        .collect();
    for stmt in &block.body {
        match stmt {
            BlockStmt::AssignBind { name, expr } => {
                let value = eval_block_expr(db, expr, &locals, params)?;
                params.write(name, value)?;
            }
            BlockStmt::AssignLocal { name, expr } => {
                let value = eval_block_expr(db, expr, &locals, params)?;
                let slot = locals
                    .get_mut(name)
                    .ok_or_else(|| Error::server(6550, format!("identifier '{}' must be declared", name)))?;
                if slot.size > 0 {
                    if let Value::Text(txt) = &value {
                        if txt.chars().count() > slot.size {
                            return Err(Error::server(6502, "character string buffer too small"));
                        }
                    }
                }
                slot.value = value;
            }
            BlockStmt::CallProc(call) => {
                call_routine(db, call, &locals, params, false)?;
            }
        }
    }
    Ok(())
}

fn eval_block_expr(
    db: &Database,
    expr: &Expr,
    locals: &HashMap<String, LocalSlot>,
    params: &mut Params,
) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Bind(name) => params.value(name),
        Expr::Local(name) => locals
            .get(name)
            .map(|slot| slot.value.clone())
            .ok_or_else(|| Error::server(6550, format!("identifier '{}' must be declared", name))),
        Expr::Concat(lhs, rhs) => {
            let left = eval_block_expr(db, lhs, locals, params)?;
            let right = eval_block_expr(db, rhs, locals, params)?;
            Ok(Value::Text(concat_text(&left)? + &concat_text(&right)?))
        }
        Expr::Call(call) => {
            let result = call_routine(db, call, locals, params, true)?;
            Ok(result.unwrap_or(Value::Null))
        }
        _ => Err(Error::server(6550, "expression expected")),
    }
}

/// Concatenation treats NULL as an empty string, the way `||` does.
fn concat_text(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Text(txt) => Ok(txt.clone()),
        Value::Integer(num) => Ok(num.to_string()),
        Value::Float(num) => Ok(num.to_string()),
        _ => Err(Error::server(932, "inconsistent datatypes")),
    }
}

fn call_routine(
    db: &Database,
    call: &Call,
    locals: &HashMap<String, LocalSlot>,
    params: &mut Params,
    as_function: bool,
) -> Result<Option<Value>> {
    let package = db
        .packages
        .get(&call.package.to_uppercase())
        .ok_or_else(|| Error::server(6550, format!("identifier '{}' must be declared", call.package.to_uppercase())))?;
    let routine = package.find(&call.routine).ok_or_else(|| {
        Error::server(
            6550,
            format!("component '{}' must be declared", call.routine.to_uppercase()),
        )
    })?;
    if as_function && !routine.is_function() {
        return Err(Error::server(6550, format!("'{}' is not a function", call.routine.to_uppercase())));
    }
    if !as_function && routine.is_function() {
        return Err(Error::server(6550, format!("'{}' is not a procedure", call.routine.to_uppercase())));
    }
    if call.args.len() != routine.params().len() {
        return Err(Error::server(
            6550,
            format!("wrong number or types of arguments in call to '{}'", call.routine.to_uppercase()),
        ));
    }

    let mut slots = Vec::with_capacity(call.args.len());
    let mut writeback: HashMap<usize, String> = HashMap::new();
    for (def, arg) in routine.params().iter().zip(&call.args) {
        match def.kind() {
            ParamKind::Scalar => match def.mode() {
                ParamMode::In => {
                    let value = eval_block_expr(db, arg, locals, params)?;
                    slots.push(ParamSlot::Scalar(value));
                }
                mode => {
                    let name = bind_arg_name(arg, def.name())?;
                    let value = if mode == ParamMode::InOut {
                        params.value(&name)?
                    } else {
                        Value::Null
                    };
                    writeback.insert(slots.len(), name);
                    slots.push(ParamSlot::Scalar(value));
                }
            },
            ParamKind::Array => {
                let name = bind_arg_name(arg, def.name())?;
                let array = params.take_array(&name, def.mode() == ParamMode::Out)?;
                if def.mode() != ParamMode::In {
                    writeback.insert(slots.len(), name);
                }
                slots.push(ParamSlot::Array(array));
            }
        }
    }

    let result = routine.invoke(&mut slots)?;

    for (ix, slot) in slots.into_iter().enumerate() {
        if let Some(name) = writeback.remove(&ix) {
            match slot {
                ParamSlot::Scalar(value) => params.write(&name, value)?,
                ParamSlot::Array(array) => params.restore_array(&name, array)?,
            }
        }
    }
    Ok(result)
}

fn bind_arg_name(arg: &Expr, param: &str) -> Result<String> {
    match arg {
        Expr::Bind(name) => Ok(name.clone()),
        _ => Err(Error::server(
            6550,
            format!("argument for parameter '{}' must be a bind variable", param),
        )),
    }
}

fn invalid_identifier(name: &str) -> Error {
    Error::server(904, format!("\"{}\": invalid identifier", name))
}
