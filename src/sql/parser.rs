//! Recursive descent parser producing [`ast::Stmt`] plus the list of bind
//! placeholders in order of first appearance.

use super::{
    ast::{Block, BlockStmt, Call, Expr, LocalDecl, OrderBy, Select, SelectItem, Stmt},
    lexer::{tokenize, Token},
};
use crate::{
    catalog::ColumnDef,
    types::{SqlType, Value},
    Error, Result,
};

#[derive(Debug)]
pub(crate) struct Parsed {
    pub stmt: Stmt,
    /// Unique placeholder names, uppercase, in order of first appearance
    pub binds: Vec<String>,
}

pub(crate) fn parse(sql: &str) -> Result<Parsed> {
    let tokens = tokenize(sql)?;
    let mut parser = Parser { tokens, pos: 0, binds: Vec::new() };
    let stmt = parser.statement()?;
    parser.accept(&Token::Semicolon);
    if parser.pos < parser.tokens.len() {
        return Err(Error::server(933, "SQL command not properly ended"));
    }
    Ok(Parsed { stmt, binds: parser.binds })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    binds: Vec<String>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn accept(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, code: i32, msg: &str) -> Result<()> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(Error::server(code, msg))
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword))
    }

    fn accept_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str, code: i32) -> Result<()> {
        if self.accept_keyword(keyword) {
            Ok(())
        } else {
            Err(Error::server(code, format!("{} keyword expected", keyword.to_uppercase())))
        }
    }

    fn identifier(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            _ => Err(Error::server(904, "invalid identifier")),
        }
    }

    fn record_bind(&mut self, name: &str) -> String {
        let name = name.to_uppercase();
        if !self.binds.contains(&name) {
            self.binds.push(name.clone());
        }
        name
    }

    fn statement(&mut self) -> Result<Stmt> {
        if self.peek_keyword("create") {
            self.create_table()
        } else if self.peek_keyword("insert") {
            self.insert()
        } else if self.peek_keyword("select") {
            self.select().map(Stmt::Select)
        } else if self.peek_keyword("begin") || self.peek_keyword("declare") {
            self.block().map(Stmt::Block)
        } else {
            Err(Error::server(900, "invalid SQL statement"))
        }
    }

    fn create_table(&mut self) -> Result<Stmt> {
        self.expect_keyword("create", 900)?;
        self.expect_keyword("table", 901)?;
        let name = self.identifier()?.to_uppercase();
        self.expect(&Token::LParen, 906, "missing left parenthesis")?;
        let mut columns = Vec::new();
        loop {
            let col_name = self.identifier()?.to_uppercase();
            let (data_type, size, precision, scale) = self.data_type()?;
            let mut nullable = true;
            if self.accept_keyword("not") {
                self.expect_keyword("null", 907)?;
                nullable = false;
            }
            columns.push(ColumnDef { name: col_name, data_type, size, precision, scale, nullable });
            if !self.accept(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, 907, "missing right parenthesis")?;
        Ok(Stmt::CreateTable { name, columns })
    }

    fn data_type(&mut self) -> Result<(SqlType, usize, Option<u8>, Option<i8>)> {
        let type_name = self.identifier()?;
        if type_name.eq_ignore_ascii_case("number") {
            if self.accept(&Token::LParen) {
                let precision = self.unsigned()? as u8;
                let scale = if self.accept(&Token::Comma) { self.unsigned()? as i8 } else { 0 };
                self.expect(&Token::RParen, 907, "missing right parenthesis")?;
                Ok((SqlType::Number, 0, Some(precision), Some(scale)))
            } else {
                Ok((SqlType::Number, 0, None, None))
            }
        } else if type_name.eq_ignore_ascii_case("varchar2") || type_name.eq_ignore_ascii_case("varchar") {
            self.expect(&Token::LParen, 906, "missing left parenthesis")?;
            let size = self.unsigned()?;
            self.expect(&Token::RParen, 907, "missing right parenthesis")?;
            Ok((SqlType::Varchar, size, None, None))
        } else if type_name.eq_ignore_ascii_case("char") {
            let size = if self.accept(&Token::LParen) {
                let size = self.unsigned()?;
                self.expect(&Token::RParen, 907, "missing right parenthesis")?;
                size
            } else {
                1
            };
            Ok((SqlType::Char, size, None, None))
        } else if type_name.eq_ignore_ascii_case("raw") {
            self.expect(&Token::LParen, 906, "missing left parenthesis")?;
            let size = self.unsigned()?;
            self.expect(&Token::RParen, 907, "missing right parenthesis")?;
            Ok((SqlType::Raw, size, None, None))
        } else {
            Err(Error::server(902, "invalid datatype"))
        }
    }

    fn unsigned(&mut self) -> Result<usize> {
        match self.advance() {
            Some(Token::NumLit(num)) => num
                .parse::<usize>()
                .map_err(|_| Error::server(1722, "invalid number")),
            _ => Err(Error::server(1722, "invalid number")),
        }
    }

    fn insert(&mut self) -> Result<Stmt> {
        self.expect_keyword("insert", 900)?;
        self.expect_keyword("into", 928)?;
        let table = self.identifier()?.to_uppercase();
        let columns = if self.accept(&Token::LParen) {
            let mut names = Vec::new();
            loop {
                names.push(self.identifier()?.to_uppercase());
                if !self.accept(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RParen, 907, "missing right parenthesis")?;
            Some(names)
        } else {
            None
        };
        self.expect_keyword("values", 926)?;
        self.expect(&Token::LParen, 906, "missing left parenthesis")?;
        let mut values = Vec::new();
        loop {
            values.push(self.value_expr()?);
            if !self.accept(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, 907, "missing right parenthesis")?;
        Ok(Stmt::Insert { table, columns, values })
    }

    /// Literal or bind; the only value forms INSERT accepts.
    fn value_expr(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::StrLit(text)) => Ok(Expr::Literal(Value::Text(text))),
            Some(Token::NumLit(num)) => Ok(Expr::Literal(number_literal(&num)?)),
            Some(Token::Bind(name)) => {
                let name = self.record_bind(&name);
                Ok(Expr::Bind(name))
            }
            _ => Err(Error::server(936, "missing expression")),
        }
    }

    fn select(&mut self) -> Result<Select> {
        self.expect_keyword("select", 900)?;
        let mut items = Vec::new();
        if self.accept(&Token::Star) {
            items.push(SelectItem::Wildcard);
        } else {
            loop {
                let name = self.identifier()?;
                if name.eq_ignore_ascii_case("rowid") {
                    items.push(SelectItem::Rowid);
                } else {
                    items.push(SelectItem::Column(name.to_uppercase()));
                }
                if !self.accept(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect_keyword("from", 923)?;
        let table = self.identifier()?.to_uppercase();
        let filter = if self.accept_keyword("where") {
            Some(self.predicate()?)
        } else {
            None
        };
        let order_by = if self.accept_keyword("order") {
            self.expect_keyword("by", 924)?;
            let column = self.identifier()?.to_uppercase();
            let descending = if self.accept_keyword("desc") {
                true
            } else {
                self.accept_keyword("asc");
                false
            };
            Some(OrderBy { column, descending })
        } else {
            None
        };
        Ok(Select { items, table, filter, order_by })
    }

    fn predicate(&mut self) -> Result<Expr> {
        let mut left = self.condition()?;
        while self.accept_keyword("and") {
            let right = self.condition()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn condition(&mut self) -> Result<Expr> {
        let operand = self.sql_operand()?;
        if self.accept(&Token::Eq) {
            let rhs = self.sql_operand()?;
            Ok(Expr::Eq(Box::new(operand), Box::new(rhs)))
        } else if self.accept_keyword("in") {
            self.expect(&Token::LParen, 906, "missing left parenthesis")?;
            let mut list = Vec::new();
            loop {
                list.push(self.sql_operand()?);
                if !self.accept(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RParen, 907, "missing right parenthesis")?;
            Ok(Expr::In(Box::new(operand), list))
        } else {
            Err(Error::server(920, "invalid relational operator"))
        }
    }

    fn sql_operand(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::Ident(name)) if name.eq_ignore_ascii_case("rowid") => Ok(Expr::RowidRef),
            Some(Token::Ident(name)) => Ok(Expr::Column(name.to_uppercase())),
            Some(Token::StrLit(text)) => Ok(Expr::Literal(Value::Text(text))),
            Some(Token::NumLit(num)) => Ok(Expr::Literal(number_literal(&num)?)),
            Some(Token::Bind(name)) => {
                let name = self.record_bind(&name);
                Ok(Expr::Bind(name))
            }
            _ => Err(Error::server(936, "missing expression")),
        }
    }

    fn block(&mut self) -> Result<Block> {
        let mut locals = Vec::new();
        if self.accept_keyword("declare") {
            while !self.peek_keyword("begin") {
                let name = self.identifier()?.to_uppercase();
                let (_, size, _, _) = self.data_type()?;
                self.expect(&Token::Semicolon, 6550, "declaration not properly terminated")?;
                locals.push(LocalDecl { name, size });
            }
        }
        self.expect_keyword("begin", 6550)?;
        let mut body = Vec::new();
        while !self.accept_keyword("end") {
            body.push(self.block_statement(&locals)?);
        }
        Ok(Block { locals, body })
    }

    fn block_statement(&mut self, locals: &[LocalDecl]) -> Result<BlockStmt> {
        match self.advance() {
            Some(Token::Bind(name)) => {
                let name = self.record_bind(&name);
                self.expect(&Token::Assign, 6550, "assignment operator expected")?;
                let expr = self.block_expr(locals)?;
                self.expect(&Token::Semicolon, 6550, "statement not properly terminated")?;
                Ok(BlockStmt::AssignBind { name, expr })
            }
            Some(Token::Ident(name)) => {
                if self.accept(&Token::Dot) {
                    let routine = self.identifier()?;
                    let args = self.call_args(locals)?;
                    self.expect(&Token::Semicolon, 6550, "statement not properly terminated")?;
                    Ok(BlockStmt::CallProc(Call { package: name, routine, args }))
                } else if self.accept(&Token::Assign) {
                    let name = self.declared_local(locals, &name)?;
                    let expr = self.block_expr(locals)?;
                    self.expect(&Token::Semicolon, 6550, "statement not properly terminated")?;
                    Ok(BlockStmt::AssignLocal { name, expr })
                } else {
                    Err(Error::server(6550, format!("unexpected symbol '{}'", name)))
                }
            }
            _ => Err(Error::server(6550, "statement expected")),
        }
    }

    fn declared_local(&self, locals: &[LocalDecl], name: &str) -> Result<String> {
        let name = name.to_uppercase();
        if locals.iter().any(|decl| decl.name == name) {
            Ok(name)
        } else {
            Err(Error::server(6550, format!("identifier '{}' must be declared", name)))
        }
    }

    fn block_expr(&mut self, locals: &[LocalDecl]) -> Result<Expr> {
        let mut left = self.block_operand(locals)?;
        while self.accept(&Token::Concat) {
            let right = self.block_operand(locals)?;
            left = Expr::Concat(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn block_operand(&mut self, locals: &[LocalDecl]) -> Result<Expr> {
        match self.advance() {
            Some(Token::StrLit(text)) => Ok(Expr::Literal(Value::Text(text))),
            Some(Token::NumLit(num)) => Ok(Expr::Literal(number_literal(&num)?)),
            Some(Token::Bind(name)) => {
                let name = self.record_bind(&name);
                Ok(Expr::Bind(name))
            }
            Some(Token::Ident(name)) => {
                if self.accept(&Token::Dot) {
                    let routine = self.identifier()?;
                    let args = self.call_args(locals)?;
                    Ok(Expr::Call(Call { package: name, routine, args }))
                } else {
                    self.declared_local(locals, &name).map(Expr::Local)
                }
            }
            _ => Err(Error::server(6550, "expression expected")),
        }
    }

    fn call_args(&mut self, locals: &[LocalDecl]) -> Result<Vec<Expr>> {
        self.expect(&Token::LParen, 6550, "missing left parenthesis")?;
        let mut args = Vec::new();
        if self.accept(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.block_expr(locals)?);
            if !self.accept(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, 6550, "missing right parenthesis")?;
        Ok(args)
    }
}

fn number_literal(num: &str) -> Result<Value> {
    if num.contains('.') {
        num.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::server(1722, "invalid number"))
    } else {
        num.parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| Error::server(1722, "invalid number"))
    }
}
