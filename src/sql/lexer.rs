//! Hand rolled tokenizer for the supported SQL dialect

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Unquoted identifier or keyword, kept as written
    Ident(String),
    /// `:name` or `:1` bind placeholder, name kept as written
    Bind(String),
    /// `'...'` string literal with `''` escapes resolved
    StrLit(String),
    /// Unsigned numeric literal
    NumLit(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Star,
    Eq,
    Concat,
    Assign,
    Dot,
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || ch == '#'
}

pub(crate) fn tokenize(sql: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = sql.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            _ if ch.is_whitespace() => {
                chars.next();
            }
            '-' => {
                chars.next();
                if chars.peek() == Some(&'-') {
                    // line comment
                    for next in chars.by_ref() {
                        if next == '\n' {
                            break;
                        }
                    }
                } else {
                    return Err(unexpected(ch));
                }
            }
            '(' => { chars.next(); tokens.push(Token::LParen); }
            ')' => { chars.next(); tokens.push(Token::RParen); }
            ',' => { chars.next(); tokens.push(Token::Comma); }
            ';' => { chars.next(); tokens.push(Token::Semicolon); }
            '*' => { chars.next(); tokens.push(Token::Star); }
            '=' => { chars.next(); tokens.push(Token::Eq); }
            '.' => { chars.next(); tokens.push(Token::Dot); }
            '|' => {
                chars.next();
                if chars.next() == Some('|') {
                    tokens.push(Token::Concat);
                } else {
                    return Err(unexpected(ch));
                }
            }
            ':' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Assign);
                } else {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if is_ident_part(next) {
                            name.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return Err(Error::server(1036, "illegal variable name"));
                    }
                    tokens.push(Token::Bind(name));
                }
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                text.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some(next) => text.push(next),
                        None => return Err(Error::server(1756, "quoted string not properly terminated")),
                    }
                }
                tokens.push(Token::StrLit(text));
            }
            _ if ch.is_ascii_digit() => {
                let mut num = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        num.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::NumLit(num));
            }
            _ if is_ident_start(ch) => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if is_ident_part(next) {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            _ => return Err(unexpected(ch)),
        }
    }
    Ok(tokens)
}

fn unexpected(ch: char) -> Error {
    Error::server(911, format!("invalid character '{}'", ch))
}
