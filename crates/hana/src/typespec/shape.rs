// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared property shapes.
//!
//! A shape is what a schema author writes for a property, e.g.
//! `Map<String, Wrapped<Integer>>`. [`TypeSpec::create`](super::TypeSpec::create)
//! turns it into a type spec and rejects unsupported compositions.

use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Terminal kind or schema type name.
    Named(String),
    Wrapped(Box<Shape>),
    Optional(Box<Shape>),
    List(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Variable(Box<Shape>),
}

impl Shape {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn wrapped(inner: Shape) -> Self {
        Self::Wrapped(Box::new(inner))
    }

    pub fn optional(inner: Shape) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn list(inner: Shape) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn variable(inner: Shape) -> Self {
        Self::Variable(Box::new(inner))
    }

    /// Parse `Name` or `Generic<Arg, ...>` notation.
    pub fn parse(text: &str) -> Result<Shape> {
        let mut parser = Parser {
            text,
            tokens: tokenize(text)?,
            pos: 0,
        };
        let shape = parser.shape()?;
        if parser.pos != parser.tokens.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(shape)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Wrapped(inner) => write!(f, "Wrapped<{}>", inner),
            Self::Optional(inner) => write!(f, "Optional<{}>", inner),
            Self::List(inner) => write!(f, "List<{}>", inner),
            Self::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            Self::Variable(inner) => write!(f, "Variable<{}>", inner),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '<' => tokens.push(Token::Open),
            '>' => tokens.push(Token::Close),
            ',' => tokens.push(Token::Comma),
            c if c.is_whitespace() => {}
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '.' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(text[start..end].to_string()));
            }
            other => {
                return Err(Error::InvalidShape(format!(
                    "unexpected '{}' in '{}'",
                    other, text
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, what: &str) -> Error {
        Error::InvalidShape(format!("{} in '{}'", what, self.text))
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        match self.next() {
            Some(t) if t == token => Ok(()),
            _ => Err(self.error(&format!("expected {:?}", token))),
        }
    }

    fn shape(&mut self) -> Result<Shape> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            _ => return Err(self.error("expected a type name")),
        };
        if self.tokens.get(self.pos) != Some(&Token::Open) {
            return Ok(Shape::Named(name));
        }

        self.pos += 1;
        let mut args = vec![self.shape()?];
        while self.tokens.get(self.pos) == Some(&Token::Comma) {
            self.pos += 1;
            args.push(self.shape()?);
        }
        self.expect(Token::Close)?;

        let mut args = args.into_iter();
        match (name.as_str(), args.next(), args.next(), args.next()) {
            ("Wrapped", Some(inner), None, _) => Ok(Shape::wrapped(inner)),
            ("Optional", Some(inner), None, _) => Ok(Shape::optional(inner)),
            ("List", Some(inner), None, _) => Ok(Shape::list(inner)),
            ("Variable", Some(inner), None, _) => Ok(Shape::variable(inner)),
            ("Map", Some(key), Some(value), None) => Ok(Shape::map(key, value)),
            ("Wrapped" | "Optional" | "List" | "Variable", ..) => {
                Err(self.error(&format!("'{}' takes one argument", name)))
            }
            ("Map", ..) => Err(self.error("'Map' takes two arguments")),
            _ => Err(self.error(&format!("'{}' is not generic", name))),
        }
    }
}
