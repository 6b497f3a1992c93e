//! Recursive-descent parser for pointcut expressions.
//!
//! ```text
//! expr    := and ("||" and)*
//! and     := unary ("&&" unary)*
//! unary   := "!" unary | primary
//! primary := "(" expr ")" | designator "(" args ")" | reference "(" ")"
//! ```
//!
//! `names(a, b*)` takes a comma-separated list of method name globs.

use crate::pointcut::error::PointcutError;
use crate::pointcut::expr::{NamedPointcuts, Pointcut};

pub(crate) struct Parser<'s> {
    src: &'s str,
    pos: usize,
    named: Option<&'s NamedPointcuts>,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(src: &'s str, named: Option<&'s NamedPointcuts>) -> Self {
        Self { src, pos: 0, named }
    }

    pub(crate) fn parse(mut self) -> Result<Pointcut, PointcutError> {
        self.skip_ws();
        if self.at_end() {
            return Err(PointcutError::Empty);
        }
        let pointcut = self.parse_or()?;
        self.skip_ws();
        match self.peek() {
            None => Ok(pointcut),
            Some(found) => Err(PointcutError::UnexpectedChar {
                found,
                position: self.pos,
            }),
        }
    }

    fn parse_or(&mut self) -> Result<Pointcut, PointcutError> {
        let mut left = self.parse_and()?;
        loop {
            self.skip_ws();
            if !self.eat("||") {
                return Ok(left);
            }
            left = left.or(self.parse_and()?);
        }
    }

    fn parse_and(&mut self) -> Result<Pointcut, PointcutError> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_ws();
            if !self.eat("&&") {
                return Ok(left);
            }
            left = left.and(self.parse_unary()?);
        }
    }

    fn parse_unary(&mut self) -> Result<Pointcut, PointcutError> {
        self.skip_ws();
        if self.eat("!") {
            return Ok(self.parse_unary()?.negate());
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Pointcut, PointcutError> {
        self.skip_ws();
        let open_at = self.pos;
        if self.eat("(") {
            let inner = self.parse_or()?;
            self.skip_ws();
            if !self.eat(")") {
                return Err(match self.peek() {
                    None => PointcutError::Unbalanced { position: open_at },
                    Some(found) => PointcutError::UnexpectedChar {
                        found,
                        position: self.pos,
                    },
                });
            }
            return Ok(inner);
        }

        let name = self.read_name()?;
        self.skip_ws();
        if !self.eat("(") {
            return Err(match self.peek() {
                None => PointcutError::UnexpectedEnd { expected: "'('" },
                Some(found) => PointcutError::UnexpectedChar {
                    found,
                    position: self.pos,
                },
            });
        }
        let args = self.read_balanced(self.pos - 1)?;

        match name {
            "execution" => Pointcut::execution(args),
            "within" => Pointcut::within(args),
            "bean" => Pointcut::bean(args),
            "@annotation" | "annotation" => Pointcut::annotation(args),
            "names" => Pointcut::method_names(&args.split(',').map(str::trim).collect::<Vec<_>>()),
            _ if name.starts_with('@') => Err(PointcutError::UnknownDesignator(name.to_string())),
            _ if !args.trim().is_empty() => Err(PointcutError::UnknownDesignator(name.to_string())),
            _ => self.resolve(name),
        }
    }

    fn resolve(&self, name: &str) -> Result<Pointcut, PointcutError> {
        self.named
            .and_then(|named| named.get(name))
            .map(|p| Pointcut::Named(name.to_string(), Box::new(p.clone())))
            .ok_or_else(|| PointcutError::UnknownReference(name.to_string()))
    }

    /// Designator or dotted reference name.
    fn read_name(&mut self) -> Result<&'s str, PointcutError> {
        let start = self.pos;
        let len = self.src[start..]
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '@')))
            .map(|(i, _)| i)
            .unwrap_or(self.src.len() - start);
        if len == 0 {
            return Err(match self.peek() {
                None => PointcutError::UnexpectedEnd {
                    expected: "a pointcut designator",
                },
                Some(found) => PointcutError::UnexpectedChar {
                    found,
                    position: start,
                },
            });
        }
        self.pos += len;
        Ok(&self.src[start..start + len])
    }

    /// Everything up to the `)` matching the `(` at `open_at`; consumes the `)`.
    fn read_balanced(&mut self, open_at: usize) -> Result<&'s str, PointcutError> {
        let start = self.pos;
        let mut depth = 1usize;
        for (i, c) in self.src[start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = start + i + 1;
                        return Ok(&self.src[start..start + i]);
                    }
                }
                _ => {}
            }
        }
        Err(PointcutError::Unbalanced { position: open_at })
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.src[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }
}
