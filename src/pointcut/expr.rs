//! Composed pointcut predicates.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::pointcut::error::PointcutError;
use crate::pointcut::glob::{simple_match, Glob};
use crate::pointcut::parser::Parser;
use crate::pointcut::pattern::{ExecutionPattern, TypePattern};
use crate::proxy::target::{simple_name, JoinPoint};

/// A compiled predicate deciding whether advice applies at a join point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pointcut {
    /// `execution(...)`: return type, declaring type, method name and parameters.
    Execution(ExecutionPattern),
    /// `within(...)`: declaring type only.
    Within(TypePattern),
    /// `bean(...)`: the registration's bean name.
    Bean(Glob),
    /// `@annotation(...)`: a tag on the method registration.
    Annotation(String),
    /// Method name filter; any glob matching wins.
    MethodNames(Vec<Glob>),
    /// A resolved reference to a named pointcut.
    Named(String, Box<Pointcut>),
    And(Box<Pointcut>, Box<Pointcut>),
    Or(Box<Pointcut>, Box<Pointcut>),
    Not(Box<Pointcut>),
}

impl Pointcut {
    /// Parse an expression without named references.
    pub fn parse(expr: &str) -> Result<Self, PointcutError> {
        Parser::new(expr, None).parse()
    }

    /// Parse an expression that may reference pointcuts defined in `named`.
    pub fn parse_with(expr: &str, named: &NamedPointcuts) -> Result<Self, PointcutError> {
        Parser::new(expr, Some(named)).parse()
    }

    pub fn execution(pattern: &str) -> Result<Self, PointcutError> {
        ExecutionPattern::parse(pattern).map(Pointcut::Execution)
    }

    pub fn within(pattern: &str) -> Result<Self, PointcutError> {
        TypePattern::parse(pattern).map(Pointcut::Within)
    }

    pub fn bean(pattern: &str) -> Result<Self, PointcutError> {
        Glob::new(pattern.trim()).map(Pointcut::Bean)
    }

    pub fn annotation(tag: &str) -> Result<Self, PointcutError> {
        let tag = tag.trim();
        if tag.is_empty() || tag.contains(char::is_whitespace) {
            return Err(PointcutError::invalid(tag, "annotation name must be a single identifier"));
        }
        Ok(Pointcut::Annotation(simple_name(tag).to_string()))
    }

    /// The pattern-filtered strategy: advise methods whose name matches any glob.
    pub fn method_names<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PointcutError> {
        if patterns.is_empty() {
            return Err(PointcutError::invalid("", "at least one method name pattern is required"));
        }
        patterns
            .iter()
            .map(|p| Glob::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Pointcut::MethodNames)
    }

    pub fn and(self, other: Pointcut) -> Self {
        Pointcut::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Pointcut) -> Self {
        Pointcut::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Pointcut::Not(Box::new(self))
    }

    /// Evaluate against one join point. `&&` and `||` short-circuit.
    pub fn matches(&self, jp: &JoinPoint<'_>) -> bool {
        match self {
            Pointcut::Execution(p) => p.matches(jp.target_type(), jp.method()),
            Pointcut::Within(p) => p.matches(jp.target_type()),
            Pointcut::Bean(g) => g.matches(jp.bean_name()),
            Pointcut::Annotation(tag) => jp.method().has_tag(tag),
            Pointcut::MethodNames(globs) => simple_match(globs, jp.method().name()),
            Pointcut::Named(_, inner) => inner.matches(jp),
            Pointcut::And(a, b) => a.matches(jp) && b.matches(jp),
            Pointcut::Or(a, b) => a.matches(jp) || b.matches(jp),
            Pointcut::Not(inner) => !inner.matches(jp),
        }
    }
}

impl std::ops::Not for Pointcut {
    type Output = Pointcut;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl FromStr for Pointcut {
    type Err = PointcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pointcut::parse(s)
    }
}

impl fmt::Display for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointcut::Execution(p) => write!(f, "execution({})", p),
            Pointcut::Within(p) => write!(f, "within({})", p),
            Pointcut::Bean(g) => write!(f, "bean({})", g),
            Pointcut::Annotation(tag) => write!(f, "@annotation({})", tag),
            Pointcut::MethodNames(globs) => {
                let names: Vec<&str> = globs.iter().map(Glob::as_str).collect();
                write!(f, "names({})", names.join(", "))
            }
            Pointcut::Named(name, _) => write!(f, "{}()", name),
            Pointcut::And(a, b) => write!(f, "({} && {})", a, b),
            Pointcut::Or(a, b) => write!(f, "({} || {})", a, b),
            Pointcut::Not(inner) => write!(f, "!{}", inner),
        }
    }
}

/// Named pointcuts that later expressions may reference as `name()`.
#[derive(Debug, Clone, Default)]
pub struct NamedPointcuts {
    entries: HashMap<String, Pointcut>,
}

impl NamedPointcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `expr` (which may reference earlier definitions) and store it.
    pub fn define(&mut self, name: &str, expr: &str) -> Result<&Pointcut, PointcutError> {
        let pointcut = Pointcut::parse_with(expr, self)?;
        Ok(self.insert(name, pointcut))
    }

    pub fn insert(&mut self, name: &str, pointcut: Pointcut) -> &Pointcut {
        self.entries.remove(name);
        self.entries.entry(name.to_string()).or_insert(pointcut)
    }

    /// Look up by full name, then by the last segment of a dotted reference
    /// such as `hello.aop.order.aop.Pointcuts.allOrder`.
    pub fn get(&self, name: &str) -> Option<&Pointcut> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(simple_name(name)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
