//! Type, parameter and method-execution patterns.
//!
//! # Grammar
//! ```text
//! type      := pkg ".." glob          this package or any sub-package
//!            | pkg "." glob           exactly this package
//!            | glob                   any package
//! execution := [modifier] [retGlob] (type "." | pkg "..")? methodGlob "(" params ")"
//! params    := ".." | "" | item ("," item)* ["," ".."]
//! ```
//! Package segments are globs themselves, so `hello.*.order` is valid.

use std::fmt;

use crate::pointcut::error::PointcutError;
use crate::pointcut::glob::Glob;
use crate::proxy::target::{simple_name, MethodSignature, TargetType};

const MODIFIERS: &[&str] = &["public", "protected", "private", "static", "final"];

/// Which packages a type pattern accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagePattern {
    Any,
    Exact(Vec<Glob>),
    /// The package itself or any sub-package.
    Tree(Vec<Glob>),
}

impl PackagePattern {
    fn parse(text: &str, whole: &str) -> Result<Vec<Glob>, PointcutError> {
        text.split('.')
            .map(|segment| {
                if segment.is_empty() {
                    Err(PointcutError::invalid(whole, "empty package segment"))
                } else {
                    Glob::new(segment)
                }
            })
            .collect()
    }

    pub fn matches<'s>(&self, mut segments: impl Iterator<Item = &'s str>) -> bool {
        match self {
            PackagePattern::Any => true,
            PackagePattern::Exact(globs) => {
                globs.iter().all(|g| segments.next().is_some_and(|s| g.matches(s))) && segments.next().is_none()
            }
            PackagePattern::Tree(globs) => globs.iter().all(|g| segments.next().is_some_and(|s| g.matches(s))),
        }
    }
}

/// Matches a declaring type by package and simple name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePattern {
    source: String,
    package: PackagePattern,
    name: Glob,
}

impl TypePattern {
    pub fn parse(text: &str) -> Result<Self, PointcutError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PointcutError::invalid(text, "empty type pattern"));
        }

        let (package, name) = if let Some(idx) = text.rfind("..") {
            let name = &text[idx + 2..];
            if name.is_empty() || name.contains('.') {
                return Err(PointcutError::invalid(text, "expected a type name after '..'"));
            }
            (PackagePattern::Tree(PackagePattern::parse(&text[..idx], text)?), name)
        } else if let Some(idx) = text.rfind('.') {
            (PackagePattern::Exact(PackagePattern::parse(&text[..idx], text)?), &text[idx + 1..])
        } else {
            (PackagePattern::Any, text)
        };

        Ok(Self {
            source: text.to_string(),
            package,
            name: Glob::new(name)?,
        })
    }

    /// Every type in `package` and its sub-packages.
    fn package_tree(package: &str, whole: &str) -> Result<Self, PointcutError> {
        Ok(Self {
            source: format!("{}..*", package),
            package: PackagePattern::Tree(PackagePattern::parse(package, whole)?),
            name: Glob::any(),
        })
    }

    fn any() -> Self {
        Self {
            source: "*".to_string(),
            package: PackagePattern::Any,
            name: Glob::any(),
        }
    }

    pub fn matches(&self, ty: &TargetType) -> bool {
        self.name.matches(ty.simple_name()) && self.package.matches(ty.package_segments())
    }
}

impl fmt::Display for TypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Matches a method's parameter list by simple type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamPattern {
    /// `(..)`
    Any,
    /// Fixed leading items, optionally followed by `..`.
    List { items: Vec<Glob>, rest: bool },
}

impl ParamPattern {
    pub fn parse(text: &str) -> Result<Self, PointcutError> {
        let text = text.trim();
        if text == ".." {
            return Ok(ParamPattern::Any);
        }
        if text.is_empty() {
            return Ok(ParamPattern::List {
                items: Vec::new(),
                rest: false,
            });
        }

        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        let mut items = Vec::with_capacity(parts.len());
        let mut rest = false;
        for (i, part) in parts.iter().enumerate() {
            if *part == ".." {
                if i != parts.len() - 1 {
                    return Err(PointcutError::invalid(text, "'..' is only allowed as the last parameter"));
                }
                rest = true;
            } else {
                items.push(Glob::new(simple_name(part))?);
            }
        }
        Ok(ParamPattern::List { items, rest })
    }

    pub fn matches(&self, params: &[String]) -> bool {
        match self {
            ParamPattern::Any => true,
            ParamPattern::List { items, rest } => {
                let arity_ok = if *rest {
                    params.len() >= items.len()
                } else {
                    params.len() == items.len()
                };
                arity_ok && items.iter().zip(params).all(|(g, p)| g.matches(simple_name(p)))
            }
        }
    }
}

/// The argument of `execution(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPattern {
    source: String,
    returns: Glob,
    declaring: TypePattern,
    method: Glob,
    params: ParamPattern,
}

impl ExecutionPattern {
    pub fn parse(text: &str) -> Result<Self, PointcutError> {
        let source = text.trim();
        let open = source
            .find('(')
            .ok_or_else(|| PointcutError::invalid(source, "missing parameter list"))?;
        let params_text = source[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| PointcutError::invalid(source, "parameter list must close the pattern"))?;
        if params_text.contains(['(', ')']) {
            return Err(PointcutError::invalid(source, "nested parentheses in parameter list"));
        }

        let mut head: Vec<&str> = source[..open].split_whitespace().collect();
        while head.len() > 1 && MODIFIERS.contains(&head[0]) {
            head.remove(0);
        }
        let (returns, target) = match head.as_slice() {
            [target] => (Glob::any(), *target),
            [returns, target] => (Glob::new(simple_name(returns))?, *target),
            [] => return Err(PointcutError::invalid(source, "missing method pattern")),
            _ => return Err(PointcutError::invalid(source, "too many tokens before the parameter list")),
        };

        let (declaring, method) = match target.rfind('.') {
            Some(idx) => {
                let type_part = &target[..idx];
                let declaring = match type_part.strip_suffix('.') {
                    Some(package) => TypePattern::package_tree(package, source)?,
                    None => TypePattern::parse(type_part)?,
                };
                (declaring, &target[idx + 1..])
            }
            None => (TypePattern::any(), target),
        };

        Ok(Self {
            source: source.to_string(),
            returns,
            declaring,
            method: Glob::new(method)?,
            params: ParamPattern::parse(params_text)?,
        })
    }

    pub fn matches(&self, ty: &TargetType, method: &MethodSignature) -> bool {
        self.method.matches(method.name())
            && self.declaring.matches(ty)
            && self.returns.matches(simple_name(method.return_type()))
            && self.params.matches(method.params())
    }
}

impl fmt::Display for ExecutionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> TargetType {
        TargetType::new(name)
    }

    fn exec(p: &str) -> ExecutionPattern {
        ExecutionPattern::parse(p).unwrap()
    }

    #[test]
    fn test_type_pattern_tree() {
        let p = TypePattern::parse("hello.aop.order..*Service").unwrap();
        assert!(p.matches(&ty("hello.aop.order.OrderService")));
        assert!(p.matches(&ty("hello.aop.order.sub.PayService")));
        assert!(!p.matches(&ty("hello.aop.order.OrderRepository")));
        assert!(!p.matches(&ty("hello.aop.member.MemberService")));
        assert!(!p.matches(&ty("hello.aop.OrderService")));
    }

    #[test]
    fn test_type_pattern_exact_package() {
        let p = TypePattern::parse("hello.aop.order.*").unwrap();
        assert!(p.matches(&ty("hello.aop.order.OrderService")));
        assert!(!p.matches(&ty("hello.aop.order.sub.OrderService")));

        let wildcard_segment = TypePattern::parse("hello.*.order.OrderService").unwrap();
        assert!(wildcard_segment.matches(&ty("hello.aop.order.OrderService")));
    }

    #[test]
    fn test_type_pattern_any_package() {
        let p = TypePattern::parse("*Service").unwrap();
        assert!(p.matches(&ty("hello.aop.order.OrderService")));
        assert!(p.matches(&ty("OrderService")));
    }

    #[test]
    fn test_type_pattern_rejects_malformed() {
        assert!(TypePattern::parse("").is_err());
        assert!(TypePattern::parse("hello..").is_err());
        assert!(TypePattern::parse("hello..a.B").is_err());
        assert!(TypePattern::parse("hello..Svc").is_ok());
        assert!(TypePattern::parse("a..b..C").is_err());
    }

    #[test]
    fn test_param_pattern() {
        let params = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(ParamPattern::parse("..").unwrap().matches(&params(&["a", "b"])));
        assert!(ParamPattern::parse("").unwrap().matches(&params(&[])));
        assert!(!ParamPattern::parse("").unwrap().matches(&params(&["String"])));

        let one = ParamPattern::parse("java.lang.String").unwrap();
        assert!(one.matches(&params(&["String"])));
        assert!(!one.matches(&params(&["String", "Long"])));

        let any_one = ParamPattern::parse("*").unwrap();
        assert!(any_one.matches(&params(&["Long"])));
        assert!(!any_one.matches(&params(&[])));

        let leading = ParamPattern::parse("String, ..").unwrap();
        assert!(leading.matches(&params(&["String"])));
        assert!(leading.matches(&params(&["String", "Long", "Object"])));
        assert!(!leading.matches(&params(&["Long"])));

        assert!(ParamPattern::parse(".., String").is_err());
    }

    #[test]
    fn test_execution_without_return_type() {
        let p = exec("*Service.*(..)");
        let order_item = MethodSignature::new("orderItem").param("String");
        let save = MethodSignature::new("save").param("String");

        assert!(p.matches(&ty("hello.aop.order.OrderService"), &order_item));
        assert!(!p.matches(&ty("hello.aop.order.OrderRepository"), &save));
    }

    #[test]
    fn test_execution_package_tree_methods() {
        let p = exec("* hello.proxy.app..*(..)");
        let m = MethodSignature::new("request").param("String").returns("String");
        assert!(p.matches(&ty("hello.proxy.app.v1.OrderControllerV1Impl"), &m));
        assert!(p.matches(&ty("hello.proxy.app.OrderService"), &m));
        assert!(!p.matches(&ty("hello.proxy.config.AppConfig"), &m));
    }

    #[test]
    fn test_execution_full_signature() {
        let p = exec("public String hello.aop.member.MemberServiceImpl.hello(String)");
        let hello = MethodSignature::new("hello").param("String").returns("java.lang.String");
        let internal = MethodSignature::new("internal").param("String").returns("String");

        assert!(p.matches(&ty("hello.aop.member.MemberServiceImpl"), &hello));
        assert!(!p.matches(&ty("hello.aop.member.MemberServiceImpl"), &internal));
        assert!(!p.matches(&ty("hello.aop.member.MemberService"), &hello));
    }

    #[test]
    fn test_execution_method_only() {
        let p = exec("save(..)");
        assert!(p.matches(&ty("a.Repo"), &MethodSignature::new("save").param("String")));
        assert!(!p.matches(&ty("a.Repo"), &MethodSignature::new("saveAll")));

        let void_only = exec("void *(..)");
        assert!(void_only.matches(&ty("a.Repo"), &MethodSignature::new("save")));
        assert!(!void_only.matches(&ty("a.Repo"), &MethodSignature::new("find").returns("String")));
    }

    #[test]
    fn test_execution_rejects_malformed() {
        assert!(ExecutionPattern::parse("*Service.*").is_err());
        assert!(ExecutionPattern::parse("(..)").is_err());
        assert!(ExecutionPattern::parse("* * a.B.c(..)").is_err());
        assert!(ExecutionPattern::parse("a.B.c(..").is_err());
        assert!(ExecutionPattern::parse("a.B.(..)").is_err());
    }
}
