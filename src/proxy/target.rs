//! Target registration metadata and join points.
//!
//! A [`Registration`] describes one target instance: its logical bean name,
//! its fully qualified type and the methods that may be advised. Pointcuts are
//! evaluated against a [`JoinPoint`], the pairing of a registration with one of
//! its methods.

use std::fmt;

/// Fully qualified, `.`-separated type name such as `hello.aop.order.OrderService`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    name: String,
}

impl TargetType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the type name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Everything before the last segment; empty for the default package.
    pub fn package(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    pub fn package_segments(&self) -> impl Iterator<Item = &str> {
        self.package().split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One advisable method of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    params: Vec<String>,
    returns: String,
    tags: Vec<String>,
}

impl MethodSignature {
    /// A method with no parameters returning `void`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: "void".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn param(mut self, ty: impl Into<String>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = ty.into();
        self
    }

    /// Attach a marker tag, the equivalent of a method annotation.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn return_type(&self) -> &str {
        &self.returns
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Tags compare on their simple names, so `a.b.Trace` equals `Trace`.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = simple_name(tag);
        self.tags.iter().any(|t| simple_name(t) == wanted)
    }
}

/// Registration metadata for one target instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    bean_name: String,
    target_type: TargetType,
    methods: Vec<MethodSignature>,
}

impl Registration {
    pub fn new(bean_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            bean_name: bean_name.into(),
            target_type: TargetType::new(type_name),
            methods: Vec::new(),
        }
    }

    /// Register under the default bean name: the simple type name with a
    /// lowercase first letter (`OrderService` → `orderService`).
    pub fn for_type(type_name: impl Into<String>) -> Self {
        let target_type = TargetType::new(type_name);
        let bean_name = default_bean_name(target_type.simple_name());
        Self {
            bean_name,
            target_type,
            methods: Vec::new(),
        }
    }

    /// Add a method. A later method with the same name replaces the earlier one.
    pub fn method(mut self, method: MethodSignature) -> Self {
        self.methods.retain(|m| m.name() != method.name());
        self.methods.push(method);
        self
    }

    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    pub fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name() == name)
    }

    pub fn join_point<'a>(&'a self, method: &'a MethodSignature) -> JoinPoint<'a> {
        JoinPoint {
            registration: self,
            method,
        }
    }
}

/// A method of a registered target at which advice may run.
#[derive(Debug, Clone, Copy)]
pub struct JoinPoint<'a> {
    registration: &'a Registration,
    method: &'a MethodSignature,
}

impl<'a> JoinPoint<'a> {
    pub fn registration(&self) -> &'a Registration {
        self.registration
    }

    pub fn target_type(&self) -> &'a TargetType {
        &self.registration.target_type
    }

    pub fn bean_name(&self) -> &'a str {
        &self.registration.bean_name
    }

    pub fn method(&self) -> &'a MethodSignature {
        self.method
    }

    /// `OrderService.orderItem()`: the message used for trace lines.
    pub fn short_signature(&self) -> String {
        format!("{}.{}()", self.target_type().simple_name(), self.method.name())
    }

    /// `void hello.aop.order.OrderService.orderItem(String)`
    pub fn long_signature(&self) -> String {
        format!(
            "{} {}.{}({})",
            self.method.return_type(),
            self.target_type(),
            self.method.name(),
            self.method.params().join(",")
        )
    }
}

impl fmt::Display for JoinPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_signature())
    }
}

pub(crate) fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn default_bean_name(simple: &str) -> String {
    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
