//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Names are present and unique per section
//! - Expressions are present (parsing happens at wiring time)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WeaveConfig → Result<(), Vec<ValidationError>>
//! - Advisors sharing an order are legal; registration order decides

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::schema::WeaveConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{section} entry #{index} has an empty name")]
    EmptyName { section: &'static str, index: usize },

    #[error("duplicate {section} name '{name}'")]
    DuplicateName { section: &'static str, name: String },

    #[error("{section} '{name}' has an empty expression")]
    EmptyExpression { section: &'static str, name: String },
}

pub fn validate_config(config: &WeaveConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_section(
        "pointcut",
        config.pointcuts.iter().map(|p| (p.name.as_str(), p.expression.as_str())),
        &mut errors,
    );
    check_section(
        "advisor",
        config.advisors.iter().map(|a| (a.name.as_str(), a.pointcut.as_str())),
        &mut errors,
    );

    let mut by_order: HashMap<i32, Vec<&str>> = HashMap::new();
    for advisor in &config.advisors {
        by_order.entry(advisor.order).or_default().push(&advisor.name);
    }
    for (order, names) in by_order.iter().filter(|(_, names)| names.len() > 1) {
        tracing::debug!(order, advisors = ?names, "Advisors share an order, registration order applies");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_section<'a>(
    section: &'static str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for (index, (name, expression)) in entries.enumerate() {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { section, index });
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }
        if expression.trim().is_empty() {
            errors.push(ValidationError::EmptyExpression {
                section,
                name: name.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AdviceKind, AdvisorConfig, PointcutConfig};

    fn advisor(name: &str, pointcut: &str, order: i32) -> AdvisorConfig {
        AdvisorConfig {
            name: name.into(),
            pointcut: pointcut.into(),
            order,
            advice: AdviceKind::Trace,
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&WeaveConfig::default()), Ok(()));
    }

    #[test]
    fn test_shared_order_is_allowed() {
        let config = WeaveConfig {
            advisors: vec![advisor("a", "bean(*)", 1), advisor("b", "bean(*)", 1)],
            ..Default::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let config = WeaveConfig {
            pointcuts: vec![
                PointcutConfig {
                    name: "allOrder".into(),
                    expression: "execution(* hello.aop.order..*(..))".into(),
                },
                PointcutConfig {
                    name: "allOrder".into(),
                    expression: " ".into(),
                },
            ],
            advisors: vec![advisor("", "bean(*)", 0), advisor("trace", "bean(*)", 0), advisor("trace", "", 0)],
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateName {
                    section: "pointcut",
                    name: "allOrder".into()
                },
                ValidationError::EmptyExpression {
                    section: "pointcut",
                    name: "allOrder".into()
                },
                ValidationError::EmptyName {
                    section: "advisor",
                    index: 0
                },
                ValidationError::DuplicateName {
                    section: "advisor",
                    name: "trace".into()
                },
                ValidationError::EmptyExpression {
                    section: "advisor",
                    name: "trace".into()
                },
            ]
        );
    }
}
