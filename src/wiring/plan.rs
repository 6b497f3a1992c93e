//! Compiled advisor plan.

use serde::Serialize;

use crate::advice::{Advisor, LogAdvice, TraceAdvice, TransactionAdvice};
use crate::config::{AdviceKind, ConfigError, WeaveConfig};
use crate::pointcut::{NamedPointcuts, Pointcut};
use crate::proxy::ProxyFactory;
use crate::trace::{ErrorInfo, Tracer};

/// One advisor whose pointcut has been compiled.
#[derive(Debug, Clone)]
pub struct PlannedAdvisor {
    pub name: String,
    pub order: i32,
    pub kind: AdviceKind,
    pub pointcut: Pointcut,
}

/// Named pointcuts and advisors compiled from a [`WeaveConfig`].
///
/// Compiling is independent of the target error type; [`AdvisorPlan::advisors`]
/// instantiates the advice for a particular `E`.
#[derive(Debug, Clone)]
pub struct AdvisorPlan {
    named: NamedPointcuts,
    pointcut_names: Vec<String>,
    advisors: Vec<PlannedAdvisor>,
    disabled: Vec<String>,
}

impl AdvisorPlan {
    /// Parse named pointcuts in declaration order, then each advisor's
    /// pointcut. A named pointcut may only reference earlier ones.
    pub fn compile(config: &WeaveConfig) -> Result<Self, ConfigError> {
        let mut named = NamedPointcuts::new();
        let mut pointcut_names = Vec::with_capacity(config.pointcuts.len());
        for pointcut in &config.pointcuts {
            named
                .define(&pointcut.name, &pointcut.expression)
                .map_err(|source| ConfigError::Pointcut {
                    name: pointcut.name.clone(),
                    source,
                })?;
            pointcut_names.push(pointcut.name.clone());
        }

        let mut advisors = Vec::with_capacity(config.advisors.len());
        let mut disabled = Vec::new();
        for advisor in &config.advisors {
            let pointcut = Pointcut::parse_with(&advisor.pointcut, &named).map_err(|source| ConfigError::Pointcut {
                name: advisor.name.clone(),
                source,
            })?;
            if advisor.advice == AdviceKind::Trace && !config.trace.enabled {
                tracing::info!(advisor = %advisor.name, "Tracing disabled, skipping advisor");
                disabled.push(advisor.name.clone());
                continue;
            }
            advisors.push(PlannedAdvisor {
                name: advisor.name.clone(),
                order: advisor.order,
                kind: advisor.advice,
                pointcut,
            });
        }

        tracing::debug!(
            pointcuts = pointcut_names.len(),
            advisors = advisors.len(),
            disabled = disabled.len(),
            "Advisor plan compiled"
        );

        Ok(Self {
            named,
            pointcut_names,
            advisors,
            disabled,
        })
    }

    pub fn named_pointcuts(&self) -> &NamedPointcuts {
        &self.named
    }

    pub fn planned(&self) -> &[PlannedAdvisor] {
        &self.advisors
    }

    /// Instantiate the planned advisors for targets failing with `E`. Every
    /// trace advisor shares `tracer`.
    pub fn advisors<E>(&self, tracer: &Tracer) -> Vec<Advisor<E>>
    where
        E: ErrorInfo + 'static,
    {
        self.advisors
            .iter()
            .map(|planned| {
                let pointcut = planned.pointcut.clone();
                match planned.kind {
                    AdviceKind::Trace => {
                        Advisor::new(&planned.name, planned.order, pointcut, TraceAdvice::new(tracer.clone()))
                    }
                    AdviceKind::Transaction => {
                        Advisor::new(&planned.name, planned.order, pointcut, TransactionAdvice::logging())
                    }
                    AdviceKind::Log => Advisor::new(&planned.name, planned.order, pointcut, LogAdvice),
                }
            })
            .collect()
    }

    pub fn proxy_factory<E>(&self, tracer: &Tracer) -> ProxyFactory<E>
    where
        E: ErrorInfo + 'static,
    {
        ProxyFactory::with_advisors(self.advisors(tracer))
    }

    /// Serializable view for display.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            pointcuts: self
                .pointcut_names
                .iter()
                .filter_map(|name| {
                    self.named.get(name).map(|p| PointcutSummary {
                        name: name.clone(),
                        expression: p.to_string(),
                    })
                })
                .collect(),
            advisors: self
                .advisors
                .iter()
                .map(|a| AdvisorSummary {
                    name: a.name.clone(),
                    order: a.order,
                    advice: a.kind,
                    pointcut: a.pointcut.to_string(),
                })
                .collect(),
            disabled: self.disabled.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub pointcuts: Vec<PointcutSummary>,
    pub advisors: Vec<AdvisorSummary>,
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointcutSummary {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorSummary {
    pub name: String,
    pub order: i32,
    pub advice: AdviceKind,
    pub pointcut: String,
}
