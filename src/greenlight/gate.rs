//! Gate shapes and their evaluation.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::context::GateContext;
use crate::naming::value_string;

/// A single evaluator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub allow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allow: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: Some(reason.into()),
        }
    }

    /// A denial with no reason; the gate substitutes a generic message.
    pub fn deny_silently() -> Self {
        Self {
            allow: false,
            reason: None,
        }
    }
}

/// The final answer of a gate, whatever its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allow: bool,
    pub reasons: Vec<String>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allow: true,
            reasons: Vec::new(),
        }
    }

    pub fn deny(reasons: Vec<String>) -> Self {
        Self {
            allow: false,
            reasons,
        }
    }
}

/// Why a gate refused an operation.
///
/// The variant follows the shape of the gate that refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Denial {
    /// From a single evaluator
    Single(String),
    /// From a sequence: every denial reason, in evaluator order
    Many(Vec<String>),
    /// From a composite: every evaluation result plus the aggregator's reasons
    Composite {
        results: Vec<Verdict>,
        reasons: Vec<String>,
    },
}

impl Denial {
    /// Flattened reasons regardless of shape.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Denial::Single(reason) => vec![reason.clone()],
            Denial::Many(reasons) => reasons.clone(),
            Denial::Composite { reasons, .. } => reasons.clone(),
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Single(reason) => f.write_str(reason),
            Denial::Many(reasons) => f.write_str(&reasons.join("; ")),
            Denial::Composite { results, reasons } => write!(
                f,
                "{} ({} of {} evaluations allowed)",
                reasons.join("; "),
                results.iter().filter(|r| r.allow).count(),
                results.len()
            ),
        }
    }
}

/// Evaluator function: one context in, one verdict out.
pub type Evaluator = Arc<dyn Fn(&GateContext<'_>) -> Verdict + Send + Sync>;

/// Aggregator function for composite gates.
pub type Aggregator = Arc<dyn Fn(&[Verdict], &GateContext<'_>) -> Decision + Send + Sync>;

/// Wraps a closure as an [`Evaluator`].
pub fn evaluator<F>(f: F) -> Evaluator
where
    F: Fn(&GateContext<'_>) -> Verdict + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as an [`Aggregator`].
pub fn aggregator<F>(f: F) -> Aggregator
where
    F: Fn(&[Verdict], &GateContext<'_>) -> Decision + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Validation policy supplied per operation.
#[derive(Clone, Default)]
pub enum Greenlight {
    /// No gate: always allow
    #[default]
    None,
    /// One evaluator decides
    Single(Evaluator),
    /// Every evaluator must allow
    Sequence(Vec<Evaluator>),
    /// Every evaluation runs, then the aggregator decides
    Composite {
        evaluations: Vec<Evaluator>,
        aggregator: Aggregator,
    },
}

impl Greenlight {
    pub fn single<F>(evaluator: F) -> Self
    where
        F: Fn(&GateContext<'_>) -> Verdict + Send + Sync + 'static,
    {
        Greenlight::Single(Arc::new(evaluator))
    }

    pub fn sequence<I>(evaluators: I) -> Self
    where
        I: IntoIterator<Item = Evaluator>,
    {
        Greenlight::Sequence(evaluators.into_iter().collect())
    }

    pub fn composite<I, A>(evaluations: I, aggregator: A) -> Self
    where
        I: IntoIterator<Item = Evaluator>,
        A: Fn(&[Verdict], &GateContext<'_>) -> Decision + Send + Sync + 'static,
    {
        Greenlight::Composite {
            evaluations: evaluations.into_iter().collect(),
            aggregator: Arc::new(aggregator),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Greenlight::None)
    }

    /// Evaluate the gate, returning the denial shaped after this gate.
    pub fn check(&self, ctx: &GateContext<'_>) -> Result<(), Denial> {
        match self {
            Greenlight::None => Ok(()),
            Greenlight::Single(evaluator) => {
                let verdict = evaluator(ctx);
                if verdict.allow {
                    Ok(())
                } else {
                    Err(Denial::Single(
                        verdict.reason.unwrap_or_else(|| unknown_failure(ctx)),
                    ))
                }
            }
            Greenlight::Sequence(evaluators) => {
                let reasons: Vec<String> = evaluators
                    .iter()
                    .map(|evaluator| evaluator(ctx))
                    .filter(|verdict| !verdict.allow)
                    .map(|verdict| verdict.reason.unwrap_or_else(|| unknown_failure(ctx)))
                    .collect();
                if reasons.is_empty() {
                    Ok(())
                } else {
                    Err(Denial::Many(reasons))
                }
            }
            Greenlight::Composite {
                evaluations,
                aggregator,
            } => {
                let results: Vec<Verdict> = evaluations.iter().map(|e| e(ctx)).collect();
                let decision = aggregator(&results, ctx);
                if decision.allow {
                    Ok(())
                } else {
                    Err(Denial::Composite {
                        results,
                        reasons: decision.reasons,
                    })
                }
            }
        }
    }

    /// Evaluate the gate to a shape-independent decision.
    pub fn evaluate(&self, ctx: &GateContext<'_>) -> Decision {
        match self.check(ctx) {
            Ok(()) => Decision::allow(),
            Err(denial) => Decision::deny(denial.reasons()),
        }
    }
}

impl fmt::Debug for Greenlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Greenlight::None => write!(f, "Greenlight::None"),
            Greenlight::Single(_) => write!(f, "Greenlight::Single"),
            Greenlight::Sequence(evaluators) => {
                write!(f, "Greenlight::Sequence({} evaluators)", evaluators.len())
            }
            Greenlight::Composite { evaluations, .. } => {
                write!(f, "Greenlight::Composite({} evaluations)", evaluations.len())
            }
        }
    }
}

fn unknown_failure(ctx: &GateContext<'_>) -> String {
    let key = ctx
        .key
        .map(value_string)
        .unwrap_or_else(|| "(none)".to_string());
    format!("DB operation failed for key {}. No reason given", key)
}
