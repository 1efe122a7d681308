//! Condition evaluator

use crate::condition::ast::{AstNode, ConditionValue, Operator, SingleCondition};
use crate::error::{Result, TrainerError};
use crate::metrics::{MetricState, KNOWN_PROPERTIES};

/// Evaluate an AST against a MetricState
pub fn check(ast: &AstNode, state: &MetricState) -> bool {
    match ast {
        AstNode::Single(cond) => check_single(cond, state),
        AstNode::And(left, right) => check(left, state) && check(right, state),
        AstNode::Or(left, right) => check(left, state) || check(right, state),
    }
}

/// Reject expressions that name properties no game exposes
pub fn validate(ast: &AstNode) -> Result<()> {
    match ast
        .properties()
        .into_iter()
        .find(|p| !KNOWN_PROPERTIES.contains(p))
    {
        Some(unknown) => Err(TrainerError::InvalidCondition(format!(
            "Unknown property: {}",
            unknown
        ))),
        None => Ok(()),
    }
}

fn check_single(cond: &SingleCondition, state: &MetricState) -> bool {
    let value = state.get(&cond.property);

    match (&value, &cond.value, cond.operator) {
        (MetricValue::Integer(pv), ConditionValue::Integer(cv), op) => compare(*pv, *cv, op),

        (MetricValue::Integer(pv), ConditionValue::Float(cv), op) => {
            let pv = *pv as f64;
            match op {
                Operator::Greater => pv > *cv,
                Operator::Less => pv < *cv,
                Operator::GreaterEqual => pv >= *cv,
                Operator::LessEqual => pv <= *cv,
                Operator::Equal => pv == *cv,
                Operator::NotEqual => pv != *cv,
                _ => false,
            }
        }

        // List membership
        (MetricValue::List(list), ConditionValue::Integer(cv), Operator::Equal) => {
            list.contains(cv)
        }
        (MetricValue::List(list), ConditionValue::Integer(cv), Operator::NotEqual) => {
            !list.contains(cv)
        }

        (MetricValue::List(list), ConditionValue::Array(arr), Operator::IncludesAny) => {
            list.iter().any(|v| arr.contains(v))
        }
        (MetricValue::Integer(pv), ConditionValue::Array(arr), Operator::IncludesAny) => {
            arr.contains(pv)
        }

        (MetricValue::List(list), ConditionValue::Array(arr), Operator::ExcludesAll) => {
            list.iter().all(|v| !arr.contains(v))
        }
        (MetricValue::Integer(pv), ConditionValue::Array(arr), Operator::ExcludesAll) => {
            !arr.contains(pv)
        }

        _ => false,
    }
}

#[inline]
fn compare(pv: i64, cv: i64, op: Operator) -> bool {
    match op {
        Operator::Greater => pv > cv,
        Operator::Less => pv < cv,
        Operator::GreaterEqual => pv >= cv,
        Operator::LessEqual => pv <= cv,
        Operator::Equal => pv == cv,
        Operator::NotEqual => pv != cv,
        _ => false,
    }
}

/// Property value types for evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    List(Vec<i64>),
}

impl MetricState {
    /// Get property value for condition evaluation
    pub fn get(&self, prop: &str) -> MetricValue {
        match prop {
            "ALG" => MetricValue::Integer(self.algorithm),
            "SCR" => MetricValue::Integer(self.score),
            "TIME" => MetricValue::Integer(self.time),
            "OK" => MetricValue::Integer(self.correct),
            "BAD" => MetricValue::Integer(self.incorrect),
            "ACT" => MetricValue::Integer(self.correct + self.incorrect),
            "ACC" => MetricValue::Integer(self.accuracy),
            "WON" => MetricValue::Integer(self.won),
            "SIZE" => MetricValue::Integer(self.size),
            "GAMES" => MetricValue::Integer(self.games),
            "WINS" => MetricValue::Integer(self.wins),
            "BEST" => MetricValue::Integer(self.best),
            "MST" => MetricValue::Integer(self.mastery),
            "TOTAL" => MetricValue::Integer(self.total_games),
            "GOLD" => MetricValue::List(self.gold.clone()),
            _ => MetricValue::Integer(0),
        }
    }
}
