//! Condition parsing cache

use crate::condition::ast::AstNode;
use crate::condition::{evaluator, parser};
use crate::error::Result;
use crate::metrics::MetricState;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Global condition cache keyed by the raw condition string
static CONDITION_CACHE: Lazy<RwLock<AHashMap<String, AstNode>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(64)));

/// Get or parse a condition string, using cache for repeated conditions
#[inline]
pub fn get_or_parse(condition: &str) -> Result<AstNode> {
    {
        let cache = CONDITION_CACHE.read();
        if let Some(ast) = cache.get(condition) {
            return Ok(ast.clone());
        }
    }

    let ast = parser::parse(condition)?;
    CONDITION_CACHE
        .write()
        .insert(condition.to_string(), ast.clone());

    Ok(ast)
}

/// Check a condition against a MetricState; an empty condition always holds
#[inline]
pub fn check_condition(condition: &str, state: &MetricState) -> Result<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }

    let ast = get_or_parse(condition)?;
    Ok(evaluator::check(&ast, state))
}

/// Parse and check property names without evaluating
pub fn validate_condition(condition: &str) -> Result<()> {
    if condition.trim().is_empty() {
        return Ok(());
    }
    evaluator::validate(&get_or_parse(condition)?)
}

/// Number of cached expressions
pub fn cache_size() -> usize {
    CONDITION_CACHE.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit() {
        let state = MetricState {
            score: 10,
            ..Default::default()
        };

        let cond = "SCR>5 & SCR<11";
        assert!(check_condition(cond, &state).unwrap());
        assert!(CONDITION_CACHE.read().contains_key(cond));
        assert!(cache_size() >= 1);
        assert!(check_condition(cond, &state).unwrap());
    }

    #[test]
    fn test_empty_condition() {
        let state = MetricState::default();
        assert!(check_condition("", &state).unwrap());
        assert!(validate_condition("  ").is_ok());
    }

    #[test]
    fn test_parse_error_propagates() {
        let state = MetricState::default();
        assert!(check_condition("SCR>>", &state).is_err());
        assert!(validate_condition("FOO=1").is_err());
    }
}
