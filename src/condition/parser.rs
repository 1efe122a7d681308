//! Condition string parser

use crate::condition::ast::{AstNode, ConditionValue, Operator, SingleCondition};
use crate::error::{Result, TrainerError};

fn invalid(msg: impl Into<String>) -> TrainerError {
    TrainerError::InvalidCondition(msg.into())
}

/// Parse a condition string into an AST
pub fn parse(condition: &str) -> Result<AstNode> {
    let condition = condition.trim();
    if condition.is_empty() {
        return Err(invalid("Empty condition"));
    }

    let tokens = tokenize(condition)?;
    parse_tokens(&tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Condition(String),
    And,
    Or,
    OpenParen,
    CloseParen,
}

fn tokenize(condition: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut in_list = false;

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Condition(std::mem::take(current)));
        }
    };

    for c in condition.chars() {
        match c {
            ' ' | '\t' if in_list => {}
            ' ' | '\t' => flush(&mut current, &mut tokens),
            '[' | ']' => {
                in_list = c == '[';
                current.push(c);
            }
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::OpenParen);
                depth += 1;
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::CloseParen);
                depth -= 1;
                if depth < 0 {
                    return Err(invalid("Unbalanced parentheses"));
                }
            }
            '&' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::And);
            }
            '|' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Or);
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    if depth != 0 {
        return Err(invalid("Unbalanced parentheses"));
    }

    Ok(merge_split_terms(tokens))
}

/// Rejoin terms written with spaces around the operator, e.g. `SCR >= 10`
fn merge_split_terms(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (merged.last_mut(), token) {
            (Some(Token::Condition(prev)), Token::Condition(next))
                if !has_value(prev) || starts_with_operator(&next) =>
            {
                prev.push_str(&next);
            }
            (_, token) => merged.push(token),
        }
    }
    merged
}

fn starts_with_operator(s: &str) -> bool {
    s.starts_with(['>', '<', '=', '!', '?'])
}

/// A term is complete once it holds an operator followed by something
fn has_value(s: &str) -> bool {
    match s.find(['>', '<', '=', '!', '?']) {
        Some(pos) => s[pos..]
            .trim_start_matches(['>', '<', '=', '!', '?'])
            .chars()
            .next()
            .is_some(),
        None => false,
    }
}

fn parse_tokens(tokens: &[Token]) -> Result<AstNode> {
    if tokens.is_empty() {
        return Err(invalid("Empty expression"));
    }

    // OR binds looser than AND; split on the last top-level one of each
    let mut depth = 0;
    let mut or_pos = None;
    let mut and_pos = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth -= 1,
            Token::Or if depth == 0 => or_pos = Some(i),
            Token::And if depth == 0 => and_pos = Some(i),
            _ => {}
        }
    }

    if let Some(pos) = or_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(AstNode::Or(Box::new(left), Box::new(right)));
    }

    if let Some(pos) = and_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(AstNode::And(Box::new(left), Box::new(right)));
    }

    match tokens {
        [Token::OpenParen, inner @ .., Token::CloseParen] => parse_tokens(inner),
        [Token::Condition(cond)] => parse_single_condition(cond),
        _ => Err(invalid(format!("Cannot parse tokens: {:?}", tokens))),
    }
}

fn parse_single_condition(condition: &str) -> Result<AstNode> {
    let pos = condition
        .find(['>', '<', '=', '!', '?'])
        .ok_or_else(|| invalid(format!("No operator found in: {}", condition)))?;

    let rest = &condition[pos..];
    let (operator, len) = if rest.starts_with(">=") {
        (Operator::GreaterEqual, 2)
    } else if rest.starts_with("<=") {
        (Operator::LessEqual, 2)
    } else if rest.starts_with("!=") {
        (Operator::NotEqual, 2)
    } else {
        let op = match rest.as_bytes()[0] {
            b'>' => Operator::Greater,
            b'<' => Operator::Less,
            b'=' => Operator::Equal,
            b'?' => Operator::IncludesAny,
            _ => Operator::ExcludesAll,
        };
        (op, 1)
    };

    let property = condition[..pos].trim();
    if property.is_empty() {
        return Err(invalid(format!("Missing property in: {}", condition)));
    }

    let value = parse_value(&rest[len..])?;
    if matches!(operator, Operator::IncludesAny | Operator::ExcludesAll)
        && !matches!(value, ConditionValue::Array(_))
    {
        return Err(invalid(format!(
            "Operator {} needs a list in: {}",
            operator.symbol(),
            condition
        )));
    }

    Ok(AstNode::Single(SingleCondition {
        property: property.to_uppercase(),
        operator,
        value,
    }))
}

fn parse_value(value_str: &str) -> Result<ConditionValue> {
    let value_str = value_str.trim();

    if let Some(inner) = value_str
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        return inner
            .split(',')
            .map(|s| s.trim().parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(ConditionValue::Array)
            .map_err(|_| invalid(format!("Invalid list: {}", value_str)));
    }

    if let Ok(i) = value_str.parse::<i64>() {
        return Ok(ConditionValue::Integer(i));
    }

    value_str
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(ConditionValue::Float)
        .ok_or_else(|| invalid(format!("Invalid value: {:?}", value_str)))
}
