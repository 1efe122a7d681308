//! Abstract Syntax Tree for condition expressions

/// AST node for condition expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Single comparison like "SCR>=100"
    Single(SingleCondition),
    And(Box<AstNode>, Box<AstNode>),
    Or(Box<AstNode>, Box<AstNode>),
}

impl AstNode {
    /// Visit every property name referenced by the expression
    pub fn properties(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_properties(&mut out);
        out
    }

    fn collect_properties<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            AstNode::Single(cond) => out.push(cond.property.as_str()),
            AstNode::And(l, r) | AstNode::Or(l, r) => {
                l.collect_properties(out);
                r.collect_properties(out);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleCondition {
    pub property: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `?` includes any of a list
    IncludesAny,
    /// `!` excludes all of a list
    ExcludesAll,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::IncludesAny => "?",
            Operator::ExcludesAll => "!",
        }
    }
}

/// Condition value types
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Integer(i64),
    Float(f64),
    Array(Vec<i64>),
}
