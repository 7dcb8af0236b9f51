//! PromQL expression tree used by the policy checkers
//!
//! The tree is built once per validation by [`super::parser::parse`] and is
//! read-only afterwards. Every node owns its children, so the tree cannot
//! contain shared nodes or cycles.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// A parsed PromQL expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Aggregate(AggregateExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(Call),
    VectorSelector(VectorSelector),
    MatrixSelector(MatrixSelector),
    Subquery(SubqueryExpr),
    Paren(ParenExpr),
    NumberLiteral(f64),
    StringLiteral(String),
}

impl Expr {
    /// Direct children of this node, in source order
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Aggregate(agg) => {
                let mut children = Vec::with_capacity(2);
                if let Some(param) = &agg.param {
                    children.push(param.as_ref());
                }
                children.push(agg.expr.as_ref());
                children
            }
            Self::Binary(bin) => vec![bin.lhs.as_ref(), bin.rhs.as_ref()],
            Self::Unary(unary) => vec![unary.expr.as_ref()],
            Self::Call(call) => call.args.iter().collect(),
            Self::Subquery(sq) => vec![sq.expr.as_ref()],
            Self::Paren(paren) => vec![paren.expr.as_ref()],
            Self::VectorSelector(_)
            | Self::MatrixSelector(_)
            | Self::NumberLiteral(_)
            | Self::StringLiteral(_) => Vec::new(),
        }
    }

    /// The selector owning label matchers, if this node is one
    pub fn selector(&self) -> Option<&VectorSelector> {
        match self {
            Self::VectorSelector(vs) => Some(vs),
            Self::MatrixSelector(ms) => Some(&ms.vs),
            _ => None,
        }
    }
}

/// Aggregation grouping clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    /// `by (labels)`
    By(Vec<String>),
    /// `without (labels)`
    Without(Vec<String>),
}

impl Grouping {
    pub fn labels(&self) -> &[String] {
        match self {
            Self::By(labels) | Self::Without(labels) => labels,
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (keyword, labels) = match self {
            Self::By(labels) => ("by", labels),
            Self::Without(labels) => ("without", labels),
        };
        write!(f, "{keyword} ({})", labels.join(", "))
    }
}

/// Aggregation such as `sum by (job) (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpr {
    /// Operator name (`sum`, `avg`, `topk`, ...)
    pub op: String,
    pub grouping: Option<Grouping>,
    /// Parameter of `topk`, `quantile`, `count_values` and friends
    pub param: Option<Box<Expr>>,
    pub expr: Box<Expr>,
}

impl AggregateExpr {
    /// Grouping labels as a set; empty when the aggregation has no clause.
    ///
    /// `by (job, job)` and `by (job)` yield the same set.
    pub fn grouping_labels(&self) -> BTreeSet<&str> {
        self.grouping
            .iter()
            .flat_map(|g| g.labels().iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Operator token as written (`+`, `>`, `and`, ...)
    pub op: String,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub expr: Box<Expr>,
}

/// Function call such as `rate(x[5m])`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Instant vector selector, e.g. `http_requests_total{job="api"}`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorSelector {
    pub name: Option<String>,
    pub matchers: Vec<LabelMatcher>,
    /// Alternative matcher sets joined with `or` inside the braces
    pub or_matchers: Vec<Vec<LabelMatcher>>,
}

impl VectorSelector {
    /// All matchers of this selector, including `or` alternatives
    pub fn all_matchers(&self) -> impl Iterator<Item = &LabelMatcher> {
        self.matchers
            .iter()
            .chain(self.or_matchers.iter().flatten())
    }
}

/// Range vector selector, e.g. `http_requests_total[5m]`
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSelector {
    pub vs: VectorSelector,
    pub range: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubqueryExpr {
    pub expr: Box<Expr>,
    pub range: Duration,
    /// Resolution step; `None` for the default evaluation interval
    pub step: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub expr: Box<Expr>,
}

/// Label matcher operators matching Prometheus semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// Exact string match (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Regex match (=~)
    RegexMatch,
    /// Regex not match (!~)
    RegexNotMatch,
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::RegexMatch => write!(f, "=~"),
            Self::RegexNotMatch => write!(f, "!~"),
        }
    }
}

/// A single label matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    /// Label name
    pub name: String,
    /// Match operation
    pub op: MatchOp,
    /// Literal value; for regex operators, the pattern as written
    pub value: String,
}

impl LabelMatcher {
    pub fn new(name: &str, op: MatchOp, value: &str) -> Self {
        Self {
            name: name.to_string(),
            op,
            value: value.to_string(),
        }
    }

    /// Whether this matcher selects the literal `value`.
    ///
    /// Regex patterns are compared as literal strings, they are not compiled.
    /// Negative operators never select a value.
    pub fn matches_value(&self, value: &str) -> bool {
        match self.op {
            MatchOp::Equal | MatchOp::RegexMatch => self.value == value,
            MatchOp::NotEqual | MatchOp::RegexNotMatch => false,
        }
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.op, self.value)
    }
}
