//! Parse gateway over the promql-parser crate
//!
//! Grammar and tokenization belong to promql-parser. This module only calls
//! it and converts the resulting tree into the [`Expr`] model the policy
//! checkers walk.

use promql_parser::label::{MatchOp as ParserMatchOp, Matcher};
use promql_parser::parser::{self, LabelModifier};

use super::ast::{
    AggregateExpr, BinaryExpr, Call, Expr, Grouping, LabelMatcher, MatchOp, MatrixSelector,
    ParenExpr, SubqueryExpr, UnaryExpr, VectorSelector,
};
use crate::error::PromQLSyntaxError;

/// Parse `query` into the expression tree walked by the policy checkers
///
/// Anything promql-parser rejects, including calls to functions it does not
/// know, comes back as a [`PromQLSyntaxError`] carrying the parser's message.
/// A syntax error is never turned into a policy violation.
///
/// ```ignore
/// use validator::promql::parser::parse;
///
/// let expr = parse("sum by (job)(rate(http_requests_total[5m]))")?;
///
/// let err = parse("sum by (job)(unknown_over_time(up[5m]))").unwrap_err();
/// log::warn!("rejected query: {}", err.message);
/// ```
pub fn parse(query: &str) -> Result<Expr, PromQLSyntaxError> {
    let expr = parser::parse(query).map_err(PromQLSyntaxError::new)?;
    convert_expr(&expr)
}

fn convert_expr(expr: &parser::Expr) -> Result<Expr, PromQLSyntaxError> {
    let converted = match expr {
        parser::Expr::Aggregate(agg) => Expr::Aggregate(AggregateExpr {
            op: agg.op.to_string(),
            grouping: agg.modifier.as_ref().map(convert_grouping),
            param: agg
                .param
                .as_deref()
                .map(convert_expr)
                .transpose()?
                .map(Box::new),
            expr: Box::new(convert_expr(&agg.expr)?),
        }),
        parser::Expr::Unary(unary) => Expr::Unary(UnaryExpr {
            expr: Box::new(convert_expr(&unary.expr)?),
        }),
        parser::Expr::Binary(bin) => Expr::Binary(BinaryExpr {
            op: bin.op.to_string(),
            lhs: Box::new(convert_expr(&bin.lhs)?),
            rhs: Box::new(convert_expr(&bin.rhs)?),
        }),
        parser::Expr::Paren(paren) => Expr::Paren(ParenExpr {
            expr: Box::new(convert_expr(&paren.expr)?),
        }),
        parser::Expr::Subquery(sq) => Expr::Subquery(SubqueryExpr {
            expr: Box::new(convert_expr(&sq.expr)?),
            range: sq.range,
            step: sq.step,
        }),
        parser::Expr::NumberLiteral(num) => Expr::NumberLiteral(num.val),
        parser::Expr::StringLiteral(s) => Expr::StringLiteral(s.val.clone()),
        parser::Expr::VectorSelector(vs) => Expr::VectorSelector(convert_selector(vs)),
        parser::Expr::MatrixSelector(ms) => Expr::MatrixSelector(MatrixSelector {
            vs: convert_selector(&ms.vs),
            range: ms.range,
        }),
        parser::Expr::Call(call) => Expr::Call(Call {
            name: call.func.name.to_string(),
            args: call
                .args
                .args
                .iter()
                .map(|arg| convert_expr(arg))
                .collect::<Result<_, _>>()?,
        }),
        parser::Expr::Extension(_) => {
            return Err(PromQLSyntaxError::new("unsupported expression"));
        }
    };
    Ok(converted)
}

fn convert_grouping(modifier: &LabelModifier) -> Grouping {
    match modifier {
        LabelModifier::Include(labels) => Grouping::By(labels.labels.clone()),
        LabelModifier::Exclude(labels) => Grouping::Without(labels.labels.clone()),
    }
}

fn convert_selector(vs: &parser::VectorSelector) -> VectorSelector {
    VectorSelector {
        name: vs.name.clone(),
        matchers: vs.matchers.matchers.iter().map(convert_matcher).collect(),
        or_matchers: vs
            .matchers
            .or_matchers
            .iter()
            .map(|group| group.iter().map(convert_matcher).collect())
            .collect(),
    }
}

fn convert_matcher(matcher: &Matcher) -> LabelMatcher {
    let op = match &matcher.op {
        ParserMatchOp::Equal => MatchOp::Equal,
        ParserMatchOp::NotEqual => MatchOp::NotEqual,
        ParserMatchOp::Re(_) => MatchOp::RegexMatch,
        ParserMatchOp::NotRe(_) => MatchOp::RegexNotMatch,
    };

    LabelMatcher {
        name: matcher.name.clone(),
        op,
        value: matcher.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_simple_metric() {
        let expr = parse("http_requests_total").unwrap();
        match expr {
            Expr::VectorSelector(vs) => {
                assert_eq!(vs.name.as_deref(), Some("http_requests_total"));
            }
            other => panic!("Expected VectorSelector, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_aggregation_by() {
        let expr = parse("sum by (job)(rate(http_requests_total[5m]))").unwrap();
        let Expr::Aggregate(agg) = expr else {
            panic!("Expected Aggregate");
        };
        assert_eq!(agg.op, "sum");
        assert_eq!(agg.grouping, Some(Grouping::By(vec!["job".to_string()])));
        let Expr::Call(call) = agg.expr.as_ref() else {
            panic!("Expected Call");
        };
        assert_eq!(call.name, "rate");
        assert!(matches!(call.args[0], Expr::MatrixSelector(ref ms) if ms.range == Duration::from_secs(300)));
    }

    #[test]
    fn test_parse_aggregation_without() {
        let expr = parse("avg without (instance)(up)").unwrap();
        let Expr::Aggregate(agg) = expr else {
            panic!("Expected Aggregate");
        };
        assert_eq!(
            agg.grouping,
            Some(Grouping::Without(vec!["instance".to_string()]))
        );
    }

    #[test]
    fn test_parse_aggregation_without_clause() {
        let Expr::Aggregate(agg) = parse("count(up)").unwrap() else {
            panic!("Expected Aggregate");
        };
        assert!(agg.grouping.is_none());
        assert!(agg.grouping_labels().is_empty());
    }

    #[test]
    fn test_parse_aggregation_param() {
        let Expr::Aggregate(agg) = parse("topk(5, http_requests_total)").unwrap() else {
            panic!("Expected Aggregate");
        };
        assert_eq!(agg.op, "topk");
        assert_eq!(agg.param.as_deref(), Some(&Expr::NumberLiteral(5.0)));
    }

    #[test]
    fn test_parse_regex_matcher_keeps_pattern() {
        let expr = parse("foo_metric{very=~'important', something!~'else'}").unwrap();
        let vs = expr.selector().expect("selector");
        assert_eq!(
            vs.matchers,
            vec![
                LabelMatcher::new("very", MatchOp::RegexMatch, "important"),
                LabelMatcher::new("something", MatchOp::RegexNotMatch, "else"),
            ]
        );
    }

    #[test]
    fn test_parse_subquery_of_call() {
        let expr = parse(
            r#"sum_over_time(label_replace(some_metric, "name", "$1", "othername", "(.*)")[6h:])"#,
        )
        .unwrap();
        let Expr::Call(call) = expr else {
            panic!("Expected Call");
        };
        assert_eq!(call.name, "sum_over_time");
        let Expr::Subquery(sq) = &call.args[0] else {
            panic!("Expected Subquery");
        };
        assert_eq!(sq.range, Duration::from_secs(6 * 60 * 60));
        assert!(sq.step.is_none());
        assert!(matches!(sq.expr.as_ref(), Expr::Call(inner) if inner.name == "label_replace"));
    }

    #[test]
    fn test_parse_or_matcher_groups() {
        let expr = parse("sum by (job)(foo{job='x' or tier='important'})").unwrap();
        let Expr::Aggregate(agg) = expr else {
            panic!("Expected Aggregate");
        };
        let vs = agg.expr.selector().expect("selector");
        let names: Vec<_> = vs
            .all_matchers()
            .map(|m| m.name.as_str())
            .filter(|name| *name != "__name__")
            .collect();
        assert_eq!(names, vec!["job", "tier"]);
        assert!(vs.all_matchers().any(|m| m.matches_value("important")));
    }

    #[test]
    fn test_parse_subquery_step() {
        let Expr::Subquery(sq) = parse("rate(foo[5m])[1h:30s]").unwrap() else {
            panic!("Expected Subquery");
        };
        assert_eq!(sq.range, Duration::from_secs(3600));
        assert_eq!(sq.step, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_binary_expression() {
        let expr = parse("http_requests_total / http_requests_failed > 5").unwrap();
        let Expr::Binary(bin) = expr else {
            panic!("Expected Binary");
        };
        assert_eq!(bin.op, ">");
        assert!(matches!(bin.rhs.as_ref(), Expr::NumberLiteral(v) if *v == 5.0));
    }

    #[test]
    fn test_parse_unknown_function_is_syntax_error() {
        let result = parse("unsupported_aggregation_over_time(some_metric[5m])");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_query() {
        assert!(parse("http_requests_total{job=}").is_err());
        assert!(parse("rate(x[])").is_err());
        assert!(parse("sum by (job").is_err());
    }
}
