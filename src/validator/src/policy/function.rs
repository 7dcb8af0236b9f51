use std::collections::BTreeSet;

use super::{Validator, to_set};
use crate::error::ValidationError;
use crate::promql::ast::Expr;
use crate::promql::walker::find_calls;

/// Rejects calls to blacklisted functions anywhere in a query
///
/// Aggregation operators are not function calls and are never matched.
#[derive(Debug, Clone)]
pub struct FunctionValidator {
    blacklisted: BTreeSet<String>,
}

impl FunctionValidator {
    pub fn new<I, S>(blacklisted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blacklisted: to_set(blacklisted),
        }
    }

    pub fn blacklisted(&self) -> &BTreeSet<String> {
        &self.blacklisted
    }
}

impl Validator for FunctionValidator {
    fn name(&self) -> &'static str {
        "function"
    }

    fn check(&self, expr: &Expr) -> Result<(), ValidationError> {
        match find_calls(expr).find(|call| self.blacklisted.contains(&call.name)) {
            Some(call) => Err(ValidationError::new(
                self.name(),
                format!("using blacklisted function '{}'", call.name),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promql::parser::parse;

    fn check(blacklisted: &[&str], query: &str) -> Result<(), ValidationError> {
        FunctionValidator::new(blacklisted.iter().copied()).check(&parse(query).unwrap())
    }

    #[test]
    fn test_call_inside_aggregation_fails() {
        let query = r#"avg by (group, name)(absent_over_time(label_replace(some_metric, "name", "$1", "othername", "(.*)")[6h:])) > 5"#;
        let err = check(&["absent", "absent_over_time"], query).unwrap_err();
        assert_eq!(err.rule, "function");
        assert_eq!(err.message, "using blacklisted function 'absent_over_time'");
    }

    #[test]
    fn test_call_as_argument_fails() {
        let err = check(&["label_replace"], r#"sum_over_time(label_replace(m, "a", "$1", "b", "(.*)")[1h:])"#)
            .unwrap_err();
        assert!(err.message.contains("'label_replace'"));
    }

    #[test]
    fn test_aggregation_operator_is_not_a_call() {
        assert!(check(&["sum", "avg"], "sum by (job)(avg(foo))").is_ok());
    }

    #[test]
    fn test_query_without_blacklisted_call_passes() {
        assert!(check(&["absent"], "rate(foo[5m]) + irate(bar[5m])").is_ok());
        assert!(check(&["absent"], "foo > 1").is_ok());
    }
}
