use std::collections::BTreeSet;

use super::{Validator, format_labels, to_set};
use crate::error::ValidationError;
use crate::promql::ast::Expr;
use crate::promql::walker::find_aggregations;

/// Requires every aggregation to group by exactly the expected labels
///
/// Only the label names are compared; `by` and `without` clauses are treated
/// alike. Queries without any aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregationGroupValidator {
    expected: BTreeSet<String>,
}

impl AggregationGroupValidator {
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected: to_set(expected),
        }
    }

    pub fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }
}

impl Validator for AggregationGroupValidator {
    fn name(&self) -> &'static str {
        "aggregation_group"
    }

    fn check(&self, expr: &Expr) -> Result<(), ValidationError> {
        let expected: BTreeSet<&str> = self.expected.iter().map(String::as_str).collect();

        for agg in find_aggregations(expr) {
            let grouping = agg.grouping_labels();
            if grouping == expected {
                continue;
            }

            let missing = expected.difference(&grouping).copied();
            let unexpected = grouping.difference(&expected).copied();
            return Err(ValidationError::new(
                self.name(),
                format!(
                    "aggregation '{}' groups by {}, expected {} (missing {}, unexpected {})",
                    agg.op,
                    format_labels(grouping.iter().copied()),
                    format_labels(expected.iter().copied()),
                    format_labels(missing),
                    format_labels(unexpected),
                ),
            ));
        }

        Ok(())
    }
}
