use std::collections::BTreeSet;

use super::{Validator, to_set};
use crate::error::ValidationError;
use crate::promql::ast::Expr;
use crate::promql::walker::find_aggregations;

/// Rejects aggregation operators on a blacklist
///
/// Only the aggregation operator itself is checked. Range functions such as
/// `avg_over_time` are calls, not aggregations, and are left alone.
#[derive(Debug, Clone)]
pub struct AggregationFunctionValidator {
    blacklisted: BTreeSet<String>,
}

impl AggregationFunctionValidator {
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

impl Validator for AggregationFunctionValidator {
    fn name(&self) -> &'static str {
        "aggregation_function"
    }

    fn check(&self, expr: &Expr) -> Result<(), ValidationError> {
        match find_aggregations(expr).find(|agg| self.blacklisted.contains(&agg.op)) {
            Some(agg) => Err(ValidationError::new(
                self.name(),
                format!("using blacklisted aggregator '{}'", agg.op),
            )),
            None => Ok(()),
        }
    }
}
