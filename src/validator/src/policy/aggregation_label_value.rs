use super::{Validator, format_labels};
use crate::error::ValidationError;
use crate::promql::ast::Expr;
use crate::promql::walker::{find_aggregations, find_matchers};

/// Requires labels selecting a given value to be kept by enclosing aggregations
///
/// For every aggregation, each matcher inside it that selects `label_value`
/// (`=` or `=~` with that literal value) must name a label present in the
/// aggregation's grouping. Aggregations without such a matcher are not
/// constrained.
#[derive(Debug, Clone)]
pub struct AggregationLabelValueValidator {
    label_value: String,
}

impl AggregationLabelValueValidator {
    pub fn new(label_value: impl Into<String>) -> Self {
        Self {
            label_value: label_value.into(),
        }
    }

    pub fn label_value(&self) -> &str {
        &self.label_value
    }
}

impl Validator for AggregationLabelValueValidator {
    fn name(&self) -> &'static str {
        "aggregation_label_value"
    }

    fn check(&self, expr: &Expr) -> Result<(), ValidationError> {
        for agg in find_aggregations(expr) {
            let grouping = agg.grouping_labels();

            let offending = find_matchers(&agg.expr)
                .map(|(matcher, _)| matcher)
                .filter(|matcher| matcher.matches_value(&self.label_value))
                .find(|matcher| !grouping.contains(matcher.name.as_str()));

            if let Some(matcher) = offending {
                return Err(ValidationError::new(
                    self.name(),
                    format!(
                        "label '{}' selecting value '{}' ({}) is not in the grouping {} of aggregation '{}'",
                        matcher.name,
                        self.label_value,
                        matcher,
                        format_labels(grouping.iter().copied()),
                        agg.op,
                    ),
                ));
            }
        }

        Ok(())
    }
}
