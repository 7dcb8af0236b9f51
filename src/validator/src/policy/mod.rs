//! Query policy validators
//!
//! Each validator is configured once with its policy parameters and then
//! checks any number of queries. A check parses the query, walks the tree and
//! stops at the first violation it finds.
//!
//! ```ignore
//! use validator::policy::{AggregationGroupValidator, Validator};
//!
//! let validator = AggregationGroupValidator::new(["job"]);
//! validator.validate("sum by (job)(rate(http_requests_total[5m]))")?;
//! ```

mod aggregation_function;
mod aggregation_group;
mod aggregation_label_value;
mod function;
mod set;

use std::collections::BTreeSet;

pub use aggregation_function::AggregationFunctionValidator;
pub use aggregation_group::AggregationGroupValidator;
pub use aggregation_label_value::AggregationLabelValueValidator;
pub use function::FunctionValidator;
pub use set::PolicySet;

use crate::error::{Result, ValidationError};
use crate::promql::ast::Expr;
use crate::promql::parser;

/// A policy rule over PromQL queries
///
/// Implementations hold only their immutable parameters, so one instance can
/// be shared between threads and reused for any number of queries.
pub trait Validator: Send + Sync {
    /// Short rule name used in logs and in [`ValidationError::rule`]
    fn name(&self) -> &'static str;

    /// Check an already parsed query
    fn check(&self, expr: &Expr) -> Result<(), ValidationError>;

    /// Parse `query` and check it
    ///
    /// Parse failures are returned as [`crate::Error::Syntax`] and are never
    /// reported as policy violations.
    #[tracing::instrument(level = "debug", skip_all, fields(rule = self.name()))]
    fn validate(&self, query: &str) -> Result<()> {
        let expr = parser::parse(query)?;
        match self.check(&expr) {
            Ok(()) => {
                log::debug!("Query passed {} policy", self.name());
                Ok(())
            }
            Err(violation) => {
                log::info!("Query rejected by {} policy: {}", self.name(), violation);
                Err(violation.into())
            }
        }
    }
}

fn to_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn format_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    format!("{{{}}}", labels.into_iter().collect::<Vec<_>>().join(", "))
}
