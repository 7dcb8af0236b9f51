//! Policy validation for PromQL queries
//!
//! Queries submitted to alerting or dashboard configuration are checked
//! against grouping, labeling and function-usage policies before they are
//! accepted. Parsing is delegated to the promql-parser crate; this crate
//! walks the resulting tree and applies the configured rules.

pub mod error;
pub mod policy;
pub mod promql;

pub use error::{Error, PromQLSyntaxError, Result, ValidationError};
pub use policy::{
    AggregationFunctionValidator, AggregationGroupValidator, AggregationLabelValueValidator,
    FunctionValidator, PolicySet, Validator,
};
