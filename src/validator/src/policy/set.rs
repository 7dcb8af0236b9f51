use common::config::PolicyConfig;

use super::{
    AggregationFunctionValidator, AggregationGroupValidator, AggregationLabelValueValidator,
    FunctionValidator, Validator,
};
use crate::error::{Result, ValidationError};
use crate::promql::ast::Expr;
use crate::promql::parser;

/// Ordered group of validators applied to the same query
///
/// The query is parsed once; validators run in insertion order and the first
/// violation is returned.
#[derive(Default)]
pub struct PolicySet {
    validators: Vec<Box<dyn Validator>>,
}

impl std::fmt::Debug for PolicySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|v| v.name()))
            .finish()
    }
}

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the validators enabled in `config`
    ///
    /// Absent or empty entries leave the matching validator out.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut set = Self::new();

        if let Some(expected) = &config.aggregation_group {
            set.push(AggregationGroupValidator::new(expected.iter().cloned()));
        }
        if let Some(label_value) = &config.aggregation_label_value {
            set.push(AggregationLabelValueValidator::new(label_value.clone()));
        }
        if !config.blacklisted_aggregators.is_empty() {
            set.push(AggregationFunctionValidator::new(
                config.blacklisted_aggregators.iter().cloned(),
            ));
        }
        if !config.blacklisted_functions.is_empty() {
            set.push(FunctionValidator::new(
                config.blacklisted_functions.iter().cloned(),
            ));
        }

        log::debug!("Built policy set {set:?}");
        set
    }

    pub fn push<V: Validator + 'static>(&mut self, validator: V) {
        self.validators.push(Box::new(validator));
    }

    pub fn with<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.push(validator);
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Names of the contained validators, in order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.validators.iter().map(|v| v.name())
    }
}

impl Validator for PolicySet {
    fn name(&self) -> &'static str {
        "policy_set"
    }

    fn check(&self, expr: &Expr) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.check(expr))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(validators = self.len()))]
    fn validate(&self, query: &str) -> Result<()> {
        let expr = parser::parse(query)?;
        self.check(&expr).inspect_err(|violation| {
            log::info!("Query rejected by {} policy: {}", violation.rule, violation);
        })?;
        log::debug!("Query passed {} policies", self.len());
        Ok(())
    }
}
