//! promval validates PromQL queries against policy rules before they are
//! accepted into alerting or dashboard configuration.
//!
//! See the `validator` crate for the rules and `common` for configuration
//! and logging.

pub use common::{config, logging};
pub use validator::*;
