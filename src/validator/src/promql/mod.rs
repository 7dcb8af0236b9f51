//! PromQL expression model and traversal
//!
//! ```text
//! PromQL String → Parser (promql-parser) → AST (Expr) → Walker → Policy checks
//! ```
//!
//! # Modules
//!
//! - [`parser`] - parsing through the promql-parser crate
//! - [`ast`] - the expression tree the policy checkers inspect
//! - [`walker`] - lazy pre-order traversal and node predicates
//!
//! Only aggregations, function calls and label matchers carry policy
//! meaning; other node kinds are kept so the walker can reach into them.

pub mod ast;
pub mod parser;
pub mod walker;
