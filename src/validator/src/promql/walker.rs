//! Pre-order traversal over [`Expr`] trees
//!
//! Every helper here returns a lazy iterator backed by its own stack, so a
//! traversal never recurses and each call starts from scratch.

use super::ast::{AggregateExpr, Call, Expr, LabelMatcher, VectorSelector};

/// Depth-first, pre-order iterator over every node of a tree
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the leftmost child is visited first
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

/// Walk `root` and all of its descendants
pub fn walk(root: &Expr) -> Walk<'_> {
    Walk { stack: vec![root] }
}

/// Every node in the subtree for which `predicate` holds
pub fn find_all<'a, P>(root: &'a Expr, predicate: P) -> impl Iterator<Item = &'a Expr>
where
    P: Fn(&Expr) -> bool,
{
    walk(root).filter(move |node| predicate(*node))
}

pub fn is_aggregation(expr: &Expr) -> bool {
    matches!(expr, Expr::Aggregate(_))
}

pub fn is_any_call(expr: &Expr) -> bool {
    matches!(expr, Expr::Call(_))
}

/// Predicate matching calls of the function `name`
pub fn is_call(name: &str) -> impl Fn(&Expr) -> bool + '_ {
    move |expr| matches!(expr, Expr::Call(call) if call.name == name)
}

/// All aggregation nodes, outermost first
pub fn find_aggregations(root: &Expr) -> impl Iterator<Item = &AggregateExpr> {
    walk(root).filter_map(|node| match node {
        Expr::Aggregate(agg) => Some(agg),
        _ => None,
    })
}

/// All function calls, including calls nested in other calls' arguments
pub fn find_calls(root: &Expr) -> impl Iterator<Item = &Call> {
    walk(root).filter_map(|node| match node {
        Expr::Call(call) => Some(call),
        _ => None,
    })
}

pub fn find_calls_named<'a>(root: &'a Expr, name: &'a str) -> impl Iterator<Item = &'a Call> {
    find_calls(root).filter(move |call| call.name == name)
}

/// Every label matcher in the subtree, paired with the selector owning it
pub fn find_matchers(root: &Expr) -> impl Iterator<Item = (&LabelMatcher, &VectorSelector)> {
    walk(root)
        .filter_map(Expr::selector)
        .flat_map(|vs| vs.all_matchers().map(move |matcher| (matcher, vs)))
}
