use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::tree::{Evaluable, NodeRef, Score};

/// Order in which a node's children are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildOrder {
    /// Generator order.
    #[default]
    Generated,
    /// Sorted by estimated value, most promising for the side to move first.
    Estimated,
}

/// Descending by estimate: children best for the maximizer come first.
pub fn favor_maximize(a: Score, b: Score) -> Ordering {
    b.cmp(&a)
}

/// Ascending by estimate: children best for the minimizer come first.
pub fn favor_minimize(a: Score, b: Score) -> Ordering {
    a.cmp(&b)
}

/// Stable sort of `children` for a parent where `maximizing` is to move.
///
/// Estimates are read once per child (cached value, else static score), so
/// comparison never expands anything.
pub fn order_children<T: Evaluable>(children: &mut [NodeRef<T>], maximizing: bool) {
    let cmp = if maximizing { favor_maximize } else { favor_minimize };
    let mut keyed: Vec<(Score, NodeRef<T>)> = children.iter().map(|c| (c.borrow_mut().estimate(), c.clone())).collect();
    keyed.sort_by(|a, b| cmp(a.0, b.0));
    for (slot, (_, node)) in children.iter_mut().zip(keyed) {
        *slot = node;
    }
}
