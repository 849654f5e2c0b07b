//! Game trees with lazily generated children and cached node values.
//!
//! A [`Tree`] owns its root [`Node`]; every node owns its children and keeps
//! a weak link back to its parent. Children are produced on demand through
//! the [`Expand`] contract and scored through [`Evaluable`].

pub mod node;
pub mod value;

use std::rc::Rc;

pub use node::{Node, NodeRef};
pub use value::{NodeValue, Score, Tier, SCORE_MAX, SCORE_MIN};

use crate::error::NoChildren;

/// Scoring contract for node content.
pub trait Evaluable {
    /// Score without lookahead. Must not depend on whether follow-ups exist.
    fn static_score(&self) -> Score;

    /// Score of a position already known to have no follow-ups, reached `ply`
    /// half-moves below the search root. May differ from `static_score` for
    /// the same position.
    fn terminal_score(&self, ply: u32) -> Score;
}

/// Move generation contract for node content.
pub trait Expand: Evaluable + Sized {
    /// Legal follow-up positions in generator order. `Err(NoChildren)` (or an
    /// empty list) marks a terminal position.
    fn follow_ups(&mut self) -> Result<Vec<Self>, NoChildren>;

    /// Called once children have been materialised. Content may drop state that
    /// was only needed to generate them.
    fn after_expansion(&mut self) {}

    /// Move-ordering hint copied onto the node when it is created.
    fn is_interesting(&self) -> bool {
        false
    }
}

/// Handle to the root of a game tree.
pub struct Tree<T> {
    root: NodeRef<T>,
}

impl<T: Expand> Tree<T> {
    pub fn new(content: T) -> Self {
        Self { root: Node::new_root(content) }
    }
}

impl<T> Tree<T> {
    pub fn from_root(root: NodeRef<T>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NodeRef<T> {
        &self.root
    }

    /// Visits every node currently in the tree, parents before children, with
    /// its distance from the root.
    pub fn for_each(&self, mut f: impl FnMut(&NodeRef<T>, usize)) {
        fn walk<T>(node: &NodeRef<T>, ply: usize, f: &mut impl FnMut(&NodeRef<T>, usize)) {
            f(node, ply);
            let children: Vec<NodeRef<T>> = node.borrow().children().to_vec();
            for child in &children {
                walk(child, ply + 1, f);
            }
        }
        walk(&self.root, 0, &mut f);
    }

    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.for_each(|_, _| n += 1);
        n
    }

    /// Distance from the root to the deepest node currently held.
    pub fn held_depth(&self) -> usize {
        let mut deepest = 0;
        self.for_each(|_, ply| deepest = deepest.max(ply));
        deepest
    }

    /// Drops every generated node below the root.
    pub fn clear(&self) {
        self.root.borrow_mut().delete_children();
    }

    pub fn is_root(&self, node: &NodeRef<T>) -> bool {
        Rc::ptr_eq(&self.root, node)
    }
}
