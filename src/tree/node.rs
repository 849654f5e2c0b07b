use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{NoChildren, SearchError};
use crate::tree::value::{NodeValue, Score, Tier};
use crate::tree::{Evaluable, Expand};

pub type NodeRef<T> = Rc<RefCell<Node<T>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    Pending,
    Expanded,
    Terminal,
}

/// A vertex of a game tree.
///
/// Children are owned; the parent link is weak and only used to walk upward.
/// A child is listed by its parent iff its parent link points back to it.
pub struct Node<T> {
    parent: Weak<RefCell<Node<T>>>,
    children: Vec<NodeRef<T>>,
    expansion: Expansion,
    content: T,
    value: NodeValue,
    static_cache: Option<Score>,
    interesting: bool,
    best: Weak<RefCell<Node<T>>>,
}

impl<T: Expand> Node<T> {
    pub fn new_root(content: T) -> NodeRef<T> {
        Rc::new(RefCell::new(Self::with_parent(content, Weak::new())))
    }

    fn with_parent(content: T, parent: Weak<RefCell<Node<T>>>) -> Self {
        let interesting = content.is_interesting();
        Self {
            parent,
            children: Vec::new(),
            expansion: Expansion::Pending,
            content,
            value: NodeValue::Unset,
            static_cache: None,
            interesting,
            best: Weak::new(),
        }
    }

    /// Generates the children of `this` once and returns them. Later calls
    /// return the same children without consulting the generator again, until
    /// they are deleted.
    pub fn expand(this: &NodeRef<T>) -> Result<Vec<NodeRef<T>>, NoChildren> {
        let mut node = this.borrow_mut();
        match node.expansion {
            Expansion::Expanded => return Ok(node.children.clone()),
            Expansion::Terminal => return Err(NoChildren),
            Expansion::Pending => {}
        }
        let follow_ups = match node.content.follow_ups() {
            Ok(f) if !f.is_empty() => f,
            _ => {
                node.expansion = Expansion::Terminal;
                return Err(NoChildren);
            }
        };
        node.children = follow_ups
            .into_iter()
            .map(|c| Rc::new(RefCell::new(Node::with_parent(c, Rc::downgrade(this)))))
            .collect();
        node.expansion = Expansion::Expanded;
        node.content.after_expansion();
        Ok(node.children.clone())
    }
}

impl<T: Evaluable> Node<T> {
    /// Static value, or the cached value if one of any tier is present.
    pub fn static_value(&mut self) -> Score {
        if let Some(s) = self.value.at_least(Tier::Static) {
            return s;
        }
        let s = self.static_score();
        self.value = NodeValue::Static(s);
        s
    }

    /// Terminal value, or the cached value if it is a leaf or explicit value.
    pub fn leaf_value(&mut self, ply: u32) -> Score {
        if let Some(s) = self.value.at_least(Tier::Leaf) {
            return s;
        }
        let s = self.content.terminal_score(ply);
        self.value = NodeValue::Leaf(s);
        s
    }

    /// Best value available without searching: the cached value if any, else
    /// the static score. Never generates children and never changes the
    /// node's value.
    pub fn estimate(&mut self) -> Score {
        match self.value.score() {
            Some(s) => s,
            None => self.static_score(),
        }
    }

    fn static_score(&mut self) -> Score {
        match self.static_cache {
            Some(s) => s,
            None => {
                let s = self.content.static_score();
                self.static_cache = Some(s);
                s
            }
        }
    }
}

impl<T> Node<T> {
    pub fn parent(&self) -> Option<NodeRef<T>> {
        self.parent.upgrade()
    }

    pub fn children(&self) -> &[NodeRef<T>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeRef<T>> {
        &mut self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }

    /// True once expansion has shown the position has no follow-ups.
    pub fn is_terminal(&self) -> bool {
        self.expansion == Expansion::Terminal
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut T {
        &mut self.content
    }

    pub fn value(&self) -> Result<Score, SearchError> {
        self.value.get()
    }

    pub fn node_value(&self) -> NodeValue {
        self.value
    }

    pub fn tier(&self) -> Option<Tier> {
        self.value.tier()
    }

    pub fn set_value(&mut self, score: Score) {
        self.value = NodeValue::Explicit(score);
    }

    pub(crate) fn restore_value(&mut self, value: NodeValue) {
        self.value = value;
    }

    /// Forgets the value of a previous pass. The static cache survives since it
    /// only depends on content.
    pub fn reset_value(&mut self) {
        self.value = NodeValue::Unset;
    }

    pub fn has_static_cache(&self) -> bool {
        self.static_cache.is_some()
    }

    pub fn is_interesting(&self) -> bool {
        self.interesting
    }

    pub fn set_interesting(&mut self, interesting: bool) {
        self.interesting = interesting;
    }

    pub fn best_child(&self) -> Option<NodeRef<T>> {
        self.best.upgrade()
    }

    pub(crate) fn set_best_child(&mut self, best: Option<&NodeRef<T>>) {
        self.best = best.map(Rc::downgrade).unwrap_or_default();
    }

    /// Detaches and drops all children. Returns how many were held.
    pub fn delete_children(&mut self) -> usize {
        let n = self.children.len();
        for child in self.children.drain(..) {
            child.borrow_mut().parent = Weak::new();
        }
        self.best = Weak::new();
        self.expansion = Expansion::Pending;
        n
    }

    /// Best-child chain starting below `this`, as recorded by the last search.
    pub fn principal_variation(this: &NodeRef<T>) -> Vec<NodeRef<T>> {
        let mut line = Vec::new();
        let mut cur = this.borrow().best_child();
        while let Some(n) = cur {
            cur = n.borrow().best_child();
            line.push(n);
        }
        line
    }

    /// Nodes from the topmost reachable ancestor down to `this`, inclusive.
    pub fn line_from_root(this: &NodeRef<T>) -> Vec<NodeRef<T>> {
        let mut line = vec![this.clone()];
        let mut cur = this.borrow().parent();
        while let Some(p) = cur {
            cur = p.borrow().parent();
            line.push(p);
        }
        line.reverse();
        line
    }

    /// Number of parent links between `this` and its topmost ancestor.
    pub fn depth(this: &NodeRef<T>) -> usize {
        Self::line_from_root(this).len() - 1
    }
}
