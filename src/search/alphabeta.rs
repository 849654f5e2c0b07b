use std::time::{Duration, Instant};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::search::ordering::{order_children, ChildOrder};
use crate::search::retention::{Retention, Variant};
use crate::search::stats::SearchStats;
use crate::tree::{Expand, Node, NodeRef, Score, SCORE_MAX, SCORE_MIN};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Maximum depth for iterative deepening; fixed depth for a single search.
    pub depth: u32,
    /// Wall-clock budget in milliseconds.
    pub movetime_ms: Option<u64>,
    pub retention: Retention,
    pub ordering: ChildOrder,
}

impl SearchParams {
    pub fn with_variant(mut self, v: Variant) -> Self {
        self.retention = v.retention();
        self.ordering = v.ordering();
        self
    }

    pub fn movetime(&self) -> Option<Duration> {
        self.movetime_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    /// Depth budget used up; scored statically without expanding.
    DepthExhausted,
    /// Expansion found no follow-ups.
    Terminal,
    Inner,
}

/// Alpha-beta minimax over a [`Node`] tree.
///
/// Stores each searched node's value on the node and returns its best child.
/// Retention and child order are configurable.
pub struct Searcher {
    retention: Retention,
    ordering: ChildOrder,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl Default for Searcher {
    fn default() -> Self {
        Self { retention: Retention::KeepAll, ordering: ChildOrder::Generated, deadline: None, stats: SearchStats::default() }
    }
}

impl Searcher {
    pub fn new(retention: Retention, ordering: ChildOrder) -> Self {
        Self { retention, ordering, ..Self::default() }
    }

    pub fn from_params(params: &SearchParams) -> Self {
        Self::new(params.retention, params.ordering)
    }

    pub fn variant(v: Variant) -> Self {
        Self::new(v.retention(), v.ordering())
    }

    pub fn retention(&self) -> Retention { self.retention }
    pub fn ordering(&self) -> ChildOrder { self.ordering }

    /// Searches abort with [`SearchError::Timeout`] once `deadline` has passed.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Searches `depth` plies below `node` with a full window and returns its
    /// best child, or `None` when `node` itself is a leaf. The node's value is
    /// left on the node.
    pub fn best_child<T: Expand>(&mut self, node: &NodeRef<T>, depth: u32, maximizing: bool) -> Result<Option<NodeRef<T>>, SearchError> {
        Ok(self.principal_variation(node, depth, maximizing)?.into_iter().next())
    }

    /// Searches like [`Searcher::best_child`] and returns the whole best line
    /// below `node`, best child first. The line holds its nodes alive even when
    /// the retention policy has already detached them from the tree.
    pub fn principal_variation<T: Expand>(&mut self, node: &NodeRef<T>, depth: u32, maximizing: bool) -> Result<Vec<NodeRef<T>>, SearchError> {
        self.alphabeta(node, depth, 0, SCORE_MIN, SCORE_MAX, maximizing)
    }

    /// Like [`Searcher::best_child`] but also reads back the node's value.
    pub fn evaluate<T: Expand>(&mut self, node: &NodeRef<T>, depth: u32, maximizing: bool) -> Result<(Score, Option<NodeRef<T>>), SearchError> {
        let best = self.best_child(node, depth, maximizing)?;
        let score = node.borrow().value()?;
        Ok((score, best))
    }

    fn check_deadline(&self) -> Result<(), SearchError> {
        match self.deadline {
            Some(dl) if Instant::now() >= dl => Err(SearchError::Timeout),
            _ => Ok(()),
        }
    }

    fn classify<T: Expand>(&mut self, node: &NodeRef<T>, depth: u32) -> LeafKind {
        if depth == 0 {
            return LeafKind::DepthExhausted;
        }
        let fresh = !node.borrow().is_expanded();
        match Node::expand(node) {
            Ok(_) => {
                if fresh { self.stats.expansions += 1; }
                LeafKind::Inner
            }
            Err(_) => LeafKind::Terminal,
        }
    }

    fn alphabeta<T: Expand>(
        &mut self,
        node: &NodeRef<T>,
        depth: u32,
        ply: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Result<Vec<NodeRef<T>>, SearchError> {
        self.check_deadline()?;
        self.stats.nodes += 1;
        node.borrow_mut().reset_value();

        match self.classify(node, depth) {
            LeafKind::DepthExhausted => {
                node.borrow_mut().static_value();
                self.stats.static_evals += 1;
                return Ok(Vec::new());
            }
            LeafKind::Terminal => {
                node.borrow_mut().leaf_value(ply);
                self.stats.terminal_evals += 1;
                return Ok(Vec::new());
            }
            LeafKind::Inner => {}
        }

        let children = {
            let mut n = node.borrow_mut();
            if self.ordering == ChildOrder::Estimated {
                order_children(n.children_mut(), maximizing);
            }
            n.children().to_vec()
        };
        if children.is_empty() {
            return Err(SearchError::Inconsistent(format!("inner node at ply {} has no children", ply)));
        }

        let mut working = if maximizing { SCORE_MIN } else { SCORE_MAX };
        let mut best: Option<(NodeRef<T>, Vec<NodeRef<T>>)> = None;
        for child in &children {
            let line = self.alphabeta(child, depth - 1, ply + 1, alpha, beta, !maximizing)?;
            let v = child.borrow().value()?;
            let improves = match best {
                None => true,
                Some(_) => if maximizing { v > working } else { v < working },
            };
            if improves {
                working = v;
                best = Some((child.clone(), line));
            }
            if maximizing {
                if working > alpha { alpha = working; }
                if working >= beta {
                    self.stats.cutoffs += 1;
                    trace!("beta cutoff at ply {} value {} beta {}", ply, working, beta);
                    break;
                }
            } else {
                if working < beta { beta = working; }
                if working <= alpha {
                    self.stats.cutoffs += 1;
                    trace!("alpha cutoff at ply {} value {} alpha {}", ply, working, alpha);
                    break;
                }
            }
        }

        {
            let mut n = node.borrow_mut();
            n.set_value(working);
            n.set_best_child(best.as_ref().map(|(b, _)| b));
            if self.retention.deletes_at(ply) {
                self.stats.deleted += n.delete_children() as u64;
            }
        }
        Ok(match best {
            Some((child, below)) => {
                let mut line = Vec::with_capacity(below.len() + 1);
                line.push(child);
                line.extend(below);
                line
            }
            None => Vec::new(),
        })
    }
}
