use std::ops::AddAssign;

use serde::Serialize;

/// Evaluation counters collected by the engine.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes entered by the recursion.
    pub nodes: u64,
    /// Depth-exhausted leaves scored statically.
    pub static_evals: u64,
    /// Terminal leaves scored with terminal knowledge.
    pub terminal_evals: u64,
    /// Nodes whose children were generated during the search.
    pub expansions: u64,
    /// Sibling loops stopped early by an alpha or beta cutoff.
    pub cutoffs: u64,
    /// Direct children dropped by the retention policy.
    pub deleted: u64,
}

impl SearchStats {
    pub fn leaf_evals(&self) -> u64 {
        self.static_evals + self.terminal_evals
    }
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, o: Self) {
        self.nodes += o.nodes;
        self.static_evals += o.static_evals;
        self.terminal_evals += o.terminal_evals;
        self.expansions += o.expansions;
        self.cutoffs += o.cutoffs;
        self.deleted += o.deleted;
    }
}
