use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Serialize;

use crate::error::SearchError;
use crate::search::alphabeta::{SearchParams, Searcher};
use crate::search::stats::SearchStats;
use crate::tree::{Expand, NodeRef, NodeValue, Score, Tree};

/// One finished iteration, for progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IterationReport {
    pub depth: u32,
    pub score: Score,
    /// Cumulative over all iterations so far.
    pub nodes: u64,
    pub cutoffs: u64,
    pub elapsed_ms: u128,
}

/// Last fully completed iteration.
pub struct DeepeningResult<T> {
    /// Best child of the root, `None` when the root is a leaf.
    pub best: Option<NodeRef<T>>,
    pub score: Score,
    /// Depth of the completed iteration that produced `best` and `score`.
    pub depth: u32,
    /// Counters over every iteration, including an abandoned one.
    pub stats: SearchStats,
    pub elapsed: Duration,
    /// True when the deadline cut a deeper iteration short.
    pub timed_out: bool,
    pub iterations: Vec<IterationReport>,
    line: Vec<NodeRef<T>>,
}

impl<T> DeepeningResult<T> {
    /// Best line of the completed iteration, starting with `best`. Never longer
    /// than `depth`.
    pub fn principal_variation(&self) -> &[NodeRef<T>] {
        &self.line
    }
}

/// Values and best line of a completed iteration.
///
/// An abandoned deeper pass resets values and rewires best-child links on the
/// nodes it visits; `restore` puts the completed iteration's state back. Line
/// nodes already detached by retention get their links back too, pointing at
/// nodes the line keeps alive.
struct Completed<T> {
    depth: u32,
    score: Score,
    line: Vec<NodeRef<T>>,
    // root first, then one per line node
    values: Vec<NodeValue>,
}

impl<T> Completed<T> {
    fn capture(root: &NodeRef<T>, line: Vec<NodeRef<T>>, depth: u32, score: Score) -> Self {
        let values = std::iter::once(root).chain(line.iter()).map(|n| n.borrow().node_value()).collect();
        Self { depth, score, line, values }
    }

    fn restore(&self, root: &NodeRef<T>) {
        let nodes = std::iter::once(root).chain(self.line.iter());
        for (i, (node, value)) in nodes.zip(&self.values).enumerate() {
            let mut n = node.borrow_mut();
            n.restore_value(*value);
            // line[i] is the best child of the node at position i (root = 0)
            n.set_best_child(self.line.get(i));
        }
    }
}

/// Re-runs the engine on the same root at depth 1, 2, ... until the maximum
/// depth is done or the wall-clock budget runs out.
pub struct IterativeDeepening {
    params: SearchParams,
    searcher: Searcher,
}

impl IterativeDeepening {
    pub fn new(params: SearchParams) -> Self {
        Self { searcher: Searcher::from_params(&params), params }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn search<T: Expand>(&mut self, tree: &Tree<T>, maximizing: bool) -> Result<DeepeningResult<T>, SearchError> {
        let start = Instant::now();
        let deadline = self.params.movetime().map(|d| start + d);
        self.searcher.set_deadline(deadline);
        self.searcher.reset_stats();

        let root = tree.root();
        let mut last: Option<Completed<T>> = None;
        let mut iterations = Vec::new();
        let mut timed_out = false;
        let max_depth = self.params.depth.max(1);

        for depth in 1..=max_depth {
            match self.searcher.principal_variation(root, depth, maximizing) {
                Ok(line) => {
                    let score = root.borrow().value()?;
                    let stats = self.searcher.stats();
                    let elapsed = start.elapsed();
                    debug!("depth {} score {} nodes {} cutoffs {} elapsed {:?}", depth, score, stats.nodes, stats.cutoffs, elapsed);
                    iterations.push(IterationReport {
                        depth,
                        score,
                        nodes: stats.nodes,
                        cutoffs: stats.cutoffs,
                        elapsed_ms: elapsed.as_millis(),
                    });
                    let leaf_root = line.is_empty();
                    last = Some(Completed::capture(root, line, depth, score));
                    if leaf_root {
                        // Deeper iterations cannot change a leaf root.
                        break;
                    }
                }
                Err(SearchError::Timeout) => {
                    info!("deadline hit during depth {}, keeping depth {}", depth, depth - 1);
                    timed_out = true;
                    break;
                }
                Err(e) => return Err(e),
            }
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    timed_out = depth < max_depth;
                    break;
                }
            }
        }

        let done = last.ok_or(SearchError::BudgetExhausted)?;
        // Undoes an abandoned pass, and relinks line nodes whose links the
        // retention policy cleared.
        done.restore(root);
        let result = DeepeningResult {
            best: done.line.first().cloned(),
            score: done.score,
            depth: done.depth,
            stats: self.searcher.stats(),
            elapsed: start.elapsed(),
            timed_out,
            iterations,
            line: done.line,
        };
        info!("completed depth {} score {} nodes {} in {:?}", result.depth, result.score, result.stats.nodes, result.elapsed);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Variant;
    use crate::synthetic::Shape;
    use crate::tree::Node;

    const DEPTH4: [Score; 16] = [8, 5, 6, -4, 3, 8, 4, -6, 1, Score::MIN, 5, 2, Score::MIN, Score::MIN, Score::MAX, Score::MAX];

    #[test]
    fn stops_early_on_leaf_root() {
        let tree = Tree::new(Shape::Leaf(3).position());
        let mut p = SearchParams::default();
        p.depth = 6;
        let r = IterativeDeepening::new(p).search(&tree, true).unwrap();
        assert!(r.best.is_none());
        assert!(r.principal_variation().is_empty());
        assert_eq!((r.score, r.depth), (3, 1));
        assert_eq!(r.iterations.len(), 1);
    }

    #[test]
    fn zero_budget_is_reported() {
        let tree = Tree::new(Shape::binary(&[1, 2, 3, 4]).position());
        let mut p = SearchParams::default();
        p.depth = 4;
        p.movetime_ms = Some(0);
        let r = IterativeDeepening::new(p).search(&tree, true);
        assert_eq!(r.err(), Some(SearchError::BudgetExhausted));
    }

    #[test]
    fn one_report_per_completed_depth() {
        let tree = Tree::new(Shape::binary(&DEPTH4).position());
        let mut p = SearchParams::default();
        p.depth = 4;
        let r = IterativeDeepening::new(p).search(&tree, true).unwrap();
        let depths: Vec<u32> = r.iterations.iter().map(|it| it.depth).collect();
        assert_eq!(depths, vec![1, 2, 3, 4]);
        assert_eq!(r.iterations.last().map(|it| it.score), Some(3));
        assert!(r.iterations.windows(2).all(|w| w[0].nodes <= w[1].nodes));
        assert_eq!(r.principal_variation().len(), 4);
    }

    #[test]
    fn restore_undoes_a_deeper_pass() {
        for variant in [Variant::Plain, Variant::Storing(2)] {
            let tree = Tree::new(Shape::binary(&DEPTH4).position());
            let root = tree.root();
            let mut s = Searcher::variant(variant);
            let line = s.principal_variation(root, 2, true).unwrap();
            let score = root.borrow().value().unwrap();
            let done = Completed::capture(root, line, 2, score);

            s.best_child(root, 4, true).unwrap();
            assert_eq!(root.borrow().value(), Ok(3));

            done.restore(root);
            assert_eq!(root.borrow().value(), Ok(score));
            let live = Node::principal_variation(root);
            assert_eq!(live.len(), 2, "{variant}");
            assert!(live.iter().zip(&done.line).all(|(a, b)| std::rc::Rc::ptr_eq(a, b)));
            assert!(done.line.iter().all(|n| n.borrow().value() == Ok(score)), "{variant}");
        }
    }
}
