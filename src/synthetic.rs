//! Scripted game trees with fixed leaf scores.
//!
//! Used to check the engine against known answers and against an unpruned
//! minimax, and to benchmark variants without a real move generator.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::NoChildren;
use crate::tree::{Evaluable, Expand, Score, SCORE_MAX, SCORE_MIN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf(Score),
    /// `estimate` is the mean of the leaf scores below and serves as the static score.
    Branch { estimate: Score, children: Vec<Rc<Shape>> },
}

impl Shape {
    pub fn branch(children: Vec<Shape>) -> Shape {
        let (sum, count) = children.iter().fold((0i64, 0i64), |(s, c), ch| {
            let (s2, c2) = ch.leaf_sum();
            (s + s2, c + c2)
        });
        let estimate = if count == 0 { 0 } else { (sum / count) as Score };
        Shape::Branch { estimate, children: children.into_iter().map(Rc::new).collect() }
    }

    /// A root whose children are all leaves.
    pub fn leaves(scores: &[Score]) -> Shape {
        Shape::branch(scores.iter().map(|&s| Shape::Leaf(s)).collect())
    }

    /// A complete tree with `branching` children per node whose bottom level
    /// holds `scores` left to right.
    pub fn uniform(scores: &[Score], branching: usize) -> Shape {
        let b = branching.max(2);
        let mut level: Vec<Shape> = scores.iter().map(|&s| Shape::Leaf(s)).collect();
        while level.len() > 1 {
            level = level.chunks(b).map(|c| Shape::branch(c.to_vec())).collect();
        }
        level.pop().unwrap_or(Shape::Leaf(0))
    }

    pub fn binary(scores: &[Score]) -> Shape {
        Shape::uniform(scores, 2)
    }

    fn leaf_sum(&self) -> (i64, i64) {
        match self {
            Shape::Leaf(s) => (*s as i64, 1),
            Shape::Branch { children, .. } => children.iter().fold((0, 0), |(s, c), ch| {
                let (s2, c2) = ch.leaf_sum();
                (s + s2, c + c2)
            }),
        }
    }

    pub fn children(&self) -> &[Rc<Shape>] {
        match self {
            Shape::Leaf(_) => &[],
            Shape::Branch { children, .. } => children,
        }
    }

    pub fn static_score(&self) -> Score {
        match self {
            Shape::Leaf(s) => *s,
            Shape::Branch { estimate, .. } => *estimate,
        }
    }

    /// Longest root-to-leaf distance.
    pub fn depth(&self) -> u32 {
        self.children().iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    pub fn position(self) -> ScriptedPosition {
        ScriptedPosition::new(Rc::new(self))
    }
}

/// Parameters for [`Shape::random`].
#[derive(Debug, Clone, Copy)]
pub struct RandomTree {
    pub depth: u32,
    pub min_branching: usize,
    pub max_branching: usize,
    /// Chance that an inner node ends the game early.
    pub terminal_chance: f64,
    /// Chance that a leaf scores an extreme sentinel.
    pub sentinel_chance: f64,
    /// Standard deviation of leaf scores.
    pub spread: f64,
}

impl Default for RandomTree {
    fn default() -> Self {
        Self { depth: 4, min_branching: 1, max_branching: 4, terminal_chance: 0.1, sentinel_chance: 0.02, spread: 200.0 }
    }
}

impl Shape {
    pub fn random(params: RandomTree, seed: u64) -> Shape {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::random_with(&params, params.depth, true, &mut rng)
    }

    fn random_with(p: &RandomTree, depth: u32, root: bool, rng: &mut SmallRng) -> Shape {
        if depth == 0 || (!root && rng.gen_bool(p.terminal_chance.clamp(0.0, 1.0))) {
            if rng.gen_bool(p.sentinel_chance.clamp(0.0, 1.0)) {
                return Shape::Leaf(if rng.gen_bool(0.5) { SCORE_MIN } else { SCORE_MAX });
            }
            let z: f64 = rng.sample(StandardNormal);
            return Shape::Leaf((z * p.spread).round() as Score);
        }
        let lo = p.min_branching.max(1);
        let hi = p.max_branching.max(lo);
        let n = rng.gen_range(lo..=hi);
        Shape::branch((0..n).map(|_| Self::random_with(p, depth - 1, false, rng)).collect())
    }
}

/// Node content walking a [`Shape`].
#[derive(Debug, Clone)]
pub struct ScriptedPosition {
    shape: Rc<Shape>,
    label: usize,
    calls: Rc<Cell<u64>>,
}

impl ScriptedPosition {
    pub fn new(shape: Rc<Shape>) -> Self {
        Self { shape, label: 0, calls: Rc::new(Cell::new(0)) }
    }

    /// Index of this position among its parent's follow-ups.
    pub fn label(&self) -> usize {
        self.label
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Generator invocations across the whole tree this position belongs to.
    pub fn generator_calls(&self) -> u64 {
        self.calls.get()
    }
}

impl Evaluable for ScriptedPosition {
    fn static_score(&self) -> Score {
        self.shape.static_score()
    }

    fn terminal_score(&self, _ply: u32) -> Score {
        self.shape.static_score()
    }
}

impl Expand for ScriptedPosition {
    fn follow_ups(&mut self) -> Result<Vec<Self>, NoChildren> {
        self.calls.set(self.calls.get() + 1);
        let children = self.shape.children();
        if children.is_empty() {
            return Err(NoChildren);
        }
        Ok(children
            .iter()
            .enumerate()
            .map(|(label, shape)| ScriptedPosition { shape: shape.clone(), label, calls: self.calls.clone() })
            .collect())
    }
}

/// Unpruned minimax. Returns the value and the index of the first child that
/// reaches it.
pub fn minimax(shape: &Shape, depth: u32, maximizing: bool) -> (Score, Option<usize>) {
    let children = shape.children();
    if depth == 0 || children.is_empty() {
        return (shape.static_score(), None);
    }
    let mut best: Option<(Score, usize)> = None;
    for (i, child) in children.iter().enumerate() {
        let (v, _) = minimax(child, depth - 1, !maximizing);
        let better = match best {
            None => true,
            Some((b, _)) => if maximizing { v > b } else { v < b },
        };
        if better {
            best = Some((v, i));
        }
    }
    match best {
        Some((v, i)) => (v, Some(i)),
        None => (shape.static_score(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_tree_has_expected_depth() {
        let s = Shape::binary(&[-1, 3, 5, 1, -6, -4, 0, 9]);
        assert_eq!(s.depth(), 3);
        assert_eq!(s.node_count(), 15);
        assert_eq!(s.static_score(), 7 / 8);
    }

    #[test]
    fn minimax_matches_known_answers() {
        let s = Shape::binary(&[-1, 3, 5, 1, -6, -4, 0, 9]);
        assert_eq!(minimax(&s, 3, true), (3, Some(0)));
        assert_eq!(minimax(&s, 3, false), (0, Some(1)));
    }

    #[test]
    fn random_trees_are_reproducible() {
        let p = RandomTree::default();
        assert_eq!(Shape::random(p, 7), Shape::random(p, 7));
        assert!(Shape::random(p, 7).depth() <= p.depth);
    }

    #[test]
    fn leaves_have_no_follow_ups() {
        let mut pos = Shape::Leaf(4).position();
        assert_eq!(pos.follow_ups().err(), Some(NoChildren));
        assert_eq!(pos.generator_calls(), 1);
    }
}
