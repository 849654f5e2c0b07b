use serde::{Deserialize, Serialize};

use crate::error::SearchError;

pub type Score = i32;

/// Most negative score; seeds the maximizer's accumulator and scores an
/// unbounded loss.
pub const SCORE_MIN: Score = i32::MIN;
/// Most positive score; seeds the minimizer's accumulator and scores an
/// unbounded win.
pub const SCORE_MAX: Score = i32::MAX;

/// How a node's value was obtained. Later variants supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Scored without lookahead and without knowing whether the position is terminal.
    Static,
    /// Scored knowing the position has no follow-ups.
    Leaf,
    /// Assigned by the search from its children.
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeValue {
    #[default]
    Unset,
    Static(Score),
    Leaf(Score),
    Explicit(Score),
}

impl NodeValue {
    pub fn tier(self) -> Option<Tier> {
        match self {
            NodeValue::Unset => None,
            NodeValue::Static(_) => Some(Tier::Static),
            NodeValue::Leaf(_) => Some(Tier::Leaf),
            NodeValue::Explicit(_) => Some(Tier::Explicit),
        }
    }

    pub fn score(self) -> Option<Score> {
        match self {
            NodeValue::Unset => None,
            NodeValue::Static(s) | NodeValue::Leaf(s) | NodeValue::Explicit(s) => Some(s),
        }
    }

    /// The cached score if it is at least `tier`.
    pub fn at_least(self, tier: Tier) -> Option<Score> {
        match self.tier() {
            Some(t) if t >= tier => self.score(),
            _ => None,
        }
    }

    pub fn get(self) -> Result<Score, SearchError> {
        self.score().ok_or(SearchError::UninitializedValue)
    }
}
