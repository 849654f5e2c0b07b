pub mod alphabeta;
pub mod eval;
pub mod iterative;
pub mod ordering;
pub mod retention;
pub mod stats;

pub use alphabeta::{SearchParams, Searcher};
pub use iterative::{DeepeningResult, IterationReport, IterativeDeepening};
pub use ordering::ChildOrder;
pub use retention::{Retention, Variant};
pub use stats::SearchStats;
