// Alpha-beta search over lazily expanded game trees
pub mod board;
pub mod error;
pub mod perft;
pub mod search;
pub mod synthetic;
pub mod tree;
pub mod uci;

pub use error::{NoChildren, SearchError};
pub use tree::{Evaluable, Expand, Node, NodeRef, Score, Tree};
