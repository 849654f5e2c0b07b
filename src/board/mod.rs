pub mod cozy;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("FEN error: {0}")]
    Fen(String),
    #[error("Illegal move: {0}")]
    IllegalMove(String),
}
