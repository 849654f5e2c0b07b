use crate::board::cozy::ChessPosition;
use crate::tree::Expand;

// Perft over the follow-up generator that feeds the search tree
pub fn perft(pos: &ChessPosition, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut pos = pos.clone();
    match pos.follow_ups() {
        Ok(children) if depth == 1 => children.len() as u64,
        Ok(children) => children.iter().map(|c| perft(c, depth - 1)).sum(),
        Err(_) => 0,
    }
}
