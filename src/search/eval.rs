use cozy_chess::{Board, Color, Piece};

use crate::tree::Score;

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

/// Centipawns per legal move of the side to move.
pub const MOBILITY_CP: i32 = 2;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 30_000;
pub const DRAW_SCORE: i32 = 0;

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.into_iter().count() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    let w = Color::White;
    let b = Color::Black;
    (count_piece(board, w, Piece::Pawn) - count_piece(board, b, Piece::Pawn)) * PAWN
        + (count_piece(board, w, Piece::Knight) - count_piece(board, b, Piece::Knight)) * KNIGHT
        + (count_piece(board, w, Piece::Bishop) - count_piece(board, b, Piece::Bishop)) * BISHOP
        + (count_piece(board, w, Piece::Rook) - count_piece(board, b, Piece::Rook)) * ROOK
        + (count_piece(board, w, Piece::Queen) - count_piece(board, b, Piece::Queen)) * QUEEN
}

/// Static score from White's point of view: material plus the mobility of
/// whichever side is to move. Negates exactly under colour mirroring.
pub fn static_eval_cp(board: &Board, legal_moves: usize) -> Score {
    let mobility = legal_moves as i32 * MOBILITY_CP;
    let signed = if board.side_to_move() == Color::White { mobility } else { -mobility };
    material_eval_cp_side_agnostic(board) + signed
}

/// Score of a position with no legal moves, `ply` half-moves below the root.
/// Checkmates found sooner score further from zero.
pub fn terminal_eval_cp(board: &Board, ply: u32) -> Score {
    if board.checkers().is_empty() {
        return DRAW_SCORE;
    }
    let mate = MATE_SCORE - ply as i32;
    if board.side_to_move() == Color::White { -mate } else { mate }
}
