use std::cell::OnceCell;

use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};
use rayon::prelude::*;

use crate::board::BoardError;
use crate::error::NoChildren;
use crate::search::eval::{static_eval_cp, terminal_eval_cp};
use crate::tree::{Evaluable, Expand, Score};

/// Minimum number of legal moves before children are built on the rayon pool.
const PARALLEL_MIN_MOVES: usize = 24;

/// Chess position used as node content. Remembers the move that produced it.
#[derive(Clone, Debug)]
pub struct ChessPosition {
    board: CozyBoard,
    last_move: Option<Move>,
    interesting: bool,
    parallel: bool,
    legal: OnceCell<Vec<Move>>,
}

impl ChessPosition {
    pub fn startpos() -> Self {
        Self::from_board(CozyBoard::default())
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        CozyBoard::from_fen(fen, false).map(Self::from_board).map_err(|e| BoardError::Fen(format!("{e:?}")))
    }

    pub fn from_board(board: CozyBoard) -> Self {
        Self { board, last_move: None, interesting: false, parallel: false, legal: OnceCell::new() }
    }

    /// Builds children on the rayon pool when there are many of them. Inherited
    /// by every follow-up.
    pub fn with_parallel_expansion(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn last_move(&self) -> Option<Move> { self.last_move }

    /// UCI text of the move that produced this position. Castling is shown as
    /// the king's two-square step.
    pub fn last_move_uci(&self) -> Option<String> {
        self.last_move.map(|m| format!("{}", m))
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// White maximizes, Black minimizes.
    pub fn white_to_move(&self) -> bool {
        self.board.side_to_move() == Color::White
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), BoardError> {
        let found = self.legal_moves().iter().copied().find(|&m| format!("{}", uci_form(&self.board, m)) == mv_uci);
        match found {
            Some(m) => {
                let shown = uci_form(&self.board, m);
                self.board.play(m);
                self.last_move = Some(shown);
                self.legal = OnceCell::new();
                Ok(())
            }
            None => Err(BoardError::IllegalMove(mv_uci.to_string())),
        }
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn legal_moves_count(&self) -> usize {
        self.legal_moves().len()
    }

    fn legal_moves(&self) -> &[Move] {
        self.legal.get_or_init(|| {
            let mut moves = Vec::with_capacity(64);
            self.board.generate_moves(|ml| { moves.extend(ml); false });
            moves
        })
    }

    fn child(parent: &CozyBoard, m: Move, parallel: bool) -> Self {
        let opp = if parent.side_to_move() == Color::White { Color::Black } else { Color::White };
        let capture = parent.color_on(m.to) == Some(opp);
        let mut board = parent.clone();
        board.play(m);
        let check = !board.checkers().is_empty();
        Self { board, last_move: Some(uci_form(parent, m)), interesting: capture || check, parallel, legal: OnceCell::new() }
    }
}

impl Evaluable for ChessPosition {
    fn static_score(&self) -> Score {
        static_eval_cp(&self.board, self.legal_moves_count())
    }

    fn terminal_score(&self, ply: u32) -> Score {
        terminal_eval_cp(&self.board, ply)
    }
}

impl Expand for ChessPosition {
    fn follow_ups(&mut self) -> Result<Vec<Self>, NoChildren> {
        let moves = self.legal_moves();
        if moves.is_empty() {
            return Err(NoChildren);
        }
        let (board, parallel) = (&self.board, self.parallel);
        // The move list lives in a OnceCell, which is not Sync; hand rayon the
        // board alone.
        let children = if parallel && moves.len() >= PARALLEL_MIN_MOVES {
            moves.to_vec().into_par_iter().map(|m| Self::child(board, m, parallel)).collect()
        } else {
            moves.iter().map(|&m| Self::child(board, m, parallel)).collect()
        };
        Ok(children)
    }

    fn after_expansion(&mut self) {
        self.legal = OnceCell::new();
    }

    fn is_interesting(&self) -> bool {
        self.interesting
    }
}

// cozy-chess encodes castling as king-takes-rook; UCI wants the king's two-square step.
fn uci_form(board: &CozyBoard, m: Move) -> Move {
    let castles = board.piece_on(m.from) == Some(Piece::King) && board.colors(board.side_to_move()).has(m.to);
    if !castles {
        return m;
    }
    let file = if m.to.file() as u8 > m.from.file() as u8 { File::G } else { File::C };
    Move { from: m.from, to: Square::new(file, m.from.rank()), promotion: None }
}

/// Colour-mirrors a FEN: ranks flipped, piece colours and side to move swapped.
pub fn mirror_fen(fen: &str) -> Result<String, BoardError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(BoardError::Fen(format!("expected at least 4 fields: {fen}")));
    }
    let swap = |c: char| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() };
    let placement: Vec<String> = fields[0].split('/').rev().map(|rank| rank.chars().map(swap).collect()).collect();
    let side = match fields[1] {
        "w" => "b",
        "b" => "w",
        other => return Err(BoardError::Fen(format!("bad side to move: {other}"))),
    };
    let castling = if fields[2] == "-" {
        "-".to_string()
    } else {
        let swapped: String = fields[2].chars().map(swap).collect();
        "KQkq".chars().filter(|c| swapped.contains(*c)).collect()
    };
    let ep = if fields[3] == "-" { "-".to_string() } else { mirror_squares(fields[3]) };
    let mut out = vec![placement.join("/"), side.to_string(), castling, ep];
    out.extend(fields[4..].iter().map(|s| s.to_string()));
    Ok(out.join(" "))
}

/// Mirrors the ranks of every square in a UCI move (`e2e4` -> `e7e5`).
pub fn mirror_move(uci: &str) -> String {
    mirror_squares(uci)
}

fn mirror_squares(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(r @ 1..=8) => char::from_digit(9 - r, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_follow_ups() {
        let mut p = ChessPosition::startpos();
        let kids = p.follow_ups().unwrap();
        assert_eq!(kids.len(), 20);
        assert!(kids.iter().all(|k| k.last_move().is_some() && !k.white_to_move()));
        assert!(kids.iter().all(|k| !k.is_interesting()));
    }

    #[test]
    fn parallel_expansion_keeps_generator_order() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut serial = ChessPosition::from_fen(fen).unwrap();
        let mut parallel = ChessPosition::from_fen(fen).unwrap().with_parallel_expansion(true);
        let a: Vec<_> = serial.follow_ups().unwrap().iter().map(|c| c.last_move()).collect();
        let b: Vec<_> = parallel.follow_ups().unwrap().iter().map(|c| c.last_move()).collect();
        assert_eq!(a.len(), 48);
        assert_eq!(a, b);
    }

    #[test]
    fn captures_are_interesting() {
        let mut p = ChessPosition::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").unwrap();
        let kids = p.follow_ups().unwrap();
        let cap = kids.iter().find(|k| k.last_move_uci().as_deref() == Some("e2d2")).unwrap();
        assert!(cap.is_interesting());
    }

    #[test]
    fn checkmate_has_no_follow_ups() {
        let mut p = ChessPosition::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert_eq!(p.follow_ups().err(), Some(NoChildren));
    }

    #[test]
    fn mirror_fen_round_trips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w Kq - 0 1";
        let m = mirror_fen(fen).unwrap();
        assert_eq!(m, "r3k2r/pppbbppp/2n2q1P/1P2p3/3pn3/BN2PNP1/P1PPQPB1/R3K2R b Qk - 0 1");
        assert_eq!(mirror_fen(&m).unwrap(), fen);
        assert!(ChessPosition::from_fen(&m).is_ok());
        let ep = mirror_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(ep, "rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 1");
        assert_eq!(mirror_move("e2d2"), "e7d7");
        assert_eq!(mirror_move("a7a8q"), "a2a1q");
    }

    #[test]
    fn castling_uses_uci_king_squares() {
        let mut p = ChessPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves: Vec<String> = p.follow_ups().unwrap().iter().filter_map(|c| c.last_move_uci()).collect();
        assert!(moves.iter().any(|m| m == "e1g1"));
        assert!(moves.iter().any(|m| m == "e1c1"));
        assert!(!moves.iter().any(|m| m == "e1h1"));
        p.make_move_uci("e1g1").unwrap();
        assert_eq!(p.last_move_uci().as_deref(), Some("e1g1"));
    }

    #[test]
    fn illegal_uci_move_is_rejected() {
        let mut p = ChessPosition::startpos();
        assert_eq!(p.make_move_uci("e2e5"), Err(BoardError::IllegalMove("e2e5".into())));
        assert!(p.make_move_uci("e2e4").is_ok());
        assert!(!p.white_to_move());
    }
}
