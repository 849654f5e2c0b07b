use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::board::cozy::ChessPosition;
use crate::error::SearchError;
use crate::search::{DeepeningResult, IterativeDeepening, SearchParams, Variant};
use crate::tree::Tree;

const DEFAULT_DEPTH: u32 = 4;
const MAX_DEPTH: u32 = 64;

pub struct UciEngine {
    pos: ChessPosition,
    variant: Variant,
}

impl Default for UciEngine {
    fn default() -> Self { Self::new() }
}

impl UciEngine {
    pub fn new() -> Self { Self { pos: ChessPosition::startpos(), variant: Variant::Storing(2) } }

    pub fn with_variant(variant: Variant) -> Self { Self { variant, ..Self::new() } }

    pub fn position(&self) -> &ChessPosition { &self.pos }

    pub fn variant(&self) -> Variant { self.variant }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name abtree")?;
        writeln!(out, "id author abtree developers")?;
        writeln!(out, "option name Variant type string default {}", self.variant)?;
        writeln!(out, "uciok")
    }

    fn cmd_setoption(&mut self, args: &str) {
        // setoption name Variant value <variant>
        if let Some(v) = args.strip_prefix("name Variant value ") {
            match v.parse::<Variant>() {
                Ok(v) => self.variant = v,
                Err(e) => warn!("ignoring option: {}", e),
            }
        }
    }

    fn cmd_position(&mut self, args: &str) {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let mut tokens = args.split_whitespace();
        let base = match tokens.next() {
            Some("startpos") => Ok(ChessPosition::startpos()),
            Some("fen") => {
                let fen_fields: Vec<&str> = tokens.by_ref().take(6).collect();
                ChessPosition::from_fen(&fen_fields.join(" "))
            }
            _ => return,
        };
        let mut pos = match base {
            Ok(p) => p,
            Err(e) => { warn!("{}", e); return; }
        };
        if let Some("moves") = tokens.next() {
            for m in tokens {
                if let Err(e) = pos.make_move_uci(m) { warn!("{}", e); return; }
            }
        }
        self.pos = pos;
    }

    fn go_params(&self, args: &str) -> SearchParams {
        let mut params = SearchParams::default().with_variant(self.variant);
        params.depth = DEFAULT_DEPTH;
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "depth" => {
                    if let Some(d) = tokens.next().and_then(|s| s.parse::<u32>().ok()) { params.depth = d; }
                }
                "movetime" => {
                    if let Some(t) = tokens.next().and_then(|s| s.parse::<u64>().ok()) {
                        params.movetime_ms = Some(t);
                        params.depth = MAX_DEPTH;
                    }
                }
                _ => {}
            }
        }
        params
    }

    fn run_search(&self, params: SearchParams) -> Result<DeepeningResult<ChessPosition>, SearchError> {
        let tree = Tree::new(self.pos.clone());
        let white = self.pos.white_to_move();
        match IterativeDeepening::new(params).search(&tree, white) {
            Err(SearchError::BudgetExhausted) => {
                info!("budget too small for depth 1, searching depth 1 without deadline");
                let mut fallback = params;
                fallback.depth = 1;
                fallback.movetime_ms = None;
                IterativeDeepening::new(fallback).search(&tree, white)
            }
            r => r,
        }
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let params = self.go_params(args);
        let res = match self.run_search(params) {
            Ok(r) => r,
            Err(e) => {
                warn!("search failed: {}", e);
                return writeln!(out, "bestmove 0000");
            }
        };
        // UCI scores are from the side to move
        let sign = if self.pos.white_to_move() { 1 } else { -1 };
        let shown = res.iterations.len().saturating_sub(1);
        for it in &res.iterations[..shown] {
            writeln!(out, "info depth {} score cp {} nodes {} time {}", it.depth, sign * it.score, it.nodes, it.elapsed_ms)?;
        }
        let pv: Vec<String> = res.principal_variation().iter().filter_map(|n| n.borrow().content().last_move_uci()).collect();
        writeln!(
            out,
            "info depth {} score cp {} nodes {} time {} pv {}",
            res.depth, sign * res.score, res.stats.nodes, res.elapsed.as_millis(), pv.join(" ")
        )?;
        match res.best.as_ref().and_then(|b| b.borrow().content().last_move_uci()) {
            Some(best) => writeln!(out, "bestmove {}", best),
            None => writeln!(out, "bestmove 0000"),
        }
    }

    /// Handles one command line. Returns false on `quit`.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() { return Ok(true); }
        match line {
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.pos = ChessPosition::startpos(),
            "quit" => return Ok(false),
            "stop" => {}
            _ => {
                if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                else if let Some(rest) = line.strip_prefix("setoption ") { self.cmd_setoption(rest); }
                else if line == "go" { self.cmd_go("", out)?; }
                else if let Some(rest) = line.strip_prefix("go ") { self.cmd_go(rest, out)?; }
            }
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in stdin.lock().lines() {
            let line = line?;
            if !self.handle_line(&line, &mut out)? { break; }
        }
        Ok(())
    }
}
