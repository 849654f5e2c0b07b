use std::path::PathBuf;

use abtree::board::cozy::ChessPosition;
use abtree::search::{IterationReport, IterativeDeepening, SearchParams, SearchStats, Variant};
use abtree::tree::Tree;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "abtree-analyse", version, about = "Analyse one position with iterative-deepening alpha-beta")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// JSON file with search parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum depth
    #[arg(long)]
    depth: Option<u32>,

    /// Time budget in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Engine variant: plain, self-destructing, storing:N, ordered-self-destructing
    #[arg(long)]
    variant: Option<Variant>,

    /// Build children on the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    fen: String,
    bestmove: Option<String>,
    score_cp: i32,
    depth: u32,
    timed_out: bool,
    elapsed_ms: u128,
    pv: Vec<String>,
    stats: SearchStats,
    iterations: Vec<IterationReport>,
    params: SearchParams,
}

fn load_params(args: &Args) -> Result<SearchParams> {
    let mut params = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SearchParams { depth: 4, ..SearchParams::default() },
    };
    if let Some(v) = args.variant { params = params.with_variant(v); }
    if let Some(d) = args.depth { params.depth = d; }
    if args.movetime.is_some() { params.movetime_ms = args.movetime; }
    if params.depth == 0 { anyhow::bail!("depth must be at least 1"); }
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let params = load_params(&args)?;
    let pos = if args.fen == "startpos" { ChessPosition::startpos() } else { ChessPosition::from_fen(&args.fen)? };
    let white = pos.white_to_move();
    let tree = Tree::new(pos.with_parallel_expansion(args.parallel));

    let res = IterativeDeepening::new(params).search(&tree, white)?;
    let bestmove = res.best.as_ref().and_then(|b| b.borrow().content().last_move_uci());
    let pv: Vec<String> = res.principal_variation().iter().filter_map(|n| n.borrow().content().last_move_uci()).collect();

    if args.json {
        let report = Report {
            fen: args.fen.clone(),
            bestmove,
            score_cp: res.score,
            depth: res.depth,
            timed_out: res.timed_out,
            elapsed_ms: res.elapsed.as_millis(),
            pv,
            stats: res.stats,
            iterations: res.iterations.clone(),
            params,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let secs = res.elapsed.as_secs_f64();
        let nps = if secs > 0.0 { res.stats.nodes as f64 / secs } else { 0.0 };
        println!(
            "bestmove={} score_cp={} depth={} nodes={} cutoffs={} elapsed={:.3}s nps={:.1} pv={}",
            bestmove.unwrap_or_else(|| "(none)".to_string()), res.score, res.depth, res.stats.nodes, res.stats.cutoffs, secs, nps, pv.join(" ")
        );
    }
    Ok(())
}
