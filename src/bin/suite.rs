use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use abtree::board::cozy::ChessPosition;
use abtree::search::{IterativeDeepening, SearchParams, Variant};
use abtree::tree::Tree;
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, serde::Deserialize)]
struct Rec { fen: String, best: String }

#[derive(Parser, Debug)]
#[command(name = "abtree-suite", version, about = "Run a JSONL suite of {fen, best} positions")]
struct Args {
    /// JSONL file, one {"fen": ..., "best": ...} object per line
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Search depth
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Engine variant
    #[arg(long, default_value = "storing:2")]
    variant: Variant,
}

fn load_jsonl(path: &PathBuf) -> Result<Vec<Rec>> {
    let f = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        let l = line.trim();
        if l.is_empty() { continue; }
        out.push(serde_json::from_str(l).with_context(|| format!("line {}", i + 1))?);
    }
    Ok(out)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cases = load_jsonl(&args.file)?;
    let params = SearchParams { depth: args.depth, ..SearchParams::default() }.with_variant(args.variant);

    let bar = ProgressBar::new(cases.len() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let mut failures: Vec<String> = Vec::new();
    let mut nodes = 0u64;
    for case in &cases {
        let pos = ChessPosition::from_fen(&case.fen)?;
        let white = pos.white_to_move();
        let tree = Tree::new(pos);
        let res = IterativeDeepening::new(params).search(&tree, white)?;
        nodes += res.stats.nodes;
        let got = res.best.as_ref().and_then(|b| b.borrow().content().last_move_uci());
        if got.as_deref() != Some(case.best.as_str()) {
            failures.push(format!("fen={} got={:?} expect={}", case.fen, got, case.best));
        }
        bar.set_message(format!("failures {}", failures.len()));
        bar.inc(1);
    }
    bar.finish();

    println!("summary: cases={} failures={} nodes={} depth={} variant={}", cases.len(), failures.len(), nodes, args.depth, args.variant);
    if !failures.is_empty() {
        eprintln!("failures ({}):\n{}", failures.len(), failures.join("\n"));
        std::process::exit(1);
    }
    Ok(())
}
