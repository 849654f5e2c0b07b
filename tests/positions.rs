use std::fs::File;
use std::io::{BufRead, BufReader};

use abtree::board::cozy::ChessPosition;
use abtree::search::{IterativeDeepening, SearchParams, Variant};
use abtree::tree::Tree;

#[derive(Debug, serde::Deserialize)]
struct PosRec { fen: String, best: String }

fn load_positions() -> Vec<PosRec> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/positions_sample.jsonl");
    let f = File::open(path).expect("open bundled positions_sample.jsonl");
    let rdr = BufReader::new(f);
    rdr.lines().map_while(Result::ok).filter(|l| !l.trim().is_empty()).filter_map(|l| serde_json::from_str(&l).ok()).collect()
}

#[test]
fn positions_correct_move_for_every_variant() {
    let poses = load_positions();
    assert_eq!(poses.len(), 5);
    for variant in [Variant::Plain, Variant::SelfDestructing, Variant::Storing(2), Variant::OrderedSelfDestructing] {
        for rec in &poses {
            let pos = ChessPosition::from_fen(&rec.fen).expect("valid fen");
            let white = pos.white_to_move();
            let tree = Tree::new(pos);
            let params = SearchParams { depth: 2, ..SearchParams::default() }.with_variant(variant);
            let r = IterativeDeepening::new(params).search(&tree, white).unwrap();
            let got = r.best.as_ref().and_then(|b| b.borrow().content().last_move_uci());
            assert_eq!(got.as_deref(), Some(rec.best.as_str()), "FEN {} variant {}", rec.fen, variant);
        }
    }
}
