use criterion::{black_box, criterion_group, criterion_main, Criterion};
use abtree::board::cozy::ChessPosition;
use abtree::search::{Searcher, Variant};
use abtree::synthetic::{RandomTree, Shape};
use abtree::tree::Tree;

const VARIANTS: [Variant; 4] = [Variant::Plain, Variant::SelfDestructing, Variant::Storing(2), Variant::OrderedSelfDestructing];

fn bench_synthetic(c: &mut Criterion) {
    let shape = Shape::random(RandomTree { depth: 7, min_branching: 3, max_branching: 5, ..RandomTree::default() }, 7);
    let mut group = c.benchmark_group("synthetic_depth6");
    for v in VARIANTS {
        group.bench_function(v.to_string(), |ben| {
            ben.iter(|| {
                let tree = Tree::new(shape.clone().position());
                let mut s = Searcher::variant(v);
                black_box(s.evaluate(tree.root(), 6, true).map(|(score, _)| score))
            })
        });
    }
    group.finish();
}

fn bench_startpos(c: &mut Criterion) {
    let mut group = c.benchmark_group("startpos_depth3");
    group.sample_size(10);
    for v in VARIANTS {
        group.bench_function(v.to_string(), |ben| {
            ben.iter(|| {
                let tree = Tree::new(ChessPosition::startpos());
                let mut s = Searcher::variant(v);
                black_box(s.evaluate(tree.root(), 3, true).map(|(score, _)| score))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_synthetic, bench_startpos);
criterion_main!(benches);
