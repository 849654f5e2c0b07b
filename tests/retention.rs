use abtree::search::{IterativeDeepening, SearchParams, Searcher, Variant};
use abtree::synthetic::Shape;
use abtree::tree::{Node, Tree, SCORE_MAX as MAX, SCORE_MIN as MIN};
use abtree::Score;

const DEPTH4: [Score; 16] = [8, 5, 6, -4, 3, 8, 4, -6, 1, MIN, 5, 2, MIN, MIN, MAX, MAX];

fn searched(variant: Variant) -> (Tree<abtree::synthetic::ScriptedPosition>, Searcher) {
    let tree = Tree::new(Shape::binary(&DEPTH4).position());
    let mut s = Searcher::variant(variant);
    s.best_child(tree.root(), 4, true).unwrap();
    (tree, s)
}

#[test]
fn plain_keeps_the_searched_tree() {
    let (tree, s) = searched(Variant::Plain);
    assert_eq!(tree.held_depth(), 4);
    assert_eq!(s.stats().deleted, 0);
}

#[test]
fn self_destructing_leaves_a_bare_root() {
    let (tree, s) = searched(Variant::SelfDestructing);
    assert!(!tree.root().borrow().has_children());
    assert_eq!(tree.node_count(), 1);
    assert!(s.stats().deleted > 0);
    // The root value survives its children.
    assert_eq!(tree.root().borrow().value(), Ok(3));
}

#[test]
fn self_destructing_best_child_is_detached_but_usable() {
    let tree = Tree::new(Shape::binary(&DEPTH4).position());
    let mut s = Searcher::variant(Variant::OrderedSelfDestructing);
    let best = s.best_child(tree.root(), 4, true).unwrap().expect("best child");
    assert!(best.borrow().parent().is_none());
    assert!(!best.borrow().has_children());
    assert_eq!(best.borrow().value(), Ok(3));
}

#[test]
fn storing_keeps_only_the_top_levels() {
    for levels in 1..=3u32 {
        let (tree, _) = searched(Variant::Storing(levels));
        tree.for_each(|n, ply| {
            let level = ply as u32 + 1;
            if level > levels {
                assert!(!n.borrow().has_children(), "levels {levels}: node at ply {ply} kept children");
            }
        });
        assert!(tree.root().borrow().has_children());
        if levels >= 2 {
            for child in tree.root().borrow().children() {
                assert!(child.borrow().has_children(), "levels {levels}: ply 1 node lost its children");
            }
        }
    }
}

#[test]
fn storing_reuses_the_top_of_the_tree_across_iterations() {
    let calls = |variant: Variant| {
        let tree = Tree::new(Shape::binary(&DEPTH4).position());
        let params = SearchParams { depth: 4, ..SearchParams::default() }.with_variant(variant);
        let r = IterativeDeepening::new(params).search(&tree, true).unwrap();
        assert_eq!((r.score, r.depth), (3, 4));
        let n = tree.root().borrow().content().generator_calls();
        n
    };
    let storing = calls(Variant::Storing(2));
    let destroying = calls(Variant::SelfDestructing);
    assert!(storing < destroying, "storing {storing} vs self-destructing {destroying}");
}

#[test]
fn principal_variation_follows_best_children() {
    let (tree, _) = searched(Variant::Plain);
    let pv: Vec<usize> = Node::principal_variation(tree.root()).iter().map(|n| n.borrow().content().label()).collect();
    assert_eq!(pv, vec![0, 1, 0, 0]);
    let last = Node::principal_variation(tree.root()).pop().unwrap();
    let line = Node::line_from_root(&last);
    assert_eq!(line.len(), 5);
    assert!(std::rc::Rc::ptr_eq(&line[0], tree.root()));
}
