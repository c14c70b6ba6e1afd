use criterion::{black_box, criterion_group, criterion_main, Criterion};
use deinos::eval::{default_prior, material_value};
use deinos::mcts::{value_fn, Expansion, Tree};
use deinos::AnalysedPosition;

fn bench_search(c: &mut Criterion) {
    for expansion in [Expansion::Full, Expansion::Incremental] {
        c.bench_function(&format!("search_2000_startpos_{expansion:?}").to_lowercase(), |b| {
            b.iter(|| {
                let tree = Tree::new(AnalysedPosition::startpos(), value_fn(material_value), default_prior(), 0.5)
                    .with_expansion(expansion);
                for _ in 0..2000 {
                    tree.search();
                }
                black_box(tree.root().best_move())
            })
        });
    }
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
