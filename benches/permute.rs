//! Criterion-based benchmark target that measures how fast the engine
//! walks the search tree of randomly constrained problems.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use permsched::{Inst, PermutationEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn create_random_engine(seed: u64, size: usize) -> PermutationEngine<Inst> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut engine = PermutationEngine::new();
    for i in 0..size {
        engine.add_instruction(Inst::new(i)).unwrap();
    }
    let mut has_direct_dependent = vec![false; size];
    for d in 1..size {
        for i in 0..d {
            if rng.random_ratio(1, 3) {
                engine.add_dependency(Inst::new(d), Inst::new(i)).unwrap();
            }
        }
        let i = rng.random_range(0..d);
        if !has_direct_dependent[i] && rng.random_ratio(1, 5) {
            has_direct_dependent[i] = true;
            engine
                .add_direct_dependency(Inst::new(d), Inst::new(i))
                .unwrap();
        }
    }
    engine
}

fn run_permute(c: &mut Criterion) {
    const SIZE: usize = 10;
    env_logger::init();
    let mut group = c.benchmark_group("benches");
    for iter in 0..3 {
        let engine = create_random_engine(iter, SIZE);
        let count = engine.count_permutations();
        eprintln!("==== {} items, {} permutations", SIZE, count);
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("count", iter), &iter, |b, _| {
            b.iter(|| engine.count_permutations());
        });
        group.bench_with_input(BenchmarkId::new("random", iter), &iter, |b, _| {
            let mut rng = ChaCha8Rng::seed_from_u64(iter);
            b.iter(|| engine.random_permutation(&mut rng));
        });
    }
    group.finish();
}

criterion_group!(benches, run_permute);
criterion_main!(benches);
