use crate::checker;
use crate::{EngineOptions, PermError, PermutationEngine};
use alloc::vec;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn direct_dependency_is_atomic() {
    let (x, y, z) = (0, 1, 2);
    let e = engine(3, &[], &[(y, x)]);
    assert_eq!(e.count_permutations(), 2);
    assert_eq!(enumerate(&e), vec![vec![x, y, z], vec![z, x, y]]);
    for (k, order) in enumerate(&e).iter().enumerate() {
        assert_ne!(order, &vec![x, z, y], "permutation {}", k);
    }
}

#[test]
fn normal_cycle_has_no_solution() {
    let e = engine(2, &[(0, 1), (1, 0)], &[]);
    assert_eq!(e.count_permutations(), 0);
    assert!(e.get_permutation(0).is_none());
    assert_eq!(
        e.first_permutation(),
        Err(PermError::NoAvailableItem {
            scheduled: 0,
            total: 2
        })
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(
        e.random_permutation(&mut rng),
        Err(PermError::DeadEnd {
            scheduled: 0,
            total: 2
        })
    );
}

#[test]
fn direct_item_with_two_prerequisites_has_no_solution() {
    // 1 would have to sit right after both 0 and 2.
    let e = engine(3, &[], &[(1, 0), (1, 2)]);
    assert_eq!(e.count_permutations(), 0);
    assert!(e.first_permutation().is_err());
}

#[test]
fn counts_match_brute_force() {
    for (n, normal, direct) in cases() {
        let e = engine(n, &normal, &direct);
        let expected = brute_force(&e);
        assert_eq!(
            e.count_permutations(),
            expected.len() as u64,
            "normal {:?} direct {:?}",
            normal,
            direct
        );
    }
}

#[test]
fn indexing_enumerates_every_ordering_once() {
    for (n, normal, direct) in cases() {
        let e = engine(n, &normal, &direct);
        let mut all = enumerate(&e);
        for order in &all {
            assert!(checker::check(&e, order).is_ok(), "{:?}", order);
        }
        all.sort();
        let before = all.len();
        all.dedup();
        assert_eq!(all.len(), before, "duplicate orderings");
        assert_eq!(all, brute_force(&e));
    }
}

#[test]
fn indexing_is_deterministic() {
    let e = engine(5, &[(3, 0), (4, 3)], &[(2, 1)]);
    for k in 0..e.count_permutations() {
        assert_eq!(e.get_permutation(k), e.get_permutation(k));
    }
}

#[test]
fn index_out_of_range_is_none() {
    let e = engine(3, &[], &[]);
    assert_eq!(e.count_permutations(), 6);
    assert!(e.get_permutation(5).is_some());
    assert!(e.get_permutation(6).is_none());
    assert!(e.get_permutation(u64::MAX).is_none());
}

#[test]
fn canonical_order_follows_registration() {
    let e = engine(3, &[], &[]);
    let all = enumerate(&e);
    assert_eq!(
        all,
        vec![
            vec![0, 1, 2],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![2, 1, 0],
        ]
    );
}

#[test]
fn transitive_chain_is_scheduled_together() {
    // 0 -> 1 -> 2 directly, 3 free.
    let e = engine(4, &[], &[(1, 0), (2, 1)]);
    assert_eq!(
        enumerate(&e),
        vec![vec![0, 1, 2, 3], vec![3, 0, 1, 2]]
    );
}

#[test]
fn greedy_takes_first_available() {
    let e = engine(5, &[(0, 4), (2, 3)], &[(1, 0)]);
    let greedy = e.first_permutation().unwrap();
    assert_eq!(greedy.as_slice(), &[3, 2, 4, 0, 1]);
    assert_eq!(Some(greedy), e.get_permutation(0));
}

#[test]
fn random_samples_are_always_valid() {
    let e = moderately_connected();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for _ in 0..10_000 {
        let order = e.random_permutation(&mut rng).unwrap();
        if let Err(errs) = checker::check(&e, order.as_slice()) {
            panic!("invalid random ordering {:?}: {:?}", order, errs);
        }
    }
}

#[test]
fn random_is_reproducible_with_same_seed() {
    let e = moderately_connected();
    let mut a = ChaCha8Rng::seed_from_u64(42);
    let mut b = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..100 {
        assert_eq!(e.random_permutation(&mut a), e.random_permutation(&mut b));
    }
}

#[test]
fn sample_distinct_finds_every_ordering() {
    let e = engine(3, &[], &[(1, 0)]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut found: Vec<Vec<u32>> = e
        .sample_distinct(&mut rng, 200)
        .into_iter()
        .map(|s| s.into_vec())
        .collect();
    found.sort();
    assert_eq!(found, vec![vec![0, 1, 2], vec![2, 0, 1]]);
}

#[test]
fn sample_distinct_skips_dead_ends() {
    let e = engine(2, &[(0, 1), (1, 0)], &[]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(e.sample_distinct(&mut rng, 10).is_empty());
}

#[test]
fn explicit_stack_matches_recursion() {
    for (n, normal, direct) in cases() {
        let recursive = engine(n, &normal, &direct);
        let mut iterative = PermutationEngine::with_options(EngineOptions { recursion_limit: 0 });
        for i in 0..n {
            iterative.add_instruction(i).unwrap();
        }
        for &(a, b) in &normal {
            iterative.add_dependency(a, b).unwrap();
        }
        for &(a, b) in &direct {
            iterative.add_direct_dependency(a, b).unwrap();
        }

        assert_eq!(
            iterative.count_permutations(),
            recursive.count_permutations()
        );
        assert_eq!(enumerate(&iterative), enumerate(&recursive));
        assert_eq!(
            iterative.first_permutation(),
            recursive.first_permutation()
        );
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            iterative.random_permutation(&mut a),
            recursive.random_permutation(&mut b)
        );
    }
}

#[test]
fn long_chain_uses_explicit_stack() {
    // Far more items than the default recursion limit.
    let n = 2_000u32;
    let mut e = PermutationEngine::new();
    for i in (0..n).rev() {
        e.add_instruction(i).unwrap();
    }
    for i in 1..n {
        e.add_dependency(i, i - 1).unwrap();
    }
    assert_eq!(e.count_permutations(), 1);
    let order = e.get_permutation(0).unwrap().into_vec();
    assert_eq!(order, (0..n).collect::<Vec<_>>());
    assert!(e.get_permutation(1).is_none());
}

#[test]
fn long_direct_chain_through_unregistered_items() {
    // Only 0 and 1 are registered; 1 heads a direct chain of markers.
    let mut e = PermutationEngine::new();
    e.add_instruction(0u32).unwrap();
    e.add_instruction(1).unwrap();
    for i in 1..60_000u32 {
        e.add_direct_dependency(i + 1, i).unwrap();
    }
    assert_eq!(e.count_permutations(), 0);
    assert!(e.get_permutation(0).is_none());
    assert_eq!(
        e.first_permutation(),
        Err(PermError::NoAvailableItem {
            scheduled: 1,
            total: 2
        })
    );
}

#[test]
fn unplaceable_direct_dependent_is_backtracked() {
    // 0 looks available, but its direct dependent 5 is never registered,
    // so every attempt to insert 0 fails.
    for recursion_limit in [0, crate::DEFAULT_RECURSION_LIMIT] {
        let mut e = PermutationEngine::with_options(EngineOptions { recursion_limit });
        e.add_instruction(0u32).unwrap();
        e.add_instruction(1).unwrap();
        e.add_direct_dependency(5, 0).unwrap();

        assert_eq!(e.available(&crate::Schedule::new()), vec![0, 1]);
        assert_eq!(e.count_permutations(), 0);
        assert!(e.get_permutation(0).is_none());

        // Greedy skips 0 and takes 1, then has nothing left to insert.
        let mut steps = vec![];
        let greedy = e.first_permutation_with(|_, s| steps.push(s.to_list()));
        assert_eq!(
            greedy,
            Err(PermError::NoAvailableItem {
                scheduled: 1,
                total: 2
            })
        );
        assert_eq!(steps, vec![vec![1]]);

        // Whatever is drawn first, 1 is placed and 0 is redrawn until the
        // pool is empty.
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(
                e.random_permutation(&mut rng),
                Err(PermError::DeadEnd {
                    scheduled: 1,
                    total: 2
                })
            );
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(e.sample_distinct(&mut rng, 10).is_empty());
    }
}

#[test]
fn greedy_steps_are_reported() {
    let e = engine(4, &[(3, 2)], &[(1, 0)]);
    let mut steps = vec![];
    let greedy = e
        .first_permutation_with(|step, s| steps.push((step, s.to_list())))
        .unwrap();
    assert_eq!(greedy.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(
        steps,
        vec![(1, vec![0, 1]), (2, vec![0, 1, 2]), (3, vec![0, 1, 2, 3])]
    );
}

#[test]
fn empty_engine() {
    let e: PermutationEngine<u32> = PermutationEngine::new();
    assert_eq!(e.count_permutations(), 0);
    assert!(e.get_permutation(0).is_none());
    assert!(e.first_permutation().unwrap().is_empty());
}

#[test]
fn registration_errors() {
    let mut e = PermutationEngine::new();
    e.add_instruction(1u32).unwrap();
    assert!(matches!(
        e.add_instruction(1),
        Err(PermError::DuplicateItem(_))
    ));
    assert!(matches!(
        e.add_dependency(1, 1),
        Err(PermError::SelfDependency(_))
    ));
    assert!(matches!(
        e.add_direct_dependency(1, 1),
        Err(PermError::SelfDependency(_))
    ));
}

#[test]
fn clone_is_independent() {
    let e = engine(3, &[], &[]);
    let mut copy = e.clone();
    copy.add_dependency(1, 0).unwrap();
    copy.add_instruction(3).unwrap();
    assert_eq!(e.count_permutations(), 6);
    assert_eq!(copy.count_permutations(), 12);
}

#[test]
fn clear_allows_reuse() {
    let mut e = engine(3, &[(1, 0)], &[(2, 1)]);
    e.clear();
    assert_eq!(e.count_permutations(), 0);
    e.add_instruction(7).unwrap();
    e.add_instruction(8).unwrap();
    e.add_direct_dependency(8, 7).unwrap();
    assert_eq!(e.count_permutations(), 1);
    assert_eq!(e.get_permutation(0).unwrap().as_slice(), &[7, 8]);
}

#[test]
fn queries_do_not_mutate() {
    let e = moderately_connected();
    let before = alloc::format!("{:?}", e);
    let _ = e.count_permutations();
    let _ = e.first_permutation();
    let _ = e.random_permutation(&mut ChaCha8Rng::seed_from_u64(9));
    assert_eq!(alloc::format!("{:?}", e), before);
}

fn engine(n: u32, normal: &[(u32, u32)], direct: &[(u32, u32)]) -> PermutationEngine<u32> {
    let mut e = PermutationEngine::new();
    for i in 0..n {
        e.add_instruction(i).unwrap();
    }
    for &(a, b) in normal {
        e.add_dependency(a, b).unwrap();
    }
    for &(a, b) in direct {
        e.add_direct_dependency(a, b).unwrap();
    }
    e
}

/// Eight items with a mix of normal edges and a direct chain.
fn moderately_connected() -> PermutationEngine<u32> {
    engine(
        8,
        &[(2, 0), (3, 1), (5, 2), (5, 3), (7, 6), (6, 0)],
        &[(4, 1), (6, 4)],
    )
}

/// Graphs whose direct constraints form simple chains, so a direct
/// dependent must sit exactly one position after its independent.
fn cases() -> Vec<(u32, Vec<(u32, u32)>, Vec<(u32, u32)>)> {
    vec![
        (4, vec![], vec![]),
        (5, vec![(1, 0), (2, 0), (3, 1), (3, 2)], vec![]),
        (5, vec![(4, 3)], vec![(1, 0), (2, 1)]),
        (6, vec![(2, 0), (5, 4), (1, 5)], vec![(1, 0), (3, 2)]),
        (4, vec![(1, 2)], vec![(1, 0)]),
        (5, vec![(0, 3)], vec![(2, 1), (4, 3)]),
        (3, vec![(0, 1), (1, 0)], vec![]),
    ]
}

fn enumerate(e: &PermutationEngine<u32>) -> Vec<Vec<u32>> {
    (0..e.count_permutations())
        .map(|k| e.get_permutation(k).unwrap().into_vec())
        .collect()
}

/// Every ordering of the items that the checker accepts, sorted.
///
/// The checker only decides exact adjacency for chain-shaped direct
/// constraints, so `cases()` must keep every item to at most one direct
/// dependent and one direct prerequisite.
fn brute_force(e: &PermutationEngine<u32>) -> Vec<Vec<u32>> {
    let items: Vec<u32> = e.instructions().iter().collect();
    let mut out = vec![];
    permutations(&mut items.clone(), 0, &mut |order: &[u32]| {
        if checker::check(e, order).is_ok() {
            out.push(order.to_vec());
        }
    });
    out.sort();
    out
}

fn permutations(items: &mut Vec<u32>, k: usize, f: &mut dyn FnMut(&[u32])) {
    if k == items.len() {
        f(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permutations(items, k + 1, f);
        items.swap(k, i);
    }
}
