//! Fuzz the permutation engine against brute-force enumeration.

use crate::{checker, EngineOptions, Inst, PermutationEngine};
use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::{vec, vec::Vec};

/// Brute force visits `MAX_ITEMS!` orderings.
const MAX_ITEMS: usize = 7;

/// A small scheduling problem.
///
/// Direct constraints form simple chains: every item has at most one
/// direct dependent and at most one direct prerequisite. Under that
/// shape a direct dependent sits exactly one position after its
/// independent, so the checker decides validity on its own and can be
/// used as a brute-force oracle.
#[derive(Clone, Debug)]
pub struct Problem {
    num_items: usize,
    normal: Vec<(Inst, Inst)>,
    direct: Vec<(Inst, Inst)>,
}

impl Arbitrary<'_> for Problem {
    fn arbitrary(u: &mut Unstructured) -> Result<Problem> {
        let num_items = u.int_in_range(1..=MAX_ITEMS)?;

        let mut normal = vec![];
        for d in 0..num_items {
            for i in 0..num_items {
                // Mostly forward edges; the odd backward edge makes cycles.
                let add = if i < d {
                    u.ratio(1, 4)?
                } else if i > d {
                    u.ratio(1, 32)?
                } else {
                    false
                };
                if add {
                    normal.push((Inst::new(d), Inst::new(i)));
                }
            }
        }

        let mut direct = vec![];
        let mut has_direct_dependent = vec![false; num_items];
        for d in 1..num_items {
            if u.ratio(1, 3)? {
                let i = u.int_in_range(0..=(d - 1))?;
                if !has_direct_dependent[i] {
                    has_direct_dependent[i] = true;
                    direct.push((Inst::new(d), Inst::new(i)));
                }
            }
        }

        Ok(Problem {
            num_items,
            normal,
            direct,
        })
    }
}

impl Problem {
    pub fn engine(&self, options: EngineOptions) -> PermutationEngine<Inst> {
        let mut engine = PermutationEngine::with_options(options);
        for i in 0..self.num_items {
            engine.add_instruction(Inst::new(i)).unwrap();
        }
        for &(a, b) in &self.normal {
            engine.add_dependency(a, b).unwrap();
        }
        for &(a, b) in &self.direct {
            engine.add_direct_dependency(a, b).unwrap();
        }
        engine
    }
}

/// A [`Problem`] plus a seed for random sampling.
#[derive(Clone, Debug)]
pub struct TestCase {
    problem: Problem,
    seed: u64,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured) -> Result<TestCase> {
        Ok(TestCase {
            problem: Problem::arbitrary(u)?,
            seed: u64::arbitrary(u)?,
        })
    }
}

/// Every ordering of the items that the checker accepts, sorted.
fn brute_force(engine: &PermutationEngine<Inst>) -> Vec<Vec<Inst>> {
    fn visit(
        engine: &PermutationEngine<Inst>,
        items: &mut Vec<Inst>,
        k: usize,
        out: &mut Vec<Vec<Inst>>,
    ) {
        if k == items.len() {
            if checker::check(engine, items).is_ok() {
                out.push(items.clone());
            }
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            visit(engine, items, k + 1, out);
            items.swap(k, i);
        }
    }

    let mut items: Vec<Inst> = engine.instructions().iter().collect();
    let mut out = vec![];
    visit(engine, &mut items, 0, &mut out);
    out.sort();
    out
}

pub fn check(t: TestCase) {
    let engine = t.problem.engine(EngineOptions::default());
    let expected = brute_force(&engine);

    let count = engine.count_permutations();
    assert_eq!(count, expected.len() as u64);

    let mut indexed = Vec::with_capacity(expected.len());
    for k in 0..count {
        let schedule = engine.get_permutation(k).expect("index within count");
        checker::check(&engine, schedule.as_slice()).expect("indexed permutation is valid");
        indexed.push(schedule.into_vec());
    }
    assert!(engine.get_permutation(count).is_none());
    indexed.sort();
    assert_eq!(indexed, expected);

    // Chains never trap the greedy or random walks, so both succeed
    // exactly when some ordering exists.
    let greedy = engine.first_permutation();
    assert_eq!(greedy.is_ok(), count > 0);
    if let Ok(greedy) = &greedy {
        assert_eq!(Some(greedy), engine.get_permutation(0).as_ref());
    }

    let mut rng = SmallRng::seed_from_u64(t.seed);
    for _ in 0..16 {
        match engine.random_permutation(&mut rng) {
            Ok(schedule) => {
                assert!(count > 0);
                assert!(expected.binary_search(&schedule.to_list()).is_ok());
            }
            Err(_) => assert_eq!(count, 0),
        }
    }

    let iterative = t.problem.engine(EngineOptions { recursion_limit: 0 });
    assert_eq!(iterative.count_permutations(), count);
    assert_eq!(iterative.first_permutation(), greedy);
}

#[test]
fn smoke() {
    arbtest::arbtest(|u| {
        let test_case = TestCase::arbitrary(u)?;
        check(test_case);
        Ok(())
    })
    .budget_ms(1_000);
}
