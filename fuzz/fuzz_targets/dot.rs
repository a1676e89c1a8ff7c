/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

#![no_main]
use permsched::fuzzing::arbitrary::{Arbitrary, Result, Unstructured};
use permsched::fuzzing::fuzz_target;
use permsched::fuzzing::problem::Problem;
use permsched::{EngineOptions, Inst};

#[derive(Clone, Debug)]
struct TestCase {
    problem: Problem,
    exclude: Vec<Inst>,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured) -> Result<TestCase> {
        let problem = Problem::arbitrary(u)?;
        let mut exclude = vec![];
        for _ in 0..u.int_in_range(0..=3)? {
            exclude.push(Inst::new(u.int_in_range(0..=7)?));
        }
        Ok(TestCase { problem, exclude })
    }
}

fuzz_target!(|t: TestCase| {
    let engine = t.problem.engine(EngineOptions::default());
    let mut text = String::new();
    engine.dump_dot(&mut text, &t.exclude).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.first(), Some(&"digraph G {"));
    assert_eq!(lines.last(), Some(&"}"));

    let nodes = engine
        .instructions()
        .iter()
        .filter(|i| !t.exclude.contains(i))
        .count();
    let edges = engine
        .graph()
        .iter()
        .filter(|d| !t.exclude.contains(&d.dependent) && !t.exclude.contains(&d.independent))
        .count();
    assert_eq!(lines.iter().filter(|l| l.ends_with("[shape=box];")).count(), nodes);
    assert_eq!(lines.iter().filter(|l| l.starts_with("edge [color=")).count(), edges);
    assert_eq!(lines.iter().filter(|l| l.contains(" -> ")).count(), edges);
});
