/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Checker: verifies that a complete ordering satisfies every
//! constraint registered with an engine.
//!
//! This is independent of the search: it only looks at positions in
//! the final ordering. It is used by the tests, the fuzz targets, and
//! the command-line tool to validate whatever the engine produced.
//!
//! The rules checked are:
//!
//! - Every registered item appears exactly once, and nothing else
//!   appears.
//! - For a normal constraint `(d, i)`, `i` comes before `d`.
//! - For a direct constraint `(d, i)`, `d` comes after `i`, and every
//!   item strictly between them belongs to the transitive direct
//!   closure of `i` (the items inserted in the same atomic step). For a
//!   simple chain this means `d` is right after `i`.

use alloc::vec;
use alloc::vec::Vec;

use crate::{DepKind, FxHashMap, FxHashSet, Item, PermutationEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckerError<T> {
    /// A registered item is absent from the ordering.
    Missing { item: T },
    /// An item appears more than once.
    Duplicate { item: T },
    /// The ordering contains an item that was never registered.
    Unknown { item: T },
    /// A normal or direct constraint has its dependent first.
    OrderViolated { dependent: T, independent: T },
    /// A direct dependent is separated from its independent by an item
    /// outside the independent's atomic group.
    NotAdjacent { dependent: T, independent: T, between: T },
}

/// Every problem found in one ordering.
#[derive(Clone, Debug)]
pub struct CheckerErrors<T> {
    pub errors: Vec<CheckerError<T>>,
}

/// Check `order` against the items and constraints of `engine`.
pub fn check<T: Item>(
    engine: &PermutationEngine<T>,
    order: &[T],
) -> Result<(), CheckerErrors<T>> {
    let mut errors = vec![];
    let mut pos: FxHashMap<T, usize> = FxHashMap::default();

    for (i, &item) in order.iter().enumerate() {
        if !engine.instructions().contains(item) {
            errors.push(CheckerError::Unknown { item });
        }
        if pos.insert(item, i).is_some() {
            errors.push(CheckerError::Duplicate { item });
        }
    }
    for item in engine.instructions().iter() {
        if !pos.contains_key(&item) {
            errors.push(CheckerError::Missing { item });
        }
    }

    for dep in engine.graph().iter() {
        let (d, i) = match (pos.get(&dep.dependent), pos.get(&dep.independent)) {
            (Some(&d), Some(&i)) => (d, i),
            // Already reported as missing.
            _ => continue,
        };
        if d < i {
            errors.push(CheckerError::OrderViolated {
                dependent: dep.dependent,
                independent: dep.independent,
            });
            continue;
        }
        if dep.kind == DepKind::Direct {
            let group = direct_closure(engine, dep.independent);
            if let Some(&between) = order[i + 1..d].iter().find(|x| !group.contains(*x)) {
                errors.push(CheckerError::NotAdjacent {
                    dependent: dep.dependent,
                    independent: dep.independent,
                    between,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        log::debug!("checker found {} errors", errors.len());
        Err(CheckerErrors { errors })
    }
}

/// All items reachable from `root` through direct constraints.
fn direct_closure<T: Item>(engine: &PermutationEngine<T>, root: T) -> FxHashSet<T> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(item) = stack.pop() {
        for &d in engine.graph().direct_dependents(item) {
            if seen.insert(d) {
                stack.push(d);
            }
        }
    }
    seen
}
