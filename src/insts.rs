/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! The universe of items and the availability computation.

use alloc::format;
use alloc::vec::Vec;
use smallvec::{smallvec, SmallVec};

use crate::{DependencyGraph, FxHashSet, Item, PermError, Schedule};

/// Items pulled into the same atomic step but not yet committed.
type Pending<T> = SmallVec<[T; 8]>;

/// All items to be scheduled, in registration order.
///
/// Registration order is the tie-break used everywhere downstream: the
/// greedy schedule picks the first available item, and the canonical
/// enumeration visits available items in this order.
#[derive(Clone, Debug)]
pub struct InstructionSet<T: Item> {
    insts: Vec<T>,
    members: FxHashSet<T>,
}

impl<T: Item> Default for InstructionSet<T> {
    fn default() -> Self {
        Self {
            insts: Vec::new(),
            members: FxHashSet::default(),
        }
    }
}

impl<T: Item> InstructionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.insts.clear();
        self.members.clear();
    }

    pub fn add_instruction(&mut self, item: T) -> Result<(), PermError> {
        if !self.members.insert(item) {
            return Err(PermError::DuplicateItem(format!("{:?}", item)));
        }
        self.insts.push(item);
        Ok(())
    }

    pub fn contains(&self, item: T) -> bool {
        self.members.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.insts.iter().copied()
    }

    /// Every unscheduled item whose prerequisites are met, in
    /// registration order.
    pub fn available(&self, dg: &DependencyGraph<T>, schedule: &Schedule<T>) -> Vec<T> {
        self.available_impl(dg, schedule, false)
    }

    pub(crate) fn available_impl(
        &self,
        dg: &DependencyGraph<T>,
        schedule: &Schedule<T>,
        iterative: bool,
    ) -> Vec<T> {
        self.insts
            .iter()
            .copied()
            .filter(|&inst| !schedule.contains(inst))
            .filter(|&inst| {
                if iterative {
                    deps_fulfilled_iterative(inst, dg, schedule)
                } else {
                    deps_fulfilled(inst, dg, schedule, &mut smallvec![])
                }
            })
            .collect()
    }
}

/// Can `inst` be scheduled now, given that the items in `pending` are
/// being placed in the same atomic step?
///
/// Every prerequisite of `inst` must already be scheduled or pending.
/// In addition, every direct dependent of `inst` rides along in the same
/// step, so each of them must in turn be schedulable with `inst` added
/// to the pending group.
///
/// `pending` is used as a stack: it is restored before returning.
pub(crate) fn deps_fulfilled<T: Item>(
    inst: T,
    dg: &DependencyGraph<T>,
    schedule: &Schedule<T>,
    pending: &mut Pending<T>,
) -> bool {
    if pending.contains(&inst) {
        // A cycle of direct dependencies would place `inst` twice.
        return false;
    }
    let prereqs_met = dg
        .prerequisites(inst)
        .iter()
        .all(|&p| schedule.contains(p) || pending.contains(&p));
    if !prereqs_met {
        return false;
    }

    pending.push(inst);
    let ok = dg
        .direct_dependents(inst)
        .iter()
        .all(|&d| deps_fulfilled(d, dg, schedule, pending));
    pending.pop();
    ok
}

/// Explicit-stack version of [`deps_fulfilled`] with no pending items,
/// for long direct chains. Visits items in the same order and returns
/// the same result.
pub(crate) fn deps_fulfilled_iterative<T: Item>(
    inst: T,
    dg: &DependencyGraph<T>,
    schedule: &Schedule<T>,
) -> bool {
    // Each entry is an item to check and the depth of the pending group
    // it is checked against. `path[..depth]` holds that group, and
    // `pending` holds the same items for constant-time lookup.
    let mut stack: SmallVec<[(T, usize); 16]> = smallvec![(inst, 0)];
    let mut path: Vec<T> = Vec::new();
    let mut pending: FxHashSet<T> = FxHashSet::default();

    while let Some((inst, depth)) = stack.pop() {
        for popped in path.drain(depth..) {
            pending.remove(&popped);
        }
        if pending.contains(&inst) {
            return false;
        }
        let prereqs_met = dg
            .prerequisites(inst)
            .iter()
            .all(|&p| schedule.contains(p) || pending.contains(&p));
        if !prereqs_met {
            return false;
        }
        path.push(inst);
        pending.insert(inst);
        // Push in reverse so the first dependent is checked first.
        for &d in dg.direct_dependents(inst).iter().rev() {
            stack.push((d, depth + 1));
        }
    }
    true
}
