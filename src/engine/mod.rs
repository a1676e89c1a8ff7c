/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! The permutation engine: the public facade over the dependency graph,
//! the instruction set, and the backtracking search.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use rand::Rng;

use crate::{
    DepKind, DependencyGraph, EngineOptions, FxHashSet, InstructionSet, Item, PermError, Schedule,
};

mod search;
use search::SearchState;

#[cfg(test)]
mod tests;

/// Renders an item as a label for diagnostics.
pub type LabelFn<T> = Arc<dyn Fn(T) -> String + Send + Sync>;

/// Enumerates, counts, indexes, and samples orderings of a set of items
/// under a set of constraints.
///
/// The engine owns its items and constraints; cloning it copies both.
/// Queries take `&self` and return owned schedules.
#[derive(Clone)]
pub struct PermutationEngine<T: Item> {
    pub(crate) dg: DependencyGraph<T>,
    pub(crate) is: InstructionSet<T>,
    label_fn: Option<LabelFn<T>>,
    options: EngineOptions,
}

impl<T: Item> core::fmt::Debug for PermutationEngine<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("PermutationEngine")
            .field("insts", &self.is)
            .field("deps", &self.dg)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Item> Default for PermutationEngine<T> {
    fn default() -> Self {
        Self::with_options(EngineOptions::default())
    }
}

impl<T: Item> PermutationEngine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            dg: DependencyGraph::new(),
            is: InstructionSet::new(),
            label_fn: None,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Install a function used to label items in DOT output and logs.
    /// Without one, items are labelled by their `Debug` form.
    pub fn set_label_callback<F>(&mut self, f: F)
    where
        F: Fn(T) -> String + Send + Sync + 'static,
    {
        self.label_fn = Some(Arc::new(f));
    }

    pub fn label(&self, item: T) -> String {
        match &self.label_fn {
            Some(f) => f(item),
            None => format!("{:?}", item),
        }
    }

    /// Remove all items and constraints. The label callback and options
    /// are kept.
    pub fn clear(&mut self) {
        self.dg.clear();
        self.is.clear();
    }

    pub fn add_instruction(&mut self, item: T) -> Result<(), PermError> {
        self.is.add_instruction(item)
    }

    /// `a` may only be scheduled after `b`.
    pub fn add_dependency(&mut self, a: T, b: T) -> Result<(), PermError> {
        self.dg.add(a, b, DepKind::Normal)
    }

    /// `a` is scheduled in the same step as `b`, immediately after it.
    pub fn add_direct_dependency(&mut self, a: T, b: T) -> Result<(), PermError> {
        self.dg.add(a, b, DepKind::Direct)
    }

    pub fn graph(&self) -> &DependencyGraph<T> {
        &self.dg
    }

    pub fn instructions(&self) -> &InstructionSet<T> {
        &self.is
    }

    /// Whether the search runs on explicit stacks rather than recursion.
    ///
    /// Direct chains may run through items that were never registered,
    /// so the constraint count bounds the lookahead depth as well.
    #[inline(always)]
    fn iterative(&self) -> bool {
        self.is.len().max(self.dg.len()) > self.options.recursion_limit
    }

    /// The items that may be scheduled next after `schedule`.
    pub fn available(&self, schedule: &Schedule<T>) -> Vec<T> {
        self.is.available_impl(&self.dg, schedule, self.iterative())
    }

    /// The number of valid complete orderings.
    ///
    /// This visits the whole search tree, so it is exponential in the
    /// number of unconstrained items.
    pub fn count_permutations(&self) -> u64 {
        let mut state = SearchState::new(None);
        let found = self.permute(&mut state, Schedule::with_capacity(self.is.len()));
        debug_assert!(found.is_none());
        log::debug!(
            "counted {} permutations of {} items",
            state.counter,
            self.is.len()
        );
        state.counter
    }

    /// The `index`-th valid complete ordering, counting from zero, in
    /// depth-first traversal of the search tree with candidates taken in
    /// registration order. Returns `None` if there are not that many
    /// orderings.
    pub fn get_permutation(&self, index: u64) -> Option<Schedule<T>> {
        let mut state = SearchState::new(Some(index));
        let result = self.permute(&mut state, Schedule::with_capacity(self.is.len()));
        if result.is_none() {
            log::debug!(
                "permutation {} out of range ({} found)",
                index,
                state.counter
            );
        }
        result
    }

    /// A single ordering built greedily: at every step the first item in
    /// registration order that can be scheduled is taken. No
    /// backtracking is done, so an `Err` means the constraints could not
    /// be met along the greedy path.
    pub fn first_permutation(&self) -> Result<Schedule<T>, PermError> {
        self.first_permutation_with(|_, _| {})
    }

    /// Like [`Self::first_permutation`], calling `on_step` after every
    /// greedy step with the step number (starting at 1) and the partial
    /// schedule. Passing `schedule.as_slice()` as the exclusion list of
    /// [`Self::dump_dot`] shows the graph that remains to be scheduled.
    pub fn first_permutation_with<F>(&self, mut on_step: F) -> Result<Schedule<T>, PermError>
    where
        F: FnMut(usize, &Schedule<T>),
    {
        let total = self.is.len();
        let mut schedule = Schedule::with_capacity(total);
        let mut step = 0;
        while schedule.len() != total {
            let avail = self.available(&schedule);
            if trace_enabled!() {
                let labels: Vec<String> = avail.iter().map(|&i| self.label(i)).collect();
                trace!("{} available: {}", avail.len(), labels.join(" "));
            }

            let mut next = None;
            for &inst in &avail {
                let mut attempt = schedule.clone();
                if self.schedule_instruction(&mut attempt, inst) {
                    next = Some(attempt);
                    break;
                }
            }
            match next {
                Some(attempt) => {
                    schedule = attempt;
                    step += 1;
                    on_step(step, &schedule);
                }
                None => {
                    log::debug!(
                        "greedy schedule stuck after {} of {} items",
                        schedule.len(),
                        total
                    );
                    return Err(PermError::NoAvailableItem {
                        scheduled: schedule.len(),
                        total,
                    });
                }
            }
        }
        Ok(schedule)
    }

    /// A random ordering. At every step one available item is picked
    /// uniformly; items whose direct chain cannot be placed are dropped
    /// from that step's candidates and another is drawn.
    ///
    /// This is not uniform over all valid orderings: steps with fewer
    /// candidates give each candidate a larger share.
    pub fn random_permutation<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<Schedule<T>, PermError> {
        let total = self.is.len();
        let mut schedule = Schedule::with_capacity(total);
        while schedule.len() != total {
            let mut avail = self.available(&schedule);
            loop {
                if avail.is_empty() {
                    return Err(PermError::DeadEnd {
                        scheduled: schedule.len(),
                        total,
                    });
                }
                let inst = avail.remove(rng.random_range(0..avail.len()));
                let mut attempt = schedule.clone();
                if self.schedule_instruction(&mut attempt, inst) {
                    schedule = attempt;
                    break;
                }
            }
        }
        Ok(schedule)
    }

    /// Draw `attempts` random orderings and keep the distinct ones, in
    /// the order they were first drawn. Draws that hit a dead end are
    /// skipped.
    pub fn sample_distinct<R: Rng>(
        &self,
        rng: &mut R,
        attempts: usize,
    ) -> Vec<Schedule<T>> {
        let mut seen: FxHashSet<Vec<T>> = FxHashSet::default();
        let mut found = Vec::new();
        let mut dead_ends = 0;
        for _ in 0..attempts {
            match self.random_permutation(rng) {
                Ok(schedule) => {
                    if seen.insert(schedule.to_list()) {
                        trace!("distinct permutation {}", found.len());
                        found.push(schedule);
                    }
                }
                Err(_) => dead_ends += 1,
            }
        }
        log::info!(
            "{} distinct permutations in {} attempts ({} dead ends)",
            found.len(),
            attempts,
            dead_ends
        );
        found
    }
}
