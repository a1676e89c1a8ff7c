/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Backtracking search over the tree of partial schedules.
//!
//! Each node of the tree is a partial schedule; its children are the
//! schedules obtained by atomically inserting one available item (plus
//! its direct-dependency closure). Children are visited in the order of
//! the availability list, which makes the numbering of complete
//! schedules canonical.

use alloc::vec;
use alloc::vec::Vec;
use core::slice;

use super::PermutationEngine;
use crate::{Item, Schedule};

/// Counts complete schedules and knows when to stop.
#[derive(Debug)]
pub(crate) struct SearchState {
    /// Complete schedules seen so far.
    pub counter: u64,
    /// How many more complete schedules to skip before returning one.
    /// `None` searches the whole tree.
    stop: Option<u64>,
}

impl SearchState {
    pub fn new(stop: Option<u64>) -> Self {
        Self { counter: 0, stop }
    }

    /// Record one complete schedule. Returns true if it is the one being
    /// looked for.
    #[inline(always)]
    fn complete(&mut self) -> bool {
        self.counter += 1;
        match &mut self.stop {
            Some(0) => true,
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }
}

impl<T: Item> PermutationEngine<T> {
    pub(crate) fn permute(
        &self,
        state: &mut SearchState,
        schedule: Schedule<T>,
    ) -> Option<Schedule<T>> {
        if self.iterative() {
            self.permute_iterative(state, schedule)
        } else {
            self.permute_recursive(state, &schedule)
        }
    }

    pub(crate) fn permute_recursive(
        &self,
        state: &mut SearchState,
        schedule: &Schedule<T>,
    ) -> Option<Schedule<T>> {
        let total = self.is.len();
        for inst in self.available(schedule) {
            let mut attempt = schedule.clone();
            if !self.schedule_instruction(&mut attempt, inst) {
                trace!("backtrack: {:?} cannot be placed", inst);
                continue;
            }

            if attempt.len() == total {
                if state.complete() {
                    return Some(attempt);
                }
            } else if let Some(result) = self.permute_recursive(state, &attempt) {
                return Some(result);
            }
        }
        None
    }

    /// Same traversal as [`Self::permute_recursive`], with the call
    /// stack made explicit.
    pub(crate) fn permute_iterative(
        &self,
        state: &mut SearchState,
        schedule: Schedule<T>,
    ) -> Option<Schedule<T>> {
        struct Frame<T: Item> {
            schedule: Schedule<T>,
            avail: Vec<T>,
            next: usize,
        }

        let total = self.is.len();
        let avail = self.available(&schedule);
        let mut stack = vec![Frame {
            schedule,
            avail,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let inst = match frame.avail.get(frame.next) {
                Some(&inst) => inst,
                None => {
                    stack.pop();
                    continue;
                }
            };
            frame.next += 1;

            let mut attempt = frame.schedule.clone();
            if !self.schedule_instruction(&mut attempt, inst) {
                trace!("backtrack: {:?} cannot be placed", inst);
                continue;
            }

            if attempt.len() == total {
                if state.complete() {
                    return Some(attempt);
                }
            } else {
                let avail = self.available(&attempt);
                stack.push(Frame {
                    schedule: attempt,
                    avail,
                    next: 0,
                });
            }
        }
        None
    }

    /// Atomically insert `inst` and, transitively, its direct dependents.
    ///
    /// Availability is computed once after `inst` is appended, and every
    /// direct dependent of `inst` must be in that set. Returns false if
    /// some part of the chain cannot be placed; the schedule is then left
    /// partially extended and must be discarded by the caller.
    pub(crate) fn schedule_instruction(&self, schedule: &mut Schedule<T>, inst: T) -> bool {
        if self.iterative() {
            self.schedule_instruction_iterative(schedule, inst)
        } else {
            self.schedule_instruction_recursive(schedule, inst)
        }
    }

    fn schedule_instruction_recursive(&self, schedule: &mut Schedule<T>, inst: T) -> bool {
        trace!("scheduling {:?}", inst);
        schedule.schedule_instruction(inst);
        let avail = self.available(schedule);

        for &direct in self.dg.direct_dependents(inst) {
            if schedule.contains(direct) {
                // Already pulled in by an earlier dependent's chain.
                continue;
            }
            if !avail.contains(&direct) {
                trace!(" direct dependency {:?} not available", direct);
                return false;
            }
            if !self.schedule_instruction_recursive(schedule, direct) {
                return false;
            }
        }
        true
    }

    fn schedule_instruction_iterative(&self, schedule: &mut Schedule<T>, inst: T) -> bool {
        struct Frame<'a, T> {
            avail: Vec<T>,
            directs: slice::Iter<'a, T>,
        }

        schedule.schedule_instruction(inst);
        let mut stack = vec![Frame {
            avail: self.available(schedule),
            directs: self.dg.direct_dependents(inst).iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let direct = match frame.directs.next() {
                Some(&direct) => direct,
                None => {
                    stack.pop();
                    continue;
                }
            };
            if schedule.contains(direct) {
                continue;
            }
            if !frame.avail.contains(&direct) {
                trace!(" direct dependency {:?} not available", direct);
                return false;
            }
            schedule.schedule_instruction(direct);
            stack.push(Frame {
                avail: self.available(schedule),
                directs: self.dg.direct_dependents(direct).iter(),
            });
        }
        true
    }
}
