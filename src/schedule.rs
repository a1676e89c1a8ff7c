/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Partial and complete schedules.

use alloc::vec::Vec;

use crate::{FxHashSet, Item};

/// An ordered, append-only sequence of scheduled items.
///
/// Cloning a schedule copies it; the search clones one per branch so
/// that no branch can observe another's partial state.
#[derive(Clone, Debug)]
pub struct Schedule<T: Item> {
    order: Vec<T>,
    members: FxHashSet<T>,
}

impl<T: Item> Default for Schedule<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: FxHashSet::default(),
        }
    }
}

impl<T: Item> PartialEq for Schedule<T> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<T: Item> Eq for Schedule<T> {}

impl<T: Item> Schedule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n),
            members: FxHashSet::with_capacity_and_hasher(n, Default::default()),
        }
    }

    #[inline(always)]
    pub fn schedule_instruction(&mut self, item: T) {
        debug_assert!(!self.members.contains(&item));
        self.order.push(item);
        self.members.insert(item);
    }

    #[inline(always)]
    pub fn contains(&self, item: T) -> bool {
        self.members.contains(&item)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.order[..]
    }

    pub fn to_list(&self) -> Vec<T> {
        self.order.clone()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.order
    }
}
