/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! A constrained permutation engine.
//!
//! Given a set of opaque items and ordering constraints between them,
//! [`PermutationEngine`] counts, indexes, randomly samples, or greedily
//! produces total orderings ("schedules") that respect the
//! constraints. Two kinds of constraint exist:
//!
//! - [`DepKind::Normal`]: the dependent may only be scheduled once its
//!   prerequisite has been scheduled.
//! - [`DepKind::Direct`]: the dependent is scheduled in the same
//!   atomic step as its prerequisite, immediately after it. This is
//!   transitive along chains of direct dependencies.
//!
//! The engine never looks inside an item beyond equality and hashing;
//! it is generic over any [`Item`].

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// Even when the `log` level filters them out, trace calls cost something
// on the hot paths, so they compile to nothing unless the `trace-log`
// feature is enabled.
macro_rules! trace {
    ($($tt:tt)*) => {
        if cfg!(feature = "trace-log") {
            ::log::trace!($($tt)*);
        }
    };
}

macro_rules! trace_enabled {
    () => {
        cfg!(feature = "trace-log") && ::log::log_enabled!(::log::Level::Trace)
    };
}

use alloc::string::String;
use core::hash::{BuildHasherDefault, Hash};
use rustc_hash::FxHasher;

type FxHashMap<K, V> = hashbrown::HashMap<K, V, BuildHasherDefault<FxHasher>>;
type FxHashSet<V> = hashbrown::HashSet<V, BuildHasherDefault<FxHasher>>;

#[macro_use]
mod index;
pub use index::Inst;

pub mod checker;
pub mod dot;
mod engine;
pub mod graph;
pub mod insts;
pub mod schedule;
pub mod selection;

#[cfg(feature = "enable-serde")]
pub mod serialize;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;

pub use engine::{LabelFn, PermutationEngine};
pub use graph::{DepKind, Dependency, DependencyGraph};
pub use insts::InstructionSet;
pub use schedule::Schedule;
pub use selection::PermutationSelection;

/// A unit of work that can be placed in a schedule.
///
/// This is blanket-implemented for every type that is cheap to copy
/// and can be compared and hashed; the engine needs nothing else.
pub trait Item: Copy + Eq + Hash + core::fmt::Debug {}

impl<T: Copy + Eq + Hash + core::fmt::Debug> Item for T {}

/// An error returned by the permutation engine.
///
/// Items are carried as their `Debug` text so that the error type does
/// not depend on the item type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PermError {
    /// A constraint would make an item depend on itself.
    SelfDependency(String),
    /// An item was registered twice.
    DuplicateItem(String),
    /// Greedy scheduling found no available item while `scheduled` of
    /// `total` items were placed. The constraint set is unsatisfiable
    /// (a cycle, or a direct chain that can never be placed).
    NoAvailableItem { scheduled: usize, total: usize },
    /// Random scheduling reached a partial schedule that cannot be
    /// extended.
    DeadEnd { scheduled: usize, total: usize },
    /// A permutation selection string could not be parsed.
    InvalidSelection(String),
}

impl core::fmt::Display for PermError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PermError {}

/// Default item count above which the search switches from call-stack
/// recursion to an explicit stack.
pub const DEFAULT_RECURSION_LIMIT: usize = 256;

/// Options for the permutation engine.
#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    /// Problems with more items than this are searched with explicit
    /// stacks instead of recursion. The results are identical.
    pub recursion_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}
