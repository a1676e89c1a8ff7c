/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Ordering constraints between items.

use alloc::format;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::{FxHashMap, FxHashSet, Item, PermError};

/// The kind of an ordering constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "enable-serde",
    derive(::serde::Serialize, ::serde::Deserialize)
)]
pub enum DepKind {
    /// The dependent may not be scheduled before the independent.
    Normal,
    /// The dependent is scheduled in the same atomic step as the
    /// independent, immediately after it.
    Direct,
}

/// One constraint: `dependent` depends on `independent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "enable-serde",
    derive(::serde::Serialize, ::serde::Deserialize)
)]
pub struct Dependency<T> {
    pub dependent: T,
    pub independent: T,
    pub kind: DepKind,
}

/// The set of all registered constraints.
///
/// Constraints are kept in registration order, which is also the order
/// in which [`DependencyGraph::direct_dependents`] reports them. Two
/// adjacency indices avoid scanning the whole constraint list on every
/// availability query.
#[derive(Clone, Debug)]
pub struct DependencyGraph<T: Item> {
    deps: Vec<Dependency<T>>,
    seen: FxHashSet<Dependency<T>>,
    /// Map from a dependent to all of its independents, of either kind.
    prereqs: FxHashMap<T, SmallVec<[T; 4]>>,
    /// Map from an independent to its direct dependents.
    direct: FxHashMap<T, SmallVec<[T; 2]>>,
}

impl<T: Item> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self {
            deps: Vec::new(),
            seen: FxHashSet::default(),
            prereqs: FxHashMap::default(),
            direct: FxHashMap::default(),
        }
    }
}

impl<T: Item> DependencyGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.deps.clear();
        self.seen.clear();
        self.prereqs.clear();
        self.direct.clear();
    }

    /// Add a normal constraint. Adding an existing constraint is a no-op.
    pub fn add_dependency(&mut self, dependent: T, independent: T) -> Result<(), PermError> {
        self.add(dependent, independent, DepKind::Normal)
    }

    /// Add a constraint of the given kind. Adding an existing constraint
    /// is a no-op; a constraint from an item to itself is rejected.
    pub fn add(&mut self, dependent: T, independent: T, kind: DepKind) -> Result<(), PermError> {
        if dependent == independent {
            return Err(PermError::SelfDependency(format!("{:?}", dependent)));
        }
        let dep = Dependency {
            dependent,
            independent,
            kind,
        };
        if !self.seen.insert(dep) {
            return Ok(());
        }
        self.deps.push(dep);

        let prereqs = self.prereqs.entry(dependent).or_default();
        if !prereqs.contains(&independent) {
            prereqs.push(independent);
        }
        if kind == DepKind::Direct {
            self.direct.entry(independent).or_default().push(dependent);
        }
        Ok(())
    }

    pub fn has_dependency(&self, dependent: T, independent: T, kind: DepKind) -> bool {
        self.seen.contains(&Dependency {
            dependent,
            independent,
            kind,
        })
    }

    /// All items that must be scheduled immediately after `independent`,
    /// in registration order.
    pub fn direct_dependents(&self, independent: T) -> &[T] {
        self.direct
            .get(&independent)
            .map(|v| &v[..])
            .unwrap_or(&[])
    }

    /// All items that `dependent` depends on, regardless of kind, in
    /// registration order and without repeats.
    pub fn prerequisites(&self, dependent: T) -> &[T] {
        self.prereqs
            .get(&dependent)
            .map(|v| &v[..])
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency<T>> {
        self.deps.iter()
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn dedup_is_per_kind() {
        let mut g = DependencyGraph::new();
        g.add_dependency(1u32, 0).unwrap();
        g.add_dependency(1, 0).unwrap();
        assert_eq!(g.len(), 1);

        g.add(1, 0, DepKind::Direct).unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.has_dependency(1, 0, DepKind::Normal));
        assert!(g.has_dependency(1, 0, DepKind::Direct));
        assert!(!g.has_dependency(0, 1, DepKind::Normal));

        // Both kinds name the same prerequisite only once.
        assert_eq!(g.prerequisites(1), &[0]);
    }

    #[test]
    fn direct_dependents_in_registration_order() {
        let mut g = DependencyGraph::new();
        g.add(3u32, 0, DepKind::Direct).unwrap();
        g.add(1, 0, DepKind::Normal).unwrap();
        g.add(2, 0, DepKind::Direct).unwrap();
        assert_eq!(g.direct_dependents(0), &[3, 2]);
        assert!(g.direct_dependents(3).is_empty());
        assert_eq!(
            g.iter().map(|d| d.dependent).collect::<Vec<_>>(),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn self_dependency_is_rejected() {
        let mut g = DependencyGraph::new();
        assert_eq!(
            g.add(4u32, 4, DepKind::Direct),
            Err(PermError::SelfDependency("4".into()))
        );
        assert!(g.is_empty());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut g = DependencyGraph::new();
        g.add(1u32, 0, DepKind::Direct).unwrap();
        g.clear();
        assert!(g.is_empty());
        assert!(g.direct_dependents(0).is_empty());
        assert!(g.prerequisites(1).is_empty());
        assert!(!g.has_dependency(1, 0, DepKind::Direct));
    }
}
