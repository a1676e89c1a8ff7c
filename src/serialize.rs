use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::{DepKind, Dependency, EngineOptions, Item, PermError, PermutationEngine};

/// The items and constraints of an engine in a form that can be
/// serialized and deserialized.
///
/// Constraints are replayed in their original registration order, so a
/// round trip preserves the canonical enumeration order. The serialized
/// form is not stable across versions of this crate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializableProblem<T> {
    pub items: Vec<T>,
    pub dependencies: Vec<Dependency<T>>,
}

impl<T: Item> SerializableProblem<T> {
    pub fn new(engine: &PermutationEngine<T>) -> Self {
        Self {
            items: engine.instructions().iter().collect(),
            dependencies: engine.graph().iter().copied().collect(),
        }
    }

    /// Build an engine from this problem. Fails on the same malformed
    /// input that direct registration rejects.
    pub fn to_engine(&self, options: EngineOptions) -> Result<PermutationEngine<T>, PermError> {
        let mut engine = PermutationEngine::with_options(options);
        for &item in &self.items {
            engine.add_instruction(item)?;
        }
        for dep in &self.dependencies {
            match dep.kind {
                DepKind::Normal => engine.add_dependency(dep.dependent, dep.independent)?,
                DepKind::Direct => engine.add_direct_dependency(dep.dependent, dep.independent)?,
            }
        }
        Ok(engine)
    }
}
