/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Choosing which permutation to apply to which region.
//!
//! A scheduling pass that explores permutations is driven by two option
//! strings:
//!
//! - the list of enabled blocks, `func_block,func_block,...`;
//! - the permutation index per region, `func_block_region=index,...`.
//!
//! Regions without an entry use permutation 0, which is the first
//! ordering in canonical enumeration order.

use alloc::format;
use alloc::string::{String, ToString};

use crate::{FxHashMap, FxHashSet, PermError};

#[derive(Clone, Debug, Default)]
pub struct PermutationSelection {
    enabled: FxHashSet<String>,
    indices: FxHashMap<String, u64>,
}

impl PermutationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the enabled-block list and the per-region index list. Empty
    /// entries are ignored.
    pub fn parse(enabled: &str, perms: &str) -> Result<Self, PermError> {
        let mut sel = Self::new();
        for name in entries(enabled) {
            sel.enabled.insert(name.to_string());
        }
        for entry in entries(perms) {
            let (region, index) = match entry.split_once('=') {
                Some(pair) => pair,
                None => {
                    return Err(PermError::InvalidSelection(format!(
                        "expected REGION=INDEX, got `{}`",
                        entry
                    )))
                }
            };
            let index = index.trim().parse::<u64>().map_err(|_| {
                PermError::InvalidSelection(format!("bad permutation index in `{}`", entry))
            })?;
            sel.indices.insert(region.trim().to_string(), index);
        }
        log::debug!(
            "permutation selection: {} enabled blocks, {} region indices",
            sel.enabled.len(),
            sel.indices.len()
        );
        Ok(sel)
    }

    pub fn enable(&mut self, name: &str) {
        self.enabled.insert(name.to_string());
    }

    pub fn set_index(&mut self, region: &str, index: u64) {
        self.indices.insert(region.to_string(), index);
    }

    /// The name under which a block is enabled.
    pub fn block_key(func: &str, block: &str) -> String {
        format!("{}_{}", func, block)
    }

    /// The name under which a region's index is looked up.
    pub fn region_key(func: &str, block: &str, region: usize) -> String {
        format!("{}_{}_{}", func, block, region)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// The permutation index for `region`, or 0 if none was given.
    pub fn index_for(&self, region: &str) -> u64 {
        self.indices.get(region).copied().unwrap_or(0)
    }
}

fn entries(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|e| !e.is_empty())
}
