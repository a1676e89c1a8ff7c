/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Graphviz output of the constraint graph.
//!
//! The format is fixed because external tooling reads it:
//!
//! ```text
//! digraph G {
//! inst0 [shape=box];
//! inst1 [shape=box];
//! edge [color=black];
//! inst0 -> inst1;
//! }
//! ```
//!
//! Nodes come first, in registration order. Every edge statement is
//! preceded by a color statement: black for normal constraints, red for
//! direct ones. Edges point from the independent item to the dependent
//! one. There is no newline after the closing brace.

use core::fmt;

use crate::{DepKind, Item, PermutationEngine};

impl<T: Item> PermutationEngine<T> {
    /// Write the graph, leaving out the items in `exclude` and every edge
    /// that touches one of them.
    pub fn dump_dot<W: fmt::Write>(&self, out: &mut W, exclude: &[T]) -> fmt::Result {
        writeln!(out, "digraph G {{")?;

        for inst in self.is.iter() {
            if exclude.contains(&inst) {
                continue;
            }
            writeln!(out, "{} [shape=box];", self.label(inst))?;
        }

        for dep in self.dg.iter() {
            if exclude.contains(&dep.independent) || exclude.contains(&dep.dependent) {
                continue;
            }
            let color = match dep.kind {
                DepKind::Normal => "black",
                DepKind::Direct => "red",
            };
            writeln!(out, "edge [color={}];", color)?;
            writeln!(
                out,
                "{} -> {};",
                self.label(dep.independent),
                self.label(dep.dependent)
            )?;
        }

        write!(out, "}}")
    }

    /// Write the graph to the file at `path`, replacing its contents.
    #[cfg(feature = "std")]
    pub fn write_dot<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        exclude: &[T],
    ) -> std::io::Result<()> {
        let mut text = alloc::string::String::new();
        self.dump_dot(&mut text, exclude)
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "formatting failed"))?;
        std::fs::write(path.as_ref(), text)?;
        log::debug!("wrote constraint graph to {}", path.as_ref().display());
        Ok(())
    }
}
