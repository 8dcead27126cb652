//! The pointer-flow graph: a directed graph of [`Pointer`]s whose edges mean
//! "points-to information flows from here to there", plus each pointer's
//! current points-to set.

use std::collections::{BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;

use crate::ir::Var;
use crate::pta::pointer::{CSObj, CSVar, Pointer};

/// The pointer-flow graph together with every pointer's points-to set.
#[derive(Debug, Default)]
pub struct PointerFlowGraph {
    graph: DiGraphMap<Pointer, ()>,
    pts: HashMap<Pointer, BTreeSet<CSObj>>,
}

impl PointerFlowGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `pointer`'s current points-to set, empty if untouched.
    #[must_use]
    pub fn pts(&self, pointer: Pointer) -> BTreeSet<CSObj> {
        self.pts.get(&pointer).cloned().unwrap_or_default()
    }

    /// The union, over every context-sensitive incarnation of `var`, of its
    /// points-to set.
    #[must_use]
    pub fn var_pts_any_context(&self, var: Var) -> BTreeSet<CSObj> {
        self.pts
            .iter()
            .filter_map(|(pointer, objs)| match pointer {
                Pointer::Var(CSVar { var: v, .. }) if *v == var => Some(objs),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Adds a flow edge from `from` to `to`, returning whether it is new.
    pub fn add_edge(&mut self, from: Pointer, to: Pointer) -> bool {
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// The pointers `pointer` flows into.
    pub fn successors(&self, pointer: Pointer) -> impl Iterator<Item = Pointer> + '_ {
        self.graph.neighbors(pointer)
    }

    /// Merges `objs` into `pointer`'s points-to set, returning only the
    /// objects that were not already present (the delta to propagate
    /// onward).
    pub fn propagate(&mut self, pointer: Pointer, objs: &BTreeSet<CSObj>) -> BTreeSet<CSObj> {
        self.graph.add_node(pointer);
        let existing = self.pts.entry(pointer).or_default();
        let delta: BTreeSet<CSObj> = objs.difference(existing).copied().collect();
        existing.extend(&delta);
        delta
    }
}
