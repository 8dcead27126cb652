//! A control-flow graph over a method's statement sequence.

use std::collections::BTreeMap;

use super::StmtIndex;

/// The kind of control-flow edge leaving a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    /// Falls through to the next statement, or is the only successor of a
    /// statement with no branching instruction.
    Fallthrough,
    /// The `if` condition evaluated true.
    IfTrue,
    /// The `if` condition evaluated false.
    IfFalse,
    /// A `switch` case matching `value`.
    SwitchCase(i32),
    /// The `switch` default case.
    SwitchDefault,
}

/// A control-flow graph over `StmtIndex` nodes, with edges labeled by
/// [`EdgeKind`].
///
/// Nodes are implicit: any index appearing as the source or target of an
/// edge, or passed to [`Cfg::from_edges`] as a node, is part of the graph.
#[derive(Debug, Clone, Default)]
pub struct Cfg {
    entry: StmtIndex,
    successors: BTreeMap<StmtIndex, Vec<(StmtIndex, EdgeKind)>>,
    predecessors: BTreeMap<StmtIndex, Vec<StmtIndex>>,
    node_count: usize,
}

impl Cfg {
    /// Builds a CFG from an explicit edge list.
    ///
    /// # Panics
    ///
    /// Panics if the same `(source, target, kind)` triple is supplied twice.
    #[must_use]
    pub fn from_edges(node_count: usize, edges: impl IntoIterator<Item = (StmtIndex, StmtIndex, EdgeKind)>) -> Self {
        let mut successors: BTreeMap<StmtIndex, Vec<(StmtIndex, EdgeKind)>> = BTreeMap::new();
        let mut predecessors: BTreeMap<StmtIndex, Vec<StmtIndex>> = BTreeMap::new();
        for (from, to, kind) in edges {
            let out = successors.entry(from).or_default();
            assert!(
                !out.iter().any(|(t, k)| *t == to && *k == kind),
                "Duplicate edge {from} -> {to} ({kind:?})"
            );
            out.push((to, kind));
            predecessors.entry(to).or_default().push(from);
        }
        Self {
            entry: StmtIndex::ENTRY,
            successors,
            predecessors,
            node_count,
        }
    }

    /// The method's entry statement (always [`StmtIndex::ENTRY`]).
    #[must_use]
    pub const fn entry_point(&self) -> StmtIndex {
        self.entry
    }

    /// The number of statements in the method, including unreachable ones.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// All statement indices, in order.
    pub fn nodes(&self) -> impl Iterator<Item = StmtIndex> + '_ {
        (0..self.node_count as u32).map(StmtIndex::new)
    }

    /// The `(target, kind)` pairs leaving `node`, empty for exit statements.
    #[must_use]
    pub fn successors(&self, node: StmtIndex) -> &[(StmtIndex, EdgeKind)] {
        self.successors.get(&node).map_or(&[], Vec::as_slice)
    }

    /// The statements with an edge into `node`.
    #[must_use]
    pub fn predecessors(&self, node: StmtIndex) -> &[StmtIndex] {
        self.predecessors.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Statements with no outgoing edges: every `Return`.
    pub fn exits(&self) -> impl Iterator<Item = StmtIndex> + '_ {
        self.nodes().filter(|n| self.successors(*n).is_empty())
    }

    /// All edges in the graph, as `(source, target, kind)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (StmtIndex, StmtIndex, EdgeKind)> + '_ {
        self.successors
            .iter()
            .flat_map(|(from, outs)| outs.iter().map(move |(to, kind)| (*from, *to, *kind)))
    }
}
