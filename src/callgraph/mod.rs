//! Call-graph construction: [`cha`] builds a whole-program call graph via
//! class-hierarchy analysis.

pub mod cha;

use petgraph::graphmap::DiGraphMap;

use crate::ir::{InvokeKind, MethodId, StmtIndex};

/// Identifies an invocation statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallSite {
    /// The method containing the call.
    pub method: MethodId,
    /// The call statement's position in that method.
    pub stmt: StmtIndex,
}

/// A resolved call-graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEdge {
    /// The call site.
    pub call_site: CallSite,
    /// The resolved callee.
    pub callee: MethodId,
    /// The dispatch kind declared at the call site.
    pub kind: InvokeKind,
}

/// A whole-program call graph: reachable methods and the edges between them.
#[derive(Debug, Default)]
pub struct CallGraph {
    edges: Vec<CallEdge>,
    graph: DiGraphMap<MethodId, ()>,
}

impl CallGraph {
    /// An empty call graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edge, returning whether it is new.
    pub fn add_edge(&mut self, call_site: CallSite, callee: MethodId, kind: InvokeKind) -> bool {
        let edge = CallEdge { call_site, callee, kind };
        if self.edges.contains(&edge) {
            return false;
        }
        self.graph.add_node(call_site.method);
        self.graph.add_node(callee);
        self.graph.add_edge(call_site.method, callee, ());
        self.edges.push(edge);
        true
    }

    /// Every resolved edge.
    pub fn edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.edges.iter()
    }

    /// Every method reachable from the entry point, including the entry
    /// point itself.
    pub fn reachable_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.graph.nodes()
    }

    /// The resolved callees at `call_site`.
    pub fn callees(&self, call_site: CallSite) -> impl Iterator<Item = MethodId> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.call_site == call_site)
            .map(|e| e.callee)
    }

    /// A read-only view of the method-level call graph as a `petgraph`
    /// graph, for downstream traversal or visualization.
    #[cfg(feature = "petgraph-export")]
    #[must_use]
    pub fn as_petgraph(&self) -> &DiGraphMap<MethodId, ()> {
        &self.graph
    }
}
