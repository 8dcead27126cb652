//! The points-to sets and call graph a pointer-analysis run produces.

use std::collections::BTreeSet;

use crate::callgraph::{CallGraph, CallSite};
use crate::ir::MethodId;
use crate::pta::context::Context;
use crate::pta::pfg::PointerFlowGraph;
use crate::pta::pointer::{CSObj, CSVar, Pointer};

/// The output of [`crate::pta::solver::analyze`]: every context-sensitive
/// variable's points-to set, plus the call graph discovered on the fly.
#[derive(Debug)]
pub struct PointsToResult {
    pfg: PointerFlowGraph,
    call_graph: CallGraph,
}

impl PointsToResult {
    pub(crate) const fn new(pfg: PointerFlowGraph, call_graph: CallGraph) -> Self {
        Self { pfg, call_graph }
    }

    /// The points-to set of `var` under context `ctx`.
    #[must_use]
    pub fn points_to(&self, ctx: Context, var: crate::ir::Var) -> BTreeSet<CSObj> {
        self.pfg.pts(Pointer::Var(CSVar { ctx, var }))
    }

    /// The union, over every context `var` was analyzed under, of its
    /// points-to set — the projection spec.md §4.9 asks for when reporting
    /// results context-insensitively regardless of how the analysis itself
    /// was run.
    #[must_use]
    pub fn points_to_any_context(&self, var: crate::ir::Var) -> BTreeSet<CSObj> {
        self.pfg.var_pts_any_context(var)
    }

    /// The resolved targets at `call_site`, deduplicated at the method
    /// level (collapsing distinct contexts of the same callee).
    pub fn callees(&self, call_site: CallSite) -> impl Iterator<Item = MethodId> + '_ {
        self.call_graph.callees(call_site)
    }

    /// The whole-program call graph discovered on the fly, projected down
    /// to plain methods (context information discarded).
    #[must_use]
    pub const fn call_graph(&self) -> &CallGraph {
        &self.call_graph
    }
}
