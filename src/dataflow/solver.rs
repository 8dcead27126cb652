//! The generic worklist fixed-point solver.

use std::collections::VecDeque;

use super::{DataflowResult, Lattice};
use crate::ir::{Method, StmtIndex};
use crate::world::World;

/// Whether an [`Analysis`] propagates facts from entry to exits or from
/// exits back to entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// IN is computed from predecessors' OUT; the boundary fact seeds the
    /// entry statement's IN.
    Forward,
    /// OUT is computed from successors' IN; the boundary fact seeds every
    /// exit statement's OUT.
    Backward,
}

/// A monotone dataflow problem over one method's CFG.
pub trait Analysis {
    /// The lattice fact this analysis computes per statement.
    type Fact: Lattice;

    /// This analysis's propagation direction.
    fn direction(&self) -> Direction;

    /// The fact supplied at the boundary (the entry statement for a forward
    /// analysis, every exit statement for a backward one) instead of the
    /// lattice bottom.
    fn boundary_fact(&self, world: &World, method: &Method) -> Self::Fact;

    /// Computes the statement's far-side fact from its near-side fact: OUT
    /// from IN for a forward analysis, IN from OUT for a backward one.
    fn transfer(&self, world: &World, method: &Method, node: StmtIndex, fact: &Self::Fact) -> Self::Fact;
}

/// Runs `analysis` to a fixed point over `method`'s CFG.
pub fn solve<A: Analysis>(analysis: &A, world: &World, method: &Method) -> DataflowResult<A::Fact> {
    let cfg = method.cfg();
    let mut result = DataflowResult::new(cfg.node_count());
    let mut worklist: VecDeque<StmtIndex> = cfg.nodes().collect();

    match analysis.direction() {
        Direction::Forward => {
            let entry = cfg.entry_point();
            while let Some(node) = worklist.pop_front() {
                let in_fact = if node == entry {
                    analysis.boundary_fact(world, method)
                } else {
                    cfg.predecessors(node)
                        .iter()
                        .fold(A::Fact::bottom(), |acc, &p| acc.combine(result.out_fact(p)))
                };
                result.set_in_fact(node, in_fact.clone());

                let out_fact = analysis.transfer(world, method, node, &in_fact);
                if &out_fact != result.out_fact(node) {
                    result.set_out_fact(node, out_fact);
                    for &(succ, _) in cfg.successors(node) {
                        if !worklist.contains(&succ) {
                            worklist.push_back(succ);
                        }
                    }
                }
            }
        }
        Direction::Backward => {
            let exits: Vec<StmtIndex> = cfg.exits().collect();
            while let Some(node) = worklist.pop_front() {
                let out_fact = if exits.contains(&node) {
                    analysis.boundary_fact(world, method)
                } else {
                    cfg.successors(node)
                        .iter()
                        .fold(A::Fact::bottom(), |acc, &(s, _)| acc.combine(result.in_fact(s)))
                };
                result.set_out_fact(node, out_fact.clone());

                let in_fact = analysis.transfer(world, method, node, &out_fact);
                if &in_fact != result.in_fact(node) {
                    result.set_in_fact(node, in_fact);
                    for &pred in cfg.predecessors(node) {
                        if !worklist.contains(&pred) {
                            worklist.push_back(pred);
                        }
                    }
                }
            }
        }
    }

    result
}
