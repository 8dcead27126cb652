//! Live-variable analysis: which variables may be read before their next
//! write, at every program point.

use super::fact::SetFact;
use super::solver::{Analysis, Direction};
use crate::ir::{Method, StmtIndex, Var};
use crate::world::World;

/// A backward may-analysis computing, for every statement, the set of
/// variables whose current value may still be used on some path forward.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveVariableAnalysis;

impl Analysis for LiveVariableAnalysis {
    type Fact = SetFact<Var>;

    fn direction(&self) -> Direction {
        Direction::Backward
    }

    fn boundary_fact(&self, _world: &World, _method: &Method) -> SetFact<Var> {
        SetFact::bottom()
    }

    fn transfer(&self, _world: &World, method: &Method, node: StmtIndex, out_fact: &SetFact<Var>) -> SetFact<Var> {
        let mut in_fact = out_fact.clone();
        let stmt = &method.stmts()[node.index()];
        if let Some(def) = stmt.def() {
            in_fact.remove(&def);
        }
        for used in stmt.uses() {
            in_fact.insert(used);
        }
        in_fact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::solve;
    use crate::ir::cfg::{Cfg, EdgeKind};
    use crate::ir::{MethodId, Operand, Rvalue, StmtIndex as Idx};
    use crate::ir::builder::WorldBuilder;

    #[test]
    fn dead_store_is_not_live_before_overwrite() {
        let mut b = WorldBuilder::new();
        let object = b.add_class("Object", false, false, None, vec![]);
        let v0 = |m| WorldBuilder::var(m, 0);
        let m = b.add_method(
            object,
            "m",
            "()V",
            true,
            false,
            1,
            vec![true],
            None,
            vec![],
            vec![
                Rvalue::Use(Operand::Const(1)),
                Rvalue::Use(Operand::Const(2)),
            ]
            .into_iter()
            .map(|rhs| crate::ir::Stmt::Assign { lhs: v0(MethodId::new(0)), rhs })
            .chain(std::iter::once(crate::ir::Stmt::Return(Some(v0(MethodId::new(0))))))
            .collect(),
            Cfg::from_edges(
                3,
                [
                    (Idx::new(0), Idx::new(1), EdgeKind::Fallthrough),
                    (Idx::new(1), Idx::new(2), EdgeKind::Fallthrough),
                ],
            ),
        );
        let world = b.build(m).unwrap();
        let method = world.method(m);
        let result = solve(&LiveVariableAnalysis, &world, method);
        // v0 is overwritten at stmt 1 before any use, so it is not live
        // entering stmt 0.
        assert!(!result.in_fact(Idx::new(0)).contains(&v0(m)));
        assert!(result.in_fact(Idx::new(1)).contains(&v0(m)));
    }
}
