//! Class-hierarchy analysis: resolves each call site's possible targets
//! using only static type information, and builds the call graph by BFS
//! from a single entry method.

use std::collections::{BTreeSet, VecDeque};

use super::{CallGraph, CallSite};
use crate::ir::{ClassId, Invoke, InvokeKind, MethodId, Stmt, StmtIndex, Subsignature};
use crate::world::World;

/// Resolves `sub` starting at `class` and walking up the superclass chain,
/// returning the first non-abstract declaration found.
#[must_use]
pub fn dispatch(world: &World, class: ClassId, sub: &Subsignature) -> Option<MethodId> {
    let mut current = Some(class);
    while let Some(c) = current {
        if let Some(method) = world.declared_concrete_method(c, sub) {
            return Some(method);
        }
        current = world.super_class_of(c);
    }
    None
}

/// The possible targets of `call`, under CHA's closed-world assumption.
#[must_use]
pub fn resolve_targets(world: &World, call: &Invoke) -> BTreeSet<MethodId> {
    let mut targets = BTreeSet::new();
    match call.kind {
        InvokeKind::Static | InvokeKind::Special => {
            targets.extend(dispatch(world, call.declaring_class, &call.subsignature));
        }
        InvokeKind::Virtual => {
            targets.extend(dispatch(world, call.declaring_class, &call.subsignature));
            for sub_class in world.all_subclasses_of(call.declaring_class) {
                targets.extend(dispatch(world, sub_class, &call.subsignature));
            }
        }
        InvokeKind::Interface => {
            for implementor in world.all_implementors_of(call.declaring_class) {
                targets.extend(dispatch(world, implementor, &call.subsignature));
            }
        }
        InvokeKind::Dynamic => {}
    }
    targets
}

/// Builds a whole-program call graph by BFS from `entry`, resolving every
/// call site reached along the way with [`resolve_targets`].
#[must_use]
pub fn build(world: &World, entry: MethodId) -> CallGraph {
    let mut graph = CallGraph::new();
    let mut reachable = BTreeSet::new();
    let mut worklist = VecDeque::new();
    reachable.insert(entry);
    worklist.push_back(entry);

    while let Some(caller) = worklist.pop_front() {
        let method = world.method(caller);
        for (index, stmt) in method.stmts().iter().enumerate() {
            let Stmt::Invoke { call, .. } = stmt else { continue };
            let call_site = CallSite {
                method: caller,
                stmt: StmtIndex::new(u32::try_from(index).expect("method too large")),
            };
            for callee in resolve_targets(world, call) {
                graph.add_edge(call_site, callee, call.kind);
                if reachable.insert(callee) {
                    worklist.push_back(callee);
                }
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::builder::WorldBuilder;
    use crate::ir::cfg::{Cfg, EdgeKind};
    use crate::ir::{Operand, Rvalue, Var};

    fn leaf_method(b: &mut WorldBuilder, owner: ClassId, name: &str, is_abstract: bool) -> MethodId {
        let stmts = if is_abstract {
            vec![]
        } else {
            vec![Stmt::Return(None)]
        };
        let cfg = if is_abstract {
            Cfg::default()
        } else {
            Cfg::from_edges(1, [])
        };
        b.add_method(owner, name, "()V", false, is_abstract, 1, vec![false], None, vec![], stmts, cfg)
    }

    /// A virtual call through an interface resolves to every concrete
    /// implementor's override.
    #[test]
    fn virtual_dispatch_reaches_every_override() {
        let mut b = WorldBuilder::new();
        let shape = b.add_class("Shape", true, true, None, vec![]);
        let circle = b.add_class("Circle", false, false, None, vec![shape]);
        let square = b.add_class("Square", false, false, None, vec![shape]);

        leaf_method(&mut b, shape, "draw", true);
        let draw_circle = leaf_method(&mut b, circle, "draw", false);
        let draw_square = leaf_method(&mut b, square, "draw", false);

        let caller_owner = b.add_class("Main", false, false, None, vec![]);
        let recv = Var::new(MethodId::new(3), 0);
        let call_stmt = Stmt::Invoke {
            lhs: None,
            call: Invoke {
                kind: InvokeKind::Interface,
                declaring_class: shape,
                subsignature: Subsignature::new("draw", "()V"),
                receiver: Some(recv),
                args: vec![],
            },
        };
        let main = b.add_method(
            caller_owner,
            "main",
            "()V",
            true,
            false,
            1,
            vec![false],
            None,
            vec![],
            vec![call_stmt, Stmt::Return(None)],
            Cfg::from_edges(2, [(StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough)]),
        );
        let world = b.build(main).unwrap();

        let graph = build(&world, main);
        let targets: BTreeSet<_> = graph
            .callees(CallSite {
                method: main,
                stmt: StmtIndex::new(0),
            })
            .collect();
        assert_eq!(targets, BTreeSet::from([draw_circle, draw_square]));
        assert!(graph.reachable_methods().any(|m| m == draw_circle));
        assert!(graph.reachable_methods().any(|m| m == draw_square));
    }

    #[test]
    fn static_call_resolves_to_a_single_target() {
        let mut b = WorldBuilder::new();
        let util = b.add_class("Util", false, false, None, vec![]);
        let helper = leaf_method(&mut b, util, "helper", false);
        let call_stmt = Stmt::Invoke {
            lhs: None,
            call: Invoke {
                kind: InvokeKind::Static,
                declaring_class: util,
                subsignature: Subsignature::new("helper", "()V"),
                receiver: None,
                args: vec![],
            },
        };
        let main = b.add_method(
            util,
            "main",
            "()V",
            true,
            false,
            0,
            vec![],
            None,
            vec![],
            vec![call_stmt, Stmt::Return(None)],
            Cfg::from_edges(2, [(StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough)]),
        );
        let world = b.build(main).unwrap();
        let graph = build(&world, main);
        assert_eq!(
            graph
                .callees(CallSite {
                    method: main,
                    stmt: StmtIndex::new(0)
                })
                .collect::<Vec<_>>(),
            vec![helper]
        );
        let _ = Operand::Const(0);
        let _ = Rvalue::Use(Operand::Const(0));
    }
}
