//! End-to-end class-hierarchy call-graph construction scenarios.

use std::collections::BTreeSet;

use flowcore::callgraph::cha::build;
use flowcore::callgraph::CallSite;
use flowcore::ir::builder::WorldBuilder;
use flowcore::ir::cfg::{Cfg, EdgeKind};
use flowcore::ir::{Invoke, InvokeKind, Stmt, StmtIndex, Subsignature};

/// CHA1: an interface call with two concrete implementors resolves to both
/// overrides, and the abstract declaration itself is never a target.
#[test]
fn cha1_interface_call_reaches_every_override() {
    let mut b = WorldBuilder::new();
    let shape = b.add_class("Shape", true, true, None, vec![]);
    let circle = b.add_class("Circle", false, false, None, vec![shape]);
    let square = b.add_class("Square", false, false, None, vec![shape]);

    let draw_circle = b.add_method(circle, "draw", "()V", false, false, 1, vec![false], None, vec![], vec![Stmt::Return(None)], Cfg::from_edges(1, []));
    let draw_square = b.add_method(square, "draw", "()V", false, false, 1, vec![false], None, vec![], vec![Stmt::Return(None)], Cfg::from_edges(1, []));

    let caller_owner = b.add_class("Main", false, false, None, vec![]);
    let main_id = b.next_method_id();
    let recv = WorldBuilder::var(main_id, 0);
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
    assert_eq!(main, main_id);
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

/// A static call is never polymorphic: it resolves to exactly one target
/// regardless of subclasses.
#[test]
fn cha2_static_call_resolves_to_single_target_even_with_subclasses() {
    let mut b = WorldBuilder::new();
    let base = b.add_class("Base", false, false, None, vec![]);
    let _derived = b.add_class("Derived", false, false, Some(base), vec![]);
    let helper = b.add_method(base, "helper", "()V", false, false, 1, vec![false], None, vec![], vec![Stmt::Return(None)], Cfg::from_edges(1, []));

    let call_stmt = Stmt::Invoke {
        lhs: None,
        call: Invoke {
            kind: InvokeKind::Static,
            declaring_class: base,
            subsignature: Subsignature::new("helper", "()V"),
            receiver: None,
            args: vec![],
        },
    };
    let main = b.add_method(
        base,
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
}
