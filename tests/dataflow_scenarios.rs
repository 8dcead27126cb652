//! End-to-end constant-propagation and dead-code scenarios against a
//! hand-built `World`.

use flowcore::dataflow::constprop::ConstantPropagation;
use flowcore::dataflow::fact::Value;
use flowcore::dataflow::{dead_code, solve};
use flowcore::ir::builder::WorldBuilder;
use flowcore::ir::cfg::{Cfg, EdgeKind};
use flowcore::ir::{BinOp, CmpOp, Condition, Operand, Rvalue, Stmt, StmtIndex};

/// CP1: straight-line propagation through an arithmetic chain.
#[test]
fn cp1_straight_line_propagation() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let v0 = WorldBuilder::var(id, 0);
    let v1 = WorldBuilder::var(id, 1);
    let stmts = vec![
        Stmt::Assign {
            lhs: v0,
            rhs: Rvalue::Use(Operand::Const(1)),
        },
        Stmt::Assign {
            lhs: v1,
            rhs: Rvalue::Binary(BinOp::Add, Operand::Var(v0), Operand::Const(2)),
        },
        Stmt::Return(Some(v1)),
    ];
    let cfg = Cfg::from_edges(
        3,
        [
            (StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough),
            (StmtIndex::new(1), StmtIndex::new(2), EdgeKind::Fallthrough),
        ],
    );
    let m = b.add_method(object, "m", "()I", true, false, 2, vec![true, true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let result = solve(&ConstantPropagation, &world, world.method(m));
    assert_eq!(result.out_fact(StmtIndex::new(1)).get(v1), Value::Const(3));
}

/// CP2: two paths disagreeing on a variable's constant value merge to NAC.
#[test]
fn cp2_merge_of_disagreeing_constants_is_nac() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let v0 = WorldBuilder::var(id, 0);
    let stmts = vec![
        Stmt::If {
            cond: Condition {
                op: CmpOp::Eq,
                lhs: Operand::Const(0),
                rhs: Operand::Const(0),
            },
        },
        Stmt::Assign {
            lhs: v0,
            rhs: Rvalue::Use(Operand::Const(1)),
        },
        Stmt::Assign {
            lhs: v0,
            rhs: Rvalue::Use(Operand::Const(2)),
        },
        Stmt::Return(Some(v0)),
    ];
    let cfg = Cfg::from_edges(
        4,
        [
            (StmtIndex::new(0), StmtIndex::new(1), EdgeKind::IfTrue),
            (StmtIndex::new(0), StmtIndex::new(2), EdgeKind::IfFalse),
            (StmtIndex::new(1), StmtIndex::new(3), EdgeKind::Fallthrough),
            (StmtIndex::new(2), StmtIndex::new(3), EdgeKind::Fallthrough),
        ],
    );
    let m = b.add_method(object, "m", "()I", true, false, 1, vec![true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let result = solve(&ConstantPropagation, &world, world.method(m));
    assert_eq!(result.in_fact(StmtIndex::new(3)).get(v0), Value::Nac);
}

/// CP3: division by zero yields `Undef`, never a panic.
#[test]
fn cp3_division_by_zero_is_undef() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let v0 = WorldBuilder::var(id, 0);
    let stmts = vec![
        Stmt::Assign {
            lhs: v0,
            rhs: Rvalue::Binary(BinOp::Div, Operand::Const(4), Operand::Const(0)),
        },
        Stmt::Return(Some(v0)),
    ];
    let cfg = Cfg::from_edges(2, [(StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough)]);
    let m = b.add_method(object, "m", "()I", true, false, 1, vec![true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let result = solve(&ConstantPropagation, &world, world.method(m));
    assert_eq!(result.out_fact(StmtIndex::new(0)).get(v0), Value::Undef);
}

/// DC1: a branch whose condition is a known-false constant makes its
/// true-target unreachable.
#[test]
fn dc1_constant_false_branch_prunes_true_target() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let v0 = WorldBuilder::var(id, 0);
    let stmts = vec![
        Stmt::If {
            cond: Condition {
                op: CmpOp::Eq,
                lhs: Operand::Const(1),
                rhs: Operand::Const(2),
            },
        },
        Stmt::Return(Some(v0)),
        Stmt::Return(Some(v0)),
    ];
    let cfg = Cfg::from_edges(
        3,
        [
            (StmtIndex::new(0), StmtIndex::new(1), EdgeKind::IfTrue),
            (StmtIndex::new(0), StmtIndex::new(2), EdgeKind::IfFalse),
        ],
    );
    let m = b.add_method(object, "m", "()I", true, false, 1, vec![true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let dead = dead_code::analyze(&world, world.method(m));
    assert!(dead.contains(&StmtIndex::new(1)));
    assert!(!dead.contains(&StmtIndex::new(2)));
}

/// DC2: `switch(k) { case 1: A; case 2: B; default: D; }` with `k`
/// constant-propagating to `3` — only `D` is reachable, `A` and `B` are dead.
#[test]
fn dc2_switch_on_constant_prunes_every_non_matching_case() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let k = WorldBuilder::var(id, 0);
    let stmts = vec![
        Stmt::Assign {
            lhs: k,
            rhs: Rvalue::Use(Operand::Const(3)),
        },
        Stmt::Switch { var: k },
        Stmt::Return(Some(k)), // A: case 1
        Stmt::Return(Some(k)), // B: case 2
        Stmt::Return(Some(k)), // D: default
    ];
    let cfg = Cfg::from_edges(
        5,
        [
            (StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough),
            (StmtIndex::new(1), StmtIndex::new(2), EdgeKind::SwitchCase(1)),
            (StmtIndex::new(1), StmtIndex::new(3), EdgeKind::SwitchCase(2)),
            (StmtIndex::new(1), StmtIndex::new(4), EdgeKind::SwitchDefault),
        ],
    );
    let m = b.add_method(object, "m", "()I", true, false, 1, vec![true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let dead = dead_code::analyze(&world, world.method(m));
    assert!(dead.contains(&StmtIndex::new(2)));
    assert!(dead.contains(&StmtIndex::new(3)));
    assert!(!dead.contains(&StmtIndex::new(4)));
}

/// A computed-but-never-read value with no side effect is dead (a generic
/// useless-assignment scenario, distinct from the switch-pruning DC2 case).
#[test]
fn dc3_unused_pure_computation_is_dead() {
    let mut b = WorldBuilder::new();
    let object = b.add_class("Object", false, false, None, vec![]);
    let id = b.next_method_id();
    let v0 = WorldBuilder::var(id, 0);
    let stmts = vec![
        Stmt::Assign {
            lhs: v0,
            rhs: Rvalue::Binary(BinOp::Mul, Operand::Const(6), Operand::Const(7)),
        },
        Stmt::Return(None),
    ];
    let cfg = Cfg::from_edges(2, [(StmtIndex::new(0), StmtIndex::new(1), EdgeKind::Fallthrough)]);
    let m = b.add_method(object, "m", "()V", true, false, 1, vec![true], None, vec![], stmts, cfg);
    let world = b.build(m).unwrap();
    let dead = dead_code::analyze(&world, world.method(m));
    assert!(dead.contains(&StmtIndex::new(0)));
}
