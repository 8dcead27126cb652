//! Dead-code detection, fusing constant-propagated reachability with
//! useless-assignment elimination driven by live-variable analysis.

use std::collections::{BTreeSet, VecDeque};

use super::constprop::{ConstantPropagation, evaluate_condition};
use super::fact::{CPFact, Value};
use super::live_vars::LiveVariableAnalysis;
use super::result::DataflowResult;
use super::solver::solve;
use crate::ir::cfg::{Cfg, EdgeKind};
use crate::ir::{Method, Stmt, StmtIndex, has_no_side_effect};
use crate::world::World;

/// Finds every dead statement in `method`: statements unreachable from the
/// entry once constant-propagated branches are resolved, plus assignments
/// whose value is never subsequently read and whose right-hand side has no
/// other observable effect.
#[must_use]
pub fn analyze(world: &World, method: &Method) -> BTreeSet<StmtIndex> {
    let cp = solve(&ConstantPropagation, world, method);
    let live = solve(&LiveVariableAnalysis, world, method);
    let cfg = method.cfg();

    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    let entry = cfg.entry_point();
    seen.insert(entry);
    queue.push_back(entry);

    while let Some(node) = queue.pop_front() {
        let stmt = &method.stmts()[node.index()];
        for succ in reachable_successors(stmt, node, cfg, &cp) {
            if seen.insert(succ) {
                queue.push_back(succ);
            }
        }
    }

    let mut dead = BTreeSet::new();
    for node in cfg.nodes() {
        if !seen.contains(&node) {
            dead.insert(node);
            continue;
        }
        if let Stmt::Assign { lhs, rhs } = &method.stmts()[node.index()] {
            if has_no_side_effect(rhs) && !live.out_fact(node).contains(lhs) {
                dead.insert(node);
            }
        }
    }
    dead
}

fn reachable_successors(stmt: &Stmt, node: StmtIndex, cfg: &Cfg, cp: &DataflowResult<CPFact>) -> Vec<StmtIndex> {
    match stmt {
        Stmt::If { cond } => match evaluate_condition(cond, cp.in_fact(node)).as_const() {
            Some(0) => edges_of_kind(cfg, node, EdgeKind::IfFalse),
            Some(_) => edges_of_kind(cfg, node, EdgeKind::IfTrue),
            None => all_successors(cfg, node),
        },
        Stmt::Switch { var } => match cp.in_fact(node).get(*var) {
            Value::Const(c) => {
                let matched: Vec<StmtIndex> = cfg
                    .successors(node)
                    .iter()
                    .filter(|(_, k)| matches!(k, EdgeKind::SwitchCase(v) if *v == c))
                    .map(|(t, _)| *t)
                    .collect();
                if matched.is_empty() {
                    edges_of_kind(cfg, node, EdgeKind::SwitchDefault)
                } else {
                    matched
                }
            }
            Value::Undef | Value::Nac => all_successors(cfg, node),
        },
        _ => all_successors(cfg, node),
    }
}

fn all_successors(cfg: &Cfg, node: StmtIndex) -> Vec<StmtIndex> {
    cfg.successors(node).iter().map(|(t, _)| *t).collect()
}

fn edges_of_kind(cfg: &Cfg, node: StmtIndex, kind: EdgeKind) -> Vec<StmtIndex> {
    cfg.successors(node)
        .iter()
        .filter(|(_, k)| *k == kind)
        .map(|(t, _)| *t)
        .collect()
}
