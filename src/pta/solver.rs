//! The on-the-fly pointer-analysis solver: a worklist that grows points-to
//! sets and, simultaneously, the set of reachable methods and call-graph
//! edges, lazily wiring instance-field, array, and virtual-call constraints
//! as the objects flowing through each pointer become known.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::callgraph::cha::dispatch;
use crate::callgraph::{CallGraph, CallSite};
use crate::ir::{Invoke, InvokeKind, Method, Rvalue, Stmt, StmtIndex, Subsignature, Var};
use crate::pta::context::ContextPool;
use crate::pta::pointer::{AllocSite, CSMethod, CSObj, CSVar, Obj, Pointer};
use crate::pta::pfg::PointerFlowGraph;
use crate::pta::result::PointsToResult;
use crate::pta::selector::ContextSelector;
use crate::world::World;

#[derive(Debug, Clone)]
struct PendingCall {
    call_site: CallSite,
    caller: CSMethod,
    kind: InvokeKind,
    declaring_class: crate::ir::ClassId,
    subsignature: Subsignature,
    lhs: Option<Var>,
    args: Vec<Var>,
}

#[derive(Debug, Clone)]
enum Constraint {
    Load { field: crate::ir::FieldId, to: Pointer },
    Store { field: crate::ir::FieldId, from: Pointer },
    ArrayLoad { to: Pointer },
    ArrayStore { from: Pointer },
    Call(Box<PendingCall>),
}

/// Runs Andersen-style on-the-fly pointer analysis over `world`, starting
/// from its entry method, using `selector` to choose contexts.
///
/// Passing [`crate::pta::selector::TrivialSelector`] runs the
/// context-insensitive variant of the analysis (spec.md §4.7); any other
/// selector runs the context-sensitive variant (§4.8) with the same solver.
pub fn analyze<S: ContextSelector>(world: &World, selector: &S) -> PointsToResult {
    let mut pool = ContextPool::new();
    let mut pfg = PointerFlowGraph::new();
    let mut call_graph = CallGraph::new();
    let mut reachable: BTreeSet<CSMethod> = BTreeSet::new();
    let mut constraints: HashMap<Pointer, Vec<Constraint>> = HashMap::new();
    let mut worklist: VecDeque<(Pointer, BTreeSet<CSObj>)> = VecDeque::new();

    let entry_ctx = pool.empty();
    let entry = CSMethod {
        ctx: entry_ctx,
        method: world.entry_method(),
    };
    add_reachable(
        world,
        selector,
        &mut pool,
        &mut pfg,
        &mut call_graph,
        &mut reachable,
        &mut constraints,
        &mut worklist,
        entry,
    );

    while let Some((pointer, objs)) = worklist.pop_front() {
        let delta = pfg.propagate(pointer, &objs);
        if delta.is_empty() {
            continue;
        }
        for succ in pfg.successors(pointer).collect::<Vec<_>>() {
            worklist.push_back((succ, delta.clone()));
        }
        if let Some(cs) = constraints.get(&pointer).cloned() {
            for constraint in cs {
                apply_constraint(
                    world,
                    selector,
                    &mut pool,
                    &mut pfg,
                    &mut call_graph,
                    &mut reachable,
                    &mut constraints,
                    &mut worklist,
                    &constraint,
                    &delta,
                );
            }
        }
    }

    PointsToResult::new(pfg, call_graph)
}

#[allow(clippy::too_many_arguments)]
fn apply_constraint<S: ContextSelector>(
    world: &World,
    selector: &S,
    pool: &mut ContextPool,
    pfg: &mut PointerFlowGraph,
    call_graph: &mut CallGraph,
    reachable: &mut BTreeSet<CSMethod>,
    constraints: &mut HashMap<Pointer, Vec<Constraint>>,
    worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>,
    constraint: &Constraint,
    delta: &BTreeSet<CSObj>,
) {
    match constraint {
        Constraint::Load { field, to } => {
            for &obj in delta {
                flow_edge(pfg, worklist, Pointer::InstanceField(obj, *field), *to);
            }
        }
        Constraint::Store { field, from } => {
            for &obj in delta {
                flow_edge(pfg, worklist, *from, Pointer::InstanceField(obj, *field));
            }
        }
        Constraint::ArrayLoad { to } => {
            for &obj in delta {
                flow_edge(pfg, worklist, Pointer::ArrayElem(obj), *to);
            }
        }
        Constraint::ArrayStore { from } => {
            for &obj in delta {
                flow_edge(pfg, worklist, *from, Pointer::ArrayElem(obj));
            }
        }
        Constraint::Call(pending) => {
            // Dynamic dispatch is opaque to class-hierarchy resolution, same
            // as `callgraph::cha::resolve_targets`'s `InvokeKind::Dynamic`
            // arm: there is nothing to wire.
            if pending.kind == InvokeKind::Dynamic {
                return;
            }
            for &obj in delta {
                // Special calls are statically bound to the declaring class
                // regardless of the receiver's runtime class; only virtual
                // and interface calls dispatch on `obj`'s class.
                let target_class = if pending.kind == InvokeKind::Special {
                    pending.declaring_class
                } else {
                    obj.obj.class
                };
                let Some(callee) = dispatch(world, target_class, &pending.subsignature) else {
                    continue;
                };
                let callee_ctx =
                    selector.select_for_instance_call(pool, pending.caller.ctx, pending.call_site, obj);
                let callee_cs = CSMethod {
                    ctx: callee_ctx,
                    method: callee,
                };
                link_call(
                    world,
                    selector,
                    pool,
                    pfg,
                    call_graph,
                    reachable,
                    constraints,
                    worklist,
                    pending.caller,
                    pending.call_site,
                    callee_cs,
                    Some(obj),
                    &pending.args,
                    pending.lhs,
                    pending.kind,
                );
            }
        }
    }
}

fn flow_edge(pfg: &mut PointerFlowGraph, worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>, from: Pointer, to: Pointer) {
    if pfg.add_edge(from, to) {
        let existing = pfg.pts(from);
        if !existing.is_empty() {
            worklist.push_back((to, existing));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn link_call<S: ContextSelector>(
    world: &World,
    selector: &S,
    pool: &mut ContextPool,
    pfg: &mut PointerFlowGraph,
    call_graph: &mut CallGraph,
    reachable: &mut BTreeSet<CSMethod>,
    constraints: &mut HashMap<Pointer, Vec<Constraint>>,
    worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>,
    caller: CSMethod,
    call_site: CallSite,
    callee: CSMethod,
    receiver: Option<CSObj>,
    args: &[Var],
    lhs: Option<Var>,
    kind: InvokeKind,
) {
    call_graph.add_edge(call_site, callee.method, kind);

    add_reachable(
        world, selector, pool, pfg, call_graph, reachable, constraints, worklist, callee,
    );

    let callee_method = world.method(callee.method);
    if let (Some(recv_obj), Some(this_var)) = (receiver, callee_method.this_var()) {
        let mut seed = BTreeSet::new();
        seed.insert(recv_obj);
        worklist.push_back((Pointer::Var(CSVar { ctx: callee.ctx, var: this_var }), seed));
    }

    for (&param, &arg) in callee_method.params().iter().zip(args) {
        flow_edge(
            pfg,
            worklist,
            Pointer::Var(CSVar { ctx: caller.ctx, var: arg }),
            Pointer::Var(CSVar { ctx: callee.ctx, var: param }),
        );
    }

    if let Some(lhs) = lhs {
        for ret_var in callee_method.return_vars() {
            flow_edge(
                pfg,
                worklist,
                Pointer::Var(CSVar { ctx: callee.ctx, var: ret_var }),
                Pointer::Var(CSVar { ctx: caller.ctx, var: lhs }),
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add_reachable<S: ContextSelector>(
    world: &World,
    selector: &S,
    pool: &mut ContextPool,
    pfg: &mut PointerFlowGraph,
    call_graph: &mut CallGraph,
    reachable: &mut BTreeSet<CSMethod>,
    constraints: &mut HashMap<Pointer, Vec<Constraint>>,
    worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>,
    cs_method: CSMethod,
) {
    if !reachable.insert(cs_method) {
        return;
    }
    let method = world.method(cs_method.method);
    let ctx = cs_method.ctx;

    for (index, stmt) in method.stmts().iter().enumerate() {
        let stmt_idx = StmtIndex::new(u32::try_from(index).expect("method too large"));
        process_stmt(
            world, selector, pool, pfg, call_graph, reachable, constraints, worklist, method, ctx, cs_method, stmt_idx,
            stmt,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn process_stmt<S: ContextSelector>(
    world: &World,
    selector: &S,
    pool: &mut ContextPool,
    pfg: &mut PointerFlowGraph,
    call_graph: &mut CallGraph,
    reachable: &mut BTreeSet<CSMethod>,
    constraints: &mut HashMap<Pointer, Vec<Constraint>>,
    worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>,
    method: &Method,
    ctx: crate::pta::context::Context,
    cs_method: CSMethod,
    stmt_idx: StmtIndex,
    stmt: &Stmt,
) {
    let var_ptr = |v: Var| Pointer::Var(CSVar { ctx, var: v });
    match stmt {
        Stmt::Assign { lhs, rhs } => match rhs {
            Rvalue::New(class) => {
                let obj = Obj {
                    site: AllocSite {
                        method: cs_method.method,
                        stmt: stmt_idx,
                    },
                    class: *class,
                };
                let heap_ctx = selector.select_heap_context(pool, ctx, obj);
                let cs_obj = CSObj { heap_ctx, obj };
                let mut seed = BTreeSet::new();
                seed.insert(cs_obj);
                worklist.push_back((var_ptr(*lhs), seed));
            }
            Rvalue::Use(crate::ir::Operand::Var(rhs_var)) | Rvalue::Cast(crate::ir::Operand::Var(rhs_var)) => {
                flow_edge(pfg, worklist, var_ptr(*rhs_var), var_ptr(*lhs));
            }
            Rvalue::StaticFieldLoad(field) => {
                flow_edge(pfg, worklist, Pointer::StaticField(*field), var_ptr(*lhs));
            }
            Rvalue::InstanceFieldLoad(base, field) => {
                constraints.entry(var_ptr(*base)).or_default().push(Constraint::Load {
                    field: *field,
                    to: var_ptr(*lhs),
                });
            }
            Rvalue::ArrayLoad(base) => {
                constraints
                    .entry(var_ptr(*base))
                    .or_default()
                    .push(Constraint::ArrayLoad { to: var_ptr(*lhs) });
            }
            Rvalue::Use(crate::ir::Operand::Const(_))
            | Rvalue::Cast(crate::ir::Operand::Const(_))
            | Rvalue::Binary(..)
            | Rvalue::Cmp(_) => {}
        },
        Stmt::StaticFieldStore { field, rhs } => {
            flow_edge(pfg, worklist, var_ptr(*rhs), Pointer::StaticField(*field));
        }
        Stmt::InstanceFieldStore { base, field, rhs } => {
            constraints.entry(var_ptr(*base)).or_default().push(Constraint::Store {
                field: *field,
                from: var_ptr(*rhs),
            });
        }
        Stmt::ArrayStore { base, rhs } => {
            constraints
                .entry(var_ptr(*base))
                .or_default()
                .push(Constraint::ArrayStore { from: var_ptr(*rhs) });
        }
        Stmt::Invoke { lhs, call } => handle_invoke(
            world, selector, pool, pfg, call_graph, reachable, constraints, worklist, cs_method, stmt_idx, call, *lhs,
        ),
        Stmt::Nop | Stmt::If { .. } | Stmt::Switch { .. } | Stmt::Return(_) => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_invoke<S: ContextSelector>(
    world: &World,
    selector: &S,
    pool: &mut ContextPool,
    pfg: &mut PointerFlowGraph,
    call_graph: &mut CallGraph,
    reachable: &mut BTreeSet<CSMethod>,
    constraints: &mut HashMap<Pointer, Vec<Constraint>>,
    worklist: &mut VecDeque<(Pointer, BTreeSet<CSObj>)>,
    cs_method: CSMethod,
    stmt_idx: StmtIndex,
    call: &Invoke,
    lhs: Option<Var>,
) {
    let call_site = CallSite {
        method: cs_method.method,
        stmt: stmt_idx,
    };
    match call.receiver {
        Some(recv) => {
            let pending = PendingCall {
                call_site,
                caller: cs_method,
                kind: call.kind,
                declaring_class: call.declaring_class,
                subsignature: call.subsignature.clone(),
                lhs,
                args: call.args.clone(),
            };
            constraints
                .entry(Pointer::Var(CSVar { ctx: cs_method.ctx, var: recv }))
                .or_default()
                .push(Constraint::Call(Box::new(pending)));
        }
        None => {
            if let Some(callee) = dispatch(world, call.declaring_class, &call.subsignature) {
                let callee_ctx = selector.select_for_static_call(pool, cs_method.ctx, call_site);
                let callee_cs = CSMethod {
                    ctx: callee_ctx,
                    method: callee,
                };
                link_call(
                    world, selector, pool, pfg, call_graph, reachable, constraints, worklist, cs_method, call_site,
                    callee_cs, None, &call.args, lhs, call.kind,
                );
            }
        }
    }
}
