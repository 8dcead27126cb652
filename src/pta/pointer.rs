//! The abstract objects and pointers a [`crate::pta::pfg::PointerFlowGraph`]
//! relates.

use crate::ir::{FieldId, MethodId, StmtIndex};
use crate::pta::context::Context;
use crate::ir::ClassId;

/// The allocation site of an abstract object: the `New` statement that
/// created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocSite {
    /// The method containing the allocation.
    pub method: MethodId,
    /// The `New` statement's position.
    pub stmt: StmtIndex,
}

/// An abstract heap object: every concrete object created at the same
/// allocation site is represented by one `Obj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Obj {
    /// Where this object was allocated.
    pub site: AllocSite,
    /// The allocated class.
    pub class: ClassId,
}

/// A context-sensitive heap object: an [`Obj`] paired with the context
/// [`crate::pta::selector::ContextSelector::select_heap_context`] assigned
/// it. Under a trivial selector, `heap_ctx` is always the empty context, and
/// a `CSObj` degenerates to plain object-allocation-site sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CSObj {
    /// The context under which this object was allocated.
    pub heap_ctx: Context,
    /// The underlying abstract object.
    pub obj: Obj,
}

/// A context-sensitive local variable: a [`crate::ir::Var`] paired with the
/// context of the method activation that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CSVar {
    /// The calling context.
    pub ctx: Context,
    /// The variable.
    pub var: crate::ir::Var,
}

/// A context-sensitive method activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CSMethod {
    /// The activation's context.
    pub ctx: Context,
    /// The method.
    pub method: MethodId,
}

/// A node of the pointer-flow graph: every location points-to sets are
/// tracked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pointer {
    /// A context-sensitive local variable.
    Var(CSVar),
    /// A static field, which has no context of its own.
    StaticField(FieldId),
    /// An instance field on a specific context-sensitive object.
    InstanceField(CSObj, FieldId),
    /// The (unindexed) array-contents cell of a specific object.
    ArrayElem(CSObj),
}
