//! Context selectors: the policies choosing a callee's context from a call
//! site, and an allocation's heap context from its allocating method's
//! context.
//!
//! [`TrivialSelector`] always returns the empty context, which makes running
//! context-sensitive machinery with it equivalent to a context-insensitive
//! analysis — the same solver serves both spec.md §4.7 and §4.8.

use crate::callgraph::CallSite;
use crate::pta::context::{Context, ContextPool, CtxElem};
use crate::pta::pointer::{CSObj, Obj};

/// Chooses contexts for callee activations and heap allocations.
pub trait ContextSelector {
    /// The context for a statically resolved call (`static`/`special`) with
    /// no receiver.
    fn select_for_static_call(&self, pool: &mut ContextPool, caller_ctx: Context, call_site: CallSite) -> Context;

    /// The context for a dynamically dispatched call, given the receiver's
    /// own context-sensitive object.
    fn select_for_instance_call(
        &self,
        pool: &mut ContextPool,
        caller_ctx: Context,
        call_site: CallSite,
        receiver: CSObj,
    ) -> Context;

    /// The heap context assigned to a new allocation made by a method
    /// running under `alloc_ctx`.
    fn select_heap_context(&self, pool: &mut ContextPool, alloc_ctx: Context, obj: Obj) -> Context;
}

/// Context-insensitive analysis, expressed as context-sensitive analysis
/// under the selector that always yields the empty context.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrivialSelector;

impl ContextSelector for TrivialSelector {
    fn select_for_static_call(&self, pool: &mut ContextPool, _caller_ctx: Context, _call_site: CallSite) -> Context {
        pool.empty()
    }

    fn select_for_instance_call(
        &self,
        pool: &mut ContextPool,
        _caller_ctx: Context,
        _call_site: CallSite,
        _receiver: CSObj,
    ) -> Context {
        pool.empty()
    }

    fn select_heap_context(&self, pool: &mut ContextPool, _alloc_ctx: Context, _obj: Obj) -> Context {
        pool.empty()
    }
}

/// `k`-limited call-site sensitivity: a callee's context is the caller's
/// last `k - 1` call sites plus this call site; a heap context is the
/// allocating method's last `k - 1` call sites.
#[derive(Debug, Clone, Copy)]
pub struct CallSiteSensitivity {
    k: usize,
}

impl CallSiteSensitivity {
    /// Creates a `k`-call-site-sensitive selector. `k` is typically 1 or 2.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for CallSiteSensitivity {
    fn select_for_static_call(&self, pool: &mut ContextPool, caller_ctx: Context, call_site: CallSite) -> Context {
        pool.append_truncated(caller_ctx, CtxElem::CallSite(call_site), self.k)
    }

    fn select_for_instance_call(
        &self,
        pool: &mut ContextPool,
        caller_ctx: Context,
        call_site: CallSite,
        _receiver: CSObj,
    ) -> Context {
        pool.append_truncated(caller_ctx, CtxElem::CallSite(call_site), self.k)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, alloc_ctx: Context, _obj: Obj) -> Context {
        pool.truncate_last(alloc_ctx, self.k.saturating_sub(1))
    }
}

/// `k`-limited object sensitivity: a virtual callee's context is built from
/// the receiver's own heap context and identity, not the caller's context.
/// Static calls fall back to the caller's context unchanged, since they have
/// no receiver to key on.
#[cfg(feature = "unstable-context-sensitivity")]
#[derive(Debug, Clone, Copy)]
pub struct ObjectSensitivity {
    k: usize,
}

#[cfg(feature = "unstable-context-sensitivity")]
impl ObjectSensitivity {
    /// Creates a `k`-object-sensitive selector. `k` is typically 1 or 2.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self { k }
    }
}

#[cfg(feature = "unstable-context-sensitivity")]
impl ContextSelector for ObjectSensitivity {
    fn select_for_static_call(&self, _pool: &mut ContextPool, caller_ctx: Context, _call_site: CallSite) -> Context {
        caller_ctx
    }

    fn select_for_instance_call(
        &self,
        pool: &mut ContextPool,
        _caller_ctx: Context,
        _call_site: CallSite,
        receiver: CSObj,
    ) -> Context {
        pool.append_truncated(receiver.heap_ctx, CtxElem::Object(receiver.obj), self.k)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, alloc_ctx: Context, _obj: Obj) -> Context {
        // At k in {1, 2} every object/type-sensitivity row of the selection
        // table truncates to the same single trailing element.
        pool.truncate_last(alloc_ctx, 1)
    }
}

/// `k`-limited type sensitivity: like [`ObjectSensitivity`] but keys on the
/// receiver's allocated class rather than its identity, trading precision
/// for a smaller context space.
#[cfg(feature = "unstable-context-sensitivity")]
#[derive(Debug, Clone, Copy)]
pub struct TypeSensitivity {
    k: usize,
}

#[cfg(feature = "unstable-context-sensitivity")]
impl TypeSensitivity {
    /// Creates a `k`-type-sensitive selector. `k` is typically 1 or 2.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self { k }
    }
}

#[cfg(feature = "unstable-context-sensitivity")]
impl ContextSelector for TypeSensitivity {
    fn select_for_static_call(&self, _pool: &mut ContextPool, caller_ctx: Context, _call_site: CallSite) -> Context {
        caller_ctx
    }

    fn select_for_instance_call(
        &self,
        pool: &mut ContextPool,
        _caller_ctx: Context,
        _call_site: CallSite,
        receiver: CSObj,
    ) -> Context {
        pool.append_truncated(receiver.heap_ctx, CtxElem::Type(receiver.obj.class), self.k)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, alloc_ctx: Context, _obj: Obj) -> Context {
        pool.truncate_last(alloc_ctx, 1)
    }
}
