//! Hash-consed contexts: each [`Context`] is a cheap, `Copy` handle into a
//! [`ContextPool`] that owns the backing element sequence.

use std::collections::HashMap;

use crate::callgraph::CallSite;
use crate::ir::ClassId;
use crate::pta::pointer::Obj;

/// One element of a context: what distinguished this call, in the scheme
/// the active [`crate::pta::selector::ContextSelector`] uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CtxElem {
    /// A call site, for call-site sensitivity.
    CallSite(CallSite),
    /// An allocated object, for object sensitivity.
    Object(Obj),
    /// An allocated object's class, for type sensitivity.
    Type(ClassId),
}

/// An interned, possibly empty, sequence of [`CtxElem`]s.
///
/// `Context::default()` is the empty context, produced both by a trivial
/// (context-insensitive) selector and as the initial context of the entry
/// method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Context(u32);

/// Interns [`Context`] element sequences so that equal sequences always
/// share one [`Context`] handle.
#[derive(Debug)]
pub struct ContextPool {
    sequences: Vec<Vec<CtxElem>>,
    index: HashMap<Vec<CtxElem>, Context>,
}

impl Default for ContextPool {
    fn default() -> Self {
        let mut pool = Self {
            sequences: Vec::new(),
            index: HashMap::new(),
        };
        let empty = pool.intern(Vec::new());
        debug_assert_eq!(empty, Context::default());
        pool
    }
}

impl ContextPool {
    /// A fresh pool, already containing the empty context at
    /// [`Context::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty context.
    #[must_use]
    pub fn empty(&self) -> Context {
        Context(0)
    }

    /// Interns `elems`, returning its handle.
    pub fn intern(&mut self, elems: Vec<CtxElem>) -> Context {
        if let Some(&id) = self.index.get(&elems) {
            return id;
        }
        let id = Context(u32::try_from(self.sequences.len()).expect("too many distinct contexts"));
        self.index.insert(elems.clone(), id);
        self.sequences.push(elems);
        id
    }

    /// The element sequence `ctx` denotes.
    #[must_use]
    pub fn elems(&self, ctx: Context) -> &[CtxElem] {
        &self.sequences[ctx.0 as usize]
    }

    /// Appends `elem` to `ctx` and truncates to the last `k` elements.
    pub fn append_truncated(&mut self, ctx: Context, elem: CtxElem, k: usize) -> Context {
        let mut seq = self.elems(ctx).to_vec();
        seq.push(elem);
        let start = seq.len().saturating_sub(k);
        self.intern(seq[start..].to_vec())
    }

    /// Truncates `ctx` to its last `k` elements without appending.
    pub fn truncate_last(&mut self, ctx: Context, k: usize) -> Context {
        let seq = self.elems(ctx);
        let start = seq.len().saturating_sub(k);
        self.intern(seq[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sequences_intern_to_the_same_context() {
        let mut pool = ContextPool::new();
        let a = pool.intern(vec![CtxElem::Type(ClassId::new(0))]);
        let b = pool.intern(vec![CtxElem::Type(ClassId::new(0))]);
        assert_eq!(a, b);
    }

    #[test]
    fn truncation_keeps_only_the_last_k_elements() {
        let mut pool = ContextPool::new();
        let base = pool.intern(vec![CtxElem::Type(ClassId::new(1)), CtxElem::Type(ClassId::new(2))]);
        let truncated = pool.truncate_last(base, 1);
        assert_eq!(pool.elems(truncated), &[CtxElem::Type(ClassId::new(2))]);
    }
}
