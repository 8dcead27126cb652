//! The intermediate representation this crate's analyses operate over.
//!
//! Everything here is a plain, in-memory data model: there is no parser and
//! no class loader. Callers build a [`crate::world::World`] directly (see
//! [`builder`]) the way an upstream frontend would after it has already
//! parsed bytecode or source into this shape.

pub mod builder;
pub mod cfg;

use std::fmt;

use derive_more::Display;

/// The stable index of a statement within a method's statement sequence.
///
/// Mirrors a bytecode program counter: a small, `Copy`, totally ordered
/// handle rather than a reference into the statement vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[display("#{_0}")]
pub struct StmtIndex(u32);

impl StmtIndex {
    /// The entry statement of every method.
    pub const ENTRY: Self = Self(0);

    /// Creates a statement index from a raw position.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index as a `usize` suitable for vector indexing.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for StmtIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An interned identifier for a [`Class`](crate::ir::Class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("class#{_0}")]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An interned identifier for a [`Method`](crate::ir::Method).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("method#{_0}")]
pub struct MethodId(u32);

impl MethodId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An interned identifier for a [`Field`](crate::ir::Field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("field#{_0}")]
pub struct FieldId(u32);

impl FieldId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A local variable, scoped to the [`Method`] that declares it.
///
/// Two variables with the same name in different methods are distinct:
/// identity is `(method, slot)`, matching how a real IR disambiguates
/// locals without relying on name uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var {
    method: MethodId,
    slot: u32,
}

impl Var {
    pub(crate) const fn new(method: MethodId, slot: u32) -> Self {
        Self { method, slot }
    }

    /// The method that declares this variable.
    #[must_use]
    pub const fn method(self) -> MethodId {
        self.method
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.slot)
    }
}

/// A value consumed by an expression: either a variable or an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operand {
    /// A reference to a variable's current value.
    #[display("{_0}")]
    Var(Var),
    /// An integer literal.
    #[display("{_0}")]
    Const(i32),
}

/// Binary arithmetic, shift, and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `<<`
    Shl,
    /// `>>` (arithmetic, sign-extending)
    Shr,
    /// `>>>` (logical, zero-filling)
    UShr,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
}

/// Comparison operators used by [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

/// A boolean-valued comparison between two operands, used by `if` and as a
/// value-producing [`Rvalue::Cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// The comparison operator.
    pub op: CmpOp,
    /// The left-hand operand.
    pub lhs: Operand,
    /// The right-hand operand.
    pub rhs: Operand,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// The right-hand side of an [`Stmt::Assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rvalue {
    /// A bare operand: a variable copy or an integer literal.
    Use(Operand),
    /// A binary arithmetic, shift, or bitwise expression.
    Binary(BinOp, Operand, Operand),
    /// A comparison, producing `0` or `1` when both sides are constant.
    Cmp(Condition),
    /// A narrowing/widening conversion. Always side-effecting (may throw).
    Cast(Operand),
    /// Allocates a new instance of `class` at this statement.
    New(ClassId),
    /// Reads a static field.
    StaticFieldLoad(FieldId),
    /// Reads an instance field off `base`.
    InstanceFieldLoad(Var, FieldId),
    /// Reads the (single, unindexed) cell modeling `base`'s array contents.
    ArrayLoad(Var),
}

/// The kind of dispatch an [`Invoke`] declares at its call site, mirroring a
/// bytecode frontend's `invokestatic`/`invokespecial`/`invokevirtual`/
/// `invokeinterface`/`invokedynamic` distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum InvokeKind {
    /// A statically resolved call with no receiver.
    Static,
    /// A non-virtual call to exactly the declared method (constructors,
    /// private methods, `super` calls).
    Special,
    /// A dynamically dispatched call resolved against the receiver's class.
    Virtual,
    /// A dynamically dispatched call through an interface method.
    Interface,
    /// A call whose target is resolved by a bootstrap method, opaque to
    /// this crate's class hierarchy.
    Dynamic,
}

/// A call site: the callee's declared owner/subsignature, the (possibly
/// absent, for static calls) receiver, and the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoke {
    /// The dispatch kind declared at the call site.
    pub kind: InvokeKind,
    /// The class against which the callee's subsignature is declared.
    pub declaring_class: ClassId,
    /// The callee's subsignature (name + descriptor, independent of class).
    pub subsignature: Subsignature,
    /// The receiver, absent for [`InvokeKind::Static`].
    pub receiver: Option<Var>,
    /// Actual arguments, in declaration order.
    pub args: Vec<Var>,
}

/// A method's name plus parameter/return descriptor, excluding its declaring
/// class — the key used for virtual/interface dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subsignature {
    /// The method's name.
    pub name: Box<str>,
    /// An opaque descriptor string distinguishing overloads.
    pub descriptor: Box<str>,
}

impl Subsignature {
    /// Creates a new subsignature.
    pub fn new(name: impl Into<Box<str>>, descriptor: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// A single three-address-style statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Does nothing.
    Nop,
    /// `lhs = rhs`.
    Assign {
        /// The assigned variable.
        lhs: Var,
        /// The expression being evaluated.
        rhs: Rvalue,
    },
    /// `ClassId.field = rhs`.
    StaticFieldStore {
        /// The field being written.
        field: FieldId,
        /// The value being stored.
        rhs: Var,
    },
    /// `base.field = rhs`.
    InstanceFieldStore {
        /// The receiver object.
        base: Var,
        /// The field being written.
        field: FieldId,
        /// The value being stored.
        rhs: Var,
    },
    /// `base[*] = rhs`, modeling the array as a single cell.
    ArrayStore {
        /// The array object.
        base: Var,
        /// The value being stored.
        rhs: Var,
    },
    /// A call, optionally binding its result.
    Invoke {
        /// The variable receiving the call's return value, if used.
        lhs: Option<Var>,
        /// The call site itself.
        call: Invoke,
    },
    /// A conditional branch; targets live on the [`cfg::Cfg`]'s outgoing
    /// edges, not on the statement.
    If {
        /// The branch condition.
        cond: Condition,
    },
    /// A multi-way branch on an integer variable; case targets live on the
    /// [`cfg::Cfg`]'s outgoing edges.
    Switch {
        /// The variable being switched on.
        var: Var,
    },
    /// Returns from the method, optionally with a value.
    Return(Option<Var>),
}

impl Stmt {
    /// The variable this statement defines, if any.
    #[must_use]
    pub const fn def(&self) -> Option<Var> {
        match self {
            Self::Assign { lhs, .. } | Self::Invoke { lhs: Some(lhs), .. } => Some(*lhs),
            _ => None,
        }
    }

    /// The variables this statement reads.
    #[must_use]
    pub fn uses(&self) -> Vec<Var> {
        match self {
            Self::Nop | Self::Return(None) => vec![],
            Self::Return(Some(v)) | Self::Switch { var: v } => vec![*v],
            Self::StaticFieldStore { rhs, .. } => vec![*rhs],
            Self::InstanceFieldStore { base, rhs, .. } => vec![*base, *rhs],
            Self::ArrayStore { base, rhs } => vec![*base, *rhs],
            Self::If { cond } => operand_vars(cond.lhs)
                .into_iter()
                .chain(operand_vars(cond.rhs))
                .collect(),
            Self::Invoke { call, .. } => call.receiver.iter().copied().chain(call.args.iter().copied()).collect(),
            Self::Assign { rhs, .. } => rvalue_vars(rhs),
        }
    }
}

fn operand_vars(op: Operand) -> Option<Var> {
    match op {
        Operand::Var(v) => Some(v),
        Operand::Const(_) => None,
    }
}

fn rvalue_vars(rv: &Rvalue) -> Vec<Var> {
    match rv {
        Rvalue::Use(op) | Rvalue::Cast(op) => operand_vars(*op).into_iter().collect(),
        Rvalue::Binary(_, l, r) => operand_vars(*l).into_iter().chain(operand_vars(*r)).collect(),
        Rvalue::Cmp(cond) => operand_vars(cond.lhs).into_iter().chain(operand_vars(cond.rhs)).collect(),
        Rvalue::New(_) | Rvalue::StaticFieldLoad(_) => vec![],
        Rvalue::InstanceFieldLoad(base, _) | Rvalue::ArrayLoad(base) => vec![*base],
    }
}

/// `true` if evaluating `rhs` can never have an observable effect beyond
/// defining its target variable — i.e. it is safe to drop the assignment
/// entirely when the target is dead.
#[must_use]
pub fn has_no_side_effect(rhs: &Rvalue) -> bool {
    !matches!(
        rhs,
        Rvalue::New(_)
            | Rvalue::Cast(_)
            | Rvalue::StaticFieldLoad(_)
            | Rvalue::InstanceFieldLoad(..)
            | Rvalue::ArrayLoad(_)
            | Rvalue::Binary(BinOp::Div | BinOp::Rem, _, _)
    )
}

/// A declared method.
#[derive(Debug, Clone)]
pub struct Method {
    pub(crate) id: MethodId,
    pub(crate) owner: ClassId,
    pub(crate) subsignature: Subsignature,
    pub(crate) is_static: bool,
    pub(crate) is_abstract: bool,
    pub(crate) params: Vec<Var>,
    pub(crate) this_var: Option<Var>,
    pub(crate) var_names: Vec<Box<str>>,
    pub(crate) int_like_vars: Vec<bool>,
    pub(crate) stmts: Vec<Stmt>,
    pub(crate) cfg: cfg::Cfg,
}

impl Method {
    /// This method's identifier.
    #[must_use]
    pub const fn id(&self) -> MethodId {
        self.id
    }

    /// The class declaring this method.
    #[must_use]
    pub const fn owner(&self) -> ClassId {
        self.owner
    }

    /// This method's subsignature.
    #[must_use]
    pub const fn subsignature(&self) -> &Subsignature {
        &self.subsignature
    }

    /// Whether this method has a `static` binding (no receiver).
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether this method is abstract (has no body and cannot be a CHA/PTA
    /// dispatch target).
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The formal parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[Var] {
        &self.params
    }

    /// The implicit receiver variable, for non-static methods.
    #[must_use]
    pub const fn this_var(&self) -> Option<Var> {
        self.this_var
    }

    /// The statement sequence.
    #[must_use]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// The control-flow graph over [`Self::stmts`].
    #[must_use]
    pub const fn cfg(&self) -> &cfg::Cfg {
        &self.cfg
    }

    /// Whether `var` carries an integer-capable type (byte, short, int,
    /// char, boolean) and is therefore tracked by constant propagation.
    #[must_use]
    pub fn is_int_like(&self, var: Var) -> bool {
        debug_assert_eq!(var.method, self.id, "variable does not belong to this method");
        self.int_like_vars[var.slot as usize]
    }

    /// The variables whose `Return` statements flow a value out of this
    /// method; used to wire pointer-analysis return edges.
    #[must_use]
    pub fn return_vars(&self) -> Vec<Var> {
        self.stmts
            .iter()
            .filter_map(|s| match s {
                Stmt::Return(Some(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

/// A class or interface.
#[derive(Debug, Clone)]
pub struct Class {
    pub(crate) id: ClassId,
    pub(crate) name: Box<str>,
    pub(crate) is_interface: bool,
    pub(crate) is_abstract: bool,
    pub(crate) super_class: Option<ClassId>,
    pub(crate) interfaces: Vec<ClassId>,
    pub(crate) methods: Vec<MethodId>,
    pub(crate) fields: Vec<FieldId>,
}

impl Class {
    /// This class's identifier.
    #[must_use]
    pub const fn id(&self) -> ClassId {
        self.id
    }

    /// The class's name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is an interface rather than a class.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// The direct superclass, absent only for the root of the hierarchy.
    #[must_use]
    pub const fn super_class(&self) -> Option<ClassId> {
        self.super_class
    }

    /// Directly implemented/extended interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[ClassId] {
        &self.interfaces
    }

    /// Methods declared directly on this class (not inherited).
    #[must_use]
    pub fn declared_methods(&self) -> &[MethodId] {
        &self.methods
    }

    /// Fields declared directly on this class.
    #[must_use]
    pub fn declared_fields(&self) -> &[FieldId] {
        &self.fields
    }
}

/// A declared field.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) owner: ClassId,
    pub(crate) name: Box<str>,
    pub(crate) is_static: bool,
}

impl Field {
    /// This field's identifier.
    #[must_use]
    pub const fn id(&self) -> FieldId {
        self.id
    }

    /// The class declaring this field.
    #[must_use]
    pub const fn owner(&self) -> ClassId {
        self.owner
    }

    /// The field's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a `static` field.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_side_effect_classification() {
        assert!(has_no_side_effect(&Rvalue::Use(Operand::Const(1))));
        assert!(has_no_side_effect(&Rvalue::Binary(
            BinOp::Add,
            Operand::Const(1),
            Operand::Const(2)
        )));
        assert!(!has_no_side_effect(&Rvalue::New(ClassId::new(0))));
        assert!(!has_no_side_effect(&Rvalue::StaticFieldLoad(FieldId::new(0))));
        assert!(!has_no_side_effect(&Rvalue::Binary(
            BinOp::Div,
            Operand::Const(1),
            Operand::Const(0)
        )));
    }

    #[test]
    fn stmt_index_orders_by_position() {
        assert!(StmtIndex::new(0) < StmtIndex::new(1));
        assert_eq!(StmtIndex::ENTRY, StmtIndex::new(0));
    }
}
