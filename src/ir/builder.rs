//! An ergonomic, hand-assembly surface for constructing a [`World`] without
//! a parser.
//!
//! This is the intended way to build fixtures in tests: declare classes,
//! then methods on those classes, then hand the whole thing to
//! [`World::new`].

use super::cfg::Cfg;
use super::{Class, ClassId, Field, FieldId, Method, MethodId, Stmt, Subsignature, Var};
use crate::world::{World, WorldError};

/// Accumulates classes, fields, and methods before sealing them into a
/// [`World`].
#[derive(Debug, Default)]
pub struct WorldBuilder {
    classes: Vec<Class>,
    methods: Vec<Method>,
    fields: Vec<Field>,
}

impl WorldBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class or interface and returns its id.
    ///
    /// `super_class` and `interfaces` must already have been registered with
    /// this builder.
    pub fn add_class(
        &mut self,
        name: impl Into<Box<str>>,
        is_interface: bool,
        is_abstract: bool,
        super_class: Option<ClassId>,
        interfaces: Vec<ClassId>,
    ) -> ClassId {
        let id = ClassId::new(u32::try_from(self.classes.len()).expect("too many classes"));
        self.classes.push(Class {
            id,
            name: name.into(),
            is_interface,
            is_abstract,
            super_class,
            interfaces,
            methods: Vec::new(),
            fields: Vec::new(),
        });
        id
    }

    /// Registers a field on `owner`.
    pub fn add_field(&mut self, owner: ClassId, name: impl Into<Box<str>>, is_static: bool) -> FieldId {
        let id = FieldId::new(u32::try_from(self.fields.len()).expect("too many fields"));
        self.fields.push(Field {
            id,
            owner,
            name: name.into(),
            is_static,
        });
        self.classes[owner.index()].fields.push(id);
        id
    }

    /// The id [`Self::add_method`] will assign to the next method
    /// registered, so a method's own body can reference its own variables
    /// before the method itself is registered.
    #[must_use]
    pub fn next_method_id(&self) -> MethodId {
        MethodId::new(u32::try_from(self.methods.len()).expect("too many methods"))
    }

    /// Registers a method on `owner`.
    ///
    /// `var_count` is the number of local variable slots the method uses;
    /// `int_like` must have exactly `var_count` entries, one per slot,
    /// marking which variables constant propagation tracks. `params` and
    /// `this_var` must reference slots below `var_count`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_method(
        &mut self,
        owner: ClassId,
        name: impl Into<Box<str>>,
        descriptor: impl Into<Box<str>>,
        is_static: bool,
        is_abstract: bool,
        var_count: u32,
        int_like: Vec<bool>,
        this_var: Option<u32>,
        params: Vec<u32>,
        stmts: Vec<Stmt>,
        cfg: Cfg,
    ) -> MethodId {
        assert_eq!(int_like.len(), var_count as usize, "int_like must cover every slot");
        let id = MethodId::new(u32::try_from(self.methods.len()).expect("too many methods"));
        let var_names = (0..var_count).map(|i| format!("v{i}").into_boxed_str()).collect();
        self.methods.push(Method {
            id,
            owner,
            subsignature: Subsignature::new(name, descriptor),
            is_static,
            is_abstract,
            params: params.into_iter().map(|slot| Var::new(id, slot)).collect(),
            this_var: this_var.map(|slot| Var::new(id, slot)),
            var_names,
            int_like_vars: int_like,
            stmts,
            cfg,
        });
        self.classes[owner.index()].methods.push(id);
        id
    }

    /// Returns a fresh [`Var`] handle for `slot` in `method`, for use while
    /// building that method's statements.
    #[must_use]
    pub fn var(method: MethodId, slot: u32) -> Var {
        Var::new(method, slot)
    }

    /// Seals the builder into a [`World`] rooted at `entry_method`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoEntryMethod`] if `entry_method` was never
    /// registered with this builder.
    pub fn build(self, entry_method: MethodId) -> Result<World, WorldError> {
        World::new(self.classes, self.methods, self.fields, entry_method)
    }
}
