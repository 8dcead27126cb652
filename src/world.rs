//! The explicit context object bundling a program's classes, methods, and
//! fields together with a hierarchy index built once at construction time.
//!
//! Every analysis in this crate takes `&World` rather than reaching for a
//! global or thread-local program representation.

use std::collections::HashMap;

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Control, DfsEvent, depth_first_search};
use thiserror::Error;

use crate::ir::{Class, ClassId, Field, FieldId, Method, MethodId, Subsignature};

/// Failure constructing a [`World`].
#[derive(Debug, Error)]
pub enum WorldError {
    /// The requested entry method id has no corresponding [`Method`].
    #[error("entry method {0} is not a registered method")]
    NoEntryMethod(MethodId),
}

/// A whole program: its classes, methods, fields, and a derived class
/// hierarchy index.
#[derive(Debug)]
pub struct World {
    classes: Vec<Class>,
    methods: Vec<Method>,
    fields: Vec<Field>,
    entry_method: MethodId,
    direct_subclasses: HashMap<ClassId, Vec<ClassId>>,
    direct_subinterfaces: HashMap<ClassId, Vec<ClassId>>,
    direct_implementors: HashMap<ClassId, Vec<ClassId>>,
}

impl World {
    /// Builds a `World` from already-assembled classes, methods, and fields.
    ///
    /// Prefer [`crate::ir::builder::WorldBuilder`] for hand-assembling these
    /// from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoEntryMethod`] if `entry_method` does not index
    /// into `methods`.
    pub fn new(
        classes: Vec<Class>,
        methods: Vec<Method>,
        fields: Vec<Field>,
        entry_method: MethodId,
    ) -> Result<Self, WorldError> {
        if entry_method.index() >= methods.len() {
            return Err(WorldError::NoEntryMethod(entry_method));
        }

        let mut direct_subclasses: HashMap<ClassId, Vec<ClassId>> = HashMap::new();
        let mut direct_subinterfaces: HashMap<ClassId, Vec<ClassId>> = HashMap::new();
        let mut direct_implementors: HashMap<ClassId, Vec<ClassId>> = HashMap::new();

        for class in &classes {
            if class.is_interface {
                for &super_iface in &class.interfaces {
                    direct_subinterfaces.entry(super_iface).or_default().push(class.id);
                }
            } else {
                if let Some(super_class) = class.super_class {
                    direct_subclasses.entry(super_class).or_default().push(class.id);
                }
                for &iface in &class.interfaces {
                    direct_implementors.entry(iface).or_default().push(class.id);
                }
            }
        }

        Ok(Self {
            classes,
            methods,
            fields,
            entry_method,
            direct_subclasses,
            direct_subinterfaces,
            direct_implementors,
        })
    }

    /// The method designated as the analysis entry point.
    #[must_use]
    pub const fn entry_method(&self) -> MethodId {
        self.entry_method
    }

    /// Looks up a class by id.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    /// Looks up a method by id.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    /// Looks up a field by id.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    /// All classes and interfaces in the program.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    /// All methods in the program.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// `class`'s direct superclass, if any.
    #[must_use]
    pub fn super_class_of(&self, class: ClassId) -> Option<ClassId> {
        self.class(class).super_class
    }

    /// Classes directly extending `class` (empty if `class` is an interface).
    #[must_use]
    pub fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId] {
        self.direct_subclasses.get(&class).map_or(&[], Vec::as_slice)
    }

    /// Interfaces directly extending `iface`.
    #[must_use]
    pub fn direct_subinterfaces_of(&self, iface: ClassId) -> &[ClassId] {
        self.direct_subinterfaces.get(&iface).map_or(&[], Vec::as_slice)
    }

    /// Classes directly implementing `iface`.
    #[must_use]
    pub fn direct_implementors_of(&self, iface: ClassId) -> &[ClassId] {
        self.direct_implementors.get(&iface).map_or(&[], Vec::as_slice)
    }

    /// The transitive closure of [`Self::direct_subclasses_of`], not
    /// including `class` itself.
    #[must_use]
    pub fn all_subclasses_of(&self, class: ClassId) -> Vec<ClassId> {
        let mut graph = DiGraphMap::<ClassId, ()>::new();
        for c in &self.classes {
            graph.add_node(c.id);
        }
        for (&sup, subs) in &self.direct_subclasses {
            for &sub in subs {
                graph.add_edge(sup, sub, ());
            }
        }
        collect_descendants(&graph, class)
    }

    /// Every class that transitively implements `iface`, via either a
    /// subinterface chain or a subclass of a direct implementor.
    #[must_use]
    pub fn all_implementors_of(&self, iface: ClassId) -> Vec<ClassId> {
        let mut interfaces = vec![iface];
        interfaces.extend(self.all_subinterfaces_of(iface));

        let mut graph = DiGraphMap::<ClassId, ()>::new();
        for c in &self.classes {
            graph.add_node(c.id);
        }
        for (&sup, subs) in &self.direct_subclasses {
            for &sub in subs {
                graph.add_edge(sup, sub, ());
            }
        }

        let mut result = Vec::new();
        for iface in interfaces {
            for &direct in self.direct_implementors_of(iface) {
                result.push(direct);
                result.extend(collect_descendants(&graph, direct));
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// The transitive closure of [`Self::direct_subinterfaces_of`], not
    /// including `iface` itself.
    #[must_use]
    pub fn all_subinterfaces_of(&self, iface: ClassId) -> Vec<ClassId> {
        let mut graph = DiGraphMap::<ClassId, ()>::new();
        for c in &self.classes {
            graph.add_node(c.id);
        }
        for (&sup, subs) in &self.direct_subinterfaces {
            for &sub in subs {
                graph.add_edge(sup, sub, ());
            }
        }
        collect_descendants(&graph, iface)
    }

    /// The method declared directly on `class` with subsignature `sub`,
    /// ignoring inheritance.
    #[must_use]
    pub fn declared_method(&self, class: ClassId, sub: &Subsignature) -> Option<MethodId> {
        self.class(class)
            .declared_methods()
            .iter()
            .copied()
            .find(|&m| self.method(m).subsignature() == sub)
    }

    /// Like [`Self::declared_method`], but only matches a non-abstract
    /// method (a valid CHA/PTA dispatch target).
    #[must_use]
    pub fn declared_concrete_method(&self, class: ClassId, sub: &Subsignature) -> Option<MethodId> {
        self.declared_method(class, sub)
            .filter(|&m| !self.method(m).is_abstract())
    }
}

fn collect_descendants(graph: &DiGraphMap<ClassId, ()>, root: ClassId) -> Vec<ClassId> {
    let mut result = Vec::new();
    depth_first_search(graph, Some(root), |event| {
        match event {
            DfsEvent::Discover(n, _) if n != root => result.push(n),
            DfsEvent::BackEdge(_, _) => return Control::<()>::Prune,
            _ => {}
        }
        Control::Continue
    });
    result
}
