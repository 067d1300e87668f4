use indexmap::IndexMap;
use netweave_core::TypeRef;

use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::reference::reference_types;

/// Stable index of a type in its [`Assembly`]. Types are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of type declarations addressed by [`TypeId`] and full name.
///
/// Holds the main module's types alongside the referenced runtime, engine and
/// standard-library declarations they resolve against.
#[derive(Clone, Debug)]
pub struct Assembly {
    main_module: String,
    types: Vec<TypeDescriptor>,
    index: IndexMap<String, TypeId>,
}

impl Assembly {
    /// Empty assembly with the reference declarations installed.
    pub fn new(main_module: impl Into<String>) -> Self {
        let mut assembly = Self::bare(main_module);
        for ty in reference_types() {
            assembly.add_type(ty);
        }
        assembly
    }

    /// Empty assembly without reference declarations.
    pub fn bare(main_module: impl Into<String>) -> Self {
        Self {
            main_module: main_module.into(),
            types: Vec::new(),
            index: IndexMap::new(),
        }
    }

    pub fn main_module(&self) -> &str {
        &self.main_module
    }

    pub fn set_main_module(&mut self, module: impl Into<String>) {
        self.main_module = module.into();
    }

    /// Adds a type, replacing any previous declaration with the same name in place.
    pub fn add_type(&mut self, ty: TypeDescriptor) -> TypeId {
        if let Some(&id) = self.index.get(&ty.name) {
            self.types[id.index()] = ty;
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.index.insert(ty.name.clone(), id);
        self.types.push(ty);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeDescriptor {
        &mut self.types[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.find(name).map(|id| self.get(id))
    }

    /// Declaration a reference points at. Arrays and generic instances resolve
    /// to their element / generic definition.
    pub fn resolve(&self, ty: &TypeRef) -> Option<TypeId> {
        self.find(&ty.name)
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len() as u32).map(TypeId)
    }

    /// Types declared in the main module, in declaration order.
    pub fn main_types(&self) -> Vec<TypeId> {
        self.ids()
            .filter(|&id| self.get(id).module == self.main_module)
            .collect()
    }

    pub fn is_main(&self, id: TypeId) -> bool {
        self.get(id).module == self.main_module
    }

    pub fn base_of(&self, id: TypeId) -> Option<TypeId> {
        self.get(id).base.as_ref().and_then(|b| self.resolve(b))
    }

    /// Resolvable ancestors of `id`, nearest first. Stops at the first
    /// unresolvable base and never loops on cyclic declarations.
    pub fn base_chain(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(base) = self.base_of(current) {
            if base == id || chain.contains(&base) {
                break;
            }
            chain.push(base);
            current = base;
        }
        chain
    }

    /// Strict subtype test against a full type name.
    pub fn is_derived_from(&self, id: TypeId, ancestor: &str) -> bool {
        self.base_chain(id)
            .into_iter()
            .any(|b| self.get(b).name == ancestor)
    }

    /// `id` is `name` or derives from it.
    pub fn is_assignable_to(&self, id: TypeId, name: &str) -> bool {
        self.get(id).name == name || self.is_derived_from(id, name)
    }

    /// Finds a method on `id` or its nearest ancestor declaring it.
    pub fn find_method(&self, id: TypeId, name: &str) -> Option<(TypeId, &MethodDescriptor)> {
        std::iter::once(id)
            .chain(self.base_chain(id))
            .find_map(|t| self.get(t).method(name).map(|m| (t, m)))
    }
}
