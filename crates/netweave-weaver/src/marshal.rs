//! Type-keyed table of wire marshalling functions.

use indexmap::IndexMap;
use netweave_bytecode::MethodRef;
use netweave_core::{TypeRef, names, short_name};

/// Writer and reader entry points for one wire type.
///
/// `write` is called as `writer.Write(value)`, `read` as `reader.Read() -> value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarshalFns {
    pub write: MethodRef,
    pub read: MethodRef,
}

/// Lookup of marshalling functions by type.
///
/// An unresolved type is a hard failure for the caller, never a fallback.
pub trait Marshalling {
    fn lookup(&self, ty: &TypeRef) -> Option<&MarshalFns>;
}

/// Statically built [`Marshalling`] table keyed by full type name.
#[derive(Clone, Debug, Default)]
pub struct MarshalRegistry {
    entries: IndexMap<String, MarshalFns>,
}

impl MarshalRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Primitives, strings and the runtime's identity types, each mapped to
    /// `NetworkWriter.Write{Name}` / `NetworkReader.Read{Name}`.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for name in [
            names::BOOLEAN,
            names::CHAR,
            names::BYTE,
            names::SBYTE,
            names::INT16,
            names::UINT16,
            names::INT32,
            names::UINT32,
            names::INT64,
            names::UINT64,
            names::SINGLE,
            names::DOUBLE,
            names::STRING,
            names::VECTOR3,
            names::NETWORK_INSTANCE_ID,
            names::NETWORK_IDENTITY,
            names::GAME_OBJECT,
        ] {
            let short = short_name(name);
            registry.register(
                name,
                MethodRef::new(names::NETWORK_WRITER, format!("Write{short}")),
                MethodRef::new(names::NETWORK_READER, format!("Read{short}")),
            );
        }
        registry
    }

    pub fn register(&mut self, type_name: impl Into<String>, write: MethodRef, read: MethodRef) {
        self.entries
            .insert(type_name.into(), MarshalFns { write, read });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Marshalling for MarshalRegistry {
    fn lookup(&self, ty: &TypeRef) -> Option<&MarshalFns> {
        if ty.array || ty.is_generic_instance() {
            return None;
        }
        self.entries.get(&ty.name)
    }
}
