use std::fmt;

use serde::{Deserialize, Serialize};

use crate::names;

/// Reference to a declared type by full name.
///
/// Generic definitions carry their arity in the name (`Net.SyncList`1`);
/// instantiations list their arguments in `args`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub args: Vec<TypeRef>,
    #[serde(default)]
    pub array: bool,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array: false,
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            array: false,
        }
    }

    pub fn array_of(element: TypeRef) -> Self {
        Self {
            array: true,
            ..element
        }
    }

    pub fn void() -> Self {
        Self::named(names::VOID)
    }

    /// Element type of an array reference; identity for non-arrays.
    pub fn element(&self) -> TypeRef {
        Self {
            array: false,
            ..self.clone()
        }
    }

    /// True for a plain (non-array, non-generic) reference to `name`.
    pub fn is(&self, name: &str) -> bool {
        !self.array && self.args.is_empty() && self.name == name
    }

    pub fn is_void(&self) -> bool {
        self.is(names::VOID)
    }

    pub fn is_generic_instance(&self) -> bool {
        !self.args.is_empty()
    }

    /// Last dotted segment without generic arity, e.g. `SyncList` for `Net.SyncList`1`.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }
}

/// Last dotted segment of a full type name, without generic arity.
pub fn short_name(full: &str) -> &str {
    let tail = full.rsplit('.').next().unwrap_or(full);
    tail.split('`').next().unwrap_or(tail)
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}
