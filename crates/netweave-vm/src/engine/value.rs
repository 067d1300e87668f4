//! Runtime values.

use std::fmt;

use netweave_bytecode::{FieldRef, MethodRef};

use super::error::RuntimeError;

/// Index of an object on the VM heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub(crate) u32);

impl ObjId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value on the evaluation stack, in a local, or in a field.
///
/// Integers up to 32 bits share `I32`; the declared type decides their
/// wire width.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Vec3([f32; 3]),
    /// Entity identity; 0 is the empty id.
    InstanceId(u32),
    Obj(ObjId),
    /// Managed pointer produced by `ldflda`. `obj` is `None` for statics.
    Addr {
        obj: Option<ObjId>,
        field: FieldRef,
    },
    Type(String),
    Method(MethodRef),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::I32(n) => *n != 0,
            Value::I64(n) => *n != 0,
            Value::InstanceId(id) => *id != 0,
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) => "int",
            Value::I64(_) => "long",
            Value::F32(_) => "float",
            Value::F64(_) => "double",
            Value::Str(_) => "string",
            Value::Vec3(_) => "vector",
            Value::InstanceId(_) => "instance id",
            Value::Obj(_) => "object",
            Value::Addr { .. } => "address",
            Value::Type(_) => "type",
            Value::Method(_) => "method",
        }
    }

    fn mismatch<T>(&self, expected: &'static str) -> Result<T, RuntimeError> {
        Err(RuntimeError::TypeMismatch {
            expected,
            found: format!("{self:?}"),
        })
    }

    /// Integer view; booleans count as 0 / 1.
    pub fn as_i32(&self) -> Result<i32, RuntimeError> {
        match self {
            Value::I32(n) => Ok(*n),
            Value::Bool(b) => Ok(i32::from(*b)),
            other => other.mismatch("int"),
        }
    }

    pub fn as_obj(&self) -> Result<ObjId, RuntimeError> {
        match self {
            Value::Obj(id) => Ok(*id),
            Value::Null => Err(RuntimeError::NullReference),
            other => other.mismatch("object"),
        }
    }

    pub fn as_str(&self) -> Result<&str, RuntimeError> {
        match self {
            Value::Str(s) => Ok(s),
            other => other.mismatch("string"),
        }
    }

    pub fn as_instance_id(&self) -> Result<u32, RuntimeError> {
        match self {
            Value::InstanceId(id) => Ok(*id),
            other => other.mismatch("instance id"),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::I32(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::F32(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<ObjId> for Value {
    fn from(id: ObjId) -> Self {
        Value::Obj(id)
    }
}
