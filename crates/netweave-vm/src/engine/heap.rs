//! Object storage.

use indexmap::IndexMap;
use netweave_bytecode::MethodRef;
use netweave_core::names;

use super::error::RuntimeError;
use super::stream::{Reader, Wire, Writer};
use super::value::{ObjId, Value};

/// Instance of a declared class. Behaviours also carry the state the
/// runtime keeps for them.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub ty: String,
    pub fields: IndexMap<String, Value>,
    pub dirty_bits: i32,
    pub hook_guard: bool,
    pub net_id: u32,
}

impl Instance {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            fields: IndexMap::new(),
            dirty_bits: 0,
            hook_guard: false,
            net_id: 0,
        }
    }
}

/// A synchronized collection and its binding to the owning behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncList {
    pub ty: String,
    pub element: Wire,
    pub items: Vec<Value>,
    pub owner: Option<ObjId>,
    pub routing_id: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Instance(Instance),
    Writer(Writer),
    Reader(Reader),
    List(SyncList),
    /// Invocation list: `(target, method)` pairs, called in order.
    Delegate(Vec<(Value, MethodRef)>),
}

impl Object {
    pub fn type_name(&self) -> &str {
        match self {
            Object::Instance(i) => &i.ty,
            Object::Writer(_) => names::NETWORK_WRITER,
            Object::Reader(_) => names::NETWORK_READER,
            Object::List(l) => &l.ty,
            Object::Delegate(_) => names::MULTICAST_DELEGATE,
        }
    }

    fn mismatch(&self, expected: &'static str) -> RuntimeError {
        RuntimeError::TypeMismatch {
            expected,
            found: self.type_name().to_string(),
        }
    }
}

/// One change to a synchronized collection, as carried on the wire:
/// `[op: u8][index: packed][item]`.
#[derive(Clone, Debug, PartialEq)]
pub enum ListOp {
    Add(Value),
    Clear,
    Insert(usize, Value),
    RemoveAt(usize),
    Set(usize, Value),
}

impl ListOp {
    pub fn code(&self) -> u8 {
        match self {
            ListOp::Add(_) => 0,
            ListOp::Clear => 1,
            ListOp::Insert(..) => 2,
            ListOp::RemoveAt(_) => 4,
            ListOp::Set(..) => 5,
        }
    }

    pub fn encode(&self, w: &mut Writer, element: Wire) -> Result<(), RuntimeError> {
        w.write_bytes(&[self.code()]);
        let (index, item) = match self {
            ListOp::Add(item) => (0, Some(item)),
            ListOp::Clear => (0, None),
            ListOp::Insert(i, item) | ListOp::Set(i, item) => (*i, Some(item)),
            ListOp::RemoveAt(i) => (*i, None),
        };
        w.write_packed(index as u32);
        if let Some(item) = item {
            element.write(w, item)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader, element: Wire) -> Result<Self, RuntimeError> {
        let [code] = r.read_bytes::<1>()?;
        let index = r.read_packed()? as usize;
        Ok(match code {
            0 => ListOp::Add(element.read(r)?),
            1 => ListOp::Clear,
            2 => ListOp::Insert(index, element.read(r)?),
            4 => ListOp::RemoveAt(index),
            5 => ListOp::Set(index, element.read(r)?),
            other => return Err(RuntimeError::UnknownListOp(other)),
        })
    }

    pub fn apply(self, items: &mut Vec<Value>) -> Result<(), RuntimeError> {
        let len = items.len();
        let out_of_range = |index| RuntimeError::ListIndex { index, len };
        match self {
            ListOp::Add(item) => items.push(item),
            ListOp::Clear => items.clear(),
            ListOp::Insert(i, item) if i <= len => items.insert(i, item),
            ListOp::RemoveAt(i) if i < len => {
                items.remove(i);
            }
            ListOp::Set(i, item) if i < len => items[i] = item,
            ListOp::Insert(i, _) | ListOp::RemoveAt(i) | ListOp::Set(i, _) => {
                return Err(out_of_range(i));
            }
        }
        Ok(())
    }
}

/// Append-only object arena.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    pub fn alloc(&mut self, object: Object) -> ObjId {
        let id = ObjId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn get_mut(&mut self, id: ObjId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    /// Runtime type name of an object.
    pub fn type_name(&self, id: ObjId) -> &str {
        self.get(id).type_name()
    }

    pub fn instance(&self, id: ObjId) -> Result<&Instance, RuntimeError> {
        match self.get(id) {
            Object::Instance(i) => Ok(i),
            other => Err(other.mismatch("class instance")),
        }
    }

    pub fn instance_mut(&mut self, id: ObjId) -> Result<&mut Instance, RuntimeError> {
        match &mut self.objects[id.index()] {
            Object::Instance(i) => Ok(i),
            other => Err(other.mismatch("class instance")),
        }
    }

    pub fn writer_mut(&mut self, id: ObjId) -> Result<&mut Writer, RuntimeError> {
        match &mut self.objects[id.index()] {
            Object::Writer(w) => Ok(w),
            other => Err(other.mismatch("writer")),
        }
    }

    pub fn reader_mut(&mut self, id: ObjId) -> Result<&mut Reader, RuntimeError> {
        match &mut self.objects[id.index()] {
            Object::Reader(r) => Ok(r),
            other => Err(other.mismatch("reader")),
        }
    }

    pub fn list(&self, id: ObjId) -> Result<&SyncList, RuntimeError> {
        match self.get(id) {
            Object::List(l) => Ok(l),
            other => Err(other.mismatch("synchronized collection")),
        }
    }

    pub fn list_mut(&mut self, id: ObjId) -> Result<&mut SyncList, RuntimeError> {
        match &mut self.objects[id.index()] {
            Object::List(l) => Ok(l),
            other => Err(other.mismatch("synchronized collection")),
        }
    }
}
